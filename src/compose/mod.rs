/// Composition module
///
/// This module turns a decoded screenshot into a finished mockup raster:
/// - Rectangle mapping and rounded-corner math (geometry.rs)
/// - The single composition pipeline (engine.rs)
/// - The procedural fallback bezel (bezel.rs)

pub mod bezel;
pub mod engine;
pub mod geometry;
