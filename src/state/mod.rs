/// Session state module
///
/// This module owns all mutable per-session state:
/// - Margin records keyed by preset id (margins.rs)
/// - Uploaded bezel rasters keyed by preset id (bezels.rs)
/// - The session object tying both together (session.rs)
///
/// Both maps share the preset identifier space but are independent: a
/// preset may have a margin and no bezel asset, or the other way around.

pub mod bezels;
pub mod margins;
pub mod session;
