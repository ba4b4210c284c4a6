/// UI widgets
///
/// Only the margin editor preview needs custom drawing; everything else in
/// the window is stock iced widgets built in main.rs.

pub mod editor_canvas;
