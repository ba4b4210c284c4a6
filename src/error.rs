/// Error types for the mockup pipeline
///
/// Failures are isolated to the smallest possible unit: one file, one
/// composition call, one import entry. Nothing here aborts a whole batch.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while composing and exporting mockups
#[derive(Error, Debug)]
pub enum Error {
    /// A source file could not be decoded as an image
    #[error("failed to decode '{name}': {reason}")]
    Decode { name: String, reason: String },

    /// A preset with zero or negative area was passed to the engine
    #[error("invalid preset dimensions {width}x{height}")]
    InvalidPreset { width: u32, height: u32 },

    /// An identifier matched no catalog preset
    #[error("unknown preset id '{0}'")]
    UnknownPreset(String),

    /// Two or more presets share the requested pixel dimensions
    #[error("ambiguous dimensions {width}x{height}: matches {matches:?}")]
    AmbiguousDimensions {
        width: u32,
        height: u32,
        matches: Vec<String>,
    },

    /// A batch run was started with no files or no presets selected
    #[error("nothing to process: select at least one file and one preset")]
    EmptySelection,

    /// Filesystem error while reading inputs or writing artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encode/decode error from the image crate
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
