//! Error types for onsight.

use thiserror::Error;

/// Result alias for onsight operations.
pub type OnsightResult<T> = std::result::Result<T, OnsightError>;

/// Errors raised by image handling, capture, input, and configuration.
///
/// Search results are not errors: a locate call reports its result as a
/// [`SearchOutcome`](crate::locate::SearchOutcome).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OnsightError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Backing buffer cannot hold the described image.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Template cannot be correlated (e.g. a flat image).
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Template does not fit inside the captured screen.
    #[error("template {tpl_width}x{tpl_height} larger than screen {img_width}x{img_height}")]
    TemplateLargerThanScreen {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Reading or decoding an image file failed.
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
    /// Capturing the screen failed.
    #[error("screen capture failed: {reason}")]
    Capture { reason: String },
    /// Pointer input could not be delivered.
    #[error("pointer input failed: {reason}")]
    Input { reason: String },
    /// A similarity value is outside `[0.0, 1.0]`.
    #[error("similarity {value} is outside [0.0, 1.0]")]
    InvalidSimilarity { value: f32 },
    /// Configuration is structurally invalid.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
    /// Configuration file could not be read or parsed.
    #[error("config load failed for {path}: {reason}")]
    ConfigLoad { path: String, reason: String },
}

/// An interruptible wait was cancelled before it completed.
#[derive(Clone, Copy, Debug, Default, Error, PartialEq, Eq)]
#[error("wait was cancelled")]
pub struct Cancelled;
