//! Error types for glyphmatch.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for glyphmatch operations.
pub type GlyphMatchResult<T> = std::result::Result<T, GlyphMatchError>;

/// Errors that can occur while preprocessing, matching or storing glyphs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GlyphMatchError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Width or height is zero or overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than the row width.
    #[error("stride {stride} is smaller than width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer does not cover the described image.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// ROI does not fit inside the image.
    #[error("roi ({x}, {y}, {width}x{height}) is outside a {img_width}x{img_height} image")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The captcha is narrower than the number of glyph cells.
    #[error("image width {width} cannot be split into {num_chars} glyphs")]
    ImageTooNarrow { width: usize, num_chars: usize },
    /// A label character is not a single ASCII alphanumeric character.
    #[error("invalid label {label:?}: expected ASCII alphanumeric characters")]
    InvalidLabel { label: String },
    /// Label length differs from the number of segmented glyphs.
    #[error("label has {label_len} characters but {glyphs} glyphs were segmented")]
    LabelLengthMismatch { label_len: usize, glyphs: usize },
    /// Image decoding or encoding failed.
    #[error("image i/o failed: {reason}")]
    ImageIo { reason: String },
    /// File system access failed.
    #[error("i/o failed for {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },
}

impl GlyphMatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Returns true when the error was caused by caller-supplied input
    /// (undecodable image, bad label, wrong glyph count).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::InvalidDimensions { .. }
                | Self::ImageTooNarrow { .. }
                | Self::InvalidLabel { .. }
                | Self::LabelLengthMismatch { .. }
                | Self::ImageIo { .. }
        )
    }
}
