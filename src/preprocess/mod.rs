//! Glyph normalization: resize, blur, binarize.
//!
//! Every glyph that is matched and every template that is stored goes through
//! the same [`Preprocessor`]; scores are only comparable because both sides
//! share the target size and the blur/threshold steps.

pub mod blur;
pub mod resize;
pub mod threshold;

use crate::image::{GlyphImage, ImageView};
use crate::util::{GlyphMatchError, GlyphMatchResult};

pub use blur::gaussian_blur_3x3;
pub use resize::resize_bilinear;
pub use threshold::{binarize, histogram, otsu_threshold};

/// Target glyph geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreprocessConfig {
    /// Output width in pixels.
    pub width: usize,
    /// Output height in pixels.
    pub height: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 50,
        }
    }
}

/// Normalizes arbitrary grayscale crops into fixed-size binary glyphs.
#[derive(Clone, Copy, Debug)]
pub struct Preprocessor {
    cfg: PreprocessConfig,
}

impl Preprocessor {
    /// Creates a preprocessor, rejecting zero-sized targets.
    pub fn new(cfg: PreprocessConfig) -> GlyphMatchResult<Self> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(GlyphMatchError::InvalidDimensions {
                width: cfg.width,
                height: cfg.height,
            });
        }
        Ok(Self { cfg })
    }

    /// Returns the configuration.
    pub fn config(&self) -> PreprocessConfig {
        self.cfg
    }

    /// Resizes, blurs and binarizes `src` into a glyph of the configured size.
    pub fn apply(&self, src: ImageView<'_>) -> GlyphImage {
        let resized = resize_bilinear(src, self.cfg.width, self.cfg.height);
        let blurred = gaussian_blur_3x3(resized.view());
        let thresh = otsu_threshold(&histogram(blurred.view()));
        GlyphImage::from_binary(binarize(blurred.view(), thresh))
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            cfg: PreprocessConfig::default(),
        }
    }
}
