//! Fixed-count, equal-width glyph segmentation.
//!
//! A captcha of width `W` is cut into `N` full-height cells of width
//! `floor(W / N)`, left to right. The `W mod N` rightmost columns are never
//! assigned to a cell. Skewed or variable-width captchas are not supported:
//! nothing here can detect them, they simply segment badly.

use crate::image::io::save_gray_image;
use crate::image::{GlyphImage, ImageView};
use crate::preprocess::Preprocessor;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{GlyphMatchError, GlyphMatchResult};
use std::path::PathBuf;

/// Segmentation parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentConfig {
    /// Number of glyph cells in a captcha.
    pub num_chars: usize,
    /// When set, raw cells are written here as `char_<i>.png` before
    /// preprocessing.
    pub debug_dir: Option<PathBuf>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            num_chars: 4,
            debug_dir: None,
        }
    }
}

/// Splits captchas into preprocessed glyphs.
#[derive(Clone, Debug)]
pub struct Segmenter {
    cfg: SegmentConfig,
    preprocessor: Preprocessor,
}

impl Segmenter {
    /// Creates a segmenter; `num_chars` must be at least 1.
    pub fn new(cfg: SegmentConfig, preprocessor: Preprocessor) -> GlyphMatchResult<Self> {
        if cfg.num_chars == 0 {
            return Err(GlyphMatchError::InvalidInput("num_chars must be at least 1"));
        }
        Ok(Self { cfg, preprocessor })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SegmentConfig {
        &self.cfg
    }

    /// Returns the number of cells produced per captcha.
    pub fn num_chars(&self) -> usize {
        self.cfg.num_chars
    }

    /// Returns the raw cells as zero-copy views.
    pub fn split<'a>(&self, image: ImageView<'a>) -> GlyphMatchResult<Vec<ImageView<'a>>> {
        split_equal_width(image, self.cfg.num_chars)
    }

    /// Splits `image` into cells and preprocesses each one.
    pub fn segment(&self, image: ImageView<'_>) -> GlyphMatchResult<Vec<GlyphImage>> {
        let _span = trace_span!(
            "segment",
            width = image.width(),
            height = image.height(),
            cells = self.cfg.num_chars
        )
        .entered();

        let cells = self.split(image)?;
        if let Some(dir) = &self.cfg.debug_dir {
            dump_cells(dir, &cells);
        }
        Ok(cells
            .into_iter()
            .map(|cell| self.preprocessor.apply(cell))
            .collect())
    }
}

/// Cuts `image` into `num_chars` full-height cells of width
/// `image.width() / num_chars`.
pub fn split_equal_width(
    image: ImageView<'_>,
    num_chars: usize,
) -> GlyphMatchResult<Vec<ImageView<'_>>> {
    if num_chars == 0 {
        return Err(GlyphMatchError::InvalidInput("num_chars must be at least 1"));
    }
    let cell_width = image.width() / num_chars;
    if cell_width == 0 {
        return Err(GlyphMatchError::ImageTooNarrow {
            width: image.width(),
            num_chars,
        });
    }

    let dropped = image.width() - cell_width * num_chars;
    if dropped > 0 {
        trace_event!("segment_dropped_columns", dropped = dropped);
    }

    (0..num_chars)
        .map(|i| image.roi(i * cell_width, 0, cell_width, image.height()))
        .collect()
}

fn dump_cells(dir: &std::path::Path, cells: &[ImageView<'_>]) {
    if let Err(err) = std::fs::create_dir_all(dir) {
        trace_warn!(
            "segment_debug_dir_failed",
            dir = dir.display().to_string().as_str(),
            error = err.to_string().as_str()
        );
        return;
    }
    for (i, cell) in cells.iter().enumerate() {
        let path = dir.join(format!("char_{i}.png"));
        if let Err(err) = save_gray_image(&path, *cell) {
            trace_warn!(
                "segment_debug_write_failed",
                path = path.display().to_string().as_str(),
                error = err.to_string().as_str()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{split_equal_width, SegmentConfig, Segmenter};
    use crate::image::OwnedImage;
    use crate::preprocess::Preprocessor;
    use crate::util::GlyphMatchError;

    #[test]
    fn cells_are_left_to_right() {
        let img = OwnedImage::from_fn(8, 2, |x, _| x as u8).unwrap();
        let cells = split_equal_width(img.view(), 4).unwrap();
        let firsts: Vec<u8> = cells.iter().map(|c| *c.get(0, 0).unwrap()).collect();
        assert_eq!(firsts, vec![0, 2, 4, 6]);
    }

    #[test]
    fn remainder_columns_are_dropped() {
        let img = OwnedImage::filled(10, 3, 0).unwrap();
        let cells = split_equal_width(img.view(), 4).unwrap();
        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|c| c.width() == 2 && c.height() == 3));
    }

    #[test]
    fn too_narrow_image_is_rejected() {
        let img = OwnedImage::filled(3, 3, 0).unwrap();
        let err = split_equal_width(img.view(), 4).unwrap_err();
        assert_eq!(
            err,
            GlyphMatchError::ImageTooNarrow {
                width: 3,
                num_chars: 4
            }
        );
    }

    #[test]
    fn zero_cells_is_invalid() {
        let cfg = SegmentConfig {
            num_chars: 0,
            debug_dir: None,
        };
        assert!(Segmenter::new(cfg, Preprocessor::default()).is_err());
    }

    #[test]
    fn debug_dump_writes_raw_cells() {
        let dir = tempfile::tempdir().unwrap();
        let debug_dir = dir.path().join("cropped_debug");
        let cfg = SegmentConfig {
            num_chars: 2,
            debug_dir: Some(debug_dir.clone()),
        };
        let segmenter = Segmenter::new(cfg, Preprocessor::default()).unwrap();
        let img = OwnedImage::from_fn(20, 10, |x, _| (x * 10) as u8).unwrap();
        let glyphs = segmenter.segment(img.view()).unwrap();
        assert_eq!(glyphs.len(), 2);
        assert!(debug_dir.join("char_0.png").is_file());
        assert!(debug_dir.join("char_1.png").is_file());
    }
}
