//! Image views and owned grayscale buffers.
//!
//! Every image in the pipeline is 8-bit grayscale. `ImageView` is a borrowed
//! 2D view into a 1D pixel buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the parent stride; the
//! segmenter relies on this to cut glyph cells without copying.

use crate::util::{GlyphMatchError, GlyphMatchResult};

pub mod io;

/// Borrowed 8-bit grayscale view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> GlyphMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> GlyphMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(GlyphMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Iterates over all rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.height).filter_map(move |y| self.row(y))
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> GlyphMatchResult<ImageView<'a>> {
        if width == 0 || height == 0 {
            return Err(GlyphMatchError::InvalidDimensions { width, height });
        }

        let out_of_bounds = GlyphMatchError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(GlyphMatchError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self
            .data
            .get(start..)
            .ok_or(GlyphMatchError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }

    /// Copies the view into a contiguous owned image.
    pub fn to_owned_image(&self) -> OwnedImage {
        let mut data = Vec::with_capacity(self.width * self.height);
        for row in self.rows() {
            data.extend_from_slice(row);
        }
        OwnedImage {
            data,
            width: self.width,
            height: self.height,
        }
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> GlyphMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(GlyphMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(GlyphMatchError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(GlyphMatchError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a row-major buffer whose length is exactly `width * height`.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> GlyphMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlyphMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(GlyphMatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(GlyphMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(GlyphMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image filled with a single value.
    pub fn filled(width: usize, height: usize, value: u8) -> GlyphMatchResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(GlyphMatchError::InvalidDimensions { width, height })?;
        Self::new(vec![value; len], width, height)
    }

    /// Builds an image from a per-pixel function.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> u8,
    ) -> GlyphMatchResult<Self> {
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns the row-major pixel buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

/// A preprocessed glyph: fixed size, binary (0 or 255), immutable.
///
/// Only the preprocessor produces glyph images, which keeps templates and
/// submitted glyphs comparable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphImage {
    img: OwnedImage,
}

impl GlyphImage {
    pub(crate) fn from_binary(img: OwnedImage) -> Self {
        debug_assert!(img.data().iter().all(|&v| v == 0 || v == 255));
        Self { img }
    }

    /// Returns the glyph width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the glyph height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        self.img.data()
    }

    /// Returns a borrowed view of the glyph.
    pub fn view(&self) -> ImageView<'_> {
        self.img.view()
    }
}
