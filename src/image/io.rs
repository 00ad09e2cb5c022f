//! Conversions between glyphmatch buffers and the `image` crate, plus
//! decoding, loading and PNG writing helpers.

use crate::image::{ImageView, OwnedImage};
use crate::util::{GlyphMatchError, GlyphMatchResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> GlyphMatchResult<ImageView<'_>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> GlyphMatchResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> GlyphMatchResult<OwnedImage> {
    let gray = img.to_luma8();
    owned_from_gray_image(&gray)
}

/// Decodes an in-memory encoded image (PNG, JPEG, ...) to grayscale.
pub fn decode_gray_image(bytes: &[u8]) -> GlyphMatchResult<OwnedImage> {
    let img = image::load_from_memory(bytes).map_err(|err| GlyphMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> GlyphMatchResult<OwnedImage> {
    let img = image::open(path).map_err(|err| GlyphMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Copies a view into an `image::GrayImage`.
pub fn to_gray_image(view: ImageView<'_>) -> GlyphMatchResult<image::GrayImage> {
    let owned = view.to_owned_image();
    let width = u32::try_from(owned.width()).map_err(|_| GlyphMatchError::InvalidDimensions {
        width: owned.width(),
        height: owned.height(),
    })?;
    let height = u32::try_from(owned.height()).map_err(|_| GlyphMatchError::InvalidDimensions {
        width: owned.width(),
        height: owned.height(),
    })?;
    image::GrayImage::from_raw(width, height, owned.into_data())
        .ok_or(GlyphMatchError::InvalidInput("gray buffer does not match its size"))
}

/// Writes a grayscale view to disk; the format follows the file extension.
pub fn save_gray_image<P: AsRef<Path>>(path: P, view: ImageView<'_>) -> GlyphMatchResult<()> {
    let gray = to_gray_image(view)?;
    gray.save(path.as_ref())
        .map_err(|err| GlyphMatchError::ImageIo {
            reason: format!("{}: {err}", path.as_ref().display()),
        })
}

/// Encodes a grayscale view as PNG bytes.
pub fn encode_png(view: ImageView<'_>) -> GlyphMatchResult<Vec<u8>> {
    let gray = to_gray_image(view)?;
    let mut out = std::io::Cursor::new(Vec::new());
    gray.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|err| GlyphMatchError::ImageIo {
            reason: err.to_string(),
        })?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::{decode_gray_image, encode_png};
    use crate::image::OwnedImage;
    use crate::util::GlyphMatchError;

    #[test]
    fn png_bytes_decode_back_to_same_pixels() {
        let img = OwnedImage::from_fn(7, 3, |x, y| (x * 30 + y) as u8).unwrap();
        let bytes = encode_png(img.view()).unwrap();
        let decoded = decode_gray_image(&bytes).unwrap();
        assert_eq!(decoded, img);
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let err = decode_gray_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, GlyphMatchError::ImageIo { .. }));
    }
}
