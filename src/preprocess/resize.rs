//! Bilinear resampling for grayscale `u8` images.
//!
//! Sampling is pixel-center aligned: destination pixel `d` reads source
//! coordinate `(d + 0.5) * scale - 0.5`, clamped to the image. Identical sizes
//! copy through unchanged.

use crate::image::{ImageView, OwnedImage};

#[derive(Clone, Copy)]
struct Tap {
    lo: usize,
    hi: usize,
    frac: f32,
}

fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let scale = src_len as f32 / dst_len as f32;
    let last = src_len - 1;
    (0..dst_len)
        .map(|d| {
            let pos = (d as f32 + 0.5) * scale - 0.5;
            if pos <= 0.0 {
                return Tap {
                    lo: 0,
                    hi: 0,
                    frac: 0.0,
                };
            }
            let lo = pos.floor() as usize;
            if lo >= last {
                return Tap {
                    lo: last,
                    hi: last,
                    frac: 0.0,
                };
            }
            Tap {
                lo,
                hi: lo + 1,
                frac: pos - lo as f32,
            }
        })
        .collect()
}

/// Resizes `src` to `dst_width x dst_height` with bilinear interpolation.
///
/// Both destination dimensions must be non-zero; the preprocessor validates
/// its configuration before calling this.
pub fn resize_bilinear(src: ImageView<'_>, dst_width: usize, dst_height: usize) -> OwnedImage {
    debug_assert!(dst_width > 0 && dst_height > 0);
    if src.width() == dst_width && src.height() == dst_height {
        return src.to_owned_image();
    }

    let xs = taps(src.width(), dst_width);
    let ys = taps(src.height(), dst_height);
    let mut data = Vec::with_capacity(dst_width * dst_height);
    for ty in &ys {
        let row_lo = src.row(ty.lo).expect("row within bounds for resize");
        let row_hi = src.row(ty.hi).expect("row within bounds for resize");
        for tx in &xs {
            let top = row_lo[tx.lo] as f32 * (1.0 - tx.frac) + row_lo[tx.hi] as f32 * tx.frac;
            let bottom = row_hi[tx.lo] as f32 * (1.0 - tx.frac) + row_hi[tx.hi] as f32 * tx.frac;
            let value = top * (1.0 - ty.frac) + bottom * ty.frac;
            data.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    OwnedImage::new(data, dst_width, dst_height)
        .expect("resize output length matches its dimensions")
}
