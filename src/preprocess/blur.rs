//! 3x3 Gaussian blur with automatic sigma.
//!
//! For a 3-tap kernel the automatic sigma is `0.3 * ((3 - 1) * 0.5 - 1) + 0.8 = 0.8`,
//! whose normalized taps are the binomial `[1, 2, 1] / 4`. The filter is applied
//! separably in integer arithmetic with reflect-101 borders (`dcb|abcd|cba`)
//! and rounds to nearest.

use crate::image::{ImageView, OwnedImage};

const TAPS: [u32; 3] = [1, 2, 1];

/// Mirror an out-of-range neighbor index without repeating the edge pixel.
fn reflect101(idx: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let idx = if idx < 0 {
        -idx
    } else if idx > last {
        2 * last - idx
    } else {
        idx
    };
    idx as usize
}

/// Applies the 3x3 Gaussian to a grayscale view.
pub fn gaussian_blur_3x3(src: ImageView<'_>) -> OwnedImage {
    let width = src.width();
    let height = src.height();

    let mut horizontal = vec![0u32; width * height];
    for (y, row) in src.rows().enumerate() {
        let out = &mut horizontal[y * width..(y + 1) * width];
        for (x, slot) in out.iter_mut().enumerate() {
            *slot = TAPS
                .iter()
                .enumerate()
                .map(|(k, &w)| w * row[reflect101(x as isize + k as isize - 1, width)] as u32)
                .sum();
        }
    }

    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let sum: u32 = TAPS
                .iter()
                .enumerate()
                .map(|(k, &w)| {
                    let yy = reflect101(y as isize + k as isize - 1, height);
                    w * horizontal[yy * width + x]
                })
                .sum();
            data.push(((sum + 8) >> 4) as u8);
        }
    }

    OwnedImage::new(data, width, height).expect("blur output length matches its dimensions")
}

#[cfg(test)]
mod tests {
    use super::{gaussian_blur_3x3, reflect101};
    use crate::image::OwnedImage;

    #[test]
    fn reflect101_mirrors_without_edge_repeat() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(2, 5), 2);
        assert_eq!(reflect101(-1, 1), 0);
    }

    #[test]
    fn constant_image_is_unchanged() {
        let img = OwnedImage::filled(6, 4, 123).unwrap();
        assert_eq!(gaussian_blur_3x3(img.view()), img);
    }

    #[test]
    fn vertical_edge_softens_symmetrically() {
        let img = OwnedImage::from_fn(6, 3, |x, _| if x < 3 { 0 } else { 255 }).unwrap();
        let out = gaussian_blur_3x3(img.view());
        let row = &out.data()[0..6];
        // 255 / 4 = 63.75 and 255 * 3 / 4 = 191.25, rounded.
        assert_eq!(row, &[0, 0, 64, 191, 255, 255]);
    }

    #[test]
    fn isolated_pixel_spreads_binomially() {
        let img = OwnedImage::from_fn(5, 5, |x, y| if x == 2 && y == 2 { 160 } else { 0 }).unwrap();
        let out = gaussian_blur_3x3(img.view());
        let inner: Vec<u8> = (1..4)
            .flat_map(|y| out.data()[y * 5 + 1..y * 5 + 4].to_vec())
            .collect();
        assert_eq!(inner, vec![10, 20, 10, 20, 40, 20, 10, 20, 10]);
        assert_eq!(out.data()[0], 0);
    }
}
