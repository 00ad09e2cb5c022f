//! Scalar reference kernel for the normalized squared difference.

use crate::kernel::{normalize_sqdiff, window_sums, Kernel, Placement};
use crate::template::SqdiffPlan;
use crate::util::{GlyphMatchError, GlyphMatchResult};
use crate::ImageView;

/// Scalar normalized squared-difference kernel.
pub struct SqdiffNormedScalar;

/// Returns the largest valid top-left coordinates for `tpl` inside `image`.
fn placement_range(
    image: ImageView<'_>,
    tpl: &SqdiffPlan,
) -> GlyphMatchResult<(usize, usize)> {
    let img_width = image.width();
    let img_height = image.height();
    let tpl_width = tpl.width();
    let tpl_height = tpl.height();
    if img_width < tpl_width || img_height < tpl_height {
        return Err(GlyphMatchError::RoiOutOfBounds {
            x: 0,
            y: 0,
            width: tpl_width,
            height: tpl_height,
            img_width,
            img_height,
        });
    }
    Ok((img_width - tpl_width, img_height - tpl_height))
}

impl Kernel for SqdiffNormedScalar {
    type Plan = SqdiffPlan;

    fn scan_min(image: ImageView<'_>, tpl: &Self::Plan) -> GlyphMatchResult<Placement> {
        let (max_x, max_y) = placement_range(image, tpl)?;
        let sum_t2 = tpl.sum_sq();
        let mut best = Placement {
            x: 0,
            y: 0,
            score: f32::INFINITY,
        };
        for y in 0..=max_y {
            for x in 0..=max_x {
                let (sum_i2, cross) = window_sums(image, tpl, x, y);
                let candidate = Placement {
                    x,
                    y,
                    score: normalize_sqdiff(sum_i2, cross, sum_t2),
                };
                if candidate.improves_on(&best) {
                    best = candidate;
                }
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::{Kernel, SqdiffNormedScalar};
    use crate::image::OwnedImage;
    use crate::template::SqdiffPlan;
    use crate::util::GlyphMatchError;

    fn pattern(width: usize, height: usize) -> OwnedImage {
        OwnedImage::from_fn(width, height, |x, y| ((x * 17 + y * 9 + x * y) & 0xFF) as u8).unwrap()
    }

    #[test]
    fn scan_finds_embedded_patch() {
        let image = pattern(9, 7);
        let patch = image.view().roi(4, 2, 3, 3).unwrap().to_owned_image();
        let plan = SqdiffPlan::from_view(patch.view());

        let best = <SqdiffNormedScalar as Kernel>::scan_min(image.view(), &plan).unwrap();
        assert_eq!((best.x, best.y), (4, 2));
        assert_eq!(best.score, 0.0);
    }

    #[test]
    fn scan_matches_bruteforce() {
        let image = pattern(6, 5);
        let tpl = OwnedImage::from_fn(3, 2, |x, y| ((x * 5 + y * 11 + x * y) & 0xFF) as u8).unwrap();
        let plan = SqdiffPlan::from_view(tpl.view());
        let best = <SqdiffNormedScalar as Kernel>::scan_min(image.view(), &plan).unwrap();

        let mut expected = (f64::INFINITY, 0, 0);
        for y in 0..=3 {
            for x in 0..=3 {
                let mut num = 0.0f64;
                let mut si = 0.0f64;
                let mut st = 0.0f64;
                for ty in 0..2 {
                    for tx in 0..3 {
                        let i = *image.view().get(x + tx, y + ty).unwrap() as f64;
                        let t = *tpl.view().get(tx, ty).unwrap() as f64;
                        num += (t - i) * (t - i);
                        si += i * i;
                        st += t * t;
                    }
                }
                let score = (num / (si * st).sqrt()).min(1.0);
                if score < expected.0 {
                    expected = (score, x, y);
                }
            }
        }
        assert_eq!((best.x, best.y), (expected.1, expected.2));
        assert!((best.score as f64 - expected.0).abs() < 1e-6);
    }

    #[test]
    fn equal_sizes_have_one_placement() {
        let image = pattern(5, 4);
        let plan = SqdiffPlan::from_view(pattern(5, 4).view());
        let best = <SqdiffNormedScalar as Kernel>::scan_min(image.view(), &plan).unwrap();
        assert_eq!((best.x, best.y, best.score), (0, 0, 0.0));
    }

    #[test]
    fn oversized_template_is_rejected() {
        let image = pattern(3, 3);
        let plan = SqdiffPlan::from_view(pattern(4, 3).view());
        let err = <SqdiffNormedScalar as Kernel>::scan_min(image.view(), &plan).unwrap_err();
        assert!(matches!(err, GlyphMatchError::RoiOutOfBounds { .. }));
    }
}
