//! Normalized squared-difference kernels.
//!
//! For a template `T` placed at `(x, y)` over image `I` the score is
//!
//! ```text
//! R(x, y) = sum (T - I)^2 / sqrt(sum T^2 * sum I^2)
//! ```
//!
//! where the sums run over the template footprint. Lower is better; 0 is an
//! exact match. Scans report the minimum over all valid placements.

use crate::template::SqdiffPlan;
use crate::util::GlyphMatchResult;
use crate::ImageView;

/// Best (lowest-scoring) placement of a template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// X coordinate (column) of the template's top-left corner.
    pub x: usize,
    /// Y coordinate (row) of the template's top-left corner.
    pub y: usize,
    /// Normalized squared difference at the placement, in `[0, 1]`.
    pub score: f32,
}

impl Placement {
    /// Returns true if `self` should replace `best`: lower score, then
    /// row-major order.
    pub(crate) fn improves_on(&self, best: &Placement) -> bool {
        self.score
            .total_cmp(&best.score)
            .then_with(|| self.y.cmp(&best.y))
            .then_with(|| self.x.cmp(&best.x))
            .is_lt()
    }
}

/// Kernel trait for scan operations.
pub trait Kernel {
    type Plan;

    /// Scans the full valid placement range and returns the best placement.
    fn scan_min(image: ImageView<'_>, plan: &Self::Plan) -> GlyphMatchResult<Placement>;
}

/// Turns raw sums into the normalized score.
///
/// A numerator at or above the normalizer (including the all-zero case where
/// both energies vanish) saturates to 1, the worst score.
pub(crate) fn normalize_sqdiff(sum_i2: f64, cross: f64, sum_t2: f64) -> f32 {
    let num = (sum_i2 - 2.0 * cross + sum_t2).max(0.0);
    let denom = sum_i2.sqrt() * sum_t2.sqrt();
    if num < denom {
        (num / denom) as f32
    } else {
        1.0
    }
}

/// Window sums for one placement: `(sum I^2, sum I*T)`.
#[inline]
pub(crate) fn window_sums(image: ImageView<'_>, plan: &SqdiffPlan, x: usize, y: usize) -> (f64, f64) {
    let tpl_width = plan.width();
    let values = plan.values();
    let mut sum_i2 = 0.0f64;
    let mut cross = 0.0f64;
    for ty in 0..plan.height() {
        let img_row = image.row(y + ty).expect("row within bounds for scan");
        let tpl_row = &values[ty * tpl_width..(ty + 1) * tpl_width];
        for (&t, &i) in tpl_row.iter().zip(&img_row[x..x + tpl_width]) {
            let i = i as f64;
            sum_i2 += i * i;
            cross += i * t as f64;
        }
    }
    (sum_i2, cross)
}

pub mod scalar;

#[cfg(test)]
mod tests {
    use super::{normalize_sqdiff, Placement};

    #[test]
    fn identical_windows_score_zero() {
        assert_eq!(normalize_sqdiff(100.0, 100.0, 100.0), 0.0);
    }

    #[test]
    fn empty_energy_saturates_to_worst() {
        assert_eq!(normalize_sqdiff(0.0, 0.0, 0.0), 1.0);
        assert_eq!(normalize_sqdiff(0.0, 0.0, 65025.0), 1.0);
    }

    #[test]
    fn disjoint_binary_windows_saturate() {
        // Two non-overlapping white pixels: num = 2 * 255^2, denom = 255^2.
        let e = 255.0f64 * 255.0;
        assert_eq!(normalize_sqdiff(e, 0.0, e), 1.0);
    }

    #[test]
    fn placement_order_prefers_lower_then_row_major() {
        let best = Placement { x: 3, y: 1, score: 0.2 };
        assert!(Placement { x: 9, y: 9, score: 0.1 }.improves_on(&best));
        assert!(Placement { x: 5, y: 0, score: 0.2 }.improves_on(&best));
        assert!(!Placement { x: 4, y: 1, score: 0.2 }.improves_on(&best));
    }
}
