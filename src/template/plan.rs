//! Template plan precomputation for the normalized squared-difference metric.

use crate::image::ImageView;

/// Contiguous template pixels plus their sum of squares.
///
/// The image side of the metric still needs a per-window sum of squares and a
/// cross term, but the template energy is fixed and computed once here.
#[derive(Clone, Debug)]
pub struct SqdiffPlan {
    width: usize,
    height: usize,
    sum_sq: f64,
    values: Vec<f32>,
}

impl SqdiffPlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_>) -> Self {
        let width = tpl.width();
        let height = tpl.height();
        let mut values = Vec::with_capacity(width * height);
        let mut sum_sq = 0.0f64;
        for row in tpl.rows() {
            for &value in row {
                let v = value as f64;
                sum_sq += v * v;
                values.push(value as f32);
            }
        }
        Self {
            width,
            height,
            sum_sq,
            values,
        }
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the sum of squared template intensities.
    pub fn sum_sq(&self) -> f64 {
        self.sum_sq
    }

    /// Returns the template pixels in row-major order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
