//! Global Otsu thresholding.

use crate::image::{ImageView, OwnedImage};

/// Builds the 256-bin intensity histogram of a view.
pub fn histogram(src: ImageView<'_>) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for row in src.rows() {
        for &v in row {
            hist[v as usize] += 1;
        }
    }
    hist
}

/// Returns the threshold maximizing between-class variance.
///
/// Iterates candidate levels in increasing order and keeps the first strict
/// maximum. Levels where either class is empty are skipped, so a histogram
/// with a single occupied bin yields 0.
pub fn otsu_threshold(hist: &[u32; 256]) -> u8 {
    let total: u64 = hist.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0;
    }
    let scale = 1.0 / total as f64;
    let mu: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum::<f64>()
        * scale;

    let mut q1 = 0.0f64;
    let mut mu1 = 0.0f64;
    let mut max_sigma = 0.0f64;
    let mut best = 0u8;
    for (i, &count) in hist.iter().enumerate() {
        let p_i = count as f64 * scale;
        let q1_prev = q1;
        mu1 *= q1_prev;
        q1 += p_i;
        let q2 = 1.0 - q1;

        if q1.min(q2) < f32::EPSILON as f64 || q1.max(q2) > 1.0 - f32::EPSILON as f64 {
            mu1 = if q1 > 0.0 { (mu1 + i as f64 * p_i) / q1 } else { 0.0 };
            continue;
        }

        mu1 = (mu1 + i as f64 * p_i) / q1;
        let mu2 = (mu - q1 * mu1) / q2;
        let sigma = q1 * q2 * (mu1 - mu2) * (mu1 - mu2);
        if sigma > max_sigma {
            max_sigma = sigma;
            best = i as u8;
        }
    }
    best
}

/// Maps pixels strictly above `thresh` to 255 and the rest to 0.
pub fn binarize(src: ImageView<'_>, thresh: u8) -> OwnedImage {
    let mut data = Vec::with_capacity(src.width() * src.height());
    for row in src.rows() {
        data.extend(row.iter().map(|&v| if v > thresh { 255 } else { 0 }));
    }
    OwnedImage::new(data, src.width(), src.height())
        .expect("binarized output length matches its dimensions")
}

#[cfg(test)]
mod tests {
    use super::{binarize, histogram, otsu_threshold};
    use crate::image::OwnedImage;

    #[test]
    fn two_level_image_splits_between_levels() {
        let img = OwnedImage::from_fn(10, 10, |x, _| if x < 4 { 20 } else { 220 }).unwrap();
        let t = otsu_threshold(&histogram(img.view()));
        assert!((20..220).contains(&t), "threshold {t}");
        let bin = binarize(img.view(), t);
        assert_eq!(bin.data()[0], 0);
        assert_eq!(bin.data()[9], 255);
    }

    #[test]
    fn uniform_image_thresholds_at_zero() {
        let img = OwnedImage::filled(4, 4, 90).unwrap();
        assert_eq!(otsu_threshold(&histogram(img.view())), 0);
    }

    #[test]
    fn three_cluster_threshold_falls_between_clusters() {
        let mut hist = [0u32; 256];
        hist[10] = 50;
        hist[60] = 10;
        hist[200] = 40;
        let t = otsu_threshold(&hist);
        assert!((10..200).contains(&t), "threshold {t}");
    }
}
