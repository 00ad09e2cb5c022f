//! Scoring a glyph against a single template.

use crate::image::GlyphImage;
use crate::kernel::scalar::SqdiffNormedScalar;
use crate::kernel::Kernel;
use crate::template::{SqdiffPlan, Template};

/// Best normalized squared difference between `glyph` and `template`.
///
/// The smaller image slides over the larger one: the template over the glyph
/// when it fits, otherwise the glyph over the template when the glyph is
/// smaller in both dimensions. Returns `None` when neither contains the other.
/// Preprocessed glyphs and templates share one size, which reduces this to a
/// single comparison.
pub fn score_template(glyph: &GlyphImage, template: &Template) -> Option<f32> {
    let (gw, gh) = (glyph.width(), glyph.height());
    let plan = template.plan();
    let (tw, th) = (plan.width(), plan.height());

    let placement = if gw >= tw && gh >= th {
        <SqdiffNormedScalar as Kernel>::scan_min(glyph.view(), plan)
    } else if gw <= tw && gh <= th {
        let glyph_plan = SqdiffPlan::from_view(glyph.view());
        <SqdiffNormedScalar as Kernel>::scan_min(template.view(), &glyph_plan)
    } else {
        return None;
    };
    placement.ok().map(|p| p.score)
}
