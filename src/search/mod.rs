//! Nearest-template classification of preprocessed glyphs.
//!
//! Every template of every label is scored with the normalized squared
//! difference (lower is better). Scores are aggregated per label, the label
//! with the lowest aggregate wins, and the confidence is
//! `clamp((1 - score) * 100, 0, 100)`. Ties go to the label that comes first
//! in the store's ordering (ASCII order); callers should not depend on that.

mod score;

pub use score::score_template;

use crate::image::GlyphImage;
use crate::store::TemplateSet;
use crate::template::{Label, Template};
use crate::trace::{trace_event, trace_span};
use std::fmt;

/// Symbol reported for glyphs that could not be classified.
pub const UNKNOWN_SYMBOL: char = '?';

/// How template scores are combined into one score per label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelAggregation {
    /// Best single template. One excellent template decides, and weak
    /// templates in the same label do no harm.
    Min,
    /// Mean of the `n` best templates (clamped to at least 1).
    TopMean(usize),
}

/// Optional rejection of weak or ambiguous winners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RejectConfig {
    /// Winning scores above this are reported as unknown.
    pub max_score: f32,
    /// Winners closer than this to the runner-up label are reported as
    /// unknown.
    pub min_margin: f32,
}

impl Default for RejectConfig {
    fn default() -> Self {
        Self {
            max_score: 0.4,
            min_margin: 0.02,
        }
    }
}

/// Matcher configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchConfig {
    /// Per-label score aggregation.
    pub aggregation: LabelAggregation,
    /// Score labels in parallel (requires the `rayon` feature; ignored
    /// otherwise).
    pub parallel: bool,
    /// Rejection thresholds; `None` always reports the best label.
    pub reject: Option<RejectConfig>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            aggregation: LabelAggregation::Min,
            parallel: false,
            reject: None,
        }
    }
}

/// Aggregate score of one label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelScore {
    pub label: Label,
    pub score: f32,
}

/// Classification of one glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    /// Winning label, or `None` for unknown.
    pub label: Option<Label>,
    /// Winning aggregate score, if any label produced one.
    pub score: Option<f32>,
    /// Confidence in `[0, 100]`.
    pub confidence: f32,
}

impl MatchResult {
    /// The unknown marker with zero confidence.
    pub fn unknown() -> Self {
        Self {
            label: None,
            score: None,
            confidence: 0.0,
        }
    }

    /// Returns true if no label was assigned.
    pub fn is_unknown(&self) -> bool {
        self.label.is_none()
    }

    /// Returns the label character or [`UNKNOWN_SYMBOL`].
    pub fn symbol(&self) -> char {
        self.label.map_or(UNKNOWN_SYMBOL, Label::as_char)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0}%)", self.symbol(), self.confidence)
    }
}

/// Converts a winning score into a 0-100 confidence.
pub fn confidence_from_score(score: f32) -> f32 {
    ((1.0 - score) * 100.0).clamp(0.0, 100.0)
}

/// Glyph classifier over template snapshots.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Matcher {
    /// Creates a matcher with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Scores every label, best first. Labels whose templates all fail to
    /// produce a score are omitted.
    pub fn rank(&self, glyph: &GlyphImage, set: &TemplateSet) -> Vec<LabelScore> {
        let mut ranked = self.score_labels(glyph, set);
        // Stable: equal scores keep label order.
        ranked.sort_by(|a, b| a.score.total_cmp(&b.score));
        ranked
    }

    /// Classifies one preprocessed glyph. Never fails: an empty store yields
    /// the unknown marker.
    pub fn match_glyph(&self, glyph: &GlyphImage, set: &TemplateSet) -> MatchResult {
        let _span = trace_span!("match_glyph", labels = set.num_labels()).entered();
        self.decide(&self.rank(glyph, set))
    }

    /// Classifies a glyph from its ranking, as returned by [`Matcher::rank`].
    pub fn decide(&self, ranked: &[LabelScore]) -> MatchResult {
        let Some(best) = ranked.first().copied() else {
            return MatchResult::unknown();
        };

        if let Some(reject) = self.cfg.reject {
            let runner_up = ranked.get(1).map(|r| r.score);
            let weak = best.score > reject.max_score;
            let ambiguous = runner_up.is_some_and(|s| s - best.score < reject.min_margin);
            if weak || ambiguous {
                return MatchResult {
                    label: None,
                    score: Some(best.score),
                    confidence: 0.0,
                };
            }
        }

        let confidence = confidence_from_score(best.score);
        trace_event!(
            "best_match",
            label = best.label.to_string().as_str(),
            score = best.score as f64,
            confidence = confidence as f64
        );
        MatchResult {
            label: Some(best.label),
            score: Some(best.score),
            confidence,
        }
    }

    fn score_labels(&self, glyph: &GlyphImage, set: &TemplateSet) -> Vec<LabelScore> {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            use rayon::prelude::*;
            let labels: Vec<_> = set.iter().collect();
            return labels
                .par_iter()
                .filter_map(|(label, templates)| self.score_label(glyph, *label, templates))
                .collect();
        }

        set.iter()
            .filter_map(|(label, templates)| self.score_label(glyph, label, templates))
            .collect()
    }

    fn score_label(
        &self,
        glyph: &GlyphImage,
        label: Label,
        templates: &[Template],
    ) -> Option<LabelScore> {
        let scores: Vec<f32> = templates
            .iter()
            .filter_map(|tpl| score_template(glyph, tpl))
            .collect();
        aggregate(self.cfg.aggregation, scores).map(|score| LabelScore { label, score })
    }
}

fn aggregate(aggregation: LabelAggregation, mut scores: Vec<f32>) -> Option<f32> {
    if scores.is_empty() {
        return None;
    }
    match aggregation {
        LabelAggregation::Min => scores.into_iter().min_by(f32::total_cmp),
        LabelAggregation::TopMean(n) => {
            scores.sort_by(f32::total_cmp);
            let take = n.clamp(1, scores.len());
            Some(scores[..take].iter().sum::<f32>() / take as f32)
        }
    }
}
