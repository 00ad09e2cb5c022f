//! End-to-end captcha workflows: recognize, add templates, reload.
//!
//! [`Recognizer`] owns the pipeline configuration and the shared template
//! library. All methods take `&self`, so one recognizer can serve concurrent
//! callers: recognition pins the current snapshot at call start, and reloads
//! swap a fully built snapshot in.

use crate::image::io::decode_gray_image;
use crate::image::ImageView;
use crate::preprocess::{PreprocessConfig, Preprocessor};
use crate::search::{LabelScore, MatchConfig, MatchResult, Matcher};
use crate::segment::{SegmentConfig, Segmenter};
use crate::store::{
    load_templates, write_templates, LoadReport, StoreConfig, TemplateLibrary, TemplateSet,
};
use crate::trace::{trace_event, trace_span};
use crate::util::GlyphMatchResult;
use std::sync::Arc;

/// Configuration for the whole pipeline.
#[derive(Clone, Debug, Default)]
pub struct RecognizerConfig {
    pub preprocess: PreprocessConfig,
    pub segment: SegmentConfig,
    pub store: StoreConfig,
    pub matching: MatchConfig,
}

/// Result of recognizing one captcha.
#[derive(Clone, Debug, PartialEq)]
pub struct Recognition {
    /// One symbol per glyph; unknown glyphs are `?`.
    pub text: String,
    /// Mean glyph confidence, rounded half to even.
    pub confidence: u8,
    /// Per-glyph results, left to right.
    pub glyphs: Vec<MatchResult>,
}

impl Recognition {
    fn from_glyphs(glyphs: Vec<MatchResult>) -> Self {
        let text = glyphs.iter().map(MatchResult::symbol).collect();
        let confidence = if glyphs.is_empty() {
            0
        } else {
            let mean = glyphs.iter().map(|g| g.confidence).sum::<f32>() / glyphs.len() as f32;
            mean.round_ties_even().clamp(0.0, 100.0) as u8
        };
        Self {
            text,
            confidence,
            glyphs,
        }
    }
}

/// Segmenter, preprocessor, matcher and template library behind one API.
#[derive(Debug)]
pub struct Recognizer {
    store: StoreConfig,
    preprocessor: Preprocessor,
    segmenter: Segmenter,
    matcher: Matcher,
    library: TemplateLibrary,
}

impl Recognizer {
    /// Builds a recognizer with an empty template library.
    pub fn new(cfg: RecognizerConfig) -> GlyphMatchResult<Self> {
        let preprocessor = Preprocessor::new(cfg.preprocess)?;
        let segmenter = Segmenter::new(cfg.segment, preprocessor)?;
        Ok(Self {
            store: cfg.store,
            preprocessor,
            segmenter,
            matcher: Matcher::new().with_config(cfg.matching),
            library: TemplateLibrary::new(),
        })
    }

    /// Builds a recognizer and loads the template directory.
    pub fn open(cfg: RecognizerConfig) -> GlyphMatchResult<Self> {
        let recognizer = Self::new(cfg)?;
        recognizer.reload()?;
        Ok(recognizer)
    }

    /// Returns the template store configuration.
    pub fn store_config(&self) -> &StoreConfig {
        &self.store
    }

    /// Returns the segmenter.
    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Returns the matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Returns the current template snapshot.
    pub fn templates(&self) -> Arc<TemplateSet> {
        self.library.snapshot()
    }

    /// Rescans the template directory and swaps in the result.
    pub fn reload(&self) -> GlyphMatchResult<LoadReport> {
        let (set, report) = load_templates(&self.store, &self.preprocessor)?;
        self.library.replace(set);
        Ok(report)
    }

    /// Segments and classifies a captcha.
    pub fn recognize(&self, image: ImageView<'_>) -> GlyphMatchResult<Recognition> {
        self.recognize_ranked(image, 0)
            .map(|(recognition, _)| recognition)
    }

    /// Like [`Recognizer::recognize`], also returning up to `top` ranked
    /// labels per glyph, best first.
    ///
    /// The image is segmented once and every glyph is ranked against the same
    /// snapshot the recognition uses.
    pub fn recognize_ranked(
        &self,
        image: ImageView<'_>,
        top: usize,
    ) -> GlyphMatchResult<(Recognition, Vec<Vec<LabelScore>>)> {
        let _span = trace_span!("recognize").entered();
        let set = self.library.snapshot();
        let glyphs = self.segmenter.segment(image)?;
        let (results, rankings): (Vec<_>, Vec<_>) = glyphs
            .iter()
            .map(|glyph| {
                let mut ranked = self.matcher.rank(glyph, &set);
                let result = self.matcher.decide(&ranked);
                ranked.truncate(top);
                (result, ranked)
            })
            .unzip();
        let recognition = Recognition::from_glyphs(results);
        trace_event!(
            "recognized",
            text = recognition.text.as_str(),
            confidence = recognition.confidence as u64
        );
        Ok((recognition, rankings))
    }

    /// Decodes an encoded image and recognizes it.
    pub fn recognize_bytes(&self, bytes: &[u8]) -> GlyphMatchResult<Recognition> {
        let image = decode_gray_image(bytes)?;
        self.recognize(image.view())
    }

    /// Segments a labeled captcha, writes one template per glyph and reloads.
    ///
    /// Returns the written file names. On a label/glyph count mismatch
    /// nothing is written, and a failed write removes the files this call
    /// already wrote. If the reload after a successful write fails, the
    /// files stay on disk and the next reload picks them up.
    pub fn add_templates(&self, label: &str, image: ImageView<'_>) -> GlyphMatchResult<Vec<String>> {
        let glyphs = self.segmenter.segment(image)?;
        let files = write_templates(&self.store, &self.preprocessor, label, &glyphs)?;
        self.reload()?;
        Ok(files)
    }

    /// Decodes an encoded image and adds it as templates.
    pub fn add_templates_bytes(&self, label: &str, bytes: &[u8]) -> GlyphMatchResult<Vec<String>> {
        let image = decode_gray_image(bytes)?;
        self.add_templates(label, image.view())
    }
}
