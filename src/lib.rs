//! glyphmatch segments fixed-width captchas into glyphs and classifies each
//! glyph against a library of labeled templates.
//!
//! The pipeline is deliberately simple: equal-width segmentation, a
//! resize/blur/Otsu normalization shared by glyphs and templates, and a
//! nearest-template decision using the normalized squared difference. The
//! template library lives in a flat directory of `<label>_<index>.png` files
//! and is grown by labeling captchas.
//!
//! Label scoring can run in parallel via the `rayon` feature; the `tracing`
//! feature emits spans and events for segmentation, loading and matching.

mod trace;

pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod preprocess;
pub mod recognize;
pub mod search;
pub mod segment;
pub mod store;
pub mod template;
pub mod util;

pub use crate::image::io;
pub use crate::image::{GlyphImage, ImageView, OwnedImage};
pub use preprocess::{PreprocessConfig, Preprocessor};
pub use recognize::{Recognition, Recognizer, RecognizerConfig};
pub use search::{
    LabelAggregation, LabelScore, MatchConfig, MatchResult, Matcher, RejectConfig, UNKNOWN_SYMBOL,
};
pub use segment::{SegmentConfig, Segmenter};
pub use store::{LoadReport, StoreConfig, TemplateLibrary, TemplateSet};
pub use template::{Label, Template};
pub use util::{GlyphMatchError, GlyphMatchResult};
