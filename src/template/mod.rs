//! Labels, templates and their precomputed matching plans.

use crate::image::{GlyphImage, ImageView};
use crate::util::{GlyphMatchError, GlyphMatchResult};
use std::fmt;

mod plan;

pub use plan::SqdiffPlan;

/// A single ASCII alphanumeric character naming a glyph class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(char);

impl Label {
    /// Validates `c` as a label.
    pub fn new(c: char) -> GlyphMatchResult<Self> {
        if c.is_ascii_alphanumeric() {
            Ok(Self(c))
        } else {
            Err(GlyphMatchError::InvalidLabel {
                label: c.to_string(),
            })
        }
    }

    /// Splits a label string such as `"AB12"` into one label per character.
    ///
    /// The whole string is rejected if any character is invalid, or if it is
    /// empty.
    pub fn parse_str(text: &str) -> GlyphMatchResult<Vec<Self>> {
        if text.is_empty() {
            return Err(GlyphMatchError::InvalidLabel {
                label: String::new(),
            });
        }
        text.chars()
            .map(|c| {
                Self::new(c).map_err(|_| GlyphMatchError::InvalidLabel {
                    label: text.to_string(),
                })
            })
            .collect()
    }

    /// Returns the label character.
    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for Label {
    type Error = GlyphMatchError;

    fn try_from(c: char) -> GlyphMatchResult<Self> {
        Self::new(c)
    }
}

/// A labeled reference glyph ready for matching.
#[derive(Clone, Debug)]
pub struct Template {
    label: Label,
    glyph: GlyphImage,
    plan: SqdiffPlan,
    source: Option<String>,
}

impl Template {
    /// Creates a template from an already preprocessed glyph.
    pub fn new(label: Label, glyph: GlyphImage) -> Self {
        let plan = SqdiffPlan::from_view(glyph.view());
        Self {
            label,
            glyph,
            plan,
            source: None,
        }
    }

    /// Records the file the template was loaded from.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the template label.
    pub fn label(&self) -> Label {
        self.label
    }

    /// Returns the preprocessed glyph.
    pub fn glyph(&self) -> &GlyphImage {
        &self.glyph
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_> {
        self.glyph.view()
    }

    /// Returns the precomputed matching plan.
    pub fn plan(&self) -> &SqdiffPlan {
        &self.plan
    }

    /// Returns the source file name, if the template came from disk.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}
