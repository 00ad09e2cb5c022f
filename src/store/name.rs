//! Template file naming: `<label>_<index>.<ext>`.

use crate::template::Label;

/// Parsed template file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateName {
    pub label: Label,
    pub index: usize,
}

/// Outcome of classifying a directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameCheck {
    /// A well-formed template file.
    Template(TemplateName),
    /// Not a template file (other extension); ignored.
    Foreign,
    /// Template extension but malformed stem; rejected.
    Malformed,
}

impl TemplateName {
    /// Formats the file name for this template.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}_{}.{}", self.label, self.index, extension)
    }

    /// Classifies `file_name` against the configured extension
    /// (case-insensitive).
    pub fn check(file_name: &str, extension: &str) -> NameCheck {
        let Some((stem, ext)) = file_name.rsplit_once('.') else {
            return NameCheck::Foreign;
        };
        if !ext.eq_ignore_ascii_case(extension) {
            return NameCheck::Foreign;
        }
        match Self::parse_stem(stem) {
            Some(name) => NameCheck::Template(name),
            None => NameCheck::Malformed,
        }
    }

    fn parse_stem(stem: &str) -> Option<Self> {
        let (label, index) = stem.split_once('_')?;
        let mut chars = label.chars();
        let label = Label::new(chars.next()?).ok()?;
        if chars.next().is_some() {
            return None;
        }
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index = index.parse().ok()?;
        Some(Self { label, index })
    }
}

/// Prefix shared by every template file of `label`.
pub(crate) fn label_prefix(label: Label) -> String {
    format!("{label}_")
}

#[cfg(test)]
mod tests {
    use super::{NameCheck, TemplateName};
    use crate::template::Label;

    #[test]
    fn parses_well_formed_names() {
        let expected = TemplateName {
            label: Label::new('A').unwrap(),
            index: 12,
        };
        assert_eq!(TemplateName::check("A_12.png", "png"), NameCheck::Template(expected));
        assert_eq!(TemplateName::check("A_12.PNG", "png"), NameCheck::Template(expected));
        assert_eq!(expected.file_name("png"), "A_12.png");
    }

    #[test]
    fn other_extensions_are_foreign() {
        assert_eq!(TemplateName::check("A_1.txt", "png"), NameCheck::Foreign);
        assert_eq!(TemplateName::check("README", "png"), NameCheck::Foreign);
    }

    #[test]
    fn malformed_stems_are_rejected() {
        for name in ["AB_1.png", "_1.png", "A1.png", "A_.png", "A_x.png", "-_1.png", "A_1_2.png"] {
            assert_eq!(TemplateName::check(name, "png"), NameCheck::Malformed, "{name}");
        }
    }
}
