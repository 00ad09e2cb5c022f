//! Template storage: immutable snapshots, the swappable library, and the
//! on-disk load and write paths.
//!
//! A [`TemplateSet`] is built in full by a load and never mutated afterwards.
//! [`TemplateLibrary`] holds the current set behind an `Arc`; readers clone
//! the `Arc` at call start and keep matching against it even while a reload
//! swaps in a new set. The lock only guards the pointer.

mod load;
mod name;
mod writer;

pub use load::load_templates;
pub use name::{NameCheck, TemplateName};
pub use writer::write_templates;

use crate::template::{Label, Template};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Location and file format of the template directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Flat directory holding `<label>_<index>.<ext>` files.
    pub template_dir: PathBuf,
    /// File extension (and encoding) of template files, without the dot.
    pub extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("captcha_templates"),
            extension: "png".to_string(),
        }
    }
}

/// Summary of a load pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Templates loaded.
    pub templates: usize,
    /// Distinct labels loaded.
    pub labels: usize,
    /// Files with the template extension that were rejected or unreadable.
    pub skipped: usize,
}

/// Immutable mapping from label to its templates.
///
/// Labels iterate in ASCII order; templates keep their insertion order.
#[derive(Clone, Debug, Default)]
pub struct TemplateSet {
    by_label: BTreeMap<Label, Vec<Template>>,
}

impl TemplateSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a template under its label.
    pub fn insert(&mut self, template: Template) {
        self.by_label
            .entry(template.label())
            .or_default()
            .push(template);
    }

    /// Returns true if no templates are stored.
    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    /// Returns the number of labels with at least one template.
    pub fn num_labels(&self) -> usize {
        self.by_label.len()
    }

    /// Returns the total number of templates.
    pub fn num_templates(&self) -> usize {
        self.by_label.values().map(Vec::len).sum()
    }

    /// Returns the templates stored for `label`.
    pub fn templates(&self, label: Label) -> &[Template] {
        self.by_label.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates labels and their templates in label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &[Template])> {
        self.by_label.iter().map(|(l, t)| (*l, t.as_slice()))
    }

    /// Iterates labels in order.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.by_label.keys().copied()
    }
}

impl FromIterator<Template> for TemplateSet {
    fn from_iter<I: IntoIterator<Item = Template>>(iter: I) -> Self {
        let mut set = Self::new();
        for template in iter {
            set.insert(template);
        }
        set
    }
}

/// Shared holder of the current template snapshot.
#[derive(Debug, Default)]
pub struct TemplateLibrary {
    current: RwLock<Arc<TemplateSet>>,
}

impl TemplateLibrary {
    /// Creates a library with an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> Arc<TemplateSet> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replaces the current snapshot, returning the previous one.
    pub fn replace(&self, set: TemplateSet) -> Arc<TemplateSet> {
        let next = Arc::new(set);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}
