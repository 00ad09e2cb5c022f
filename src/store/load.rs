//! Best-effort scan of the template directory.

use crate::image::io::load_gray_image;
use crate::preprocess::Preprocessor;
use crate::store::name::{NameCheck, TemplateName};
use crate::store::{LoadReport, StoreConfig, TemplateSet};
use crate::template::Template;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{GlyphMatchError, GlyphMatchResult};

/// Builds a fresh template set from `cfg.template_dir`.
///
/// The directory is created if missing. Malformed names and unreadable images
/// are skipped and counted; only failing to create or list the directory is an
/// error. Entries are visited in file-name order.
pub fn load_templates(
    cfg: &StoreConfig,
    preprocessor: &Preprocessor,
) -> GlyphMatchResult<(TemplateSet, LoadReport)> {
    let dir = &cfg.template_dir;
    let _span = trace_span!("load_templates").entered();

    std::fs::create_dir_all(dir).map_err(|err| GlyphMatchError::io(dir, err))?;
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|err| GlyphMatchError::io(dir, err))? {
        let entry = entry.map_err(|err| GlyphMatchError::io(dir, err))?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            names.push(entry.file_name());
        }
    }
    names.sort();

    let mut set = TemplateSet::new();
    let mut report = LoadReport::default();
    for os_name in names {
        let Some(file_name) = os_name.to_str() else {
            continue;
        };
        let name = match TemplateName::check(file_name, &cfg.extension) {
            NameCheck::Template(name) => name,
            NameCheck::Foreign => continue,
            NameCheck::Malformed => {
                trace_warn!("template_name_rejected", file = file_name);
                report.skipped += 1;
                continue;
            }
        };
        let image = match load_gray_image(dir.join(file_name)) {
            Ok(image) => image,
            Err(err) => {
                trace_warn!(
                    "template_unreadable",
                    file = file_name,
                    error = err.to_string().as_str()
                );
                report.skipped += 1;
                continue;
            }
        };
        let glyph = preprocessor.apply(image.view());
        set.insert(Template::new(name.label, glyph).with_source(file_name));
    }

    report.templates = set.num_templates();
    report.labels = set.num_labels();
    trace_event!(
        "templates_loaded",
        templates = report.templates,
        labels = report.labels,
        skipped = report.skipped
    );
    Ok((set, report))
}
