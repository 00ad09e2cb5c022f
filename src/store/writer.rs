//! Appending labeled glyphs to the template directory.

use crate::image::io::encode_png;
use crate::image::GlyphImage;
use crate::preprocess::Preprocessor;
use crate::store::name::{label_prefix, TemplateName};
use crate::store::StoreConfig;
use crate::template::Label;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{GlyphMatchError, GlyphMatchResult};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Writes one template per glyph, named after the matching label character.
///
/// The label is validated and its length checked against `glyphs` before the
/// directory is touched. The index for each file starts at the number of
/// existing files beginning with `<char>_` and advances until a name can be
/// created exclusively, so concurrent writers never share or overwrite a file.
///
/// Returns the written file names in glyph order. If any glyph fails to
/// write, the files already written by this call are removed before the
/// error is returned. The in-memory store is not updated; reload to see the
/// new templates.
pub fn write_templates(
    cfg: &StoreConfig,
    preprocessor: &Preprocessor,
    label: &str,
    glyphs: &[GlyphImage],
) -> GlyphMatchResult<Vec<String>> {
    let labels = Label::parse_str(label)?;
    if labels.len() != glyphs.len() {
        return Err(GlyphMatchError::LabelLengthMismatch {
            label_len: labels.len(),
            glyphs: glyphs.len(),
        });
    }

    let dir = &cfg.template_dir;
    let _span = trace_span!("write_templates", count = glyphs.len()).entered();
    std::fs::create_dir_all(dir).map_err(|err| GlyphMatchError::io(dir, err))?;

    write_batch(dir, labels.into_iter().zip(glyphs), |(label, glyph)| {
        let normalized = preprocessor.apply(glyph.view());
        let bytes = encode_png(normalized.view())?;
        create_template_file(dir, label, &cfg.extension, &bytes)
    })
}

/// Runs `write_one` per item, collecting file names. On the first error the
/// files collected so far are removed from `dir`.
fn write_batch<I, F>(dir: &Path, items: I, mut write_one: F) -> GlyphMatchResult<Vec<String>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> GlyphMatchResult<String>,
{
    let mut written = Vec::new();
    for item in items {
        match write_one(item) {
            Ok(file_name) => {
                trace_event!("template_written", file = file_name.as_str());
                written.push(file_name);
            }
            Err(err) => {
                for file_name in &written {
                    if std::fs::remove_file(dir.join(file_name)).is_err() {
                        trace_warn!("template_rollback_failed", file = file_name.as_str());
                    }
                }
                return Err(err);
            }
        }
    }
    Ok(written)
}

/// Claims the first free `<label>_<index>` name with an exclusive create and
/// writes `bytes` into it.
fn create_template_file(
    dir: &Path,
    label: Label,
    extension: &str,
    bytes: &[u8],
) -> GlyphMatchResult<String> {
    let mut index = count_prefixed(dir, label)?;
    loop {
        let file_name = TemplateName { label, index }.file_name(extension);
        let path = dir.join(&file_name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                if let Err(err) = file.write_all(bytes) {
                    drop(file);
                    let _ = std::fs::remove_file(&path);
                    return Err(GlyphMatchError::io(&path, err));
                }
                return Ok(file_name);
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => index += 1,
            Err(err) => return Err(GlyphMatchError::io(&path, err)),
        }
    }
}

fn count_prefixed(dir: &Path, label: Label) -> GlyphMatchResult<usize> {
    let prefix = label_prefix(label);
    let mut count = 0usize;
    for entry in std::fs::read_dir(dir).map_err(|err| GlyphMatchError::io(dir, err))? {
        let entry = entry.map_err(|err| GlyphMatchError::io(dir, err))?;
        if entry.file_name().to_string_lossy().starts_with(&prefix) {
            count += 1;
        }
    }
    Ok(count)
}
