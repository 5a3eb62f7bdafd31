//! Dry-run unified diff support for `stevedore diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use stevedore_core::normalize::normalize;
use stevedore_core::source::{load_services_at, missing_required_fields, source_path_at};
use stevedore_core::SourceKind;
use stevedore_renderer::{ManifestKind, Renderer};

use crate::error::{io_err, DeployError};

/// A single manifest diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Diff result for one source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffReport {
    pub source: PathBuf,
    pub diffs: Vec<FileDiff>,
}

impl DiffReport {
    pub fn is_clean(&self) -> bool {
        self.diffs.is_empty()
    }
}

/// Render what `generate` would produce and compare it to current on-disk
/// content.
///
/// No files are written and the cluster is never touched. A manifest that
/// does not exist yet diffs against empty content, so it shows up as a pure
/// addition. Records that `generate` would skip produce no output and are
/// excluded here too.
pub fn diff_at(
    root: &Path,
    source: SourceKind,
    template_dir: Option<&Path>,
) -> Result<DiffReport, DeployError> {
    let set = load_services_at(root, source)?;
    let renderer = Renderer::with_template_dir(template_dir)?;

    let mut diffs = Vec::new();
    for (key, record) in &set.services {
        if !missing_required_fields(record, source).is_empty() {
            continue;
        }
        let record = normalize(record);
        let name = record.name_or(key);

        for kind in ManifestKind::for_service(&record) {
            let rendered = normalize_line_endings(&renderer.render(&name, &record, kind)?);
            let path = root.join(&name).join(kind.file_name());
            let existing = read_existing_or_empty(&path)?;
            if existing == rendered {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path.as_path());
            let old_header = format!("a/{}", relative.display());
            let new_header = format!("b/{}", relative.display());
            let unified = TextDiff::from_lines(&existing, &rendered)
                .unified_diff()
                .header(&old_header, &new_header)
                .context_radius(3)
                .to_string();

            diffs.push(FileDiff {
                path,
                unified_diff: unified,
            });
        }
    }

    Ok(DiffReport {
        source: source_path_at(root, source),
        diffs,
    })
}

fn read_existing_or_empty(path: &Path) -> Result<String, DeployError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
