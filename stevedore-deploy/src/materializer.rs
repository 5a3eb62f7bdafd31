//! Per-service output directories and atomic manifest writes.
//!
//! `materialize_at` creates `<root>/<name>/` if absent and writes every
//! rendered document to its fixed filename inside it. Writes are
//! unconditional: the whole document set is regenerated from the source of
//! truth on every run, so existing files are replaced, never merged or
//! patched.
//!
//! Each write goes through a `.stevedore.tmp` sibling and a rename, so a
//! crash mid-write never leaves a half-written manifest under the final name.

use std::path::{Path, PathBuf};

use stevedore_renderer::ManifestKind;

use crate::error::{io_err, DeployError};

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// File was written.
    Written { path: PathBuf },
    /// Dry-run mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written { path } | WriteOutcome::WouldWrite { path } => path,
        }
    }
}

/// Write every rendered document for one service under `<root>/<name>/`.
///
/// Idempotent across runs: unchanged input produces byte-identical files,
/// changed input fully replaces the prior output. With `dry_run` set, nothing
/// on disk is touched and every outcome is [`WriteOutcome::WouldWrite`].
pub fn materialize_at(
    root: &Path,
    name: &str,
    documents: &[(ManifestKind, String)],
    dry_run: bool,
) -> Result<Vec<WriteOutcome>, DeployError> {
    let dir = root.join(name);
    let mut outcomes = Vec::with_capacity(documents.len());
    for (kind, content) in documents {
        let path = dir.join(kind.file_name());
        outcomes.push(atomic_write(&path, content, dry_run)?);
    }
    Ok(outcomes)
}

/// Atomically write a single rendered file.
pub(crate) fn atomic_write(
    path: &Path,
    content: &str,
    dry_run: bool,
) -> Result<WriteOutcome, DeployError> {
    let tmp = PathBuf::from(format!("{}.stevedore.tmp", path.display()));
    atomic_write_with_tmp(path, content, dry_run, &tmp)
}

fn atomic_write_with_tmp(
    path: &Path,
    content: &str,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteOutcome, DeployError> {
    // Normalize line endings to LF before writing.
    let normalized = content.replace("\r\n", "\n");
    let content = normalized.as_str();

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteOutcome::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    // Atomic rename to the final path.
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteOutcome::Written {
        path: path.to_path_buf(),
    })
}
