//! Error types for stevedore-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from manifest rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error, from parsing, context building, or
    /// rendering.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while loading user templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    /// The record does not carry the section this manifest kind renders from.
    /// Callers guard conditional kinds with [`ManifestKind::for_service`];
    /// reaching this is a caller contract violation.
    ///
    /// [`ManifestKind::for_service`]: crate::ManifestKind::for_service
    #[error("record has no {section} section to render a {kind} manifest from")]
    SectionUnavailable {
        kind: &'static str,
        section: &'static str,
    },
}
