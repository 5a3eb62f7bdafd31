//! Source-document loading and required-field validation.
//!
//! # Source layout
//!
//! ```text
//! <root>/
//!   config.yaml   (regular source — required-field checks enforced)
//!   core.yaml     (core source — privileged, checks relaxed)
//! ```
//!
//! Exactly one source is loaded per invocation; [`SourceKind`] selects which.
//!
//! # API pattern
//!
//! Every loading function has two forms:
//! - `fn_at(root: &Path, …)` — explicit root; used in tests with `TempDir`
//! - `fn(…)` — derives root from the current directory, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::{ServiceRecord, ServiceSet, SourceKind};

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<root>/<config.yaml|core.yaml>` — pure, no I/O.
pub fn source_path_at(root: &Path, kind: SourceKind) -> PathBuf {
    root.join(kind.file_name())
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load the service set from the selected source under `root`.
///
/// Returns `ConfigError::SourceNotFound` if the file is absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_services_at(root: &Path, kind: SourceKind) -> Result<ServiceSet, ConfigError> {
    let path = source_path_at(root, kind);
    if !path.exists() {
        return Err(ConfigError::SourceNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_services_at` convenience wrapper rooted at the current directory.
pub fn load_services(kind: SourceKind) -> Result<ServiceSet, ConfigError> {
    load_services_at(&std::env::current_dir()?, kind)
}

// ---------------------------------------------------------------------------
// 3. Required-field validation
// ---------------------------------------------------------------------------

/// Schema fields a regular record must carry before any output is produced.
const REGULAR_REQUIRED: &[&str] = &[
    "name",
    "image",
    "port",
    "containerPath",
    "serviceLocalPath",
];

/// Names of the required fields `record` is missing, empty when complete.
///
/// The check is presence-only — no value validation beyond "the field is
/// there" (an empty string counts as absent). Core records are privileged:
/// only `name` is enforced, since a nameless record has no output directory.
pub fn missing_required_fields(record: &ServiceRecord, kind: SourceKind) -> Vec<&'static str> {
    let required: &[&str] = if kind.is_core() {
        &["name"]
    } else {
        REGULAR_REQUIRED
    };

    required
        .iter()
        .filter(|field| !has_field(record, field))
        .copied()
        .collect()
}

fn has_field(record: &ServiceRecord, field: &str) -> bool {
    match field {
        "name" => present(&record.name),
        "image" => present(&record.image),
        "port" => record.port.is_some(),
        "containerPath" => present(&record.container_path),
        "serviceLocalPath" => present(&record.service_local_path),
        _ => true,
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
