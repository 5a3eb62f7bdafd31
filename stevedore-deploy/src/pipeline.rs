//! The generate pipeline: load, validate, normalize, render, materialize,
//! reconcile.
//!
//! Incomplete records are skipped with a logged notice and the loop continues;
//! control-plane or filesystem failures abort the run. Whatever was already
//! written stays on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use stevedore_cluster::{ensure_namespace, ClusterBackend, NamespaceStatus};
use stevedore_core::normalize::{normalize, DEFAULT_NAMESPACE};
use stevedore_core::source::{load_services_at, missing_required_fields, source_path_at};
use stevedore_core::SourceKind;
use stevedore_renderer::{ManifestKind, Renderer};

use crate::error::DeployError;
use crate::materializer::{materialize_at, WriteOutcome};

/// Knobs for one `generate` run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Which source document to load (`config.yaml` or `core.yaml`).
    pub source: SourceKind,
    /// Render and report, but write no files and touch no cluster.
    pub dry_run: bool,
    /// Extra directory of `.tera` template overrides.
    pub template_dir: Option<PathBuf>,
}

/// What happened to one record of the service set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Generated {
        name: String,
        namespace: String,
        /// `None` in dry-run mode (the cluster is never queried).
        namespace_status: Option<NamespaceStatus>,
        writes: Vec<WriteOutcome>,
    },
    Skipped {
        key: String,
        missing: Vec<&'static str>,
    },
}

/// Outcome of one full `generate` run.
#[derive(Debug)]
pub struct GenerateReport {
    pub source: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub outcomes: Vec<RecordOutcome>,
}

impl GenerateReport {
    pub fn generated(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Generated { .. }))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RecordOutcome::Skipped { .. }))
    }
}

/// Generate manifests for every service in the configured source under
/// `root`, reconciling each record's namespace as it goes.
pub fn generate_at(
    root: &Path,
    backend: &dyn ClusterBackend,
    options: &GenerateOptions,
) -> Result<GenerateReport, DeployError> {
    let source = source_path_at(root, options.source);
    let set = load_services_at(root, options.source)?;
    let renderer = Renderer::with_template_dir(options.template_dir.as_deref())?;

    let mut outcomes = Vec::with_capacity(set.len());
    for (key, record) in &set.services {
        let missing = missing_required_fields(record, options.source);
        if !missing.is_empty() {
            tracing::warn!("skipping {key}: missing required fields {missing:?}");
            outcomes.push(RecordOutcome::Skipped {
                key: key.clone(),
                missing,
            });
            continue;
        }

        let record = normalize(record);
        let name = record.name_or(key);
        let namespace = record
            .namespace
            .as_deref()
            .unwrap_or(DEFAULT_NAMESPACE)
            .to_string();

        // Reconcile the namespace before any manifest referencing it exists.
        let namespace_status = if options.dry_run {
            None
        } else {
            Some(ensure_namespace(backend, &namespace)?)
        };

        let mut documents = Vec::new();
        for kind in ManifestKind::for_service(&record) {
            documents.push((kind, renderer.render(&name, &record, kind)?));
        }
        let writes = materialize_at(root, &name, &documents, options.dry_run)?;

        outcomes.push(RecordOutcome::Generated {
            name,
            namespace,
            namespace_status,
            writes,
        });
    }

    Ok(GenerateReport {
        source,
        generated_at: Utc::now(),
        outcomes,
    })
}
