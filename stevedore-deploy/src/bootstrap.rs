//! Built-in bootstrap for the one external dependency a local image workflow
//! needs: a `registry:2` deployment in its own namespace.

use std::path::Path;

use stevedore_cluster::{ensure_namespace, ClusterBackend, NamespaceStatus};
use stevedore_core::normalize::{normalize, DEFAULT_NAMESPACE};
use stevedore_core::types::ServiceRecord;
use stevedore_renderer::{ManifestKind, Renderer};

use crate::error::DeployError;
use crate::materializer::{materialize_at, WriteOutcome};

pub const REGISTRY_NAME: &str = "registry";

/// The built-in service record for a local image registry.
pub fn registry_record() -> ServiceRecord {
    ServiceRecord {
        name: Some(REGISTRY_NAME.to_string()),
        image: Some("registry:2".to_string()),
        port: Some(5000),
        container_path: Some("/var/lib/registry".to_string()),
        service_local_path: Some("/opt/stevedore/registry".to_string()),
        namespace: Some(REGISTRY_NAME.to_string()),
        replica_count: Some(1),
        ..ServiceRecord::default()
    }
}

/// What `bootstrap` did.
#[derive(Debug)]
pub struct BootstrapReport {
    pub name: String,
    pub namespace: String,
    /// `None` in dry-run mode.
    pub namespace_status: Option<NamespaceStatus>,
    pub writes: Vec<WriteOutcome>,
    /// Whether the manifests were applied to the cluster.
    pub applied: bool,
}

/// Generate and apply the registry manifests under `root`.
///
/// The built-in record flows through the same normalize, render,
/// materialize, and reconcile steps as any configured service, then the
/// resulting directory is applied. Dry-run renders and reports without
/// touching disk or cluster.
pub fn bootstrap_at(
    root: &Path,
    backend: &dyn ClusterBackend,
    dry_run: bool,
) -> Result<BootstrapReport, DeployError> {
    let record = normalize(&registry_record());
    let name = record.name_or(REGISTRY_NAME);
    let namespace = record
        .namespace
        .as_deref()
        .unwrap_or(DEFAULT_NAMESPACE)
        .to_string();

    let namespace_status = if dry_run {
        None
    } else {
        Some(ensure_namespace(backend, &namespace)?)
    };

    let renderer = Renderer::new()?;
    let mut documents = Vec::new();
    for kind in ManifestKind::for_service(&record) {
        documents.push((kind, renderer.render(&name, &record, kind)?));
    }
    let writes = materialize_at(root, &name, &documents, dry_run)?;

    let applied = if dry_run {
        false
    } else {
        tracing::info!("applying bootstrap manifests for {name}");
        backend.apply_manifests(&root.join(&name))?;
        true
    };

    Ok(BootstrapReport {
        name,
        namespace,
        namespace_status,
        writes,
        applied,
    })
}
