//! Namespace reconciliation — create the namespace a manifest targets when it
//! does not exist yet.

use std::fmt;

use crate::backend::ClusterBackend;
use crate::error::ClusterError;

/// What [`ensure_namespace`] found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceStatus {
    Created,
    AlreadyPresent,
}

impl fmt::Display for NamespaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceStatus::Created => write!(f, "created"),
            NamespaceStatus::AlreadyPresent => write!(f, "already present"),
        }
    }
}

/// Make sure `namespace` exists, creating it when absent.
///
/// A negative existence answer is expected control flow and triggers exactly
/// one create call; it is never surfaced as an error. Errors mean the control
/// plane could not be queried or the create itself failed.
pub fn ensure_namespace(
    backend: &dyn ClusterBackend,
    namespace: &str,
) -> Result<NamespaceStatus, ClusterError> {
    if backend.namespace_exists(namespace)? {
        log::debug!("namespace {namespace} already present");
        return Ok(NamespaceStatus::AlreadyPresent);
    }
    backend.create_namespace(namespace)?;
    log::info!("namespace {namespace} created");
    Ok(NamespaceStatus::Created)
}
