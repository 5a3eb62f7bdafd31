//! # stevedore-cluster
//!
//! Control-plane collaborator and dependency-ordered startup.
//!
//! [`ClusterBackend`] is the narrow interface over the external cluster tool
//! (namespace query/create, apply, delete); [`ensure_namespace`] reconciles a
//! namespace before manifests reference it; [`Orchestrator`] starts whole
//! service sets with dependencies first.

pub mod backend;
pub mod error;
pub mod orchestrator;
pub mod reconciler;

pub use backend::{ClusterBackend, KubectlBackend};
pub use error::{ClusterError, OrchestratorError};
pub use orchestrator::{
    GracePeriodProbe, Orchestrator, ReadinessProbe, StartAllReport, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_POLL_INTERVAL,
};
pub use reconciler::{ensure_namespace, NamespaceStatus};
