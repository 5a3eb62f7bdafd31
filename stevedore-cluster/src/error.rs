use thiserror::Error;

/// Error surface for control-plane operations.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The external tool could not be spawned at all (not installed, not on
    /// PATH, not executable).
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The external tool ran and reported failure. `detail` folds the tool's
    /// stdout and stderr into one trimmed line.
    #[error("{tool} failed ({status}): {detail}")]
    CommandFailed {
        tool: String,
        status: std::process::ExitStatus,
        detail: String,
    },
}

/// Error surface for dependency-ordered startup.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("cluster error: {0}")]
    Cluster(#[from] ClusterError),

    #[error("service {service} was not ready after {attempts} readiness checks")]
    ReadinessTimeout { service: String, attempts: u32 },
}
