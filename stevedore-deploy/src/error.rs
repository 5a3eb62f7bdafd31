use std::path::PathBuf;

use thiserror::Error;

/// Error surface for manifest generation, materialization, and diffing.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("config error: {0}")]
    Config(#[from] stevedore_core::ConfigError),

    #[error("render error: {0}")]
    Render(#[from] stevedore_renderer::RenderError),

    #[error("cluster error: {0}")]
    Cluster(#[from] stevedore_cluster::ClusterError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DeployError {
    DeployError::Io {
        path: path.into(),
        source,
    }
}
