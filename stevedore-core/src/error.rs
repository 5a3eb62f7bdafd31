//! Error types for stevedore-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading a service set.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse service set at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The source document did not exist at the expected path.
    #[error("source not found at {path}")]
    SourceNotFound { path: PathBuf },
}
