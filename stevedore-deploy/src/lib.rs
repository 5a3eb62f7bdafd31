//! # stevedore-deploy
//!
//! Manifest generation pipeline and per-service output materializer.
//!
//! Call [`generate_at`] to render and write all manifests for a service set,
//! [`diff_at`] to preview what a generate would change, and [`bootstrap_at`]
//! to provision the built-in registry dependency.

pub mod bootstrap;
pub mod diff;
pub mod error;
pub mod materializer;
pub mod pipeline;

pub use bootstrap::{bootstrap_at, registry_record, BootstrapReport, REGISTRY_NAME};
pub use diff::{diff_at, DiffReport, FileDiff};
pub use error::DeployError;
pub use materializer::{materialize_at, WriteOutcome};
pub use pipeline::{generate_at, GenerateOptions, GenerateReport, RecordOutcome};
