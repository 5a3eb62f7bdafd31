//! `stevedore stop` — delete the cluster resources of one service.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use stevedore_cluster::{GracePeriodProbe, KubectlBackend, Orchestrator};

/// Arguments for `stevedore stop`.
#[derive(Args, Debug)]
pub struct StopArgs {
    /// Service whose applied manifests should be deleted.
    pub service: String,
}

impl StopArgs {
    pub fn run(self) -> Result<()> {
        let root: PathBuf = env::current_dir().context("could not determine working directory")?;
        let backend = KubectlBackend::new();
        // Stopping never waits on readiness.
        let probe = GracePeriodProbe::new(Duration::ZERO);
        let orchestrator = Orchestrator::new(&backend, &probe);

        orchestrator
            .stop(&root, &self.service)
            .with_context(|| format!("stop failed for '{}'", self.service))?;
        println!("✓ stopped '{}'", self.service);
        Ok(())
    }
}
