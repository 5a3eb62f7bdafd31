//! `stevedore start` — apply manifests for one service or the whole set.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use stevedore_cluster::{GracePeriodProbe, KubectlBackend, Orchestrator};
use stevedore_core::source::load_services_at;
use stevedore_core::SourceKind;

use crate::StartTarget;

/// Arguments for `stevedore start`.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Service to start, or `all` for the whole declared set.
    pub target: StartTarget,

    /// Seconds a started dependency gets before dependents are released.
    #[arg(long, default_value_t = 10)]
    pub grace_secs: u64,
}

impl StartArgs {
    pub fn run(self) -> Result<()> {
        let root: PathBuf = env::current_dir().context("could not determine working directory")?;
        let backend = KubectlBackend::new();
        let probe = GracePeriodProbe::new(Duration::from_secs(self.grace_secs));

        // Polls run every 500ms; the attempt budget must outlast the grace window.
        let max_attempts = u32::try_from(self.grace_secs.saturating_mul(2).saturating_add(20))
            .unwrap_or(u32::MAX);
        let orchestrator = Orchestrator::new(&backend, &probe).with_max_attempts(max_attempts);

        match self.target {
            StartTarget::Service(name) => {
                orchestrator
                    .start(&root, &name)
                    .with_context(|| format!("start failed for '{name}'"))?;
                println!("✓ started '{name}'");
            }
            StartTarget::All => {
                let set = load_services_at(&root, SourceKind::Regular)
                    .context("failed to load config.yaml")?;
                if set.is_empty() {
                    println!("No services declared in config.yaml.");
                    return Ok(());
                }

                let report = orchestrator
                    .start_all(&root, &set)
                    .context("start all failed")?;
                println!(
                    "✓ started {} services ({} dispatched, {} released)",
                    report.total(),
                    report.dispatched.len(),
                    report.released.len()
                );
                for name in &report.dispatched {
                    println!("  ·  {name}");
                }
                for name in &report.released {
                    println!("  ·  {name} (released after readiness gate)");
                }
            }
        }

        Ok(())
    }
}
