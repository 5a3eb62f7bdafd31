//! `stevedore bootstrap` — stand up the bundled image registry.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stevedore_cluster::KubectlBackend;
use stevedore_deploy::{bootstrap_at, WriteOutcome};

/// Arguments for `stevedore bootstrap`.
#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Show what would happen without touching disk or cluster.
    #[arg(long)]
    pub dry_run: bool,
}

impl BootstrapArgs {
    pub fn run(self) -> Result<()> {
        let root: PathBuf = env::current_dir().context("could not determine working directory")?;
        let backend = KubectlBackend::new();

        let report = bootstrap_at(&root, &backend, self.dry_run).context("bootstrap failed")?;

        let prefix = if self.dry_run { "[dry-run] " } else { "" };
        let action = if report.applied { "applied" } else { "rendered" };
        println!(
            "{prefix}✓ '{}' {action} in namespace '{}' ({} manifests)",
            report.name,
            report.namespace,
            report.writes.len(),
        );
        for write in &report.writes {
            match write {
                WriteOutcome::Written { path } => println!("  ✎  {}", path.display()),
                WriteOutcome::WouldWrite { path } => println!("  ~  {}", path.display()),
            }
        }

        Ok(())
    }
}
