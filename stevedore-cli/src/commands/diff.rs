//! `stevedore diff` — unified diffs of what generate would change on disk.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stevedore_core::SourceKind;
use stevedore_deploy::diff_at;
use stevedore_renderer::user_template_dir;

/// Arguments for `stevedore diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Limit the diff to one service's manifest directory.
    pub service: Option<String>,

    /// Read `core.yaml` (infrastructure services) instead of `config.yaml`.
    #[arg(long)]
    pub core: bool,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let root: PathBuf = env::current_dir().context("could not determine working directory")?;
        let source = if self.core {
            SourceKind::Core
        } else {
            SourceKind::Regular
        };

        let template_dir = user_template_dir();
        let mut report = diff_at(&root, source, template_dir.as_deref())
            .with_context(|| format!("diff failed for {}", source.file_name()))?;

        if let Some(service) = self.service.as_ref() {
            let dir = root.join(service);
            report.diffs.retain(|diff| diff.path.starts_with(&dir));
        }

        if report.diffs.is_empty() {
            match self.service {
                Some(service) => println!("No differences for '{service}'."),
                None => println!("No differences."),
            }
            return Ok(());
        }

        for diff in report.diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }

        Ok(())
    }
}
