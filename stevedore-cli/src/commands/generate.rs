//! `stevedore generate` — render manifests and reconcile namespaces.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use stevedore_cluster::KubectlBackend;
use stevedore_core::SourceKind;
use stevedore_deploy::{generate_at, GenerateOptions, GenerateReport, RecordOutcome, WriteOutcome};
use stevedore_renderer::user_template_dir;

/// Arguments for `stevedore generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Read `core.yaml` (infrastructure services) instead of `config.yaml`.
    #[arg(long)]
    pub core: bool,

    /// Show what would be written without touching disk or cluster.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    pub fn run(self) -> Result<()> {
        let root: PathBuf = env::current_dir().context("could not determine working directory")?;
        let backend = KubectlBackend::new();

        let source = if self.core {
            SourceKind::Core
        } else {
            SourceKind::Regular
        };
        let options = GenerateOptions {
            source,
            dry_run: self.dry_run,
            template_dir: user_template_dir(),
        };

        let report = generate_at(&root, &backend, &options)
            .with_context(|| format!("generate failed for {}", source.file_name()))?;

        if self.json {
            print_json(&report)?;
            return Ok(());
        }

        print_report(&report, self.dry_run);
        Ok(())
    }
}

#[derive(Serialize)]
struct GenerateReportJson {
    source: String,
    generated_at: String,
    summary: GenerateSummaryJson,
    services: Vec<ServiceOutcomeJson>,
}

#[derive(Serialize)]
struct GenerateSummaryJson {
    generated: usize,
    skipped: usize,
    files: usize,
}

#[derive(Serialize)]
struct ServiceOutcomeJson {
    name: String,
    status: String,
    namespace: Option<String>,
    namespace_status: Option<String>,
    files: Vec<String>,
    missing: Vec<String>,
}

fn print_json(report: &GenerateReport) -> Result<()> {
    let services: Vec<ServiceOutcomeJson> = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            RecordOutcome::Generated {
                name,
                namespace,
                namespace_status,
                writes,
            } => ServiceOutcomeJson {
                name: name.clone(),
                status: "generated".to_string(),
                namespace: Some(namespace.clone()),
                namespace_status: namespace_status.map(|s| s.to_string()),
                files: writes
                    .iter()
                    .map(|w| w.path().display().to_string())
                    .collect(),
                missing: Vec::new(),
            },
            RecordOutcome::Skipped { key, missing } => ServiceOutcomeJson {
                name: key.clone(),
                status: "skipped".to_string(),
                namespace: None,
                namespace_status: None,
                files: Vec::new(),
                missing: missing.iter().map(|m| m.to_string()).collect(),
            },
        })
        .collect();

    let files = services.iter().map(|s| s.files.len()).sum();
    let payload = GenerateReportJson {
        source: report.source.display().to_string(),
        generated_at: report.generated_at.to_rfc3339(),
        summary: GenerateSummaryJson {
            generated: report.generated().count(),
            skipped: report.skipped().count(),
            files,
        },
        services,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize generate JSON")?
    );
    Ok(())
}

fn print_report(report: &GenerateReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    if report.outcomes.is_empty() {
        println!("No services declared in {}.", report.source.display());
        return;
    }

    for outcome in &report.outcomes {
        match outcome {
            RecordOutcome::Generated {
                name,
                namespace,
                namespace_status,
                writes,
            } => {
                let ns_note = match namespace_status {
                    Some(status) => format!("namespace '{namespace}' {status}"),
                    None => format!("namespace '{namespace}'"),
                };
                println!(
                    "{prefix}✓ '{name}' — {} manifests ({ns_note})",
                    writes.len()
                );
                for write in writes {
                    match write {
                        WriteOutcome::Written { path } => println!("  ✎  {}", path.display()),
                        WriteOutcome::WouldWrite { path } => println!("  ~  {}", path.display()),
                    }
                }
            }
            RecordOutcome::Skipped { key, missing } => {
                println!("{prefix}· '{key}' skipped — missing {}", missing.join(", "));
            }
        }
    }
}
