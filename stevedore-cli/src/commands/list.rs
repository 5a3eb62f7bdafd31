//! `stevedore list` — the declared service set at a glance.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use stevedore_core::normalize::{normalize, DEFAULT_NAMESPACE};
use stevedore_core::source::{load_services_at, missing_required_fields};
use stevedore_core::SourceKind;
use stevedore_renderer::ManifestKind;

/// Arguments for `stevedore list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Read `core.yaml` (infrastructure services) instead of `config.yaml`.
    #[arg(long)]
    pub core: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let root: PathBuf = env::current_dir().context("could not determine working directory")?;
        let source = if self.core {
            SourceKind::Core
        } else {
            SourceKind::Regular
        };

        let set = load_services_at(&root, source)
            .with_context(|| format!("failed to load {}", source.file_name()))?;
        let rows = build_rows(&set, source);

        if self.json {
            print_json(source, rows)?;
            return Ok(());
        }

        print_table(source, rows);
        Ok(())
    }
}

/// One declared service with normalization applied, the way `generate`
/// would see it.
#[derive(Debug, Clone)]
struct ServiceRow {
    name: String,
    namespace: String,
    image: Option<String>,
    port: Option<u16>,
    replicas: u32,
    manifests: Vec<String>,
    depends_on: Vec<String>,
    missing: Vec<&'static str>,
}

impl ServiceRow {
    fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Serialize)]
struct ListReportJson {
    source: String,
    summary: ListSummaryJson,
    services: Vec<ServiceRowJson>,
}

#[derive(Serialize)]
struct ListSummaryJson {
    services: usize,
    namespaces: usize,
    incomplete: usize,
}

#[derive(Serialize)]
struct ServiceRowJson {
    name: String,
    namespace: String,
    status: String,
    image: Option<String>,
    port: Option<u16>,
    replicas: u32,
    manifests: Vec<String>,
    depends_on: Vec<String>,
    missing: Vec<String>,
}

#[derive(Tabled)]
struct ListTableRow {
    #[tabled(rename = "service")]
    service: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
    #[tabled(rename = "port")]
    port: String,
    #[tabled(rename = "replicas")]
    replicas: u32,
    #[tabled(rename = "depends on")]
    depends_on: String,
}

fn build_rows(set: &stevedore_core::ServiceSet, source: SourceKind) -> Vec<ServiceRow> {
    let mut rows = Vec::with_capacity(set.len());
    for (key, record) in &set.services {
        let missing = missing_required_fields(record, source);
        let record = normalize(record);
        let name = record.name_or(key);
        let manifests: Vec<String> = ManifestKind::for_service(&record)
            .into_iter()
            .map(|kind| kind.to_string())
            .collect();
        let namespace = record
            .namespace
            .clone()
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        rows.push(ServiceRow {
            name,
            namespace,
            image: record.image,
            port: record.port,
            replicas: record.replica_count.unwrap_or(1),
            manifests,
            depends_on: record.depends_on,
            missing,
        });
    }
    rows
}

fn print_json(source: SourceKind, rows: Vec<ServiceRow>) -> Result<()> {
    let namespaces = rows
        .iter()
        .map(|row| row.namespace.clone())
        .collect::<BTreeSet<_>>()
        .len();
    let incomplete = rows.iter().filter(|row| !row.is_complete()).count();

    let payload = ListReportJson {
        source: source.file_name().to_string(),
        summary: ListSummaryJson {
            services: rows.len(),
            namespaces,
            incomplete,
        },
        services: rows
            .into_iter()
            .map(|row| ServiceRowJson {
                status: if row.is_complete() {
                    "complete".to_string()
                } else {
                    "incomplete".to_string()
                },
                name: row.name,
                namespace: row.namespace,
                image: row.image,
                port: row.port,
                replicas: row.replicas,
                manifests: row.manifests,
                depends_on: row.depends_on,
                missing: row.missing.iter().map(|m| m.to_string()).collect(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize list JSON")?
    );
    Ok(())
}

fn print_table(source: SourceKind, rows: Vec<ServiceRow>) {
    let namespaces = rows
        .iter()
        .map(|row| row.namespace.clone())
        .collect::<BTreeSet<_>>()
        .len();
    let incomplete = rows.iter().filter(|row| !row.is_complete()).count();

    println!(
        "Stevedore v{} | {} | {} services | {} namespaces | {} incomplete",
        env!("CARGO_PKG_VERSION"),
        source.file_name(),
        rows.len(),
        namespaces,
        incomplete,
    );

    if rows.is_empty() {
        println!("No services declared.");
        return;
    }

    let separator = "■".repeat(67).bright_black().to_string();
    let mut grouped = BTreeMap::<String, Vec<ServiceRow>>::new();
    for row in rows {
        grouped.entry(row.namespace.clone()).or_default().push(row);
    }

    println!("{separator}");
    println!(
        "Indicators: {} COMPLETE  {} INCOMPLETE",
        "■".green().bold(),
        "■".yellow().bold(),
    );
    println!("{separator}");
    for (namespace, rows) in grouped {
        println!("{}", namespace.to_uppercase().bold());
        let table_rows: Vec<ListTableRow> = rows
            .into_iter()
            .map(|row| ListTableRow {
                status: if row.is_complete() {
                    "COMPLETE".to_string()
                } else {
                    "INCOMPLETE".to_string()
                },
                detail: row_detail(&row),
                port: row
                    .port
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                replicas: row.replicas,
                depends_on: if row.depends_on.is_empty() {
                    "-".to_string()
                } else {
                    row.depends_on.join(", ")
                },
                service: row.name,
            })
            .collect();
        let mut table = Table::new(table_rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("{separator}");
    }

    if incomplete > 0 {
        println!("Incomplete services are skipped by 'stevedore generate'.");
    }
}

fn row_detail(row: &ServiceRow) -> String {
    if row.is_complete() {
        row.manifests.join(", ")
    } else {
        format!("missing {}", row.missing.join(", "))
    }
}
