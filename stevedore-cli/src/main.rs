//! Stevedore — declarative service manifests and ordered startup for k8s.
//!
//! # Usage
//!
//! ```text
//! stevedore generate [--core] [--dry-run] [--json]
//! stevedore start <service|all> [--grace-secs <n>]
//! stevedore stop <service>
//! stevedore list [--core] [--json]
//! stevedore diff [service] [--core]
//! stevedore bootstrap [--dry-run]
//! ```

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    bootstrap::BootstrapArgs, diff::DiffArgs, generate::GenerateArgs, list::ListArgs,
    start::StartArgs, stop::StopArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "stevedore",
    version,
    about = "Generate Kubernetes manifests and start services in dependency order",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render and write manifests for every declared service.
    Generate(GenerateArgs),

    /// Apply one service's manifests, or the whole set in dependency order.
    Start(StartArgs),

    /// Delete the cluster resources of one service's manifests.
    Stop(StopArgs),

    /// Show the declared service set and what generate would produce.
    List(ListArgs),

    /// Show unified diffs of what generate would change on disk.
    Diff(DiffArgs),

    /// Generate and immediately apply the bundled image registry.
    Bootstrap(BootstrapArgs),
}

// ---------------------------------------------------------------------------
// Shared start target — a service name, or the whole set
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse the `start` target from CLI args.
#[derive(Debug, Clone)]
pub enum StartTarget {
    All,
    Service(String),
}

impl FromStr for StartTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("service name must not be empty".to_string());
        }
        if s.eq_ignore_ascii_case("all") {
            Ok(StartTarget::All)
        } else {
            Ok(StartTarget::Service(s.to_string()))
        }
    }
}

impl fmt::Display for StartTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartTarget::All => write!(f, "all"),
            StartTarget::Service(name) => name.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => args.run(),
        Commands::Start(args) => args.run(),
        Commands::Stop(args) => args.run(),
        Commands::List(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::Bootstrap(args) => args.run(),
    }
}
