//! Subcommand implementations, one module per `stevedore <command>`.

pub mod bootstrap;
pub mod diff;
pub mod generate;
pub mod list;
pub mod start;
pub mod stop;
