//! CLI argument parsing definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a YAML configuration file; environment variables apply on top
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one load-test phase and print its summary as JSON
    Run {
        /// Phase name, see `surge phases`
        #[arg(value_name = "PHASE")]
        phase: String,

        /// Override the number of concurrent workers (VUS)
        #[arg(long, value_name = "N")]
        workers: Option<u32>,

        /// Override the iterations each worker runs (ITERATIONS)
        #[arg(long, value_name = "N")]
        iterations: Option<u32>,
    },

    /// List the available phases in execution order
    Phases,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print a sample configuration file
    Sample,

    /// Validate a configuration file
    Validate {
        /// Configuration file to check
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Show the effective configuration with secrets redacted
    Show {
        /// Output format: yaml, json
        #[arg(long, default_value = "yaml")]
        format: String,
    },
}
