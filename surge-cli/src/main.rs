use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use surge_config::{ConfigLoader, LogLevel, SurgeConfig};
use surge_scenarios::{Harness, PhaseKind, RunSummary, Runner};
use tracing::{error, info, warn};

mod cli;
use cli::{Cli, Commands, ConfigCommands};

/// Load configuration from a YAML file when given, else from the environment.
///
/// Runs before the subscriber exists, so it reports through errors only.
fn load_config(config_path: Option<&PathBuf>) -> Result<SurgeConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => loader
            .from_file(path)
            .context(format!("Failed to load configuration from {:?}", path)),
        None => loader
            .from_env()
            .context("Failed to load configuration from environment"),
    }
}

/// Where the configuration came from, for the first log line of a run
fn config_source(config_path: Option<&PathBuf>) -> String {
    match config_path {
        Some(path) => format!("file {}", path.display()),
        None => "environment".to_string(),
    }
}

/// Install the subscriber, letting `--log-level` win over the configured level
fn init_logging(config: &mut SurgeConfig, log_level: Option<&String>) -> Result<()> {
    if let Some(level) = log_level {
        config.logging.level = level.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
        config.logging.debug = false;
    }
    surge_logging::init_logging(&config.logging)
}

/// Run one phase to completion and print its summary
async fn run_command(
    mut config: SurgeConfig,
    phase: &str,
    workers: Option<u32>,
    iterations: Option<u32>,
) -> Result<()> {
    let kind: PhaseKind = phase.parse()?;
    if let Some(workers) = workers {
        config.test.vus = workers;
    }
    if let Some(iterations) = iterations {
        config.test.iterations = iterations;
    }
    config
        .validate_all()
        .context("Invalid configuration after command line overrides")?;

    let harness = Harness::connect(config)
        .await
        .context("Failed to connect to the Cloud API")?;
    let runner = Runner::new(Arc::new(harness));

    let summary = tokio::select! {
        summary = runner.run(kind.build()) => summary
            .with_context(|| format!("Phase {} failed", kind))?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted; {} did not finish", kind);
            return Err(anyhow::anyhow!("Interrupted during {}", kind));
        }
    };

    print_summary(&summary)?;

    if summary.passed {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} missed its threshold: check rate {:.4}",
            summary.phase,
            summary.check_rate
        ))
    }
}

fn print_summary(summary: &RunSummary) -> Result<()> {
    let output = serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;
    println!("{}", output);
    Ok(())
}

fn list_phases() {
    for kind in PhaseKind::ALL {
        println!("{:<20} {}", kind.name(), kind.description());
    }
}

/// Handle configuration validation
fn handle_config_validate(config_file: &PathBuf) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!(
            "Configuration file not found: {:?}",
            config_file
        ));
    }

    match ConfigLoader::new().from_file(config_file) {
        Ok(_config) => {
            println!("Configuration file is valid");
            Ok(())
        }
        Err(e) => {
            for message in e.messages() {
                println!("  - {}", message);
            }
            error!("Configuration validation failed: {}", e);
            Err(anyhow::anyhow!("Configuration validation failed"))
        }
    }
}

/// Handle configuration display
fn handle_config_show(config: &SurgeConfig, format: &str) -> Result<()> {
    let redacted = config.redacted();

    match format.to_lowercase().as_str() {
        "yaml" | "yml" => {
            let yaml_output =
                serde_yaml::to_string(&redacted).context("Failed to serialize to YAML")?;
            println!("{}", yaml_output);
        }
        "json" => {
            let json_output =
                serde_json::to_string_pretty(&redacted).context("Failed to serialize to JSON")?;
            println!("{}", json_output);
        }
        _ => {
            return Err(anyhow::anyhow!(
                "Unknown output format: {}. Valid formats: yaml, json",
                format
            ));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            phase,
            workers,
            iterations,
        }) => {
            let mut config = load_config(cli.config.as_ref())?;
            init_logging(&mut config, cli.log_level.as_ref())?;
            info!(
                "Loaded configuration from {}",
                config_source(cli.config.as_ref())
            );
            run_command(config, &phase, workers, iterations).await
        }
        Some(Commands::Phases) => {
            list_phases();
            Ok(())
        }
        Some(Commands::Config { config_cmd }) => match config_cmd {
            ConfigCommands::Sample => {
                println!("{}", SurgeConfig::generate_sample());
                Ok(())
            }
            ConfigCommands::Validate { path } => {
                surge_logging::init_simple_tracing(
                    cli.log_level.as_deref().unwrap_or("warn"),
                )?;
                handle_config_validate(&path)
            }
            ConfigCommands::Show { format } => {
                let config = load_config(cli.config.as_ref())?;
                handle_config_show(&config, &format)
            }
        },
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
