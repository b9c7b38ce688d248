use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Common CLI arguments shared across Helios binaries
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, help = "Enable quiet mode (minimal output)")]
    pub quiet: bool,
}

/// Common subcommands available for all services
#[derive(Subcommand, Debug, Clone, Default)]
pub enum CommonCommands {
    /// Start the service (default behavior)
    #[default]
    Start,
    /// Show current configuration and exit
    Config {
        #[arg(long, help = "Show configuration in JSON format")]
        json: bool,
    },
    /// Validate configuration and exit
    Validate,
    /// Show version information and exit
    Version,
}

/// Utility functions for CLI operations
pub mod utils {
    use super::*;
    use crate::catalog::is_valid_metric_name;
    use crate::config::Configuration;
    use anyhow::{Context, Result};
    use tracing_subscriber::EnvFilter;

    /// Level implied by `-v` / `-q` when `RUST_LOG` is not set
    pub fn log_level(args: &CommonArgs) -> &'static str {
        if args.quiet {
            "warn"
        } else if args.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Initialize logging based on CLI arguments
    pub fn init_logging(args: &CommonArgs) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_level(args)));

        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    /// Load configuration with optional override from CLI
    pub fn load_config(config_path: Option<&PathBuf>) -> Result<Configuration> {
        match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Configuration::load_from_path(path).context("Failed to load configuration")
            }
            None => Configuration::load().context("Failed to load configuration"),
        }
    }

    /// Display configuration in human-readable or JSON format
    pub fn display_config(config: &Configuration, json: bool) -> Result<()> {
        if json {
            let json = serde_json::to_string_pretty(config)
                .context("Failed to serialize configuration to JSON")?;
            println!("{json}");
        } else {
            println!("Helios Configuration:");
            println!("=====================");
            println!("Backend URL: {}", config.backend.url);
            println!("Backend timeout: {:?}", config.backend.timeout);
            println!("Range lookback: {:?}", config.backend.range.lookback);
            println!("Range step: {:?}", config.backend.range.step);
            println!(
                "HTTP listener: {}:{}",
                config.server.bind, config.server.port
            );
            println!("Strict metric catalog: {}", config.metrics.strict);

            if config.metrics.aliases.is_empty() {
                println!("Metric aliases: none configured");
            } else {
                let mut aliases: Vec<_> = config.metrics.aliases.iter().collect();
                aliases.sort();
                for (alias, metric) in aliases {
                    println!("Metric alias: {alias} -> {metric}");
                }
            }
        }
        Ok(())
    }

    /// Validate configuration and report any issues
    pub fn validate_config(config: &Configuration) -> Result<()> {
        log::info!("Validating configuration...");

        let url = url::Url::parse(&config.backend.url)
            .with_context(|| format!("Invalid backend URL '{}'", config.backend.url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!(
                "Backend URL must use http or https, got '{}'",
                url.scheme()
            );
        }

        if config.backend.timeout.is_zero() {
            anyhow::bail!("Backend timeout cannot be zero");
        }

        if config.backend.range.lookback.is_zero() {
            anyhow::bail!("Range lookback cannot be zero");
        }

        if config.backend.range.step.is_zero() {
            anyhow::bail!("Range step cannot be zero");
        }

        for (alias, metric) in &config.metrics.aliases {
            if !is_valid_metric_name(metric) {
                anyhow::bail!("Alias '{alias}' points to invalid metric name '{metric}'");
            }
        }

        log::info!("Configuration validation passed");
        Ok(())
    }

    /// Handle common CLI commands that don't require starting services
    pub async fn handle_common_command(
        command: &CommonCommands,
        config: &Configuration,
    ) -> Result<bool> {
        match command {
            CommonCommands::Config { json } => {
                display_config(config, *json)?;
                Ok(true)
            }
            CommonCommands::Validate => {
                validate_config(config)?;
                Ok(true)
            }
            CommonCommands::Version => {
                println!("{}", version_info());
                Ok(true)
            }
            CommonCommands::Start => Ok(false),
        }
    }

    /// Standard version information
    pub fn version_info() -> String {
        format!(
            "{} {} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_RUST_VERSION")
        )
    }
}
