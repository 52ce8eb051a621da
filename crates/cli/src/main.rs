//! actionpack CLI
//!
//! Lists, describes and runs the content-pack actions from the command line.

mod commands;
mod config;
mod registry;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::CliConfig;

/// actionpack: run content-pack actions and print their result maps.
#[derive(Parser, Debug)]
#[command(name = "actionpack", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(
        long,
        env = "ACTIONPACK_CONFIG",
        default_value = "actionpack.toml",
        global = true
    )]
    config: PathBuf,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered actions.
    List,
    /// Show the inputs, outputs and description of an action.
    Describe(commands::describe::DescribeArgs),
    /// Run an action and print its result map.
    Run(commands::run::RunArgs),
    /// Print a cloud parameter set.
    Params(commands::params::ParamsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let (config, found) = CliConfig::load(&cli.config)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !found {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let registry = registry::build_registry(&config);

    match cli.command {
        Command::List => commands::list::run(&registry, &cli.format)?,
        Command::Describe(args) => commands::describe::run(&registry, &args, &cli.format)?,
        Command::Params(args) => commands::params::run(&args, &cli.format)?,
        Command::Run(args) => {
            let result = commands::run::run(&registry, &args, &cli.format).await?;
            if !result.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
