//! geoprox CLI - Command-line interface
//!
//! This binary provides a command-line interface to the geoprox library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use commands::config::ConfigCommands;
use commands::search::SearchArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "geoprox")]
#[command(version = geoprox::VERSION)]
#[command(about = "Distance and containment search against OGC WFS services", long_about = None)]
struct Cli {
    /// Also print log output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find features of a WFS layer that contain or lie near a point
    Search {
        /// Latitude in decimal degrees (default from config)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees (default from config)
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Search radius in metres
        #[arg(long)]
        distance: Option<f64>,

        /// Server id or URL (see `geoprox servers`)
        #[arg(long)]
        server: Option<String>,

        /// Feature type name, e.g. vg250:vg250_gem
        #[arg(long)]
        layer: Option<String>,

        /// Features requested per page
        #[arg(long)]
        page_size: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Assess the result against a rule written in plain language
        #[arg(long, value_name = "RULE")]
        check: Option<String>,
    },

    /// List the feature types a server offers
    Layers {
        /// Server id or URL (see `geoprox servers`)
        #[arg(long)]
        server: Option<String>,
    },

    /// Describe a search in plain language and let the AI fill in the parameters
    Ask {
        /// Instruction, e.g. "Railway stations within 2 km of 51.0036, 13.8713"
        instruction: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Assess the result against a rule written in plain language
        #[arg(long, value_name = "RULE")]
        check: Option<String>,
    },

    /// Show the configured WFS servers
    Servers,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config { command } => commands::config::run(command),
        command => run_async(command, cli.verbose),
    };

    if let Err(e) = result {
        e.exit();
    }
}

fn run_async(command: Commands, verbose: bool) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Config(format!("Failed to start async runtime: {}", e)))?;

    let runner = CliRunner::new(verbose)?;

    runtime.block_on(async {
        match command {
            Commands::Search {
                lat,
                lon,
                distance,
                server,
                layer,
                page_size,
                json,
                check,
            } => {
                commands::search::run(
                    &runner,
                    SearchArgs {
                        lat,
                        lon,
                        distance,
                        server,
                        layer,
                        page_size,
                        json,
                        check,
                    },
                )
                .await
            }
            Commands::Layers { server } => commands::layers::run(&runner, server).await,
            Commands::Ask {
                instruction,
                json,
                check,
            } => commands::ask::run(&runner, &instruction, json, check.as_deref()).await,
            Commands::Servers => {
                commands::servers::run(runner.config());
                Ok(())
            }
            Commands::Config { command } => commands::config::run(command),
        }
    })
}
