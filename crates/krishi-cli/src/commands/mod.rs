//! Command implementations

mod catalog;
mod doctor;
mod query;
mod season;
mod soil;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;
use krishi_core::config::{CliConfigOverrides, LayeredConfig};

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    let mut config = LayeredConfig::with_defaults().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        artifact_dir: cli.artifacts.clone(),
        ..Default::default()
    });

    match cli.command {
        Commands::Query(args) => query::execute(args, &config, &output).await,
        Commands::Catalog(args) => catalog::execute(args, &config, &output),
        Commands::Season(args) => season::execute(args, &output),
        Commands::Soil(args) => soil::execute(args, &output).await,
        Commands::Doctor(args) => doctor::execute(args, &config, &output),
    }
}
