mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, ConfigCommands};
use mongosnap::config::Config;
use mongosnap::utils::logging::init_tracing;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    init_tracing("info");

    match cli.command {
        Commands::Serve { host, port } => {
            commands::serve_cmd::execute(config, host, port).await?;
        }
        Commands::Run => {
            commands::run_cmd::execute(config).await?;
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                commands::config_cmd::show_config(&config)?;
            }
        },
    }

    Ok(())
}
