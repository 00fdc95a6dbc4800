#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use froglol::{
    Settings,
    cli::{Cli, Commands},
    commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let settings = cli.apply(Settings::from_env()?);
    log::debug!("Using bookmark store at {}", settings.store_path.display());

    match &cli.command {
        Commands::Resolve { query } => commands::resolve(&settings, &query.join(" "), cli.json).await,
        Commands::Suggest { command } => commands::suggest(&settings, command, cli.json).await,
        Commands::List => commands::list(&settings, cli.json),
        Commands::Seed => commands::seed(&settings).await,
    }
}
