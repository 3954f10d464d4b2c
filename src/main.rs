//! vault-config CLI entry point.

use anyhow::Result;
use clap::Parser;

use vault_config::cli::{commands, handle_error, Cli, Commands};
use vault_config::infrastructure::config::ConfigLoader;
use vault_config::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let _logger = LoggerImpl::init(&LogConfig::try_from(&config.logging)?)?;

    match cli.command {
        Commands::Fetch(args) => commands::fetch::execute(args, config, cli.json).await,
        Commands::Plan(args) => commands::plan::execute(args, config, cli.json).await,
        Commands::Config(args) => commands::config::execute(args, config, cli.json).await,
    }
}
