//! dexcache CLI entry point.

use anyhow::Result;
use clap::Parser;

use dexcache::cli::commands::{migrate, pokemon, serve};
use dexcache::cli::{AppContext, Cli, Commands};
use dexcache::{ConfigLoader, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        dexcache::cli::handle_error(err, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config.as_deref() {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&config.logging)?;

    if let Commands::Migrate = cli.command {
        return migrate::execute(&config.database, cli.json).await;
    }

    let context = AppContext::connect(&config).await?;
    let service = &context.service;

    let result = match cli.command {
        Commands::Serve(args) => serve::execute(args, &config.server, service.clone()).await,
        Commands::Get { pokemon_id } => pokemon::handle_get(service, pokemon_id, cli.json).await,
        Commands::Fetch { pokemon_id } => {
            pokemon::handle_fetch(service, pokemon_id, cli.json).await
        }
        Commands::List { page, size } => pokemon::handle_list(service, page, size, cli.json).await,
        Commands::Search { name } => pokemon::handle_search(service, &name, cli.json).await,
        Commands::Migrate => Ok(()),
    };

    context.close().await;
    result
}
