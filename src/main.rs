mod cli;
mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use commands::AppContext;
use termforce::config::Config;

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    // RUST_LOG wins; `general.verbose` only changes the fallback level.
    let filter = if config.general.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("termforce=debug"))
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(config, cli.glossary);

    match cli.command {
        Commands::Enforce(args) => commands::enforce::run(&ctx, args)?,
        Commands::Mask(args) => commands::masking::run_mask(&ctx, args)?,
        Commands::Unmask(args) => commands::masking::run_unmask(args)?,
        Commands::Terms(args) => commands::terms::run(&ctx, args)?,
        Commands::Verify(args) => commands::verify::run(&ctx, args)?,
        Commands::Translate(args) => commands::translate::run(&ctx, args)?,
        Commands::Glossary(args) => commands::glossary::run(&ctx, args)?,
        Commands::Config(args) => commands::config::run(args)?,
    }

    Ok(())
}
