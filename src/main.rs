use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use themelens::{
    cli::CliApp,
    cli_types::{Cli, Commands},
    config::InspectorConfig,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "themelens=debug" } else { "themelens=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = InspectorConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(root) = cli.root {
        config = config.with_root(root);
    }

    let app = CliApp::new(config, cli.verbose, !cli.no_color);

    match cli.command {
        Commands::Scan(args) => app.scan(args)?,
        Commands::Pages(args) => app.pages(args)?,
        Commands::Blocks(args) => app.blocks(args)?,
        Commands::Check(args) => {
            if app.check(args)? {
                std::process::exit(1);
            }
        }
        Commands::Config => app.show_config()?,
    }

    Ok(())
}
