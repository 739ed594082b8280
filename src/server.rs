//! themelens-server: HTTP API over the theme inspector.
//!
//! Every request rescans the theme directory; only the schema translation table is
//! loaded once and kept for the life of the process.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use themelens::{api, config::InspectorConfig, ThemeInspector};

#[derive(Parser, Debug)]
#[command(name = "themelens-server", version, about = "HTTP API for theme schema inspection")]
struct ServerArgs {
    /// Theme root directory
    #[arg(short, long, env = "THEMELENS_ROOT")]
    root: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "themelens=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = InspectorConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(root) = args.root {
        config = config.with_root(root);
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Starting themelens-server for theme {}", config.theme.root.display());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.server.host, config.server.port))?;

    let inspector = Arc::new(ThemeInspector::new(config));
    let app = api::router(inspector)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
