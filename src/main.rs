//! Countries - minimal in-memory HTTP API for country records

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use countries::api::{self, ApiDoc, AppState};
use countries::config::{Config, LookupMode};
use countries::store::CountryStore;

#[derive(Parser)]
#[command(name = "countries")]
#[command(about = "Minimal in-memory HTTP API for country records")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// How `/countries/{position}` resolves its argument
        #[arg(long, value_enum)]
        lookup: Option<LookupMode>,
    },

    /// Print the OpenAPI document
    Openapi,

    /// List the records a fresh server starts with
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment
    let _ = dotenvy::dotenv();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("countries={},tower_http=debug", log_level).into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Serve { host, port, lookup } => {
            let mut config = config;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(lookup) = lookup {
                config.lookup = lookup;
            }

            serve(config).await?;
        }

        Commands::Openapi => {
            println!("{}", ApiDoc::openapi().to_pretty_json()?);
        }

        Commands::List => {
            let store = CountryStore::with_seed();
            for country in store.list().await {
                println!(
                    "{}. {} (capital: {}, area: {})",
                    country.id, country.name, country.capital, country.area
                );
            }
        }
    }

    Ok(())
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let store = CountryStore::with_seed();
    tracing::info!("Loaded {} seed countries", store.len().await);

    let state = AppState::new(store, config.lookup);
    let router = api::create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Starting HTTP server on {} (lookup by {:?})", addr, config.lookup);
    println!("Countries server running at http://{}", addr);
    println!("  API:      http://{}/countries", addr);
    println!("  API Docs: http://{}/api/docs", addr);
    println!("  Health:   http://{}/health", addr);

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Cancel `token` on Ctrl-C or SIGTERM
async fn watch_signals(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
    token.cancel();
}
