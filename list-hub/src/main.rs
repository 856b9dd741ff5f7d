use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use list_hub::api::{self, AppState};
use list_hub::config::Config;
use list_hub_core::auth::Hs256Tokens;
use list_hub_core::storage::Database;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "list-hub")]
#[command(about = "Shared shopping lists over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Listen address, overrides PORT and LIST_HUB_ADDR
        #[arg(short, long)]
        addr: Option<String>,

        /// Directory holding the document store, overrides DATA_DIR
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { addr, data_dir } => {
            if let Some(addr) = addr {
                config.addr = addr
                    .parse()
                    .with_context(|| format!("invalid listen address {addr:?}"))?;
            }
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            serve(config).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => show_config(&config),
        },
    }

    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    let db = Database::open(&config.data_dir)
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;
    let tokens = Arc::new(Hs256Tokens::new(&config.jwt_sign_key));
    let app = api::router(AppState::new(&db, tokens), config.request_timeout);

    let listener = TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "listening");
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

fn show_config(config: &Config) {
    println!("Current configuration:");
    println!("  Listen address: {}", config.addr);
    println!("  Data directory: {}", config.data_dir.display());
    println!("  Request timeout: {}s", config.request_timeout.as_secs());
    println!("  JWT sign key: <{} bytes>", config.jwt_sign_key.len());
}
