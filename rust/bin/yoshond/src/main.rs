//! `yoshond` — the Yoshon product catalog server.
//!
//! Usage:
//!   yoshond [serve] [--backend file|sqlite] [--data-file <path>] [--db-path <path>] [--listen <addr>]
//!   yoshond init    [--backend file|sqlite] ...
//!
//! Every flag can also be set from the environment (see `--help`).

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use product::ProductModule;
use yoshon_core::{Authenticator, Module, SharedSecret};

use config::ServerConfig;

/// Yoshon product catalog server.
#[derive(Parser)]
#[command(name = "yoshond", about = "Yoshon product catalog server", version)]
struct Cli {
    #[command(flatten)]
    config: ServerConfig,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create the data file or products table, then exit.
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Init => {
            bootstrap::init_storage(&cli.config)?;
            info!("Initialization complete");
            Ok(())
        }
        Command::Serve => serve(cli.config).await,
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    bootstrap::verify_config(&config)?;

    let store = bootstrap::open_store(&config)?;
    let auth: Arc<dyn Authenticator> = Arc::new(SharedSecret::new(config.admin_password.clone()));

    let product_module = ProductModule::new(store, auth);
    info!(
        "Product module initialized with {} products",
        product_module.service().total()?
    );

    let module_routes = vec![(product_module.name(), product_module.routes())];
    let app = routes::build_router(module_routes);

    let listener = TcpListener::bind(&config.listen).await?;
    info!("Yoshon server listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use crate::config::Backend;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_serve_with_file_backend() {
        let cli = Cli::try_parse_from(["yoshond"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.config.backend, Backend::File);
        assert_eq!(cli.config.listen, "0.0.0.0:3000");
    }

    #[test]
    fn flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "yoshond",
            "init",
            "--backend",
            "sqlite",
            "--db-path",
            "/tmp/catalog.sqlite",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Command::Init));
        assert_eq!(cli.config.backend, Backend::Sqlite);
        assert_eq!(cli.config.db_path, std::path::PathBuf::from("/tmp/catalog.sqlite"));
    }
}
