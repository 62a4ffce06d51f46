//! Loads the config and the feature modules, then starts the server.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use sammelsurium::config::loader::load_config;
use sammelsurium::config::schema::RunMode;
use sammelsurium::http::app::make_app;
use sammelsurium::http::server::HttpServer;
use sammelsurium::observability::init_logging;

#[derive(Debug, Parser)]
#[command(version, about = "A small multi-page website server")]
struct Args {
    /// Path to the config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Development mode: abort startup on module contract violations
    /// instead of serving without the broken modules.
    #[arg(long)]
    dev: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mode = if args.dev {
        RunMode::Development
    } else {
        RunMode::Production
    };

    let config = load_config(&args.config)?;
    init_logging(config.logging.debug.unwrap_or(mode.is_dev()));

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        ?mode,
        "starting {}",
        env!("CARGO_PKG_NAME"),
    );

    let application = make_app(&config, mode)?;

    // behind a proxy only the proxy may talk to us
    let host = if config.general.behind_proxy {
        "127.0.0.1"
    } else {
        "0.0.0.0"
    };
    let listener = TcpListener::bind((host, config.general.port)).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let server = HttpServer::new(application, config, mode);
    server.run(listener).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
