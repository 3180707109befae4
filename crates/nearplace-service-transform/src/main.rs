//! Transform microservice entrypoint.
//!
//! Takes the gazetteer path as its single required argument, builds the
//! spatial index, and serves the transform API.
//!
//! # Configuration
//!
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use nearplace_service_shared::{init_logging, AppState, LoggingConfig};
use nearplace_service_transform::build_router;

/// Default HTTP port for the transform service.
const DEFAULT_PORT: u16 = 5001;

#[derive(Parser, Debug)]
#[command(version, about = "Nearest-place enrichment service")]
struct Cli {
    /// Path to the gazetteer JSON file.
    places: PathBuf,

    /// HTTP port to listen on.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let logging_config = LoggingConfig::from_env().with_service("transform");
    init_logging(&logging_config);

    info!(places = %cli.places.display(), port = cli.port, "starting transform service");

    let state = AppState::load(&cli.places).map_err(|e| {
        error!(error = %e, path = %cli.places.display(), "failed to load gazetteer");
        e
    })?;

    info!(places_indexed = state.index().len(), "application state loaded");

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
