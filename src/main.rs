//! Demo server with structured access logging.
//!
//! Serves a small application behind the access log middleware, plus any
//! static files and redirects named in the config file.
//!
//! ```text
//! request-logger --config server.toml
//! DEBUG=TRUE request-logger --bind 127.0.0.1:8080
//! LOGENTRIES_TOKEN=... LOGLVL=WARNING request-logger
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use request_logger::config::{load_config, LoggerConfig, ServerConfig};
use request_logger::http::{HttpServer, LogPayload};
use request_logger::observability::{install_panic_hook, LogRecord, Logger};

#[derive(Parser, Debug)]
#[command(name = "request-logger", version, about = "Structured access logging demo server")]
struct Cli {
    /// TOML config file; environment variables override its logging section.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the config file.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "request_logger=info,access=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig {
            logging: LoggerConfig::from_env()?,
            ..ServerConfig::default()
        },
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        debug = config.logging.debug,
        redirects = config.redirects.len(),
        "Configuration loaded"
    );

    let logger = Arc::new(Logger::from_config(&config.logging)?);
    install_panic_hook(logger.clone());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, logger, demo_app());
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn demo_app() -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/whoami", get(whoami))
        .route("/panic", get(panics))
}

async fn whoami() -> Response {
    let mut response = "anonymous".into_response();
    response
        .extensions_mut()
        .insert(LogPayload(LogRecord::new().with("user", "anonymous")));
    response
}

async fn panics() -> &'static str {
    panic!("demo panic")
}
