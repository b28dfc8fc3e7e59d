//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Mount the application router, static files and redirects
//! - Wire up middleware (tracing, access log, panic catching)
//! - Bind server to listener with graceful shutdown

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Body,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handler::{redirect, HandlerKind};
use crate::http::middleware::access_log_middleware;
use crate::observability::Logger;

/// HTTP server wrapping an application router with access logging.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server around `app`.
    pub fn new(config: ServerConfig, logger: Arc<Logger>, app: Router) -> Self {
        let router = build_router(&config, logger, app);
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the router: `app` plus configured static files and redirects,
/// all behind the access log.
pub fn build_router(config: &ServerConfig, logger: Arc<Logger>, app: Router) -> Router {
    let mut router = app;

    for r in &config.redirects {
        let to = r.to.clone();
        let permanent = r.permanent;
        router = router.route(
            &r.from,
            get(move || {
                let to = to.clone();
                async move { redirect(&to, permanent) }
            }),
        );
    }

    if let Some(static_files) = &config.static_files {
        let files =
            middleware::map_response(mark_static_file).layer(ServeDir::new(&static_files.dir));
        router = router.nest_service(&static_files.mount, files);
    }

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(logger, access_log_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn mark_static_file<B>(mut response: Response<B>) -> Response<B> {
    response.extensions_mut().insert(HandlerKind::StaticFile);
    response
}

/// The panic itself is logged by the panic hook; the client gets a bare 500.
fn panic_response(_err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
