//! Structured access and traceback logging for axum services.

pub mod config;
pub mod http;
pub mod observability;

pub use config::{LoggerConfig, ServerConfig};
pub use http::{HttpServer, RequestHandler};
pub use observability::{install_panic_hook, Logger};
