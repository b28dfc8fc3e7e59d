//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::observability::logentries::{DEFAULT_PLAIN_ENDPOINT, DEFAULT_TLS_ENDPOINT};
use crate::observability::Severity;

/// Root configuration for the demo server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Static file mount, skipped by the access log.
    pub static_files: Option<StaticFilesConfig>,

    /// Fixed redirects, skipped by the access log.
    pub redirects: Vec<RedirectConfig>,

    /// Request and traceback logging.
    pub logging: LoggerConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Directory served under a URL prefix.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticFilesConfig {
    /// URL prefix, e.g. "/static".
    pub mount: String,

    /// Directory on disk.
    pub dir: String,
}

/// A fixed redirect from one path to another location.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedirectConfig {
    pub from: String,
    pub to: String,

    /// 308 when set, 307 otherwise.
    #[serde(default)]
    pub permanent: bool,
}

/// Logger settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Colored status prefixes and traceback echo to stdout.
    pub debug: bool,

    /// Ship logs to Logentries with this token instead of the access target.
    pub logentries_token: Option<String>,

    /// Minimum severity shipped to Logentries.
    pub logentries_level: Severity,

    /// Ship over TLS; plain TCP when disabled.
    pub logentries_tls: bool,

    /// Logentries ingestion endpoint (host:port). Defaults to port 443
    /// with TLS and port 80 without.
    pub logentries_endpoint: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            logentries_token: None,
            logentries_level: Severity::Info,
            logentries_tls: true,
            logentries_endpoint: None,
        }
    }
}

impl LoggerConfig {
    /// The configured endpoint, or the default for the chosen transport.
    pub fn resolved_endpoint(&self) -> String {
        match &self.logentries_endpoint {
            Some(endpoint) => endpoint.clone(),
            None if self.logentries_tls => DEFAULT_TLS_ENDPOINT.to_string(),
            None => DEFAULT_PLAIN_ENDPOINT.to_string(),
        }
    }
}
