//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Completed request (RequestHandler)
//!     → request.rs (base record, rollbar token, payload merge)
//!     → severity.rs (status → INFO / WARN / FATAL)
//!     → sink.rs (access target) or logentries.rs (remote shipping)
//!
//! Error or panic (ExceptionInfo)
//!     → traceback.rs (formatted frames under "traceback")
//!     → sink at ERROR
//!     → highlight.rs (stdout echo, debug only)
//! ```
//!
//! # Design Decisions
//! - One `Logger` is built at startup and shared via `Arc`; no globals
//! - Records are ordered JSON maps; values are coerced on insertion
//! - Logging never returns errors to callers

pub mod highlight;
pub mod logentries;
pub mod panic;
pub mod record;
pub mod request;
pub mod severity;
pub mod sink;
pub mod traceback;
pub mod value;

use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::config::LoggerConfig;

pub use highlight::Highlighter;
pub use logentries::{LogentriesOptions, LogentriesSink, SinkError};
pub use panic::install_panic_hook;
pub use record::LogRecord;
pub use request::format_millis;
pub use severity::Severity;
pub use sink::{AccessSink, LogSink};
pub use traceback::ExceptionInfo;
pub use value::LogValue;

/// Request and traceback logger bound to one sink.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    debug: bool,
    highlighter: Option<Arc<Highlighter>>,
    echo: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Logger {
    /// Logger writing to `sink`. Debug mode adds colored status prefixes
    /// and echoes tracebacks to stdout.
    pub fn new(sink: Arc<dyn LogSink>, debug: bool) -> Self {
        let highlighter = debug.then(|| Arc::new(Highlighter::new()));
        Self {
            sink,
            debug,
            highlighter,
            echo: Arc::new(Mutex::new(Box::new(std::io::stdout()))),
        }
    }

    /// Send the debug traceback echo to `writer` instead of stdout.
    pub fn with_echo(mut self, writer: impl Write + Send + 'static) -> Self {
        self.echo = Arc::new(Mutex::new(Box::new(writer)));
        self
    }

    /// Select the sink described by `config`: Logentries when a token is
    /// configured, the access target otherwise.
    pub fn from_config(config: &LoggerConfig) -> Result<Self, SinkError> {
        let sink: Arc<dyn LogSink> = match &config.logentries_token {
            Some(token) => {
                let options = LogentriesOptions {
                    threshold: config.logentries_level,
                    endpoint: config.resolved_endpoint(),
                    tls: config.logentries_tls,
                    ..LogentriesOptions::new(token.clone())
                };
                tracing::info!(
                    endpoint = %options.endpoint,
                    tls = options.tls,
                    level = %options.threshold,
                    "Shipping logs to Logentries"
                );
                Arc::new(LogentriesSink::spawn(options)?)
            }
            None => Arc::new(AccessSink),
        };
        Ok(Self::new(sink, config.debug))
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub(crate) fn emit(&self, severity: Severity, message: &str) {
        self.sink.write(severity, message);
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").field("debug", &self.debug).finish_non_exhaustive()
    }
}
