//! Token-based log shipping to Logentries.
//!
//! # Data Flow
//! ```text
//! LogSink::write (any task, non-blocking)
//!     → threshold check
//!     → bounded queue (full: line dropped)
//!     → shipper task: "<token> <line>\n" over TLS (or plain TCP)
//! ```
//!
//! # Design Decisions
//! - Connection is opened lazily and re-opened after any error
//! - Connect, handshake and write are bounded by a timeout
//! - A line that fails to send is dropped; no retry or buffering
//! - Newlines inside a line become U+2028 so one record stays one event

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::timeout;
use tokio_rustls::TlsConnector;

use crate::observability::severity::Severity;
use crate::observability::sink::LogSink;

pub const DEFAULT_TLS_ENDPOINT: &str = "data.logentries.com:443";
pub const DEFAULT_PLAIN_ENDPOINT: &str = "data.logentries.com:80";
pub const DEFAULT_QUEUE_CAPACITY: usize = 32_768;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error building a sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("log shipping requires a running Tokio runtime")]
    NoRuntime,
    #[error("invalid log shipping endpoint `{0}`")]
    InvalidEndpoint(String),
}

/// Shipping settings.
#[derive(Debug, Clone)]
pub struct LogentriesOptions {
    pub token: String,
    /// Lines below this severity are never queued.
    pub threshold: Severity,
    /// host:port of the ingestion endpoint.
    pub endpoint: String,
    pub tls: bool,
    /// Lines waiting to be shipped; further lines are dropped.
    pub queue_capacity: usize,
    /// Bound on connect, TLS handshake and each write.
    pub connect_timeout: Duration,
}

impl LogentriesOptions {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            threshold: Severity::Info,
            endpoint: DEFAULT_TLS_ENDPOINT.to_string(),
            tls: true,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Sink that ships lines to a Logentries token endpoint.
#[derive(Debug)]
pub struct LogentriesSink {
    threshold: Severity,
    capacity: usize,
    tx: mpsc::Sender<String>,
    dropped: AtomicU64,
    overflowing: AtomicBool,
}

impl LogentriesSink {
    /// Start the shipper task on the current runtime.
    pub fn spawn(options: LogentriesOptions) -> Result<Self, SinkError> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| SinkError::NoRuntime)?;

        let tls = if options.tls {
            Some((tls_connector(), server_name(&options.endpoint)?))
        } else {
            None
        };

        let capacity = options.queue_capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        let shipper = Shipper {
            token: options.token,
            endpoint: options.endpoint,
            tls,
            timeout: options.connect_timeout,
        };
        handle.spawn(shipper.run(rx));

        Ok(Self {
            threshold: options.threshold,
            capacity,
            tx,
            dropped: AtomicU64::new(0),
            overflowing: AtomicBool::new(false),
        })
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Lines dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl LogSink for LogentriesSink {
    fn write(&self, severity: Severity, message: &str) {
        if severity < self.threshold {
            return;
        }
        match self.tx.try_send(message.replace('\n', "\u{2028}")) {
            Ok(()) => self.overflowing.store(false, Ordering::Relaxed),
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                if !self.overflowing.swap(true, Ordering::Relaxed) {
                    tracing::warn!(capacity = self.capacity, "Log shipping queue full, dropping lines");
                }
            }
            // Shipper task is gone, i.e. the runtime is shutting down.
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

fn tls_connector() -> TlsConnector {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}

fn server_name(endpoint: &str) -> Result<ServerName<'static>, SinkError> {
    let host = endpoint
        .rsplit_once(':')
        .map_or(endpoint, |(host, _)| host)
        .trim_start_matches('[')
        .trim_end_matches(']');
    ServerName::try_from(host.to_string()).map_err(|_| SinkError::InvalidEndpoint(endpoint.to_string()))
}

type Connection = Box<dyn AsyncWrite + Unpin + Send>;

struct Shipper {
    token: String,
    endpoint: String,
    tls: Option<(TlsConnector, ServerName<'static>)>,
    timeout: Duration,
}

impl Shipper {
    async fn connect(&self) -> io::Result<Connection> {
        let tcp = timeout(self.timeout, TcpStream::connect(&self.endpoint))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))??;

        match &self.tls {
            None => Ok(Box::new(tcp)),
            Some((connector, name)) => {
                let stream = timeout(self.timeout, connector.connect(name.clone(), tcp))
                    .await
                    .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "TLS handshake timed out"))??;
                Ok(Box::new(stream))
            }
        }
    }

    async fn send(&self, conn: &mut Connection, line: &str) -> io::Result<()> {
        let event = format!("{} {line}\n", self.token);
        timeout(self.timeout, async {
            conn.write_all(event.as_bytes()).await?;
            conn.flush().await
        })
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "write timed out"))?
    }

    async fn run(self, mut rx: mpsc::Receiver<String>) {
        let mut conn: Option<Connection> = None;
        let mut reported = false;

        while let Some(line) = rx.recv().await {
            if conn.is_none() {
                match self.connect().await {
                    Ok(stream) => {
                        tracing::debug!(endpoint = %self.endpoint, "Connected to log shipping endpoint");
                        conn = Some(stream);
                        reported = false;
                    }
                    Err(e) => {
                        if !reported {
                            tracing::warn!(endpoint = %self.endpoint, error = %e, "Log shipping endpoint unreachable");
                            reported = true;
                        }
                        continue;
                    }
                }
            }

            let Some(stream) = conn.as_mut() else { continue };
            if let Err(e) = self.send(stream, &line).await {
                if !reported {
                    tracing::warn!(endpoint = %self.endpoint, error = %e, "Log shipping write failed");
                    reported = true;
                }
                conn = None;
            }
        }
    }
}
