//! Log sinks.
//!
//! A sink receives fully formatted lines together with their severity.
//! Sinks must tolerate concurrent writers; request handlers log from many
//! tasks at once.

use crate::observability::severity::Severity;

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync {
    fn write(&self, severity: Severity, message: &str);
}

/// Default sink: forwards lines to `tracing` under the `access` target.
///
/// `tracing` has no fatal level, so FATAL lines go out at ERROR with the
/// original severity attached as a field.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessSink;

impl LogSink for AccessSink {
    fn write(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!(target: "access", severity = %severity, "{message}"),
            Severity::Warn => tracing::warn!(target: "access", severity = %severity, "{message}"),
            Severity::Error | Severity::Fatal => {
                tracing::error!(target: "access", severity = %severity, "{message}")
            }
        }
    }
}
