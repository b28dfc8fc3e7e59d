//! Access log lines for completed requests.

use std::time::Duration;

use serde_json::Value;

use crate::http::handler::{HandlerKind, RequestHandler};
use crate::observability::record::LogRecord;
use crate::observability::severity::Severity;
use crate::observability::Logger;

const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

impl Logger {
    /// Log one completed request.
    ///
    /// Static file and redirect handlers are skipped. Everything else
    /// produces exactly one line at a severity chosen from the status.
    pub fn log_request<H: RequestHandler + ?Sized>(&self, handler: &H) {
        if matches!(handler.kind(), HandlerKind::StaticFile | HandlerKind::Redirect) {
            return;
        }

        let mut record = LogRecord::new()
            .with("status", handler.status())
            .with("method", handler.method())
            .with("uri", handler.uri())
            .with("reason", handler.reason())
            .with("ms", format_millis(handler.request_time()));

        if let Some(token) = handler.rollbar_token() {
            record.insert("rollbar", token);
        }
        if let Some(payload) = handler.log_payload() {
            record.merge(payload);
        }

        // Severity and prefix follow the merged record.
        let status = record
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or_else(|| handler.status());
        let method = record
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_else(|| handler.method());

        let prefix = if self.debug {
            status_prefix(method, status)
        } else {
            String::new()
        };

        self.emit(
            Severity::for_status(status),
            &format!("{prefix}{}", record.to_json()),
        );
    }
}

/// Elapsed time in whole milliseconds, rounding halves to even.
pub fn format_millis(elapsed: Duration) -> String {
    // Integer nanoseconds keep the millisecond value exact before rounding.
    let ms = elapsed.as_nanos() as f64 / 1_000_000.0;
    format!("{:.0}", ms.round_ties_even())
}

fn status_prefix(method: &str, status: u16) -> String {
    let color = match status {
        500.. => RED,
        400..=499 => YELLOW,
        _ => GREEN,
    };
    format!("{color}{method} {status}{RESET} ")
}
