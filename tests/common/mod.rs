//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};

use request_logger::observability::{LogSink, Logger, Severity};

/// Sink that keeps every line in memory.
#[derive(Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<(Severity, String)>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<(Severity, String)> {
        self.lines.lock().unwrap().clone()
    }

    /// The single recorded line, parsed as JSON.
    #[allow(dead_code)]
    pub fn only_json(&self) -> (Severity, serde_json::Value) {
        let lines = self.lines();
        assert_eq!(lines.len(), 1, "expected exactly one line, got {lines:?}");
        let (severity, line) = lines.into_iter().next().unwrap();
        (severity, serde_json::from_str(&line).unwrap())
    }
}

impl LogSink for RecordingSink {
    fn write(&self, severity: Severity, message: &str) {
        self.lines.lock().unwrap().push((severity, message.to_string()));
    }
}

/// A logger writing to a fresh recording sink.
pub fn recording_logger(debug: bool) -> (Arc<Logger>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let logger = Arc::new(Logger::new(sink.clone(), debug));
    (logger, sink)
}
