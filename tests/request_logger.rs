//! Access log records built from handler capabilities.

use std::time::Duration;

use request_logger::http::{HandlerKind, RequestHandler};
use request_logger::observability::{LogRecord, Severity};
use rust_decimal::Decimal;
use serde_json::json;

mod common;

struct Handler {
    kind: HandlerKind,
    status: u16,
    elapsed: Duration,
    rollbar: Option<&'static str>,
    payload: Option<LogRecord>,
}

impl Handler {
    fn with_status(status: u16) -> Self {
        Self {
            kind: HandlerKind::Application,
            status,
            elapsed: Duration::from_millis(10),
            rollbar: None,
            payload: None,
        }
    }
}

impl RequestHandler for Handler {
    fn kind(&self) -> HandlerKind {
        self.kind
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn method(&self) -> &str {
        "GET"
    }

    fn uri(&self) -> &str {
        "/x"
    }

    fn reason(&self) -> &str {
        "Not Found"
    }

    fn request_time(&self) -> Duration {
        self.elapsed
    }

    fn rollbar_token(&self) -> Option<&str> {
        self.rollbar
    }

    fn log_payload(&self) -> Option<LogRecord> {
        self.payload.clone()
    }
}

/// Only the required capabilities.
struct Minimal;

impl RequestHandler for Minimal {
    fn status(&self) -> u16 {
        201
    }

    fn method(&self) -> &str {
        "POST"
    }

    fn uri(&self) -> &str {
        "/items?draft=1"
    }

    fn reason(&self) -> &str {
        "Created"
    }

    fn request_time(&self) -> Duration {
        Duration::from_micros(123_400)
    }
}

#[test]
fn test_not_found_line_is_exact_json_at_warn() {
    let (logger, sink) = common::recording_logger(false);
    logger.log_request(&Handler::with_status(404));

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0, Severity::Warn);
    assert_eq!(
        lines[0].1,
        r#"{"status":404,"method":"GET","uri":"/x","reason":"Not Found","ms":"10"}"#
    );
}

#[test]
fn test_severity_follows_status() {
    let cases = [
        (100, Severity::Info),
        (200, Severity::Info),
        (302, Severity::Info),
        (399, Severity::Info),
        (400, Severity::Warn),
        (451, Severity::Warn),
        (499, Severity::Warn),
        (500, Severity::Fatal),
        (503, Severity::Fatal),
        (599, Severity::Fatal),
    ];
    for (status, expected) in cases {
        let (logger, sink) = common::recording_logger(false);
        logger.log_request(&Handler::with_status(status));
        let (severity, record) = sink.only_json();
        assert_eq!(severity, expected, "status {status}");
        assert_eq!(record["status"], json!(status));
    }
}

#[test]
fn test_excluded_kinds_never_log() {
    for kind in [HandlerKind::StaticFile, HandlerKind::Redirect] {
        for status in [200, 404, 500] {
            let (logger, sink) = common::recording_logger(false);
            let mut handler = Handler::with_status(status);
            handler.kind = kind;
            logger.log_request(&handler);
            assert!(sink.lines().is_empty(), "{kind:?} {status}");
        }
    }
}

#[test]
fn test_optional_capabilities_default_to_absent() {
    let (logger, sink) = common::recording_logger(false);
    logger.log_request(&Minimal);

    let (severity, record) = sink.only_json();
    assert_eq!(severity, Severity::Info);
    assert_eq!(
        record,
        json!({
            "status": 201,
            "method": "POST",
            "uri": "/items?draft=1",
            "reason": "Created",
            "ms": "123"
        })
    );
}

#[test]
fn test_rollbar_token_is_recorded() {
    let (logger, sink) = common::recording_logger(false);
    let mut handler = Handler::with_status(200);
    handler.rollbar = Some("abc");
    logger.log_request(&handler);

    let (_, record) = sink.only_json();
    assert_eq!(record["rollbar"], json!("abc"));
}

#[test]
fn test_payload_merges_and_overwrites() {
    let (logger, sink) = common::recording_logger(false);
    let mut handler = Handler::with_status(200);
    handler.payload = Some(
        LogRecord::new()
            .with("user_id", 42)
            .with("status", "masked")
            .with("balance", Decimal::new(314, 2)),
    );
    logger.log_request(&handler);

    let (_, record) = sink.only_json();
    assert_eq!(record["user_id"], json!(42));
    assert_eq!(record["status"], json!("masked"));
    assert_eq!(record["balance"], json!(3.14));
    assert_eq!(record["method"], json!("GET"));
}

#[test]
fn test_debug_prefix_precedes_json() {
    let (logger, sink) = common::recording_logger(true);
    logger.log_request(&Handler::with_status(503));

    let lines = sink.lines();
    assert_eq!(lines[0].0, Severity::Fatal);
    let line = &lines[0].1;
    let prefix = "\x1b[91mGET 503\x1b[0m ";
    assert!(line.starts_with(prefix), "{line:?}");

    let record: serde_json::Value = serde_json::from_str(&line[prefix.len()..]).unwrap();
    assert_eq!(record["status"], json!(503));
}

#[test]
fn test_payload_status_and_method_choose_severity_and_prefix() {
    let (logger, sink) = common::recording_logger(true);
    let mut handler = Handler::with_status(200);
    handler.payload = Some(LogRecord::new().with("status", 503).with("method", "PATCH"));
    logger.log_request(&handler);

    let lines = sink.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0, Severity::Fatal);
    let prefix = "\x1b[91mPATCH 503\x1b[0m ";
    assert!(lines[0].1.starts_with(prefix), "{:?}", lines[0].1);

    let record: serde_json::Value = serde_json::from_str(&lines[0].1[prefix.len()..]).unwrap();
    assert_eq!(record["status"], json!(503));
    assert_eq!(record["method"], json!("PATCH"));
}

#[test]
fn test_non_integer_payload_status_keeps_handler_severity() {
    let (logger, sink) = common::recording_logger(false);
    let mut handler = Handler::with_status(404);
    handler.payload = Some(LogRecord::new().with("status", "hidden"));
    logger.log_request(&handler);

    let (severity, record) = sink.only_json();
    assert_eq!(severity, Severity::Warn);
    assert_eq!(record["status"], json!("hidden"));
}
