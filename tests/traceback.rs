//! Traceback records for errors.

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

use request_logger::observability::{ExceptionInfo, LogRecord, Severity};
use serde_json::json;

mod common;

#[derive(Debug)]
struct PaymentFailed;

impl fmt::Display for PaymentFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("card declined")
    }
}

impl std::error::Error for PaymentFailed {}

fn traceback_lines(record: &serde_json::Value) -> Vec<String> {
    record["traceback"]
        .as_array()
        .expect("traceback is an array")
        .iter()
        .map(|l| l.as_str().expect("traceback lines are strings").to_string())
        .collect()
}

#[test]
fn test_error_traceback_is_logged_at_error() {
    let (logger, sink) = common::recording_logger(false);
    let exc = ExceptionInfo::from_error(&PaymentFailed);
    logger.traceback(Some(&exc), LogRecord::new().with("order", 17).with("retry", false));

    let (severity, record) = sink.only_json();
    assert_eq!(severity, Severity::Error);
    assert_eq!(record["order"], json!(17));
    assert_eq!(record["retry"], json!(false));

    let lines = traceback_lines(&record);
    assert!(lines[0].ends_with("PaymentFailed: card declined"), "{}", lines[0]);
    assert!(lines.len() >= 2);
}

#[test]
fn test_io_error_chain_via_log_error() {
    let (logger, sink) = common::recording_logger(false);
    let err = std::io::Error::new(std::io::ErrorKind::Other, PaymentFailed);
    logger.log_error(&err, LogRecord::new());

    let (severity, record) = sink.only_json();
    assert_eq!(severity, Severity::Error);
    let lines = traceback_lines(&record);
    assert!(lines[0].contains("card declined"), "{}", lines[0]);
}

#[test]
fn test_without_exception_records_current_stack() {
    let (logger, sink) = common::recording_logger(false);
    logger.traceback(None, LogRecord::new());

    let (severity, record) = sink.only_json();
    assert_eq!(severity, Severity::Error);
    let lines = traceback_lines(&record);
    assert_eq!(lines[0], "no error in flight");
}

/// Writer whose contents stay readable after the logger takes it.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_debug_echo_leaves_record_unchanged() {
    let exc = ExceptionInfo::from_error(&PaymentFailed);
    let fields = || LogRecord::new().with("order", 17).with("traceback", "caller value");

    let (quiet, quiet_sink) = common::recording_logger(false);
    let quiet_echo = SharedBuf::default();
    let quiet = (*quiet).clone().with_echo(quiet_echo.clone());
    quiet.traceback(Some(&exc), fields());

    let (loud, loud_sink) = common::recording_logger(true);
    let loud_echo = SharedBuf::default();
    let loud = (*loud).clone().with_echo(loud_echo.clone());
    loud.traceback(Some(&exc), fields());

    assert_eq!(quiet_sink.lines(), loud_sink.lines());
    let (severity, record) = loud_sink.only_json();
    assert_eq!(severity, Severity::Error);
    assert!(record["traceback"].is_array());

    assert!(quiet_echo.text().is_empty());
    let echoed = loud_echo.text();
    assert!(echoed.contains("declined"), "{echoed:?}");
    assert!(echoed.contains("PaymentFailed"), "{echoed:?}");
}
