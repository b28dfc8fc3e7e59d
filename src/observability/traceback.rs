//! Structured traceback records for errors and panics.

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::io::Write;

use crate::observability::record::LogRecord;
use crate::observability::severity::Severity;
use crate::observability::Logger;

/// An error captured for logging: its message chain plus a backtrace.
#[derive(Debug)]
pub struct ExceptionInfo {
    kind: Option<String>,
    messages: Vec<String>,
    backtrace: Backtrace,
}

impl ExceptionInfo {
    /// Capture `err` and its `source()` chain. The backtrace is taken here,
    /// so call this as close to the failure as possible.
    pub fn from_error<E: Error + ?Sized>(err: &E) -> Self {
        let mut messages = vec![err.to_string()];
        let mut source = err.source();
        while let Some(cause) = source {
            messages.push(cause.to_string());
            source = cause.source();
        }
        Self {
            kind: Some(std::any::type_name::<E>().to_string()),
            messages,
            backtrace: Backtrace::force_capture(),
        }
    }

    /// Capture a panic payload. Payloads that are not strings are reported
    /// by a placeholder.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        Self {
            kind: Some("panic".to_string()),
            messages: vec![panic_message(payload)],
            backtrace: Backtrace::force_capture(),
        }
    }

    /// The call stack at this point, with no error attached.
    pub fn current() -> Self {
        Self {
            kind: None,
            messages: vec!["no error in flight".to_string()],
            backtrace: Backtrace::force_capture(),
        }
    }

    /// Message of the outermost error.
    pub fn message(&self) -> &str {
        self.messages.first().map(String::as_str).unwrap_or_default()
    }

    /// Ordered traceback lines: the error, its causes, then the frames.
    pub fn format(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut messages = self.messages.iter();
        if let Some(top) = messages.next() {
            match &self.kind {
                Some(kind) => lines.push(format!("{kind}: {top}")),
                None => lines.push(top.clone()),
            }
        }
        lines.extend(messages.map(|cause| format!("Caused by: {cause}")));

        match self.backtrace.status() {
            BacktraceStatus::Captured => {
                lines.push("stack backtrace:".to_string());
                lines.extend(self.backtrace.to_string().lines().map(str::to_string));
            }
            _ => lines.push("<backtrace unavailable>".to_string()),
        }
        lines
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

impl Logger {
    /// Log a traceback at ERROR, with `fields` alongside it.
    ///
    /// Without `exc`, the current call stack is recorded. In debug mode the
    /// traceback is also echoed, highlighted, to stdout (or the writer set
    /// with [`Logger::with_echo`]).
    pub fn traceback(&self, exc: Option<&ExceptionInfo>, mut fields: LogRecord) {
        let lines = match exc {
            Some(exc) => exc.format(),
            None => ExceptionInfo::current().format(),
        };
        let joined = self.highlighter.is_some().then(|| lines.join("\n"));

        fields.insert("traceback", lines);
        self.emit(Severity::Error, &fields.to_json());

        if let (Some(highlighter), Some(text)) = (&self.highlighter, joined) {
            if let Ok(mut out) = self.echo.lock() {
                let _ = out.write_all(highlighter.render(&text).as_bytes());
                let _ = out.flush();
            }
        }
    }

    /// Shorthand for logging an error value with extra fields.
    pub fn log_error<E: Error + ?Sized>(&self, err: &E, fields: LogRecord) {
        self.traceback(Some(&ExceptionInfo::from_error(err)), fields);
    }
}
