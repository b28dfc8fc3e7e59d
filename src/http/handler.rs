//! Handler capabilities seen by the access log.
//!
//! # Responsibilities
//! - Describe a finished request/response cycle (`RequestHandler`)
//! - Let handlers mark their responses: kind, rollbar token, payload, reason
//! - Build redirect responses that the access log skips
//!
//! # Design Decisions
//! - Optional capabilities are trait methods returning `Option`
//! - Markers travel as response extensions, so handlers need no logger access

use std::time::Duration;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::observability::LogRecord;

/// What kind of handler produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandlerKind {
    #[default]
    Application,
    /// Static file service; never access-logged.
    StaticFile,
    /// Redirect; never access-logged.
    Redirect,
}

/// A finished request as seen by the access log.
pub trait RequestHandler {
    fn kind(&self) -> HandlerKind {
        HandlerKind::Application
    }

    fn status(&self) -> u16;

    fn method(&self) -> &str;

    fn uri(&self) -> &str;

    fn reason(&self) -> &str;

    /// Wall time from request start to completion.
    fn request_time(&self) -> Duration;

    /// Rollbar token to correlate this request with error reports.
    fn rollbar_token(&self) -> Option<&str> {
        None
    }

    /// Extra fields merged over the base record.
    fn log_payload(&self) -> Option<LogRecord> {
        None
    }
}

/// Rollbar token attached to a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbarToken(pub String);

/// Extra access log fields attached to a response.
#[derive(Debug, Clone, PartialEq)]
pub struct LogPayload(pub LogRecord);

/// Custom reason phrase for a response status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonPhrase(pub String);

/// Reason for `status`: the canonical phrase, or "Unknown".
pub fn default_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

/// Redirect response marked so the access log skips it.
pub fn redirect(to: &str, permanent: bool) -> Response {
    let status = if permanent {
        StatusCode::PERMANENT_REDIRECT
    } else {
        StatusCode::TEMPORARY_REDIRECT
    };
    let mut response = match HeaderValue::try_from(to) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(_) => {
            tracing::warn!(location = %to, "Invalid redirect target");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };
    response.extensions_mut().insert(HandlerKind::Redirect);
    response
}

/// Snapshot of one request, built by the access log middleware.
#[derive(Debug, Clone)]
pub struct CompletedRequest {
    pub kind: HandlerKind,
    pub status: u16,
    pub method: String,
    pub uri: String,
    pub reason: String,
    pub elapsed: Duration,
    pub rollbar_token: Option<String>,
    pub payload: Option<LogRecord>,
}

impl RequestHandler for CompletedRequest {
    fn kind(&self) -> HandlerKind {
        self.kind
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn reason(&self) -> &str {
        &self.reason
    }

    fn request_time(&self) -> Duration {
        self.elapsed
    }

    fn rollbar_token(&self) -> Option<&str> {
        self.rollbar_token.as_deref()
    }

    fn log_payload(&self) -> Option<LogRecord> {
        self.payload.clone().filter(|p| !p.is_empty())
    }
}
