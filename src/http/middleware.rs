//! Access log middleware.
//! Times each request and hands the finished exchange to the logger.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::http::handler::{
    default_reason, CompletedRequest, HandlerKind, LogPayload, ReasonPhrase, RollbarToken,
};
use crate::observability::Logger;

/// Logs each request once its handler has produced a response.
///
/// `ms` covers the time until the response head is ready, including any
/// body the handler buffered. Bytes streamed after that point are not
/// counted.
pub async fn access_log_middleware(
    State(logger): State<Arc<Logger>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().to_string();

    let response = next.run(request).await;

    let status = response.status();
    let extensions = response.extensions();
    let completed = CompletedRequest {
        kind: extensions.get::<HandlerKind>().copied().unwrap_or_default(),
        status: status.as_u16(),
        method,
        uri,
        reason: extensions
            .get::<ReasonPhrase>()
            .map(|r| r.0.clone())
            .unwrap_or_else(|| default_reason(status).to_string()),
        elapsed: start_time.elapsed(),
        rollbar_token: extensions.get::<RollbarToken>().map(|t| t.0.clone()),
        payload: extensions.get::<LogPayload>().map(|p| p.0.clone()),
    };

    logger.log_request(&completed);
    response
}
