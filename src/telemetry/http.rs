use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, field};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const TRACE_ID_HEADER: &str = "x-trace-id";

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub trace_id: String,
}

impl RequestContext {
    /// Reuses caller supplied ids; the trace id falls back to the request id.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let request_id =
            header_str(headers, REQUEST_ID_HEADER).unwrap_or_else(|| Uuid::new_v4().to_string());
        let trace_id = header_str(headers, TRACE_ID_HEADER).unwrap_or_else(|| request_id.clone());
        Self {
            request_id,
            trace_id,
        }
    }
}

pub async fn request_logging_middleware(mut req: Request, next: Next) -> Response {
    let context = RequestContext::from_headers(req.headers());
    req.extensions_mut().insert(context.clone());

    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let span = tracing::info_span!(
        "http_request",
        request_id = %context.request_id,
        trace_id = %context.trace_id,
        method = %method,
        path = %path,
        board_id = field::Empty,
        status = field::Empty,
        latency_ms = field::Empty
    );

    if let Some(board_id) = board_id_from_path(req.uri().path()) {
        span.record("board_id", field::display(board_id));
    }

    let start = Instant::now();
    let mut response = next.run(req).instrument(span.clone()).await;
    let latency_ms = start.elapsed().as_millis();
    let status = response.status();

    span.record("status", field::display(status.as_u16()));
    span.record("latency_ms", field::display(latency_ms));

    if status.is_server_error() {
        tracing::error!(parent: &span, status = %status.as_u16(), latency_ms = %latency_ms, "Request completed with server error");
    } else if status.is_client_error() {
        tracing::warn!(parent: &span, status = %status.as_u16(), latency_ms = %latency_ms, "Request completed with client error");
    } else {
        tracing::info!(parent: &span, status = %status.as_u16(), latency_ms = %latency_ms, "Request completed successfully");
    }

    insert_header(&mut response, REQUEST_ID_HEADER, &context.request_id);
    insert_header(&mut response, TRACE_ID_HEADER, &context.trace_id);

    response
}

/// Board token of `/api/boards/{board_id}/...` routes, for correlating logs.
fn board_id_from_path(path: &str) -> Option<Uuid> {
    let rest = path.strip_prefix("/api/boards/")?;
    let segment = rest.split('/').next()?;
    Uuid::parse_str(segment).ok()
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn insert_header(response: &mut Response, name: &'static str, value: &str) {
    let name = HeaderName::from_static(name);
    if let Ok(header_value) = HeaderValue::from_str(value) {
        response.headers_mut().insert(name, header_value);
    }
}
