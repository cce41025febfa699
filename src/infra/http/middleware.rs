use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics::counter;
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;
use crate::infra::telemetry::{RPC_ERRORS_TOTAL, RPC_REQUESTS_TOTAL};

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let ctx = RequestContext {
        request_id: request_id.clone(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Count calls and failures per procedure. Mounted as a route layer so only
/// known procedures are labelled.
pub async fn track_rpc_calls(request: Request<Body>, next: Next) -> Response {
    let procedure = request
        .uri()
        .path()
        .trim_start_matches("/rpc/")
        .to_string();

    counter!(RPC_REQUESTS_TOTAL, "procedure" => procedure.clone()).increment(1);

    let response = next.run(request).await;
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        counter!(
            RPC_ERRORS_TOTAL,
            "procedure" => procedure,
            "status" => status.as_u16().to_string()
        )
        .increment(1);
    }

    response
}

pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        let elapsed_ms = start.elapsed().as_millis();
        let report = response.extensions_mut().remove::<ErrorReport>();
        let (source, messages) = match report {
            Some(report) => (report.source, report.messages),
            None => ("unknown", Vec::new()),
        };
        let detail = messages
            .first()
            .cloned()
            .unwrap_or_else(|| "no diagnostic available".to_string());

        if status.is_server_error() {
            error!(
                target = "quill::http::response",
                status = status.as_u16(),
                method = %method,
                path = %uri.path(),
                elapsed_ms = elapsed_ms,
                source = source,
                detail = %detail,
                chain = ?messages,
                request_id = request_id,
                "request failed",
            );
        } else {
            warn!(
                target = "quill::http::response",
                status = status.as_u16(),
                method = %method,
                path = %uri.path(),
                elapsed_ms = elapsed_ms,
                source = source,
                detail = %detail,
                chain = ?messages,
                request_id = request_id,
                "client request error",
            );
        }
    }

    response
}
