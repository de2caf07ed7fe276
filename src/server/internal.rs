//! Internal HTTP server for health, info and metrics endpoints.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http_body_util::Full;
use hyper::body::Incoming as IncomingBody;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, warn};

use crate::check::Severity;
use crate::info::InfoRegistry;
use crate::report::render;
use crate::runner::Runner;

const JSON: &str = "application/json";
const PROMETHEUS: &str = "text/plain; version=0.0.4";
const PLAIN: &str = "text/plain";

/// Shared state behind the internal endpoints.
pub struct InternalState {
    runner: Runner,
    info: InfoRegistry,
    fail_on: Option<Severity>,
}

impl InternalState {
    pub fn new(runner: Runner, info: InfoRegistry, fail_on: Option<Severity>) -> Self {
        Self {
            runner,
            info,
            fail_on,
        }
    }
}

/// Bind `addr` and serve /health, /info and /metrics until the task is dropped.
pub async fn run_internal_server(
    addr: SocketAddr,
    state: Arc<InternalState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}

/// Accept loop over an already bound listener.
pub async fn serve(
    listener: TcpListener,
    state: Arc<InternalState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let s = Arc::clone(&state);
                async move { handle_internal_request(req, s).await }
            });

            let io = TokioIo::new(stream);
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!(%peer, error = %e, "internal connection closed with error");
            }
        });
    }
}

/// Handle internal server requests (/health, /info, /metrics).
async fn handle_internal_request(
    req: Request<IncomingBody>,
    state: Arc<InternalState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return Ok(respond(
            StatusCode::METHOD_NOT_ALLOWED,
            PLAIN,
            "Method Not Allowed",
        ));
    }

    let response = match req.uri().path() {
        "/health" => health(&state).await,
        "/info" => info(&state).await,
        "/metrics" => metrics(&state),
        _ => respond(StatusCode::NOT_FOUND, PLAIN, "Not Found"),
    };

    Ok(response)
}

/// Run the checks and return the JSON report; 503 when the run fails the threshold.
async fn health(state: &InternalState) -> Response<Full<Bytes>> {
    let report = match state.runner.run_once().await {
        Ok(report) => report,
        Err(e) => {
            warn!(error = %e, "health run failed");
            return error_json(StatusCode::SERVICE_UNAVAILABLE, &e.to_string());
        }
    };

    let failed = state.fail_on.is_some_and(|threshold| report.fails(threshold));
    let status = if failed {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    match render::json(&report) {
        Ok(body) => respond(status, JSON, body),
        Err(e) => error_json(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

async fn info(state: &InternalState) -> Response<Full<Bytes>> {
    let snapshot = match state.runner.gather().await {
        Ok(snapshot) => snapshot,
        Err(e) => return error_json(StatusCode::SERVICE_UNAVAILABLE, &e.to_string()),
    };

    let sections = state.info.collect(&snapshot);
    match serde_json::to_string_pretty(&sections) {
        Ok(body) => respond(StatusCode::OK, JSON, body),
        Err(e) => error_json(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn metrics(state: &InternalState) -> Response<Full<Bytes>> {
    let Some(metrics) = state.runner.metrics() else {
        return respond(StatusCode::NOT_FOUND, PLAIN, "Metrics disabled");
    };

    match metrics.export() {
        Ok(body) => respond(StatusCode::OK, PROMETHEUS, body),
        Err(e) => respond(StatusCode::INTERNAL_SERVER_ERROR, PLAIN, e.to_string()),
    }
}

fn error_json(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "status": "error", "error": message });
    respond(status, JSON, body.to_string())
}

fn respond(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
