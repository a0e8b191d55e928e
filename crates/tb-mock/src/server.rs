//! HTTP front end for the mock engine

use crate::engine::MockMatchEngine;
use crate::error::{MockError, MockResult};
use crate::request::{MockRequest, ResolvedResponse};
use axum::body::{Body, Bytes};
use axum::extract::{Query, State};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Router answering every path from the engine's active mocks
pub fn mock_router(engine: Arc<MockMatchEngine>, cors: bool) -> Router {
    let router = Router::new().fallback(handle_mock).with_state(engine);
    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Serve mocks on `addr` until ctrl-c
pub async fn serve(engine: Arc<MockMatchEngine>, addr: SocketAddr, cors: bool) -> MockResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| MockError::Bind { addr, source })?;
    log::info!("Mock server listening on http://{}", addr);

    axum::serve(listener, mock_router(engine, cors))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(MockError::Server)?;

    log::info!("Mock server stopped");
    Ok(())
}

/// Resolve `host` and `port` to the first socket address; hostnames go through DNS
pub async fn socket_addr(host: &str, port: u16) -> MockResult<SocketAddr> {
    let invalid = || MockError::InvalidAddress(format!("{}:{}", host, port));
    let mut addrs = tokio::net::lookup_host((host, port)).await.map_err(|e| {
        log::debug!("Lookup of {} failed: {}", host, e);
        invalid()
    })?;
    addrs.next().ok_or_else(invalid)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Could not listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn handle_mock(
    State(engine): State<Arc<MockMatchEngine>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = to_mock_request(&method, &uri, &headers, &body);

    match engine.match_request(&request) {
        Some(resolved) => {
            if let Some(delay) = resolved.delay {
                tokio::time::sleep(delay).await;
            }
            into_http_response(resolved)
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "no mock matched",
                "method": request.method,
                "path": request.path,
            })),
        )
            .into_response(),
    }
}

fn to_mock_request(method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> MockRequest {
    let query = Query::<HashMap<String, String>>::try_from_uri(uri)
        .map(|Query(q)| q.into_iter().collect::<BTreeMap<_, _>>())
        .unwrap_or_default();

    let mut header_map = BTreeMap::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            header_map
                .entry(name.as_str().to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    MockRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query,
        headers: header_map,
        body: parse_body(body),
    }
}

/// JSON when the payload parses, otherwise the raw text
fn parse_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn into_http_response(resolved: ResolvedResponse) -> Response {
    let status = StatusCode::from_u16(resolved.status).unwrap_or_else(|_| {
        log::warn!(
            "Mock '{}' has invalid status {}",
            resolved.mock_id,
            resolved.status
        );
        StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut headers = HeaderMap::new();
    for (name, value) in &resolved.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => log::warn!(
                "Mock '{}' skipped invalid header '{}'",
                resolved.mock_id,
                name
            ),
        }
    }

    let (payload, default_type) = match resolved.body {
        Value::Null => (Vec::new(), None),
        Value::String(s) => (s.into_bytes(), Some("text/plain; charset=utf-8")),
        other => (other.to_string().into_bytes(), Some("application/json")),
    };
    if let Some(content_type) = default_type {
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
    }

    (status, headers, Body::from(payload)).into_response()
}

#[cfg(test)]
#[path = "server_test.rs"]
mod tests;
