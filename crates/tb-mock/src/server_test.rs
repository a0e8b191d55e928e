use super::*;
use tb_core::{MockEndpoint, ScenarioId};

fn engine_with(mocks: Value) -> Arc<MockMatchEngine> {
    let endpoints: Vec<MockEndpoint> = serde_json::from_value(mocks).unwrap();
    let engine = Arc::new(MockMatchEngine::new());
    engine.activate(ScenarioId::new("s"), &endpoints);
    engine
}

async fn call(
    engine: &Arc<MockMatchEngine>,
    method: Method,
    uri: &str,
    headers: HeaderMap,
    body: &str,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = handle_mock(
        State(Arc::clone(engine)),
        method,
        uri.parse().unwrap(),
        headers,
        Bytes::from(body.to_string()),
    )
    .await;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, bytes.to_vec())
}

#[tokio::test]
async fn test_json_response() {
    let engine = engine_with(json!([{
        "id": "users", "method": "GET", "path": "/users",
        "response": { "status": 200, "body": [{ "id": "$UUID" }] }
    }]));

    let (status, headers, body) = call(&engine, Method::GET, "/users", HeaderMap::new(), "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[CONTENT_TYPE], "application/json");
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_ne!(body[0]["id"], "$UUID");
}

#[tokio::test]
async fn test_query_is_decoded_for_matching() {
    let engine = engine_with(json!([{
        "id": "search", "method": "GET", "path": "/search",
        "requestMatch": { "query": { "q": "red shoes" } },
        "response": { "status": 204 }
    }]));

    let (status, _, _) = call(
        &engine,
        Method::GET,
        "/search?q=red%20shoes&page=1",
        HeaderMap::new(),
        "",
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_body_and_headers_matched() {
    let engine = engine_with(json!([{
        "id": "admin", "method": "POST", "path": "/login",
        "requestMatch": {
            "headers": { "X-Tenant": "acme" },
            "body": { "role": "admin" }
        },
        "response": { "status": 201, "headers": { "Content-Type": "text/csv" }, "body": "a,b" }
    }]));

    let mut headers = HeaderMap::new();
    headers.insert("x-tenant", HeaderValue::from_static("acme"));
    let (status, out_headers, body) = call(
        &engine,
        Method::POST,
        "/login",
        headers,
        r#"{"role":"admin","user":"x"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(out_headers[CONTENT_TYPE], "text/csv");
    assert_eq!(body, b"a,b");

    let (status, _, _) = call(&engine, Method::POST, "/login", HeaderMap::new(), "{}").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_no_match_returns_json_404() {
    let engine = Arc::new(MockMatchEngine::new());
    let (status, _, body) = call(&engine, Method::DELETE, "/nothing", HeaderMap::new(), "").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["method"], "DELETE");
    assert_eq!(body["path"], "/nothing");
}

#[tokio::test]
async fn test_delay_is_honored() {
    let engine = engine_with(json!([{
        "id": "slow", "method": "GET", "path": "/slow",
        "response": { "delay": 50 }
    }]));

    let started = std::time::Instant::now();
    let (status, _, body) = call(&engine, Method::GET, "/slow", HeaderMap::new(), "").await;

    assert!(started.elapsed() >= std::time::Duration::from_millis(50));
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[test]
fn test_parse_body() {
    assert_eq!(parse_body(b""), Value::Null);
    assert_eq!(parse_body(br#"{"a":1}"#), json!({ "a": 1 }));
    assert_eq!(parse_body(b"plain text"), json!("plain text"));
}

#[tokio::test]
async fn test_socket_addr() {
    assert_eq!(socket_addr("127.0.0.1", 4010).await.unwrap().port(), 4010);
    assert!(matches!(
        socket_addr("not a host", 1).await,
        Err(MockError::InvalidAddress(_))
    ));
}

#[tokio::test]
async fn test_socket_addr_resolves_hostname() {
    let addr = socket_addr("localhost", 4010).await.unwrap();
    assert!(addr.ip().is_loopback());
    assert_eq!(addr.port(), 4010);
}

#[test]
fn test_router_builds_with_cors() {
    let engine = Arc::new(MockMatchEngine::new());
    let _plain = mock_router(Arc::clone(&engine), false);
    let _cors = mock_router(engine, true);
}
