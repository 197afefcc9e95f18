use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use header_rs::analysis::HeaderAnalyzer;
use mcp_header_server::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Test helper to build the router with default settings
fn app() -> Router {
    router(Arc::new(AppState {
        analyzer: HeaderAnalyzer::default(),
    }))
}

/// Test helper to POST a JSON-RPC body to /mcp
async fn post_mcp(body: Value) -> (StatusCode, Option<Value>) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/mcp")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).ok())
}

fn call(name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "params": {
            "name": name,
            "arguments": arguments
        },
        "id": 7
    })
}

#[tokio::test]
async fn test_health_check() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "mcp-header-server");
}

#[tokio::test]
async fn test_tools_list() {
    let (status, body) = post_mcp(json!({
        "jsonrpc": "2.0",
        "method": "tools/list",
        "params": {},
        "id": 1
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.expect("Invalid JSON");
    let names: Vec<&str> = body["result"]
        .as_array()
        .expect("No tools array")
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["analyze_headers", "parse_email_headers"]);
    assert_eq!(body["id"], 1);
}

#[tokio::test]
async fn test_analyze_headers_mapping() {
    let (status, body) = post_mcp(call(
        "analyze_headers",
        json!({
            "headers": {
                "Received-SPF": ["Pass (sender SPF authorized)"],
                "Authentication-Results": ["mx.example.org; dmarc=pass action=none"]
            }
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.expect("Invalid JSON");
    assert_eq!(
        body["result"],
        json!({
            "success": true,
            "spf": true,
            "dkim": false,
            "dmarc": true,
            "spoofed": false
        })
    );
    assert!(body.get("error").is_none());
    assert_eq!(body["id"], 7);
}

#[tokio::test]
async fn test_analyze_headers_raw_text() {
    let raw = "Authentication-Results: mx.example.org; spf=pass smtp.mailfrom=example.com; dkim=pass header.d=example.com\r\nFrom: a@example.com\r\n\r\n";
    let (_, body) = post_mcp(call("analyze_headers", json!({ "headers": raw }))).await;

    let result = &body.expect("Invalid JSON")["result"];
    assert_eq!(result["spf"], true);
    assert_eq!(result["dkim"], true);
    assert_eq!(result["dmarc"], false);
}

#[tokio::test]
async fn test_analyze_headers_malformed_entries() {
    let (status, body) = post_mcp(call(
        "analyze_headers",
        json!({ "headers": [{"value": "no key"}] }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = body.expect("Invalid JSON");
    assert!(body.get("result").is_none());
    assert_eq!(body["error"]["code"], -32000);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("missing field 'key'"));
}

#[tokio::test]
async fn test_parse_email_headers() {
    let raw = "From: Alerts <alerts@example.com>\r\nSubject: Disk usage\r\nReceived: from a\r\nReceived: from b\r\n\r\n";
    let (_, body) = post_mcp(call("parse_email_headers", json!({ "headers": raw }))).await;

    let result = &body.expect("Invalid JSON")["result"];
    assert_eq!(result["header"]["subject"], "Disk usage");
    assert_eq!(result["header"]["from"], "alerts@example.com");
    assert_eq!(
        result["header"]["header"]["received"],
        json!(["from a", "from b"])
    );
}

#[tokio::test]
async fn test_parse_email_headers_empty_input() {
    let (_, body) = post_mcp(call("parse_email_headers", json!({ "headers": "" }))).await;

    let body = body.expect("Invalid JSON");
    assert_eq!(body["error"]["code"], -32000);
}

#[tokio::test]
async fn test_missing_headers_argument() {
    let (status, _) = post_mcp(call("analyze_headers", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_tool_name() {
    let (status, _) = post_mcp(json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "params": { "arguments": {} },
        "id": 2
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_tool() {
    let (status, body) = post_mcp(call("search_samaccountname", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.expect("Invalid JSON")["error"]["code"], -32601);
}

#[tokio::test]
async fn test_unknown_method() {
    let (_, body) = post_mcp(json!({
        "jsonrpc": "2.0",
        "method": "resources/list",
        "params": {},
        "id": 3
    }))
    .await;

    let body = body.expect("Invalid JSON");
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["id"], 3);
}
