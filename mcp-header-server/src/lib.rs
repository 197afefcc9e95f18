//! mcp-header-server - MCP Server for header-rs
//!
//! Exposes the header analyzer as tools via the Model Context Protocol (MCP)

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use header_rs::analysis::{HeaderAnalyzer, HeaderInput};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Method or tool does not exist
const METHOD_NOT_FOUND: i32 = -32601;
/// Tool ran and failed
const TOOL_ERROR: i32 = -32000;

/// MCP JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: u64,
}

/// MCP JSON-RPC response
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
    pub id: u64,
}

/// MCP error
#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
}

impl McpResponse {
    fn success(id: u64, result: serde_json::Value) -> Self {
        McpResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    fn failure(id: u64, code: i32, message: String) -> Self {
        McpResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(McpError { code, message }),
            id,
        }
    }
}

/// Tool definition
#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    server: String,
}

#[derive(Debug, Serialize)]
struct ToolParameter {
    name: String,
    description: String,
    #[serde(rename = "type")]
    param_type: String,
    required: bool,
}

/// Application state
pub struct AppState {
    pub analyzer: HeaderAnalyzer,
}

type HandlerResult = Result<Json<McpResponse>, (StatusCode, String)>;

/// Build the HTTP router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/mcp", post(mcp_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mcp-header-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// MCP endpoint handler
async fn mcp_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<McpRequest>,
) -> HandlerResult {
    debug!("MCP request: method={}", request.method);

    match request.method.as_str() {
        "tools/list" => handle_tools_list(request.id),
        "tools/call" => handle_tools_call(state, request),
        _ => Ok(Json(McpResponse::failure(
            request.id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ))),
    }
}

/// Handle tools/list
fn handle_tools_list(id: u64) -> HandlerResult {
    debug!("Listing available tools");

    let tools = vec![
        Tool {
            name: "analyze_headers".to_string(),
            description: "Check whether SPF, DKIM and DMARC passed for an email. Returns {success, spf, dkim, dmarc, spoofed}.".to_string(),
            parameters: vec![ToolParameter {
                name: "headers".to_string(),
                description: "Raw header text, a {name: value or [values]} object, or a list of {key|name, value} objects".to_string(),
                param_type: "string | object | array".to_string(),
                required: true,
            }],
            server: "email".to_string(),
        },
        Tool {
            name: "parse_email_headers".to_string(),
            description: "Parse raw header text into a structured {header: {header: {name: [values]}}} object".to_string(),
            parameters: vec![ToolParameter {
                name: "headers".to_string(),
                description: "Raw header text (a full message is accepted)".to_string(),
                param_type: "string".to_string(),
                required: true,
            }],
            server: "email".to_string(),
        },
    ];

    let tools = serde_json::to_value(tools)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(McpResponse::success(id, tools)))
}

/// Handle tools/call
fn handle_tools_call(state: Arc<AppState>, request: McpRequest) -> HandlerResult {
    // Parse params
    let params: HashMap<String, serde_json::Value> = serde_json::from_value(request.params)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let tool_name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing tool name".to_string()))?;

    let arguments: HashMap<String, serde_json::Value> = params
        .get("arguments")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing arguments".to_string()))?;

    debug!("Calling tool: {} with args: {:?}", tool_name, arguments.keys());

    match tool_name {
        "analyze_headers" => analyze_headers_tool(&state, arguments, request.id),
        "parse_email_headers" => parse_email_headers_tool(&state, arguments, request.id),
        _ => Ok(Json(McpResponse::failure(
            request.id,
            METHOD_NOT_FOUND,
            format!("Tool not found: {}", tool_name),
        ))),
    }
}

/// Analyze headers tool implementation
fn analyze_headers_tool(
    state: &AppState,
    mut arguments: HashMap<String, serde_json::Value>,
    id: u64,
) -> HandlerResult {
    let headers = arguments
        .remove("headers")
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing 'headers' argument".to_string()))?;

    let outcome = HeaderInput::from_value(headers).and_then(|input| state.analyzer.analyze(input));

    match outcome {
        Ok(result) => {
            info!(
                spf = result.spf,
                dkim = result.dkim,
                dmarc = result.dmarc,
                "Headers analyzed"
            );
            let result = serde_json::to_value(result)
                .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
            Ok(Json(McpResponse::success(id, result)))
        }
        Err(e) => {
            warn!("Failed to analyze headers: {}", e);
            Ok(Json(McpResponse::failure(
                id,
                TOOL_ERROR,
                format!("Failed to analyze headers: {}", e),
            )))
        }
    }
}

/// Parse email headers tool implementation
fn parse_email_headers_tool(
    state: &AppState,
    arguments: HashMap<String, serde_json::Value>,
    id: u64,
) -> HandlerResult {
    let headers = arguments
        .get("headers")
        .and_then(|v| v.as_str())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "Missing 'headers' argument".to_string()))?;

    match state.analyzer.parser().parse(headers) {
        Ok(parsed) => {
            info!("Parsed {} header fields", parsed.fields().len());
            let parsed = parsed
                .to_value()
                .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
            Ok(Json(McpResponse::success(id, parsed)))
        }
        Err(e) => {
            warn!("Failed to parse headers: {}", e);
            Ok(Json(McpResponse::failure(
                id,
                TOOL_ERROR,
                format!("Failed to parse headers: {}", e),
            )))
        }
    }
}
