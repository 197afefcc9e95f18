//! mcp-header-server entry point

use header_rs::analysis::HeaderAnalyzer;
use header_rs::{logging, Config};
use mcp_header_server::{router, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let mut config = Config::load_or_default(&config_path)?;

    if let Ok(addr) = std::env::var("MCP_LISTEN_ADDR") {
        config.server.listen_addr = addr;
        config.validate()?;
    }

    logging::init(&config.logging)?;

    info!("Starting mcp-header-server v{}", env!("CARGO_PKG_VERSION"));

    let state = Arc::new(AppState {
        analyzer: HeaderAnalyzer::new(&config.analysis),
    });

    let app = router(state);

    let addr = config.server.listen_addr.clone();
    info!("MCP server listening on http://{}", addr);
    info!("Available tools: analyze_headers, parse_email_headers");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
