//! Serve command - the streamable HTTP transport.

use crate::cli::Output;
use crate::config::Settings;
use crate::mcp::McpServer;
use crate::transport::{self, SessionManager};
use anyhow::Result;
use std::sync::Arc;

/// Run the streamable HTTP transport.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    mut settings: Settings,
) -> Result<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let server = Arc::new(McpServer::new(settings.clone()));
    let manager = Arc::new(SessionManager::new(server));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    Output::header("Styre MCP Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("MCP", "POST/GET/DELETE /mcp");
    Output::kv("Health", "GET  /health");
    println!();
    if !settings.jira.is_configured() {
        Output::warning("Jira credentials not configured; Jira tools will report errors.");
        Output::info("Set JIRA_HOST, JIRA_USERNAME and JIRA_API_TOKEN, or run `styre doctor`.");
    }
    Output::info("Press Ctrl+C to stop the server.");

    transport::serve(manager, &settings).await?;

    Ok(())
}
