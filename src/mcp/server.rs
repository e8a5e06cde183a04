//! MCP server implementation.

use super::protocol::*;
use super::prompts::{get_prompts, render_prompt};
use super::tools::get_tools;
use crate::config::Settings;
use crate::files;
use crate::jira::JiraClient;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "styre";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Boundary between the transports and the method dispatcher.
///
/// The session transport forwards request bodies through this trait and
/// relays the responses verbatim; it never interprets method semantics.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Handle a single JSON-RPC request and produce the response.
    async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse;
}

/// MCP Server for Styre.
pub struct McpServer {
    settings: Settings,
    jira: Option<JiraClient>,
}

#[async_trait]
impl Dispatcher for McpServer {
    async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        self.handle_request(request).await
    }
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(settings: Settings) -> Self {
        let jira = match JiraClient::from_settings(&settings.jira) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("Jira tools disabled: {}", e);
                None
            }
        };
        Self { settings, jira }
    }

    #[cfg(test)]
    fn without_jira(settings: Settings) -> Self {
        Self {
            settings,
            jira: None,
        }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        // Log to stderr so it doesn't interfere with JSON-RPC
        eprintln!("Styre MCP server starting...");

        for line in stdin.lock().lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(req) => req,
                Err(e) => {
                    eprintln!("Failed to parse request: {}", e);
                    let response = JsonRpcResponse::error(None, -32700, "Parse error");
                    writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                    stdout.flush()?;
                    continue;
                }
            };

            let response = self.handle_request(request).await;
            writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
            stdout.flush()?;
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "initialized" | "notifications/initialized" => {
                // Notification, no response needed but we'll send empty success
                JsonRpcResponse::success(request.id, json!({}))
            }
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            "prompts/list" => self.handle_prompts_list(request.id),
            "prompts/get" => self.handle_prompts_get(request.id, request.params),
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                &format!("Method not found: {}", request.method),
            ),
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
                prompts: PromptsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult { tools: get_tools() };
        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        let result = match params.name.as_str() {
            "list_files" => self.tool_list_files(params.arguments).await,
            "read_file" => self.tool_read_file(params.arguments).await,
            "list_jira_boards" => self.tool_list_jira_boards().await,
            "list_jira_issues" => self.tool_list_jira_issues(params.arguments).await,
            "create_jira_issue" => self.tool_create_jira_issue(params.arguments).await,
            _ => ToolCallResult::error(format!("Unknown tool: {}", params.name)),
        };

        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Handle prompts/list request.
    fn handle_prompts_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = PromptsListResult {
            prompts: get_prompts(),
        };
        JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
    }

    /// Handle prompts/get request.
    fn handle_prompts_get(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: GetPromptParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        match render_prompt(&params.name, params.arguments) {
            Some(Ok(result)) => {
                JsonRpcResponse::success(id, serde_json::to_value(result).unwrap())
            }
            Some(Err(message)) => JsonRpcResponse::error(id, -32602, &message),
            None => JsonRpcResponse::error(
                id,
                -32602,
                &format!("Unknown prompt: {}", params.name),
            ),
        }
    }

    /// List files tool.
    async fn tool_list_files(&self, args: Option<Value>) -> ToolCallResult {
        let args: ListFilesParams = match parse_args(args) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::error(e),
        };

        let dir = self.resolve(&args.directory_path);
        match files::list_files(&dir).await {
            Ok(entries) => ToolCallResult::text(pretty(
                &serde_json::to_value(entries).unwrap_or(Value::Null),
            )),
            Err(e) => ToolCallResult::error(format!("Error listing files: {}", e)),
        }
    }

    /// Read file tool.
    async fn tool_read_file(&self, args: Option<Value>) -> ToolCallResult {
        let args: ReadFileParams = match parse_args(args) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::error(e),
        };

        let path = self.resolve(&args.file_path);
        match files::read_file(&path).await {
            Ok(content) => ToolCallResult::text(content),
            Err(e) => ToolCallResult::error(format!("Error reading file: {}", e)),
        }
    }

    /// List Jira boards tool.
    async fn tool_list_jira_boards(&self) -> ToolCallResult {
        let client = match self.jira() {
            Ok(client) => client,
            Err(result) => return result,
        };

        match client.list_boards().await {
            Ok(boards) => ToolCallResult::text(pretty(&boards)),
            Err(e) => ToolCallResult::error(format!("Jira API Error: {}", e)),
        }
    }

    /// List Jira issues tool.
    async fn tool_list_jira_issues(&self, args: Option<Value>) -> ToolCallResult {
        let args: ListIssuesParams = match parse_args(args) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::error(e),
        };

        let client = match self.jira() {
            Ok(client) => client,
            Err(result) => return result,
        };

        match client.board_issues(args.board_id).await {
            Ok(issues) => ToolCallResult::text(pretty(&issues)),
            Err(e) => ToolCallResult::error(format!("Jira API Error: {}", e)),
        }
    }

    /// Create Jira issue tool.
    async fn tool_create_jira_issue(&self, args: Option<Value>) -> ToolCallResult {
        let args: CreateIssueParams = match parse_args(args) {
            Ok(args) => args,
            Err(e) => return ToolCallResult::error(e),
        };

        let client = match self.jira() {
            Ok(client) => client,
            Err(result) => return result,
        };

        match client
            .create_issue(
                &args.project_id,
                &args.summary,
                &args.description,
                &args.issue_type,
            )
            .await
        {
            Ok(issue) => ToolCallResult::text(pretty(&issue)),
            Err(e) => ToolCallResult::error(format!("Jira API Error: {}", e)),
        }
    }

    fn jira(&self) -> std::result::Result<&JiraClient, ToolCallResult> {
        self.jira.as_ref().ok_or_else(|| {
            ToolCallResult::error(
                "Jira is not configured. Set JIRA_HOST, JIRA_USERNAME and JIRA_API_TOKEN."
                    .to_string(),
            )
        })
    }

    /// Resolve a tool-supplied path against the workspace directory.
    fn resolve(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.settings.workspace_dir().join(path)
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListFilesParams {
    #[serde(default = "default_directory")]
    directory_path: String,
}

fn default_directory() -> String {
    ".".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadFileParams {
    file_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListIssuesParams {
    board_id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateIssueParams {
    project_id: String,
    summary: String,
    description: String,
    #[serde(default = "default_issue_type")]
    issue_type: String,
}

fn default_issue_type() -> String {
    "Task".to_string()
}

/// Deserialize tool arguments into their typed shape.
fn parse_args<T: DeserializeOwned>(args: Option<Value>) -> std::result::Result<T, String> {
    serde_json::from_value(args.unwrap_or_else(|| json!({})))
        .map_err(|e| format!("Invalid arguments: {}", e))
}

/// Pretty-print a JSON value for tool output.
fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    fn server() -> McpServer {
        McpServer::without_jira(Settings::default())
    }

    #[tokio::test]
    async fn test_initialize_handshake() {
        let response = server().handle_request(request("initialize", None)).await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "styre");
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["capabilities"]["prompts"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server().handle_request(request("bogus/method", None)).await;
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = server().handle_request(request("tools/list", None)).await;
        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 5);
        assert_eq!(tools[0]["name"], "list_files");
    }

    #[tokio::test]
    async fn test_tools_call_missing_params() {
        let response = server().handle_request(request("tools/call", None)).await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let response = server()
            .handle_request(request("tools/call", Some(json!({"name": "bogus"}))))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_tool_list_files_in_workspace() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report.md"), "hi").unwrap();

        let mut settings = Settings::default();
        settings.general.workspace_dir = dir.path().to_string_lossy().into_owned();
        let server = McpServer::without_jira(settings);

        let response = server
            .handle_request(request(
                "tools/call",
                Some(json!({"name": "list_files", "arguments": {}})),
            ))
            .await;
        let result = response.result.unwrap();
        assert!(result.get("isError").is_none());
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("report.md"));
    }

    #[tokio::test]
    async fn test_tool_read_file_missing_argument() {
        let response = server()
            .handle_request(request(
                "tools/call",
                Some(json!({"name": "read_file", "arguments": {}})),
            ))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Invalid arguments"));
    }

    #[tokio::test]
    async fn test_jira_tool_unconfigured() {
        let response = server()
            .handle_request(request(
                "tools/call",
                Some(json!({"name": "list_jira_boards", "arguments": {}})),
            ))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("not configured"));
    }

    #[tokio::test]
    async fn test_prompts_roundtrip() {
        let response = server().handle_request(request("prompts/list", None)).await;
        let result = response.result.unwrap();
        assert_eq!(result["prompts"][0]["name"], "jira_issue_prompt");

        let response = server()
            .handle_request(request(
                "prompts/get",
                Some(json!({
                    "name": "jira_issue_prompt",
                    "arguments": {
                        "issueTitle": "T",
                        "userStory": "do things",
                        "acceptanceCriteria": "works"
                    }
                })),
            ))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn test_prompts_get_unknown() {
        let response = server()
            .handle_request(request("prompts/get", Some(json!({"name": "bogus"}))))
            .await;
        assert_eq!(response.error.unwrap().code, -32602);
    }
}
