//! MCP tool definitions for Styre.

use super::protocol::Tool;
use serde_json::json;

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "list_files".to_string(),
            description: "List the files in a directory. \
                Returns each entry with its name, whether it is a directory, and its size in bytes."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "directoryPath": {
                        "type": "string",
                        "description": "Directory to list, relative to the workspace",
                        "default": "."
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: "read_file".to_string(),
            description: "Read the contents of a UTF-8 text file.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "filePath": {
                        "type": "string",
                        "description": "Path of the file to read, relative to the workspace"
                    }
                },
                "required": ["filePath"]
            }),
        },
        Tool {
            name: "list_jira_boards".to_string(),
            description: "List all boards in Jira.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        Tool {
            name: "list_jira_issues".to_string(),
            description: "List issues for a specific board in Jira.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "boardId": {
                        "type": "number",
                        "description": "The board to list issues for"
                    }
                },
                "required": ["boardId"]
            }),
        },
        Tool {
            name: "create_jira_issue".to_string(),
            description: "Create a new issue in Jira.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "projectId": {
                        "type": "string",
                        "description": "The project to create the issue in"
                    },
                    "summary": {
                        "type": "string",
                        "description": "Issue summary line"
                    },
                    "description": {
                        "type": "string",
                        "description": "Issue description body"
                    },
                    "issueType": {
                        "type": "string",
                        "description": "Issue type name",
                        "default": "Task"
                    }
                },
                "required": ["projectId", "summary", "description"]
            }),
        },
    ]
}
