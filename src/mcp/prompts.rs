//! MCP prompt definitions for Styre.

use super::protocol::{GetPromptResult, Prompt, PromptArgument};
use serde::Deserialize;
use serde_json::Value;

/// Get all available prompts.
pub fn get_prompts() -> Vec<Prompt> {
    vec![Prompt {
        name: "jira_issue_prompt".to_string(),
        description: "Get a prompt to create a great Jira issue".to_string(),
        arguments: vec![
            PromptArgument {
                name: "issueTitle".to_string(),
                description: "Title of the issue to write".to_string(),
                required: true,
            },
            PromptArgument {
                name: "userStory".to_string(),
                description: "What the user wants to accomplish".to_string(),
                required: true,
            },
            PromptArgument {
                name: "acceptanceCriteria".to_string(),
                description: "Acceptance criteria for the issue".to_string(),
                required: true,
            },
        ],
    }]
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraIssuePromptArgs {
    issue_title: String,
    user_story: String,
    acceptance_criteria: String,
}

/// Render a prompt by name. Returns None for an unknown prompt name and
/// an error message for arguments that don't match the prompt's schema.
pub fn render_prompt(
    name: &str,
    arguments: Option<Value>,
) -> Option<std::result::Result<GetPromptResult, String>> {
    match name {
        "jira_issue_prompt" => {
            let args: JiraIssuePromptArgs =
                match serde_json::from_value(arguments.unwrap_or(Value::Null)) {
                    Ok(args) => args,
                    Err(e) => return Some(Err(format!("Invalid prompt arguments: {}", e))),
                };
            Some(Ok(GetPromptResult::user_text(format!(
                "\nAs a user, I want to {} so that I can achieve a certain goal.\n\n\
                 **Acceptance Criteria:**\n{}\n\n\
                 Please write a great Jira issue description based on the title \"{}\" \
                 and the information above.\n",
                args.user_story, args.acceptance_criteria, args.issue_title
            ))))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::PromptContent;
    use serde_json::json;

    #[test]
    fn test_prompt_listing() {
        let prompts = get_prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, "jira_issue_prompt");
        assert!(prompts[0].arguments.iter().all(|a| a.required));
    }

    #[test]
    fn test_render_embeds_arguments() {
        let result = render_prompt(
            "jira_issue_prompt",
            Some(json!({
                "issueTitle": "Add export button",
                "userStory": "export my data",
                "acceptanceCriteria": "- CSV download works"
            })),
        )
        .unwrap()
        .unwrap();

        let PromptContent::Text { text } = &result.messages[0].content;
        assert!(text.contains("export my data"));
        assert!(text.contains("- CSV download works"));
        assert!(text.contains("\"Add export button\""));
        assert_eq!(result.messages[0].role, "user");
    }

    #[test]
    fn test_render_unknown_prompt() {
        assert!(render_prompt("nope", None).is_none());
    }

    #[test]
    fn test_render_missing_arguments() {
        let result = render_prompt("jira_issue_prompt", Some(json!({}))).unwrap();
        assert!(result.is_err());
    }
}
