//! Doctor command - verify configuration and Jira credentials.

use crate::cli::Output;
use crate::config::Settings;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Styre Doctor");
    println!();
    println!("Checking configuration and credentials...\n");

    let mut checks = Vec::new();

    println!("{}", style("Jira").bold());
    let jira_checks = check_jira(settings);
    for check in &jira_checks {
        check.print();
    }
    checks.extend(jira_checks);

    println!();

    println!("{}", style("HTTP Transport").bold());
    let server_checks = check_server(settings);
    for check in &server_checks {
        check.print();
    }
    checks.extend(server_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    let workspace_check = check_workspace(settings);
    workspace_check.print();
    checks.push(workspace_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Jira tools will not work until they are fixed.",
            errors
        ));
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Styre is ready to use.");
    }

    Ok(())
}

/// Check Jira connection settings.
fn check_jira(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match settings.jira.host() {
        Some(host) => results.push(CheckResult::ok("JIRA_HOST", &host)),
        None => results.push(CheckResult::error(
            "JIRA_HOST",
            "not set",
            "Set with: export JIRA_HOST='mycompany.atlassian.net'",
        )),
    }

    match settings.jira.username() {
        Some(user) => results.push(CheckResult::ok("JIRA_USERNAME", &user)),
        None => results.push(CheckResult::error(
            "JIRA_USERNAME",
            "not set",
            "Set with: export JIRA_USERNAME='me@mycompany.com'",
        )),
    }

    match settings.jira.api_token() {
        Some(token) if token.len() > 8 => {
            let masked = format!("{}...{}", &token[..4], &token[token.len() - 4..]);
            results.push(CheckResult::ok(
                "JIRA_API_TOKEN",
                &format!("configured ({})", masked),
            ));
        }
        Some(_) => results.push(CheckResult::warning(
            "JIRA_API_TOKEN",
            "set but looks too short",
            "Create a token at id.atlassian.com/manage-profile/security/api-tokens",
        )),
        None => results.push(CheckResult::error(
            "JIRA_API_TOKEN",
            "not set",
            "Set with: export JIRA_API_TOKEN='...'",
        )),
    }

    results
}

/// Check HTTP transport settings.
fn check_server(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    results.push(CheckResult::ok(
        "Bind address",
        &format!("{}:{}", settings.server.host, settings.server.port),
    ));

    let origins = settings.server.allowed_origins();
    if origins.is_empty() {
        results.push(CheckResult::warning(
            "Allowed origins",
            "empty - all browser requests will be rejected",
            "Set ALLOWED_ORIGINS or server.allowed_origins in the config",
        ));
    } else {
        results.push(CheckResult::ok(
            "Allowed origins",
            &origins.join(", "),
        ));
    }

    results
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: styre config edit",
        )
    }
}

/// Check the workspace directory.
fn check_workspace(settings: &Settings) -> CheckResult {
    let dir = settings.workspace_dir();
    if dir.is_dir() {
        CheckResult::ok("Workspace", &format!("{}", dir.display()))
    } else {
        CheckResult::error(
            "Workspace",
            &format!("{} is not a directory", dir.display()),
            "Set general.workspace_dir in the config",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_check_server_defaults() {
        let settings = Settings::default();
        let results = check_server(&settings);
        assert!(results.iter().all(|c| c.status == CheckStatus::Ok));
    }
}
