//! Origin validation for the HTTP transport.

/// Check a request's declared origin against the allow-list.
///
/// Requests without an Origin header (curl, local MCP clients) are
/// allowed. A present origin must be a literal member of the list; no
/// normalization is applied, so scheme, host and port must match
/// exactly and mismatches fail closed. This runs before any session
/// lookup to prevent cross-origin session hijacking.
pub fn origin_allowed(origin: Option<&str>, allow_list: &[String]) -> bool {
    match origin {
        None => true,
        Some(origin) => allow_list.iter().any(|allowed| allowed == origin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> Vec<String> {
        vec![
            "http://localhost:3000".to_string(),
            "https://app.example.com".to_string(),
        ]
    }

    #[test]
    fn test_member_allowed() {
        assert!(origin_allowed(Some("http://localhost:3000"), &allow_list()));
        assert!(origin_allowed(Some("https://app.example.com"), &allow_list()));
    }

    #[test]
    fn test_missing_origin_allowed() {
        assert!(origin_allowed(None, &allow_list()));
        assert!(origin_allowed(None, &[]));
    }

    #[test]
    fn test_non_member_rejected() {
        assert!(!origin_allowed(Some("http://evil.example.com"), &allow_list()));
    }

    #[test]
    fn test_no_normalization() {
        // Near-misses must fail: different port, scheme, or a trailing slash.
        assert!(!origin_allowed(Some("http://localhost:3001"), &allow_list()));
        assert!(!origin_allowed(Some("https://localhost:3000"), &allow_list()));
        assert!(!origin_allowed(Some("http://localhost:3000/"), &allow_list()));
        assert!(!origin_allowed(Some("HTTP://LOCALHOST:3000"), &allow_list()));
    }

    #[test]
    fn test_empty_allow_list_rejects_any_origin() {
        assert!(!origin_allowed(Some("http://localhost:3000"), &[]));
    }
}
