//! Business rules that gate destructive or sensitive operations.
//!
//! Every function here is pure: no I/O, no panics, no errors. Callers branch
//! on the result and raise their own `LagoonError` variants.

use regex::Regex;
use std::sync::OnceLock;

/// Environments that may never be deleted through this tool.
pub const DELETION_PROTECTED: &[&str] = &["production", "master", "develop"];

/// Environment name prefix that is also protected from deletion.
pub const DELETION_PROTECTED_PREFIX: &str = "project/";

/// Environments for which one-time login links are never generated.
/// Narrower than [`DELETION_PROTECTED`].
pub const LOGIN_LINK_PROTECTED: &[&str] = &["production", "master"];

static PR_RE: OnceLock<Regex> = OnceLock::new();
static BRANCH_RE: OnceLock<Regex> = OnceLock::new();

fn pr_re() -> &'static Regex {
    PR_RE.get_or_init(|| Regex::new(r"(?i)^pr-([0-9]+)$").unwrap())
}

fn branch_re() -> &'static Regex {
    BRANCH_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_./-]+$").unwrap())
}

// ---------------------------------------------------------------------------
// Environment protection
// ---------------------------------------------------------------------------

pub fn is_deletion_protected(environment: &str) -> bool {
    DELETION_PROTECTED.contains(&environment)
        || environment.starts_with(DELETION_PROTECTED_PREFIX)
}

pub fn is_login_link_protected(environment: &str) -> bool {
    LOGIN_LINK_PROTECTED.contains(&environment)
}

// ---------------------------------------------------------------------------
// Pull requests / GitHub
// ---------------------------------------------------------------------------

/// `pr-42` → `Some("42")`, case-insensitive. Anything else → `None`.
pub fn extract_pull_request_number(environment: Option<&str>) -> Option<String> {
    let name = environment.filter(|n| !n.is_empty())?;
    pr_re()
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Turn a project's git URL into a browsable GitHub URL.
///
/// `git@github.com:org/repo.git` becomes `https://github.com/org/repo`; other
/// GitHub URLs only lose a trailing `.git`. Non-GitHub URLs give `None`.
pub fn to_github_url(git_url: Option<&str>) -> Option<String> {
    let url = git_url.filter(|u| !u.is_empty())?;
    if !url.contains("github.com") {
        return None;
    }
    let trimmed = url.strip_suffix(".git").unwrap_or(url);
    match trimmed.strip_prefix("git@github.com:") {
        Some(path) => Some(format!("https://github.com/{path}")),
        None => Some(trimmed.to_string()),
    }
}

/// `<github url>/pull/<n>` when the environment is a PR environment of a
/// GitHub-hosted project.
pub fn pull_request_url(environment: Option<&str>, git_url: Option<&str>) -> Option<String> {
    let number = extract_pull_request_number(environment)?;
    let base = to_github_url(git_url)?;
    Some(format!("{base}/pull/{number}"))
}

// ---------------------------------------------------------------------------
// Branch names / remotes
// ---------------------------------------------------------------------------

/// True iff every character is in `[A-Za-z0-9_./-]`. Must be checked before a
/// branch name is placed into any command.
pub fn is_valid_branch_name(name: &str) -> bool {
    branch_re().is_match(name)
}

/// A remote URL that git would not mistake for an option.
pub fn is_valid_remote_url(url: &str) -> bool {
    !url.is_empty() && !url.starts_with('-') && !url.chars().any(char::is_whitespace)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletion_protection() {
        for name in ["production", "master", "develop", "project/anything", "project/"] {
            assert!(is_deletion_protected(name), "expected protected: {name}");
        }
        for name in ["pr-12", "feature-x", "Production", "staging", "my-project/x", ""] {
            assert!(!is_deletion_protected(name), "expected eligible: {name}");
        }
    }

    #[test]
    fn login_link_protection_is_narrower() {
        assert!(is_login_link_protected("production"));
        assert!(is_login_link_protected("master"));
        assert!(!is_login_link_protected("develop"));
        assert!(!is_login_link_protected("project/foo"));
        assert!(is_deletion_protected("develop"));
    }

    #[test]
    fn pull_request_numbers() {
        assert_eq!(extract_pull_request_number(Some("pr-42")).as_deref(), Some("42"));
        assert_eq!(extract_pull_request_number(Some("PR-7")).as_deref(), Some("7"));
        assert_eq!(extract_pull_request_number(Some("pr123")), None);
        assert_eq!(extract_pull_request_number(Some("feature-pr-5")), None);
        assert_eq!(extract_pull_request_number(Some("pr-")), None);
        assert_eq!(extract_pull_request_number(Some("pr-5a")), None);
        assert_eq!(extract_pull_request_number(Some("pr-\u{661}\u{662}")), None);
        assert_eq!(extract_pull_request_number(Some("pr-\u{ff11}")), None);
        assert_eq!(extract_pull_request_number(Some("")), None);
        assert_eq!(extract_pull_request_number(None), None);
    }

    #[test]
    fn github_urls() {
        assert_eq!(
            to_github_url(Some("git@github.com:org/repo.git")).as_deref(),
            Some("https://github.com/org/repo")
        );
        assert_eq!(
            to_github_url(Some("https://github.com/org/repo.git")).as_deref(),
            Some("https://github.com/org/repo")
        );
        assert_eq!(
            to_github_url(Some("ssh://git@github.com/org/repo")).as_deref(),
            Some("ssh://git@github.com/org/repo")
        );
        assert_eq!(to_github_url(Some("https://gitlab.com/x/y.git")), None);
        assert_eq!(to_github_url(Some("")), None);
        assert_eq!(to_github_url(None), None);
    }

    #[test]
    fn pull_request_url_combines_both() {
        assert_eq!(
            pull_request_url(Some("pr-9"), Some("git@github.com:org/site.git")).as_deref(),
            Some("https://github.com/org/site/pull/9")
        );
        assert_eq!(pull_request_url(Some("develop"), Some("git@github.com:o/s.git")), None);
        assert_eq!(pull_request_url(Some("pr-9"), Some("git@gitlab.com:o/s.git")), None);
        assert_eq!(
            pull_request_url(Some("pr-\u{661}\u{662}"), Some("git@github.com:o/s.git")),
            None
        );
    }

    #[test]
    fn branch_names() {
        for name in ["feature/foo-bar.1", "main", "release_2.0", "a"] {
            assert!(is_valid_branch_name(name), "expected valid: {name}");
        }
        for name in ["feature; rm -rf /", "", "a b", "$(whoami)", "x`y`", "a|b", "näme"] {
            assert!(!is_valid_branch_name(name), "expected invalid: {name}");
        }
    }

    #[test]
    fn remote_urls() {
        assert!(is_valid_remote_url("git@github.com:org/repo.git"));
        assert!(!is_valid_remote_url("--upload-pack=touch /tmp/x"));
        assert!(!is_valid_remote_url(""));
        assert!(!is_valid_remote_url("https://x y"));
    }
}
