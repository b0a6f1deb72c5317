//! Decoders for the output shapes of individual Lagoon / git operations.
//!
//! None of these are generic: each one knows the shape of exactly one
//! operation's output. Malformed JSON and unexpected `result` values become
//! [`LagoonError::UnexpectedResponse`] carrying the raw text.

use crate::error::{LagoonError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

pub const OP_CONFIG_LIST: &str = "config list";
pub const OP_LIST_PROJECTS: &str = "list projects";
pub const OP_LIST_ENVIRONMENTS: &str = "list environments";
pub const OP_DELETE_ENVIRONMENT: &str = "delete environment";
pub const OP_DEPLOY_BRANCH: &str = "deploy branch";
pub const OP_LOGIN_LINK: &str = "login link";

static HEADS_RE: OnceLock<Regex> = OnceLock::new();

fn heads_re() -> &'static Regex {
    HEADS_RE.get_or_init(|| Regex::new(r"refs/heads/(.+)$").unwrap())
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_environment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

// ---------------------------------------------------------------------------
// JSON envelope helpers
// ---------------------------------------------------------------------------

fn parse_json(operation: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw.trim())
        .map_err(|e| LagoonError::unexpected(operation, format!("invalid JSON: {e}"), raw))
}

/// Rows of the CLI's `{"data": [{...}, ...]}` envelope. A bare array is
/// accepted too.
fn rows(operation: &str, raw: &str) -> Result<Vec<Map<String, Value>>> {
    let value = parse_json(operation, raw)?;
    let data = match value {
        Value::Object(mut obj) => obj
            .remove("data")
            .ok_or_else(|| LagoonError::unexpected(operation, "missing 'data' field", raw))?,
        arr @ Value::Array(_) => arr,
        _ => return Err(LagoonError::unexpected(operation, "expected an object", raw)),
    };
    let Value::Array(items) = data else {
        return Err(LagoonError::unexpected(operation, "'data' is not a list", raw));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(row) => Ok(row),
            _ => Err(LagoonError::unexpected(operation, "row is not an object", raw)),
        })
        .collect()
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// First non-empty value among `candidates`, matching column names without
/// regard to case, spaces, dashes or underscores.
fn field(row: &Map<String, Value>, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|wanted| {
        row.iter()
            .find(|(k, _)| normalize_key(k) == *wanted)
            .and_then(|(_, v)| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
    })
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

/// `"amazeeio (default)(current)"` → `"amazeeio"`.
pub fn clean_instance_name(raw: &str) -> String {
    raw.trim()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Instance names from `lagoon config list --output-json`.
pub fn parse_instances(raw: &str) -> Result<Vec<String>> {
    let rows = rows(OP_CONFIG_LIST, raw)?;
    Ok(rows
        .iter()
        .filter_map(|row| field(row, &["name", "lagoon"]))
        .map(|name| clean_instance_name(&name))
        .filter(|name| !name.is_empty())
        .collect())
}

// ---------------------------------------------------------------------------
// Projects / environments
// ---------------------------------------------------------------------------

pub fn parse_projects(raw: &str) -> Result<Vec<ProjectRecord>> {
    let rows = rows(OP_LIST_PROJECTS, raw)?;
    rows.iter()
        .map(|row| {
            let name = field(row, &["projectname", "name"]).ok_or_else(|| {
                LagoonError::unexpected(OP_LIST_PROJECTS, "project row without a name", raw)
            })?;
            Ok(ProjectRecord {
                name,
                git_url: field(row, &["giturl"]),
                production_environment: field(row, &["productionenvironment"]),
            })
        })
        .collect()
}

pub fn parse_environments(raw: &str) -> Result<Vec<EnvironmentRecord>> {
    let rows = rows(OP_LIST_ENVIRONMENTS, raw)?;
    rows.iter()
        .map(|row| {
            let name = field(row, &["name", "environmentname"]).ok_or_else(|| {
                LagoonError::unexpected(
                    OP_LIST_ENVIRONMENTS,
                    "environment row without a name",
                    raw,
                )
            })?;
            Ok(EnvironmentRecord {
                name,
                environment_type: field(row, &["environmenttype", "environment", "type"]),
                route: field(row, &["route", "routes"]),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Mutation results
// ---------------------------------------------------------------------------

/// Classify a `{"result": ...}` response: `"success"` is Ok, `"error"` is
/// [`LagoonError::OperationRejected`], anything else is malformed.
pub fn parse_mutation_result(operation: &str, raw: &str) -> Result<()> {
    let value = parse_json(operation, raw)?;
    match value.get("result").and_then(Value::as_str) {
        Some("success") => Ok(()),
        Some("error") => Err(LagoonError::OperationRejected {
            operation: operation.to_string(),
            raw: raw.trim().to_string(),
        }),
        Some(other) => Err(LagoonError::unexpected(
            operation,
            format!("unknown result '{other}'"),
            raw,
        )),
        None => Err(LagoonError::unexpected(operation, "missing 'result' field", raw)),
    }
}

// ---------------------------------------------------------------------------
// Text outputs
// ---------------------------------------------------------------------------

/// User names from the `list all-users` table: header line dropped, first
/// `|`-separated column of every other non-empty line. Rows whose first
/// column is blank carry no user name and are skipped.
pub fn parse_users(raw: &str) -> Vec<String> {
    raw.lines()
        .filter(|l| !l.trim().is_empty())
        .skip(1)
        .filter_map(|line| line.split('|').next())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Branch names from `git ls-remote --heads`. Lines without a `refs/heads/`
/// ref are skipped.
pub fn parse_remote_branches(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(|line| heads_re().captures(line))
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// The one-time login URL printed by `drush uli`.
pub fn parse_login_link(raw: &str) -> Result<String> {
    raw.lines()
        .map(str::trim)
        .find(|l| l.starts_with("https://") || l.starts_with("http://"))
        .map(str::to_string)
        .ok_or_else(|| LagoonError::unexpected(OP_LOGIN_LINK, "no URL in output", raw))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
