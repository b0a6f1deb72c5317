//! Structured command construction for the Lagoon and git CLIs.
//!
//! A command is an executable name plus an ordered list of argument tokens.
//! Tokens are handed to the OS as discrete argv entries and are never joined
//! into a string that a shell would evaluate. `display_string()` exists for
//! logs only.
//!
//! Every `with_*` configurator treats `None` and `""` as "not set" and appends
//! nothing.

pub const LAGOON_BINARY: &str = "lagoon";
pub const GIT_BINARY: &str = "git";

// ---------------------------------------------------------------------------
// CommandSpec
// ---------------------------------------------------------------------------

/// Anything that can be rendered into an executable + argv pair.
pub trait CommandSpec {
    fn executable(&self) -> &str;

    fn arguments(&self) -> &[String];

    /// Space-joined rendering for log lines. Never pass this to a spawn call.
    fn display_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.arguments().len() + 1);
        parts.push(self.executable());
        parts.extend(self.arguments().iter().map(String::as_str));
        parts.join(" ")
    }
}

fn present<'a>(value: impl Into<Option<&'a str>>) -> Option<&'a str> {
    value.into().filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// LagoonCommand
// ---------------------------------------------------------------------------

/// Builder for an invocation of the Lagoon CLI.
///
/// ```
/// use lagoon_core::command::{CommandSpec, LagoonCommand};
///
/// let cmd = LagoonCommand::new()
///     .with_instance("amazeeio")
///     .with_project("drupal-site")
///     .list_environments()
///     .with_json_output();
/// assert_eq!(
///     cmd.arguments(),
///     ["-l", "amazeeio", "-p", "drupal-site", "list", "environments", "--output-json"]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagoonCommand {
    executable: String,
    args: Vec<String>,
}

impl Default for LagoonCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl LagoonCommand {
    pub fn new() -> Self {
        Self::with_executable(LAGOON_BINARY)
    }

    /// Use a different binary name or path for the Lagoon CLI.
    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
        }
    }

    fn push(mut self, tokens: &[&str]) -> Self {
        self.args.extend(tokens.iter().map(|t| (*t).to_string()));
        self
    }

    fn flag_value<'a>(self, flag: &str, value: impl Into<Option<&'a str>>) -> Self {
        match present(value) {
            Some(v) => self.push(&[flag, v]),
            None => self,
        }
    }

    pub fn with_instance<'a>(self, name: impl Into<Option<&'a str>>) -> Self {
        self.flag_value("-l", name)
    }

    pub fn with_project<'a>(self, name: impl Into<Option<&'a str>>) -> Self {
        self.flag_value("-p", name)
    }

    pub fn with_environment<'a>(self, name: impl Into<Option<&'a str>>) -> Self {
        self.flag_value("-e", name)
    }

    pub fn with_json_output(self) -> Self {
        self.push(&["--output-json"])
    }

    pub fn with_force(self) -> Self {
        self.push(&["--force"])
    }

    // -- verbs ---------------------------------------------------------------

    pub fn config_list(self) -> Self {
        self.push(&["config", "list"])
    }

    pub fn list_projects(self) -> Self {
        self.push(&["list", "projects"])
    }

    pub fn list_environments(self) -> Self {
        self.push(&["list", "environments"])
    }

    pub fn list_all_users(self) -> Self {
        self.push(&["list", "all-users"])
    }

    pub fn delete_environment<'a>(self, name: impl Into<Option<&'a str>>) -> Self {
        self.push(&["delete", "environment"])
            .flag_value("--environment", name)
    }

    /// Callers must run `policy::is_valid_branch_name` first.
    pub fn deploy_branch<'a>(self, branch: impl Into<Option<&'a str>>) -> Self {
        self.push(&["deploy", "branch"]).flag_value("--branch", branch)
    }

    pub fn login(self) -> Self {
        self.push(&["login"])
    }

    /// `ssh -C <remote command>`; the remote command travels as one token.
    pub fn ssh<'a>(self, remote_command: impl Into<Option<&'a str>>) -> Self {
        self.push(&["ssh"]).flag_value("-C", remote_command)
    }
}

impl CommandSpec for LagoonCommand {
    fn executable(&self) -> &str {
        &self.executable
    }

    fn arguments(&self) -> &[String] {
        &self.args
    }
}

// ---------------------------------------------------------------------------
// GitCommand
// ---------------------------------------------------------------------------

/// Builder for an invocation of git.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    executable: String,
    args: Vec<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCommand {
    pub fn new() -> Self {
        Self::with_executable(GIT_BINARY)
    }

    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
        }
    }

    pub fn list_remote_branches<'a>(mut self, url: impl Into<Option<&'a str>>) -> Self {
        self.args.push("ls-remote".to_string());
        self.args.push("--heads".to_string());
        if let Some(url) = present(url) {
            self.args.push(url.to_string());
        }
        self
    }
}

impl CommandSpec for GitCommand {
    fn executable(&self) -> &str {
        &self.executable
    }

    fn arguments(&self) -> &[String] {
        &self.args
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_environments_argument_order_is_fixed() {
        let cmd = LagoonCommand::new()
            .with_instance("a")
            .with_project("b")
            .list_environments()
            .with_json_output();
        assert_eq!(
            cmd.arguments(),
            ["-l", "a", "-p", "b", "list", "environments", "--output-json"]
        );
        assert_eq!(cmd.executable(), "lagoon");
    }

    #[test]
    fn empty_and_missing_values_append_nothing() {
        let base = LagoonCommand::new();
        for value in [Some(""), None] {
            let cmd = base
                .clone()
                .with_instance(value)
                .with_project(value)
                .with_environment(value);
            assert!(cmd.arguments().is_empty(), "expected no tokens for {value:?}");
        }
    }

    #[test]
    fn owned_strings_pass_through_as_deref() {
        let instance: Option<String> = Some("amazeeio".into());
        let project: Option<String> = None;
        let cmd = LagoonCommand::new()
            .with_instance(instance.as_deref())
            .with_project(project.as_deref())
            .list_projects();
        assert_eq!(cmd.arguments(), ["-l", "amazeeio", "list", "projects"]);
    }

    #[test]
    fn delete_environment_with_force() {
        let cmd = LagoonCommand::new()
            .with_project("site")
            .delete_environment("pr-12")
            .with_json_output()
            .with_force();
        assert_eq!(
            cmd.arguments(),
            [
                "-p",
                "site",
                "delete",
                "environment",
                "--environment",
                "pr-12",
                "--output-json",
                "--force"
            ]
        );
    }

    #[test]
    fn ssh_remote_command_is_a_single_token() {
        let cmd = LagoonCommand::new()
            .with_environment("develop")
            .ssh("drush uli");
        assert_eq!(cmd.arguments(), ["-e", "develop", "ssh", "-C", "drush uli"]);
    }

    #[test]
    fn hostile_values_stay_discrete() {
        let cmd = LagoonCommand::new().deploy_branch("main; rm -rf /");
        assert_eq!(cmd.arguments().last().map(String::as_str), Some("main; rm -rf /"));
        assert_eq!(cmd.arguments().len(), 4);
    }

    #[test]
    fn remaining_verbs() {
        assert_eq!(LagoonCommand::new().config_list().arguments(), ["config", "list"]);
        assert_eq!(
            LagoonCommand::new().list_all_users().arguments(),
            ["list", "all-users"]
        );
        assert_eq!(
            LagoonCommand::new().with_instance("x").login().arguments(),
            ["-l", "x", "login"]
        );
    }

    #[test]
    fn git_ls_remote() {
        let cmd = GitCommand::new().list_remote_branches("git@github.com:org/repo.git");
        assert_eq!(cmd.executable(), "git");
        assert_eq!(
            cmd.arguments(),
            ["ls-remote", "--heads", "git@github.com:org/repo.git"]
        );
        assert_eq!(GitCommand::new().list_remote_branches("").arguments().len(), 2);
    }

    #[test]
    fn display_string_joins_with_spaces() {
        let cmd = LagoonCommand::with_executable("/usr/local/bin/lagoon")
            .with_project("p")
            .ssh("drush cr");
        assert_eq!(
            cmd.display_string(),
            "/usr/local/bin/lagoon -p p ssh -C drush cr"
        );
    }
}
