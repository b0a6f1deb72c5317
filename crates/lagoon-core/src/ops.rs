//! User-facing operations: guard → build → execute → parse.
//!
//! Each operation owns a fresh command and runs at most one process at a
//! time. Nothing here retries; errors go straight back to the caller.

use std::path::Path;

use crate::command::{CommandSpec, GitCommand, LagoonCommand, GIT_BINARY, LAGOON_BINARY};
use crate::config::LagoonConfigFile;
use crate::error::{LagoonError, Result};
use crate::executor::{CommandRunner, ExecutionResult};
use crate::parse::{self, EnvironmentRecord, ProjectRecord};
use crate::policy;

/// Remote command that prints a one-time login URL.
pub const LOGIN_LINK_COMMAND: &str = "drush uli";
/// Remote command that rebuilds the application caches.
pub const CLEAR_CACHE_COMMAND: &str = "drush cr";

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Current instance / project selection of the interactive session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub instance: Option<String>,
    pub project: Option<String>,
}

impl Session {
    pub fn new(instance: Option<String>, project: Option<String>) -> Self {
        Self { instance, project }
    }

    pub fn project(&self) -> Result<&str> {
        self.project
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(LagoonError::MissingSelection("project"))
    }

    pub fn instance(&self) -> Result<&str> {
        self.instance
            .as_deref()
            .filter(|i| !i.is_empty())
            .ok_or(LagoonError::MissingSelection("instance"))
    }
}

fn require_environment(environment: &str) -> Result<&str> {
    if environment.is_empty() {
        return Err(LagoonError::MissingSelection("environment"));
    }
    Ok(environment)
}

// ---------------------------------------------------------------------------
// DeletionReport
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DeletionOutcome {
    pub environment: String,
    pub result: Result<()>,
}

/// Outcome of a batch delete; one entry per requested environment, in order.
#[derive(Debug, Default)]
pub struct DeletionReport {
    pub outcomes: Vec<DeletionOutcome>,
}

impl DeletionReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &DeletionOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub struct Operations<'r> {
    runner: &'r dyn CommandRunner,
    lagoon_binary: String,
    git_binary: String,
}

impl<'r> Operations<'r> {
    pub fn new(runner: &'r dyn CommandRunner) -> Self {
        Self {
            runner,
            lagoon_binary: LAGOON_BINARY.to_string(),
            git_binary: GIT_BINARY.to_string(),
        }
    }

    pub fn with_binaries(mut self, lagoon: impl Into<String>, git: impl Into<String>) -> Self {
        self.lagoon_binary = lagoon.into();
        self.git_binary = git.into();
        self
    }

    fn lagoon(&self, session: &Session) -> LagoonCommand {
        LagoonCommand::with_executable(&self.lagoon_binary)
            .with_instance(session.instance.as_deref())
    }

    fn run(&self, command: &dyn CommandSpec, action: &str) -> Result<ExecutionResult> {
        self.runner.run(command, action)
    }

    // -- listing -------------------------------------------------------------

    pub fn list_instances(&self) -> Result<Vec<String>> {
        let cmd = LagoonCommand::with_executable(&self.lagoon_binary)
            .config_list()
            .with_json_output();
        let out = self.run(&cmd, "List Lagoon instances")?;
        parse::parse_instances(&out.stdout)
    }

    pub fn list_projects(&self, session: &Session) -> Result<Vec<ProjectRecord>> {
        let cmd = self.lagoon(session).list_projects().with_json_output();
        let out = self.run(&cmd, "List projects")?;
        parse::parse_projects(&out.stdout)
    }

    pub fn list_environments(&self, session: &Session) -> Result<Vec<EnvironmentRecord>> {
        let project = session.project()?;
        let cmd = self
            .lagoon(session)
            .with_project(project)
            .list_environments()
            .with_json_output();
        let out = self.run(&cmd, "List environments")?;
        parse::parse_environments(&out.stdout)
    }

    pub fn list_users(&self, session: &Session) -> Result<Vec<String>> {
        let cmd = self.lagoon(session).list_all_users();
        let out = self.run(&cmd, "List all users")?;
        Ok(parse::parse_users(&out.stdout))
    }

    // -- environments --------------------------------------------------------

    pub fn delete_environment(&self, session: &Session, environment: &str) -> Result<()> {
        let environment = require_environment(environment)?;
        if policy::is_deletion_protected(environment) {
            return Err(LagoonError::DeletionProtected(environment.to_string()));
        }
        let project = session.project()?;
        let cmd = self
            .lagoon(session)
            .with_project(project)
            .delete_environment(environment)
            .with_json_output()
            .with_force();
        let out = self.run(&cmd, &format!("Delete environment {environment}"))?;
        parse::parse_mutation_result(parse::OP_DELETE_ENVIRONMENT, &out.stdout)
    }

    /// Delete each environment in turn. A failure is recorded and the loop
    /// moves on to the next name.
    pub fn delete_environments<S: AsRef<str>>(
        &self,
        session: &Session,
        environments: &[S],
    ) -> DeletionReport {
        let mut report = DeletionReport::default();
        for environment in environments {
            let environment = environment.as_ref();
            let result = self.delete_environment(session, environment);
            match &result {
                Ok(()) => tracing::info!(environment, "environment deleted"),
                Err(e) => tracing::warn!(environment, error = %e, "environment not deleted"),
            }
            report.outcomes.push(DeletionOutcome {
                environment: environment.to_string(),
                result,
            });
        }
        report
    }

    pub fn login_link(&self, session: &Session, environment: &str) -> Result<String> {
        let environment = require_environment(environment)?;
        if policy::is_login_link_protected(environment) {
            return Err(LagoonError::LoginLinkProtected(environment.to_string()));
        }
        let project = session.project()?;
        let cmd = self
            .lagoon(session)
            .with_project(project)
            .with_environment(environment)
            .ssh(LOGIN_LINK_COMMAND);
        let out = self.run(&cmd, &format!("Generate login link for {environment}"))?;
        parse::parse_login_link(&out.stdout)
    }

    /// Returns whatever the remote command printed.
    pub fn clear_cache(&self, session: &Session, environment: &str) -> Result<String> {
        let environment = require_environment(environment)?;
        let project = session.project()?;
        let cmd = self
            .lagoon(session)
            .with_project(project)
            .with_environment(environment)
            .ssh(CLEAR_CACHE_COMMAND);
        let out = self.run(&cmd, &format!("Clear cache on {environment}"))?;
        Ok(out.stdout.trim().to_string())
    }

    /// Returns once Lagoon has accepted the deployment, not when it finishes.
    pub fn deploy_branch(&self, session: &Session, branch: &str) -> Result<()> {
        if !policy::is_valid_branch_name(branch) {
            return Err(LagoonError::InvalidBranchName(branch.to_string()));
        }
        let project = session.project()?;
        let cmd = self
            .lagoon(session)
            .with_project(project)
            .deploy_branch(branch)
            .with_json_output();
        let out = self.run(&cmd, &format!("Deploy branch {branch}"))?;
        parse::parse_mutation_result(parse::OP_DEPLOY_BRANCH, &out.stdout)
    }

    // -- git / auth ----------------------------------------------------------

    pub fn remote_branches(&self, git_url: &str) -> Result<Vec<String>> {
        if !policy::is_valid_remote_url(git_url) {
            return Err(LagoonError::InvalidRemoteUrl(git_url.to_string()));
        }
        let cmd = GitCommand::with_executable(&self.git_binary).list_remote_branches(git_url);
        let out = self.run(&cmd, "List remote branches")?;
        Ok(parse::parse_remote_branches(&out.stdout))
    }

    pub fn refresh_login(&self, instance: &str) -> Result<()> {
        if instance.is_empty() {
            return Err(LagoonError::MissingSelection("instance"));
        }
        let cmd = LagoonCommand::with_executable(&self.lagoon_binary)
            .with_instance(instance)
            .login();
        self.run(&cmd, &format!("Log in to {instance}"))?;
        Ok(())
    }

    /// Point `instance` at `key_path` in the Lagoon CLI config, then log in
    /// again so the new key is picked up.
    pub fn configure_ssh_key(
        &self,
        lagoon_config: &Path,
        instance: &str,
        key_path: &Path,
    ) -> Result<()> {
        if !key_path.is_file() {
            return Err(LagoonError::SshKeyNotFound(key_path.display().to_string()));
        }
        let mut config = LagoonConfigFile::load(lagoon_config)?;
        config.set_ssh_key(instance, key_path)?;
        config.save(lagoon_config)?;
        tracing::info!(instance, key = %key_path.display(), "ssh key configured");
        self.refresh_login(instance)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
