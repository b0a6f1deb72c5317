use crate::cmd::{deploy, environment, instance, project, user};
use crate::context::Context;
use crate::prompt;
use anyhow::Context as _;
use lagoon_core::config::LagoonConfigFile;
use lagoon_core::policy;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    SelectInstance,
    SelectProject,
    ListEnvironments,
    DeleteEnvironments,
    LoginLink,
    ClearCache,
    DeployBranch,
    ListUsers,
    ConfigureSshKey,
    Quit,
}

impl MenuAction {
    const ALL: [MenuAction; 10] = [
        MenuAction::SelectInstance,
        MenuAction::SelectProject,
        MenuAction::ListEnvironments,
        MenuAction::DeleteEnvironments,
        MenuAction::LoginLink,
        MenuAction::ClearCache,
        MenuAction::DeployBranch,
        MenuAction::ListUsers,
        MenuAction::ConfigureSshKey,
        MenuAction::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuAction::SelectInstance => "Select Lagoon instance",
            MenuAction::SelectProject => "Select project",
            MenuAction::ListEnvironments => "List environments",
            MenuAction::DeleteEnvironments => "Delete environments",
            MenuAction::LoginLink => "Generate login link",
            MenuAction::ClearCache => "Clear cache",
            MenuAction::DeployBranch => "Deploy branch",
            MenuAction::ListUsers => "List all users",
            MenuAction::ConfigureSshKey => "Configure SSH key",
            MenuAction::Quit => "Quit",
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Interactive loop. A failed action is reported and the loop continues;
/// only prompt failures (no terminal, ctrl-c) end the session.
pub fn run(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.json = false;
    loop {
        let header = format!(
            "[{} / {}]",
            ctx.session.instance.as_deref().unwrap_or("-"),
            ctx.session.project.as_deref().unwrap_or("-")
        );
        let choice = prompt::select(&format!("{header} What would you like to do?"), &MenuAction::ALL)?;
        let action = MenuAction::ALL[choice];

        let result = match action {
            MenuAction::SelectInstance => select_instance(ctx),
            MenuAction::SelectProject => select_project(ctx),
            MenuAction::ListEnvironments => environment::list(ctx, true),
            MenuAction::DeleteEnvironments => delete_environments(ctx),
            MenuAction::LoginLink => login_link(ctx),
            MenuAction::ClearCache => clear_cache(ctx),
            MenuAction::DeployBranch => deploy_branch(ctx),
            MenuAction::ListUsers => user::list(ctx),
            MenuAction::ConfigureSshKey => configure_ssh_key(ctx),
            MenuAction::Quit => return Ok(()),
        };

        if let Err(e) = result {
            eprintln!("error: {e:#}");
        }
        println!();
    }
}

// ---------------------------------------------------------------------------
// Session selection
// ---------------------------------------------------------------------------

fn select_instance(ctx: &mut Context) -> anyhow::Result<()> {
    let names = ctx
        .ops()
        .list_instances()
        .context("failed to list Lagoon instances")?;
    if names.is_empty() {
        anyhow::bail!("no Lagoon instances configured; run 'lagoon config add' first");
    }
    let idx = prompt::select("Lagoon instance", &names)?;
    ctx.session.instance = Some(names[idx].clone());
    ctx.session.project = None;
    Ok(())
}

fn select_project(ctx: &mut Context) -> anyhow::Result<()> {
    let names: Vec<String> = project::fetch(ctx)?.into_iter().map(|p| p.name).collect();
    if names.is_empty() {
        anyhow::bail!("no projects visible on this instance");
    }
    let idx = prompt::select("Project", &names)?;
    ctx.session.project = Some(names[idx].clone());
    Ok(())
}

fn environment_names(ctx: &Context, keep: impl Fn(&str) -> bool) -> anyhow::Result<Vec<String>> {
    let project = ctx.session.project()?;
    let names: Vec<String> = ctx
        .ops()
        .list_environments(&ctx.session)
        .with_context(|| format!("failed to list environments of project '{project}'"))?
        .into_iter()
        .map(|e| e.name)
        .filter(|name| keep(name))
        .collect();
    if names.is_empty() {
        anyhow::bail!("no eligible environments in project '{project}'");
    }
    Ok(names)
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

fn delete_environments(ctx: &mut Context) -> anyhow::Result<()> {
    let names = environment_names(ctx, |n| !policy::is_deletion_protected(n))?;
    let picked = prompt::multi_select("Environments to delete (space to toggle)", &names)?;
    if picked.is_empty() {
        println!("Nothing selected.");
        return Ok(());
    }
    let chosen: Vec<String> = picked.into_iter().map(|i| names[i].clone()).collect();
    environment::delete(ctx, &chosen, false)
}

fn login_link(ctx: &mut Context) -> anyhow::Result<()> {
    let names = environment_names(ctx, |n| !policy::is_login_link_protected(n))?;
    let idx = prompt::select("Environment", &names)?;
    environment::login_link(ctx, &names[idx])
}

fn clear_cache(ctx: &mut Context) -> anyhow::Result<()> {
    let names = environment_names(ctx, |_| true)?;
    let idx = prompt::select("Environment", &names)?;
    environment::clear_cache(ctx, &names[idx])
}

fn deploy_branch(ctx: &mut Context) -> anyhow::Result<()> {
    let project = ctx.session.project()?.to_string();
    let branches = match project::git_url(ctx) {
        Ok(url) => branches_or_manual_entry(&url, ctx.ops().remote_branches(&url)),
        Err(e) => {
            tracing::debug!(error = %e, "no git url; falling back to manual entry");
            Vec::new()
        }
    };
    let branch = if branches.is_empty() {
        prompt::input("Branch to deploy")?
    } else {
        let idx = prompt::select("Branch to deploy", &branches)?;
        branches[idx].clone()
    };
    if !policy::is_valid_branch_name(&branch) {
        anyhow::bail!("invalid branch name '{branch}'");
    }
    if !prompt::confirm(&format!("Deploy '{branch}' to project '{project}'?"))? {
        println!("Deployment cancelled.");
        return Ok(());
    }
    deploy::deploy(ctx, &branch)
}

/// An unreachable remote still leaves the user able to type a branch name.
fn branches_or_manual_entry(url: &str, listed: lagoon_core::Result<Vec<String>>) -> Vec<String> {
    match listed {
        Ok(branches) => branches,
        Err(e) => {
            tracing::warn!(url, error = %e, "could not list remote branches; falling back to manual entry");
            Vec::new()
        }
    }
}

fn configure_ssh_key(ctx: &mut Context) -> anyhow::Result<()> {
    let local = LagoonConfigFile::load(&ctx.lagoon_config_path())
        .context("failed to read Lagoon CLI config")?;
    let names: Vec<String> = local.instance_names().into_iter().map(str::to_string).collect();
    if names.is_empty() {
        anyhow::bail!(
            "no instances in {}; run 'lagoon config add' first",
            ctx.lagoon_config_path().display()
        );
    }
    let idx = prompt::select("Instance", &names)?;
    let key = PathBuf::from(prompt::input("Path to SSH private key (e.g. ~/.ssh/id_ed25519)")?);
    instance::configure_ssh_key(ctx, &names[idx], &key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lagoon_core::LagoonError;

    #[test]
    fn listed_branches_are_offered() {
        let listed = Ok(vec!["main".to_string(), "develop".to_string()]);
        assert_eq!(
            branches_or_manual_entry("git@github.com:org/site.git", listed),
            ["main", "develop"]
        );
    }

    #[test]
    fn failed_listing_falls_back_to_manual_entry() {
        let listed = Err(LagoonError::CommandFailed {
            command: "git ls-remote --heads git@github.com:org/site.git".into(),
            code: Some(128),
            stderr: "Permission denied (publickey)".into(),
        });
        assert!(branches_or_manual_entry("git@github.com:org/site.git", listed).is_empty());
    }

    #[test]
    fn menu_ends_with_quit() {
        assert_eq!(MenuAction::ALL.last(), Some(&MenuAction::Quit));
        assert_eq!(MenuAction::DeployBranch.to_string(), "Deploy branch");
    }
}
