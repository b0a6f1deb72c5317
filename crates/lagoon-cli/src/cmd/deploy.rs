use crate::cmd::project;
use crate::context::Context;
use crate::output::{print_json, print_names};
use anyhow::Context as _;

pub fn deploy(ctx: &Context, branch: &str) -> anyhow::Result<()> {
    let project = ctx.session.project()?;
    ctx.ops()
        .deploy_branch(&ctx.session, branch)
        .with_context(|| format!("failed to deploy '{branch}' to project '{project}'"))?;
    if ctx.json {
        return print_json(&serde_json::json!({
            "project": project,
            "branch": branch,
            "queued": true,
        }));
    }
    println!("Deployment of '{branch}' queued for project '{project}'.");
    println!("Follow progress in the Lagoon UI.");
    Ok(())
}

pub fn branches(ctx: &Context, git_url: Option<&str>) -> anyhow::Result<()> {
    let url = match git_url {
        Some(u) => u.to_string(),
        None => project::git_url(ctx)?,
    };
    let branches = ctx
        .ops()
        .remote_branches(&url)
        .with_context(|| format!("failed to list branches of '{url}'"))?;
    print_names(&branches, ctx.json, "No branches found.")
}
