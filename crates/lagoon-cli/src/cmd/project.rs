use crate::context::Context;
use crate::output::{opt, print_json, print_table};
use anyhow::Context as _;
use lagoon_core::parse::ProjectRecord;

pub fn list(ctx: &Context) -> anyhow::Result<()> {
    let projects = fetch(ctx)?;

    if ctx.json {
        return print_json(&projects);
    }
    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }
    let rows = projects
        .iter()
        .map(|p| vec![p.name.clone(), opt(&p.production_environment), opt(&p.git_url)])
        .collect();
    print_table(&["PROJECT", "PRODUCTION", "GIT URL"], rows);
    Ok(())
}

pub fn fetch(ctx: &Context) -> anyhow::Result<Vec<ProjectRecord>> {
    ctx.ops().list_projects(&ctx.session).with_context(|| {
        format!(
            "failed to list projects on instance '{}'",
            ctx.session.instance.as_deref().unwrap_or("default")
        )
    })
}

/// Git URL of the currently selected project.
pub fn git_url(ctx: &Context) -> anyhow::Result<String> {
    let project = ctx.session.project()?;
    fetch(ctx)?
        .into_iter()
        .find(|p| p.name == project)
        .and_then(|p| p.git_url)
        .ok_or_else(|| anyhow::anyhow!("project '{project}' has no git URL"))
}
