use crate::cmd::project;
use crate::context::Context;
use crate::output::{opt, print_json, print_table};
use crate::prompt;
use anyhow::Context as _;
use lagoon_core::ops::DeletionReport;
use lagoon_core::policy;

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

pub fn list(ctx: &Context, links: bool) -> anyhow::Result<()> {
    let project = ctx.session.project()?;
    let envs = ctx
        .ops()
        .list_environments(&ctx.session)
        .with_context(|| format!("failed to list environments of project '{project}'"))?;

    let git_url = if links {
        project::git_url(ctx).ok()
    } else {
        None
    };
    let pr_link =
        |name: &str| policy::pull_request_url(Some(name), git_url.as_deref());

    if ctx.json {
        let items: Vec<serde_json::Value> = envs
            .iter()
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "environment_type": e.environment_type,
                    "route": e.route,
                    "deletion_protected": policy::is_deletion_protected(&e.name),
                    "pull_request": pr_link(&e.name),
                })
            })
            .collect();
        return print_json(&items);
    }
    if envs.is_empty() {
        println!("No environments in project '{project}'.");
        return Ok(());
    }

    let mut headers = vec!["ENVIRONMENT", "TYPE", "ROUTE", "PROTECTED"];
    if links {
        headers.push("PULL REQUEST");
    }
    let rows = envs
        .iter()
        .map(|e| {
            let protected = if policy::is_deletion_protected(&e.name) {
                "yes"
            } else {
                ""
            };
            let mut row = vec![
                e.name.clone(),
                opt(&e.environment_type),
                opt(&e.route),
                protected.to_string(),
            ];
            if links {
                row.push(pr_link(&e.name).unwrap_or_default());
            }
            row
        })
        .collect();
    print_table(&headers, rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

pub fn delete(ctx: &Context, environments: &[String], yes: bool) -> anyhow::Result<()> {
    let project = ctx.session.project()?;
    if !yes {
        let prompt = format!(
            "Delete {} from project '{project}'? This cannot be undone",
            environments.join(", ")
        );
        if !prompt::confirm(&prompt)? {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }
    let report = ctx.ops().delete_environments(&ctx.session, environments);
    print_report(ctx, &report)?;

    let failed = report.failed().count();
    if failed > 0 {
        anyhow::bail!(
            "{failed} of {} deletions failed in project '{project}'",
            report.outcomes.len()
        );
    }
    Ok(())
}

pub fn print_report(ctx: &Context, report: &DeletionReport) -> anyhow::Result<()> {
    if ctx.json {
        let items: Vec<serde_json::Value> = report
            .outcomes
            .iter()
            .map(|o| {
                serde_json::json!({
                    "environment": o.environment,
                    "deleted": o.result.is_ok(),
                    "error": o.result.as_ref().err().map(|e| e.to_string()),
                })
            })
            .collect();
        return print_json(&items);
    }
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => println!("  \u{2713} {} deleted", outcome.environment),
            Err(e) => println!("  \u{2717} {}: {e}", outcome.environment),
        }
    }
    println!(
        "{} deleted, {} failed",
        report.succeeded().count(),
        report.failed().count()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// login-link / clear-cache / pr-url
// ---------------------------------------------------------------------------

pub fn login_link(ctx: &Context, environment: &str) -> anyhow::Result<()> {
    let link = ctx
        .ops()
        .login_link(&ctx.session, environment)
        .with_context(|| format!("failed to generate login link for '{environment}'"))?;
    if ctx.json {
        return print_json(&serde_json::json!({ "environment": environment, "url": link }));
    }
    println!("{link}");
    Ok(())
}

pub fn clear_cache(ctx: &Context, environment: &str) -> anyhow::Result<()> {
    let output = ctx
        .ops()
        .clear_cache(&ctx.session, environment)
        .with_context(|| format!("failed to clear cache on '{environment}'"))?;
    if ctx.json {
        return print_json(&serde_json::json!({ "environment": environment, "output": output }));
    }
    if !output.is_empty() {
        println!("{output}");
    }
    println!("Cache cleared on '{environment}'.");
    Ok(())
}

pub fn pr_url(ctx: &Context, environment: &str, git_url: &str) -> anyhow::Result<()> {
    let url = policy::pull_request_url(Some(environment), Some(git_url)).ok_or_else(|| {
        anyhow::anyhow!(
            "'{environment}' is not a pull request environment of a GitHub project"
        )
    })?;
    if ctx.json {
        return print_json(&serde_json::json!({ "environment": environment, "url": url }));
    }
    println!("{url}");
    Ok(())
}
