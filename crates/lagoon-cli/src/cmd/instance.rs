use crate::context::Context;
use crate::output::{print_json, print_table};
use anyhow::Context as _;
use lagoon_core::config::LagoonConfigFile;
use std::path::Path;

pub fn list(ctx: &Context) -> anyhow::Result<()> {
    let names = ctx
        .ops()
        .list_instances()
        .context("failed to list Lagoon instances")?;

    // SSH keys are only known locally; a broken config file just hides them.
    let local = LagoonConfigFile::load(&ctx.lagoon_config_path()).unwrap_or_default();
    let key_for = |name: &str| {
        local
            .ssh_key(name)
            .ok()
            .flatten()
            .map(str::to_string)
    };

    if ctx.json {
        let items: Vec<serde_json::Value> = names
            .iter()
            .map(|name| serde_json::json!({ "name": name, "ssh_key": key_for(name) }))
            .collect();
        return print_json(&items);
    }
    if names.is_empty() {
        println!("No Lagoon instances configured.");
        return Ok(());
    }
    let rows = names
        .iter()
        .map(|name| {
            vec![
                name.clone(),
                key_for(name).unwrap_or_else(|| "(default)".to_string()),
            ]
        })
        .collect();
    print_table(&["INSTANCE", "SSH KEY"], rows);
    Ok(())
}

pub fn configure_ssh_key(ctx: &Context, instance: &str, key: &Path) -> anyhow::Result<()> {
    let key = ctx.expand(key);
    let config_path = ctx.lagoon_config_path();
    ctx.ops()
        .configure_ssh_key(&config_path, instance, &key)
        .with_context(|| format!("failed to configure ssh key for instance '{instance}'"))?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "instance": instance,
            "ssh_key": key.display().to_string(),
        }));
    }
    println!("Instance '{instance}' now uses {}.", key.display());
    Ok(())
}
