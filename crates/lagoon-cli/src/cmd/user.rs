use crate::context::Context;
use crate::output::print_names;
use anyhow::Context as _;

pub fn list(ctx: &Context) -> anyhow::Result<()> {
    let users = ctx.ops().list_users(&ctx.session).with_context(|| {
        format!(
            "failed to list users on instance '{}'",
            ctx.session.instance.as_deref().unwrap_or("default")
        )
    })?;
    print_names(&users, ctx.json, "No users found.")
}
