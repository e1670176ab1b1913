//! User and group commands

use anyhow::{anyhow, bail, Result};
use flowreg_app::workflows::users;
use flowreg_core::{TenantRef, UserGroup};
use std::fmt::Write as _;

use super::HandlerContext;
use crate::cli::{GroupsCommand, UsersCommand};
use crate::output::{apply_list_args, render_table};

/// Run a `users` subcommand.
pub async fn handle_users(ctx: &HandlerContext, command: UsersCommand) -> Result<String> {
    match command {
        UsersCommand::List { list } => {
            let mut table = users::load_tenants(ctx.core()).await?;
            apply_list_args(&mut table, &list).map_err(|e| anyhow!(e))?;
            Ok(render_table(&table))
        }
        UsersCommand::Add { identity } => {
            let user = users::add_user(ctx.core(), &identity).await?;
            Ok(format!("added user {} ({})", user.identity, user.identifier))
        }
    }
}

/// Run a `groups` subcommand.
pub async fn handle_groups(ctx: &HandlerContext, command: GroupsCommand) -> Result<String> {
    match command {
        GroupsCommand::List { list } => {
            let mut table = users::picker_table::<UserGroup>();
            table.set_records(ctx.core().api().get_user_groups().await?);
            apply_list_args(&mut table, &list).map_err(|e| anyhow!(e))?;
            Ok(render_table(&table))
        }
        GroupsCommand::Show { id } => {
            let group = ctx.core().api().get_user_group(&id).await?;
            Ok(describe_group(&group))
        }
        GroupsCommand::AddMembers { group, users: ids } => {
            let members = resolve_users(ctx, &ids).await?;
            let updated = users::add_users_to_group(ctx.core(), &group, &members).await?;
            Ok(describe_group(&updated))
        }
        GroupsCommand::RemoveMembers { group, users: ids } => {
            let mut updated = None;
            for id in &ids {
                updated = Some(users::remove_user_from_group(ctx.core(), &group, id).await?);
            }
            match updated {
                Some(group) => Ok(describe_group(&group)),
                None => bail!("no users given"),
            }
        }
    }
}

/// Look users up by identifier or identity.
async fn resolve_users(ctx: &HandlerContext, keys: &[String]) -> Result<Vec<TenantRef>> {
    let all = ctx.core().api().get_users().await?;
    keys.iter()
        .map(|key| {
            all.iter()
                .find(|u| &u.identifier == key || &u.identity == key)
                .map(|u| u.as_tenant_ref())
                .ok_or_else(|| anyhow!("no such user: {key}"))
        })
        .collect()
}

fn describe_group(group: &UserGroup) -> String {
    let mut out = format!("{} ({})\nmembers: {}", group.identity, group.identifier, group.users.len());
    for member in &group.users {
        let _ = write!(out, "\n  {} ({})", member.identity, member.identifier);
    }
    out
}
