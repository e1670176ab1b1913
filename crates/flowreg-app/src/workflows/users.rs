//! User and group administration.
//!
//! Membership is always changed by rewriting a group's member list with
//! `update_user_group`; the backend has no per-member endpoint.

use flowreg_core::{ConsoleError, Result, TenantRef, User, UserGroup};

use super::DeleteOutcome;
use crate::console::ConsoleCore;
use crate::views::tenants::combine;
use crate::views::{ColumnDescriptor, TableState, Tenant};

/// Empty users-and-groups table sorted by identity.
pub fn tenant_table() -> TableState<Tenant> {
    TableState::new(
        vec![
            ColumnDescriptor::sortable("identity", "Display Name"),
            ColumnDescriptor::fixed("kind", "Type"),
        ],
        true,
    )
}

/// Table for picking users or groups in a membership dialog.
pub fn picker_table<T: crate::views::Tabular>() -> TableState<T> {
    TableState::new(
        vec![ColumnDescriptor::sortable("identity", "Display Name")],
        true,
    )
}

/// Fetch users then groups into one table.
pub async fn load_tenants(core: &ConsoleCore) -> Result<TableState<Tenant>> {
    let users = core.api().get_users().await?;
    let groups = core.api().get_user_groups().await?;
    tracing::debug!(users = users.len(), groups = groups.len(), "loaded tenants");

    let mut table = tenant_table();
    table.set_records(combine(users, groups));
    Ok(table)
}

/// Add a user by identity.
pub async fn add_user(core: &ConsoleCore, identity: &str) -> Result<User> {
    let identity = identity.trim();
    if identity.is_empty() {
        return Err(ConsoleError::invalid("User identity is required"));
    }
    let user = core.api().add_user(identity).await?;
    tracing::info!(user = %user.identifier, identity, "added user");
    Ok(user)
}

/// Create a group with initial members.
pub async fn create_group(
    core: &ConsoleCore,
    name: &str,
    members: &[TenantRef],
) -> Result<UserGroup> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ConsoleError::invalid("Group name is required"));
    }
    let group = core.api().create_user_group(name, members).await?;
    tracing::info!(group = %group.identifier, name, "created group");
    Ok(group)
}

/// Add users to a group, skipping those already in it.
///
/// The group is re-read first so concurrent edits made elsewhere are kept.
pub async fn add_users_to_group(
    core: &ConsoleCore,
    group_id: &str,
    users: &[TenantRef],
) -> Result<UserGroup> {
    let group = core.api().get_user_group(group_id).await?;
    let mut members = group.users.clone();
    for user in users {
        if !group.has_member(&user.identifier) {
            members.push(user.clone());
        }
    }
    if members.len() == group.users.len() {
        return Ok(group);
    }
    Ok(core
        .api()
        .update_user_group(group_id, &group.identity, &members)
        .await?)
}

/// Add one user to several groups. Stops at the first failure.
pub async fn add_user_to_groups(
    core: &ConsoleCore,
    user: &TenantRef,
    group_ids: &[String],
) -> Result<Vec<UserGroup>> {
    let mut updated = Vec::with_capacity(group_ids.len());
    for group_id in group_ids {
        updated.push(add_users_to_group(core, group_id, std::slice::from_ref(user)).await?);
    }
    Ok(updated)
}

/// Remove one user from a group. A user who is not a member is a no-op.
pub async fn remove_user_from_group(
    core: &ConsoleCore,
    group_id: &str,
    user_id: &str,
) -> Result<UserGroup> {
    let group = core.api().get_user_group(group_id).await?;
    if !group.has_member(user_id) {
        return Ok(group);
    }
    let members: Vec<TenantRef> = group
        .users
        .iter()
        .filter(|u| u.identifier != user_id)
        .cloned()
        .collect();
    Ok(core
        .api()
        .update_user_group(group_id, &group.identity, &members)
        .await?)
}

/// Rename a group, keeping its members.
pub async fn rename_group(core: &ConsoleCore, group_id: &str, name: &str) -> Result<UserGroup> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ConsoleError::invalid("Group name is required"));
    }
    let group = core.api().get_user_group(group_id).await?;
    Ok(core
        .api()
        .update_user_group(group_id, name, &group.users)
        .await?)
}

/// Delete the selected users and groups, one request each.
pub async fn delete_tenants(core: &ConsoleCore, tenants: &[Tenant]) -> DeleteOutcome<Tenant> {
    let mut outcome = DeleteOutcome::default();
    for tenant in tenants {
        let result = match tenant {
            Tenant::User(u) => core.api().delete_user(&u.identifier).await.map(Tenant::User),
            Tenant::Group(g) => core
                .api()
                .delete_user_group(&g.identifier)
                .await
                .map(Tenant::Group),
        };
        match result {
            Ok(deleted) => outcome.deleted.push(deleted),
            Err(error) => {
                tracing::warn!(tenant = %tenant.identifier(), error = %error, "failed to delete");
                outcome
                    .failed
                    .push((tenant.identifier().to_string(), ConsoleError::from(error)));
            }
        }
    }
    outcome
}
