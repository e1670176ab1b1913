//! Users and groups listed in a single table.

use flowreg_core::{TenantRef, User, UserGroup};
use std::borrow::Cow;

use super::table::Tabular;

/// One row of the combined users-and-groups table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tenant {
    /// A user row
    User(User),
    /// A group row
    Group(UserGroup),
}

impl Tenant {
    /// Backend identifier.
    pub fn identifier(&self) -> &str {
        match self {
            Self::User(u) => &u.identifier,
            Self::Group(g) => &g.identifier,
        }
    }

    /// Display identity.
    pub fn identity(&self) -> &str {
        match self {
            Self::User(u) => &u.identity,
            Self::Group(g) => &g.identity,
        }
    }

    /// True for group rows.
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// `"user"` or `"group"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Group(_) => "group",
        }
    }

    /// Membership reference to this tenant.
    pub fn as_tenant_ref(&self) -> TenantRef {
        match self {
            Self::User(u) => u.as_tenant_ref(),
            Self::Group(g) => TenantRef {
                identifier: g.identifier.clone(),
                identity: g.identity.clone(),
                configurable: g.configurable,
            },
        }
    }
}

impl Tabular for Tenant {
    fn record_id(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.identifier())
    }

    fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "kind" => Some(Cow::Borrowed(self.kind())),
            _ => match self {
                Self::User(u) => u.field(name),
                Self::Group(g) => g.field(name),
            },
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        match self {
            Self::User(u) => u.search_fields(),
            Self::Group(g) => g.search_fields(),
        }
    }
}

/// Users first, then groups, as the backend returned them.
pub fn combine(users: Vec<User>, groups: Vec<UserGroup>) -> Vec<Tenant> {
    users
        .into_iter()
        .map(Tenant::User)
        .chain(groups.into_iter().map(Tenant::Group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::table::{sort, SortOrder};

    #[test]
    fn test_combined_rows_sort_by_identity() {
        let tenants = combine(
            vec![User {
                identifier: "u-1".into(),
                identity: "zoe".into(),
                ..User::default()
            }],
            vec![UserGroup {
                identifier: "g-1".into(),
                identity: "admins".into(),
                ..UserGroup::default()
            }],
        );

        let rows = sort(&tenants, "identity", SortOrder::Asc);
        assert!(rows[0].is_group());
        assert_eq!(rows[1].identity(), "zoe");
        assert_eq!(rows[0].field("kind").as_deref(), Some("group"));
    }
}
