//! Console routes
//!
//! URLs follow the web console: a primary path plus an optional side-panel
//! outlet, e.g. `/administration/users(sidenav:manage/user/u-1)`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary route.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Grid list of every droplet
    Explorer,
    /// Droplets of one bucket
    Bucket {
        /// Bucket identifier
        bucket_id: String,
    },
    /// One droplet
    Droplet {
        /// Owning bucket identifier
        bucket_id: String,
        /// Type path segment, e.g. `flows`
        droplet_type: String,
        /// Droplet identifier
        droplet_id: String,
    },
    /// User and group administration
    AdministrationUsers,
    /// Bucket administration
    AdministrationWorkflow,
    /// Username/password login
    Login,
    /// Catch-all for unknown paths
    NotFound {
        /// The path as given
        path: String,
    },
}

impl Route {
    /// Primary path of the route.
    pub fn path(&self) -> String {
        match self {
            Self::Explorer => "/explorer/grid-list".to_string(),
            Self::Bucket { bucket_id } => format!("/explorer/grid-list/buckets/{bucket_id}"),
            Self::Droplet {
                bucket_id,
                droplet_type,
                droplet_id,
            } => format!("/explorer/grid-list/buckets/{bucket_id}/{droplet_type}/{droplet_id}"),
            Self::AdministrationUsers => "/administration/users".to_string(),
            Self::AdministrationWorkflow => "/administration/workflow".to_string(),
            Self::Login => "/login".to_string(),
            Self::NotFound { path } => path.clone(),
        }
    }

    /// Parse a primary path (no outlet).
    pub fn parse_path(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["explorer"] | ["explorer", "grid-list"] => Self::Explorer,
            ["explorer", "grid-list", "buckets", bucket] => Self::Bucket {
                bucket_id: (*bucket).to_string(),
            },
            ["explorer", "grid-list", "buckets", bucket, kind, droplet] => Self::Droplet {
                bucket_id: (*bucket).to_string(),
                droplet_type: (*kind).to_string(),
                droplet_id: (*droplet).to_string(),
            },
            ["administration"] | ["administration", "workflow"] => Self::AdministrationWorkflow,
            ["administration", "users"] => Self::AdministrationUsers,
            ["login"] => Self::Login,
            _ => Self::NotFound {
                path: path.to_string(),
            },
        }
    }

    /// Either administration route.
    pub fn is_administration(&self) -> bool {
        matches!(self, Self::AdministrationUsers | Self::AdministrationWorkflow)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Side-panel outlet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sidenav {
    /// Details of a user
    User {
        /// User identifier
        user_id: String,
    },
    /// Details of a group
    Group {
        /// Group identifier
        group_id: String,
    },
    /// Bucket policy editor
    ManageBucket {
        /// Bucket identifier
        bucket_id: String,
    },
    /// User editor
    ManageUser {
        /// User identifier
        user_id: String,
    },
    /// Group editor
    ManageGroup {
        /// Group identifier
        group_id: String,
    },
}

impl Sidenav {
    /// Outlet path, without the `sidenav:` prefix.
    pub fn path(&self) -> String {
        match self {
            Self::User { user_id } => format!("user/{user_id}"),
            Self::Group { group_id } => format!("group/{group_id}"),
            Self::ManageBucket { bucket_id } => format!("manage/bucket/{bucket_id}"),
            Self::ManageUser { user_id } => format!("manage/user/{user_id}"),
            Self::ManageGroup { group_id } => format!("manage/group/{group_id}"),
        }
    }

    /// Parse an outlet path; `None` for unknown panels.
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let id = |s: &&str| (*s).to_string();
        match segments.as_slice() {
            ["user", user] => Some(Self::User { user_id: id(user) }),
            ["group", group] => Some(Self::Group { group_id: id(group) }),
            ["manage", "bucket", bucket] => Some(Self::ManageBucket { bucket_id: id(bucket) }),
            ["manage", "user", user] => Some(Self::ManageUser { user_id: id(user) }),
            ["manage", "group", group] => Some(Self::ManageGroup { group_id: id(group) }),
            _ => None,
        }
    }
}

/// A full console location: route plus optional side panel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Primary route
    pub route: Route,
    /// Side panel, if open
    pub sidenav: Option<Sidenav>,
}

impl Location {
    /// Location with no side panel.
    pub fn new(route: Route) -> Self {
        Self {
            route,
            sidenav: None,
        }
    }

    /// Open `sidenav` alongside the route.
    pub fn with_sidenav(mut self, sidenav: Sidenav) -> Self {
        self.sidenav = Some(sidenav);
        self
    }

    /// Parse a console URL. Unknown outlets are dropped.
    pub fn parse(url: &str) -> Self {
        let (primary, outlet) = match url.find('(') {
            Some(open) => (&url[..open], Some(&url[open + 1..])),
            None => (url, None),
        };
        let sidenav = outlet
            .and_then(|o| o.strip_suffix(')'))
            .and_then(|o| o.strip_prefix("sidenav:"))
            .and_then(Sidenav::parse);
        Self {
            route: Route::parse_path(primary),
            sidenav,
        }
    }

    /// Console URL, inverse of [`Location::parse`].
    pub fn url(&self) -> String {
        match &self.sidenav {
            Some(sidenav) => format!("{}(sidenav:{})", self.route.path(), sidenav.path()),
            None => self.route.path(),
        }
    }
}

impl From<Route> for Location {
    fn from(route: Route) -> Self {
        Self::new(route)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primary_routes() {
        assert_eq!(Route::parse_path("/"), Route::Explorer);
        assert_eq!(Route::parse_path("/explorer/grid-list"), Route::Explorer);
        assert_eq!(
            Route::parse_path("/explorer/grid-list/buckets/b-1"),
            Route::Bucket {
                bucket_id: "b-1".into()
            }
        );
        assert_eq!(
            Route::parse_path("/explorer/grid-list/buckets/b-1/flows/d-1"),
            Route::Droplet {
                bucket_id: "b-1".into(),
                droplet_type: "flows".into(),
                droplet_id: "d-1".into(),
            }
        );
        assert_eq!(Route::parse_path("/administration"), Route::AdministrationWorkflow);
        assert_eq!(Route::parse_path("/administration/users?x=1"), Route::AdministrationUsers);
        assert_eq!(Route::parse_path("/login"), Route::Login);
        assert_eq!(
            Route::parse_path("/nope"),
            Route::NotFound {
                path: "/nope".into()
            }
        );
    }

    #[test]
    fn test_location_with_outlet() {
        let url = "/administration/users(sidenav:manage/group/g-1)";
        let location = Location::parse(url);

        assert_eq!(location.route, Route::AdministrationUsers);
        assert_eq!(
            location.sidenav,
            Some(Sidenav::ManageGroup {
                group_id: "g-1".into()
            })
        );
        assert_eq!(location.url(), url);
    }

    #[test]
    fn test_unknown_outlet_is_dropped() {
        let location = Location::parse("/administration/workflow(sidenav:bogus)");
        assert_eq!(location.route, Route::AdministrationWorkflow);
        assert!(location.sidenav.is_none());
    }
}
