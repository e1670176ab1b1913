//! Gate variants and decisions.

use flowreg_core::ApiError;
use serde::{Deserialize, Serialize};

use crate::routes::{Location, Route};
use crate::views::Notice;

/// The navigation classes the gate protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateVariant {
    /// The login screen
    Login,
    /// Any administrative resource
    Resources,
    /// User and group administration
    UsersAdministration,
    /// Bucket (workflow) administration
    WorkflowAdministration,
}

impl GateVariant {
    /// Variants a route passes through, outermost first.
    pub fn chain_for(route: &Route) -> &'static [GateVariant] {
        match route {
            Route::Login => &[Self::Login],
            Route::AdministrationUsers => &[Self::Resources, Self::UsersAdministration],
            Route::AdministrationWorkflow => &[Self::Resources, Self::WorkflowAdministration],
            Route::Explorer
            | Route::Bucket { .. }
            | Route::Droplet { .. }
            | Route::NotFound { .. } => &[],
        }
    }

    /// Where a resolved identity without this variant's permission is sent.
    pub fn fallback(&self) -> Route {
        match self {
            Self::UsersAdministration => Route::AdministrationWorkflow,
            Self::WorkflowAdministration => Route::AdministrationUsers,
            Self::Login | Self::Resources => Route::Explorer,
        }
    }

    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Resources => "resources",
            Self::UsersAdministration => "users-administration",
            Self::WorkflowAdministration => "workflow-administration",
        }
    }
}

/// A navigation waiting on identity resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationAttempt {
    /// Gate the navigation is passing
    pub variant: GateVariant,
    /// Attempted console URL
    pub url: String,
    /// Session navigation generation taken when the attempt started
    pub generation: u64,
}

/// Result of the synchronous check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Session state already grants access
    Allow,
    /// Access depends on resolving the identity first
    Pending(NavigationAttempt),
}

impl Activation {
    /// `false` while resolution is pending.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The pending attempt, if any.
    pub fn attempt(&self) -> Option<&NavigationAttempt> {
        match self {
            Self::Allow => None,
            Self::Pending(attempt) => Some(attempt),
        }
    }
}

/// Final outcome of a gated navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Continue to the attempted URL
    Allow,
    /// Go elsewhere, optionally telling the user why
    Redirect {
        /// Destination
        to: Location,
        /// Shown before or alongside the redirect
        notice: Option<Notice>,
    },
    /// Resolution failed; remain on the current route
    Stay {
        /// The failed identity load
        error: ApiError,
    },
    /// A newer navigation started before this one resolved; do nothing
    Superseded,
}

impl GateDecision {
    /// Redirect without a notice.
    pub fn redirect(route: Route) -> Self {
        Self::Redirect {
            to: route.into(),
            notice: None,
        }
    }

    /// Redirect and show `notice`.
    pub fn redirect_with(route: Route, notice: Notice) -> Self {
        Self::Redirect {
            to: route.into(),
            notice: Some(notice),
        }
    }

    /// Whether the navigation may continue.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Where a redirect goes.
    pub fn redirect_target(&self) -> Option<&Location> {
        match self {
            Self::Redirect { to, .. } => Some(to),
            _ => None,
        }
    }

    /// Notice attached to a redirect.
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Self::Redirect { notice, .. } => notice.as_ref(),
            _ => None,
        }
    }
}
