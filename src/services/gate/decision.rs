//! Authorization decision over (required role, resolved identity).

use super::identity::Identity;
use super::paths::GateRoutes;
use super::role::Role;

/// Why a request is being bounced elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No usable credential; the login page shows a "session expired" notice.
    SessionExpired,
    /// Signed in, but this area belongs to another role.
    WrongArea,
}

/// Machine-readable code rendered on the unauthorized notice page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotAllowed,
    AuthError,
}

impl RejectReason {
    pub fn code(self) -> &'static str {
        match self {
            RejectReason::NotAllowed => "not-allowed",
            RejectReason::AuthError => "auth-error",
        }
    }
}

/// The gateway's single output for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect {
        location: String,
        reason: RedirectReason,
        /// Path the client should come back to once the reason is resolved.
        return_to: Option<String>,
    },
    Reject(RejectReason),
}

impl Decision {
    pub fn kind(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Redirect {
                reason: RedirectReason::SessionExpired,
                ..
            } => "login_redirect",
            Decision::Redirect {
                reason: RedirectReason::WrongArea,
                ..
            } => "area_redirect",
            Decision::Reject(_) => "reject",
        }
    }

    pub fn is_login_redirect(&self) -> bool {
        matches!(
            self,
            Decision::Redirect {
                reason: RedirectReason::SessionExpired,
                ..
            }
        )
    }

    /// `Location` to send the client to, or `None` for `Allow`.
    pub fn location(&self, routes: &GateRoutes) -> Option<String> {
        match self {
            Decision::Allow => None,
            Decision::Redirect { location, .. } => Some(location.clone()),
            Decision::Reject(reason) => Some(routes.unauthorized_location(*reason)),
        }
    }
}

/// Outcome of comparing an authenticated role with the role a path requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Grant,
    /// Send the user to their own landing page.
    WrongArea,
    Deny,
}

/// (required, actual) → access. Every pair of roles appears exactly once.
pub const ACCESS_MATRIX: &[(Role, Role, Access)] = &[
    (Role::Admin, Role::Admin, Access::Grant),
    (Role::Admin, Role::Salesperson, Access::WrongArea),
    (Role::Admin, Role::User, Access::Deny),
    (Role::Salesperson, Role::Admin, Access::Grant),
    (Role::Salesperson, Role::Salesperson, Access::Grant),
    (Role::Salesperson, Role::User, Access::Deny),
    (Role::User, Role::Admin, Access::Grant),
    (Role::User, Role::Salesperson, Access::Deny),
    (Role::User, Role::User, Access::Grant),
];

pub fn access(required: Role, actual: Role) -> Access {
    ACCESS_MATRIX
        .iter()
        .find(|(r, a, _)| *r == required && *a == actual)
        .map(|(_, _, access)| *access)
        .unwrap_or(Access::Deny)
}

/// Decide what happens to a request for `path`.
///
/// `identity` is `None` when no credential was found or it failed verification.
pub fn decide(
    routes: &GateRoutes,
    required: Option<Role>,
    identity: Option<&Identity>,
    path: &str,
) -> Decision {
    let Some(required) = required else {
        return Decision::Allow;
    };

    let Some(identity) = identity else {
        return Decision::Redirect {
            location: routes.login_location(path),
            reason: RedirectReason::SessionExpired,
            return_to: Some(path.to_string()),
        };
    };

    match access(required, identity.role) {
        Access::Grant => Decision::Allow,
        Access::WrongArea => match routes.landing_for(identity.role) {
            Some(landing) => Decision::Redirect {
                location: landing.to_string(),
                reason: RedirectReason::WrongArea,
                return_to: None,
            },
            None => Decision::Reject(RejectReason::NotAllowed),
        },
        Access::Deny => Decision::Reject(RejectReason::NotAllowed),
    }
}
