//! Roles carried in access-token claims.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of roles an access token may assert.
///
/// "No role" is not a variant: an anonymous request simply has no `Identity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office administrator. Superuser for every restricted area.
    Admin,
    /// Sales staff. Owns the sales area only.
    Salesperson,
    /// Regular signed-in customer.
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Salesperson, Role::User];

    /// Roles whose areas this role may enter.
    ///
    /// `admin ⊇ {admin, salesperson, user}`; every other role only covers itself.
    pub fn capabilities(self) -> &'static [Role] {
        match self {
            Role::Admin => &Role::ALL,
            Role::Salesperson => &[Role::Salesperson],
            Role::User => &[Role::User],
        }
    }

    pub fn covers(self, required: Role) -> bool {
        self.capabilities().contains(&required)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Salesperson => "salesperson",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
