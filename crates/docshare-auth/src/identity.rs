//! The authenticated caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried in the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May start approval workflows and read the audit trail.
    Admin,
    /// Regular account.
    #[default]
    Member,
}

impl Role {
    /// Check if this role is admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is making a request, as established from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Lower-cased email.
    pub email: String,
    /// Role.
    pub role: Role,
    /// App the caller is acting from.
    pub app: String,
}

impl Identity {
    /// Build an identity, normalizing the email.
    pub fn new(email: &str, role: Role, app: impl Into<String>) -> Self {
        Self {
            email: email.trim().to_lowercase(),
            role,
            app: app.into(),
        }
    }

    /// Check if the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
