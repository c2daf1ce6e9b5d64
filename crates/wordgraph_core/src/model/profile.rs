//! Caller identity supplied by the external authentication boundary.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque user identifier issued outside the engine.
pub type UserId = String;

/// Claim value for the admin role.
pub const ROLE_ADMIN: &str = "admin";
/// Claim value for the moderator role.
pub const ROLE_MODERATOR: &str = "moderator";
/// Claim value for the member role.
pub const ROLE_MEMBER: &str = "member";

/// Caller role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Moderator,
    Member,
}

impl Role {
    /// Stable string id used by token claims.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Moderator => ROLE_MODERATOR,
            Self::Member => ROLE_MEMBER,
        }
    }

    /// Whether this role may act on resources owned by someone else.
    pub fn overrides_ownership(self) -> bool {
        match self {
            Self::Admin | Self::Moderator => true,
            Self::Member => false,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one role from its claim string.
pub fn parse_role(value: &str) -> Result<Role, RoleParseError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(RoleParseError::EmptyRole);
    }

    match normalized {
        ROLE_ADMIN => Ok(Role::Admin),
        ROLE_MODERATOR => Ok(Role::Moderator),
        ROLE_MEMBER => Ok(Role::Member),
        other => Err(RoleParseError::UnsupportedRole(other.to_string())),
    }
}

/// Role parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleParseError {
    EmptyRole,
    UnsupportedRole(String),
}

impl Display for RoleParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRole => write!(f, "role value must not be empty"),
            Self::UnsupportedRole(value) => write!(f, "role is unsupported: {value}"),
        }
    }
}

impl Error for RoleParseError {}

/// Authenticated caller, trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub role: Role,
}

impl Profile {
    pub fn new(id: impl Into<UserId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn member(id: impl Into<UserId>) -> Self {
        Self::new(id, Role::Member)
    }

    pub fn moderator(id: impl Into<UserId>) -> Self {
        Self::new(id, Role::Moderator)
    }

    pub fn admin(id: impl Into<UserId>) -> Self {
        Self::new(id, Role::Admin)
    }
}
