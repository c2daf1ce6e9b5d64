//! Ownership-based authorization guard.
//!
//! # Invariants
//! - Decisions depend only on the caller profile and the resource owner.
//! - Admin and moderator roles pass every ownership check.

use crate::model::profile::Profile;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ownership check failure for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDenied {
    pub caller_id: String,
    pub owner_id: String,
}

impl Display for AccessDenied {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "caller `{}` may not modify a resource owned by `{}`",
            self.caller_id, self.owner_id
        )
    }
}

impl Error for AccessDenied {}

/// Returns whether `profile` may mutate a resource owned by `owner_id`.
pub fn is_allowed(profile: &Profile, owner_id: &str) -> bool {
    profile.role.overrides_ownership() || profile.id == owner_id
}

/// [`is_allowed`] as a `Result`, for `?` chaining.
pub fn authorize(profile: &Profile, owner_id: &str) -> Result<(), AccessDenied> {
    if is_allowed(profile, owner_id) {
        Ok(())
    } else {
        Err(AccessDenied {
            caller_id: profile.id.clone(),
            owner_id: owner_id.to_string(),
        })
    }
}
