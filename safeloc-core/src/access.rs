//! Access roles and location visibility.
//!
//! Every request is evaluated against a single profile snapshot:
//!
//! ```text
//! caller is configured admin ──▶ Admin ─┐
//! caller == profile owner    ──▶ Owner ─┼─▶ real location
//! anyone else                ──▶ Other ───▶ fake location
//! ```
//!
//! Roles are derived per request and never stored.
//!
//! # Trust boundary
//!
//! Caller identities reaching this module are *asserted*, not verified.
//! Authenticating them is the job of whatever sits in front of the service.

use std::fmt;

use subtle::ConstantTimeEq;

use crate::location::Coordinate;
use crate::profile::{Profile, ProfileError, Result};

/// Default identity of the service administrator.
pub const DEFAULT_ADMIN_ID: &str = "admin";

/// A caller's access level with respect to one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Service administrator: sees real locations, may delete anything.
    Admin,
    /// Creator of the profile: sees the real location, may delete it.
    Owner,
    /// Anyone else: sees the approximate location only.
    Other,
}

impl Role {
    /// Converts to string representation for logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Owner => "owner",
            Self::Other => "other",
        }
    }

    /// Returns whether this role sees the real location.
    #[must_use]
    pub const fn sees_real_location(&self) -> bool {
        matches!(self, Self::Admin | Self::Owner)
    }

    /// Returns whether this role may delete the profile.
    #[must_use]
    pub const fn can_delete(&self) -> bool {
        matches!(self, Self::Admin | Self::Owner)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the role of `caller_id` for a profile owned by `profile_owner_id`.
///
/// Admin status takes precedence over ownership.
///
/// # Examples
///
/// ```
/// use safeloc_core::access::{resolve_role, Role};
///
/// assert_eq!(resolve_role("admin", "alice", true), Role::Admin);
/// assert_eq!(resolve_role("alice", "alice", false), Role::Owner);
/// assert_eq!(resolve_role("bob", "alice", false), Role::Other);
/// ```
#[must_use]
pub fn resolve_role(caller_id: &str, profile_owner_id: &str, caller_is_admin: bool) -> Role {
    if caller_is_admin {
        Role::Admin
    } else if ids_match(caller_id, profile_owner_id) {
        Role::Owner
    } else {
        Role::Other
    }
}

/// Returns the coordinate `role` is entitled to see.
#[must_use]
pub const fn visible_location(profile: &Profile, role: Role) -> Coordinate {
    if role.sees_real_location() {
        profile.real_location
    } else {
        profile.fake_location
    }
}

/// Checks that `role` may delete a profile.
///
/// # Errors
///
/// Returns [`ProfileError::Forbidden`] for [`Role::Other`].
pub fn ensure_can_delete(role: Role) -> Result<()> {
    if role.can_delete() {
        Ok(())
    } else {
        Err(ProfileError::Forbidden(format!(
            "role '{role}' may not delete this profile"
        )))
    }
}

/// Role resolution bound to a configured administrator identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    admin_id: String,
}

impl AccessPolicy {
    /// Creates a policy that treats `admin_id` as the administrator.
    #[must_use]
    pub fn new(admin_id: impl Into<String>) -> Self {
        Self {
            admin_id: admin_id.into(),
        }
    }

    /// The configured administrator identity.
    #[must_use]
    pub fn admin_id(&self) -> &str {
        &self.admin_id
    }

    /// Returns whether `caller_id` is the configured administrator.
    #[must_use]
    pub fn is_admin(&self, caller_id: &str) -> bool {
        ids_match(caller_id, &self.admin_id)
    }

    /// Resolves the role of `caller_id` for `profile`.
    #[must_use]
    pub fn role_for(&self, caller_id: &str, profile: &Profile) -> Role {
        resolve_role(caller_id, &profile.owner_id, self.is_admin(caller_id))
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_ID)
    }
}

fn ids_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileId;

    fn create_test_profile(owner: &str) -> Profile {
        Profile {
            id: ProfileId::new(1),
            full_name: format!("Profile of {owner}"),
            real_location: Coordinate::new(56.32, 65.23).unwrap(),
            fake_location: Coordinate::new(56.325, 65.236).unwrap(),
            owner_id: owner.to_string(),
            created_at: 1_000_000,
        }
    }

    #[test]
    fn admin_flag_wins() {
        assert_eq!(resolve_role("admin", "alice", true), Role::Admin);
        // Even an owner flagged as admin resolves to Admin.
        assert_eq!(resolve_role("alice", "alice", true), Role::Admin);
    }

    #[test]
    fn owner_and_other() {
        assert_eq!(resolve_role("alice", "alice", false), Role::Owner);
        assert_eq!(resolve_role("bob", "alice", false), Role::Other);
        assert_eq!(resolve_role("alic", "alice", false), Role::Other);
        assert_eq!(resolve_role("", "alice", false), Role::Other);
    }

    #[test]
    fn admin_name_without_flag_is_not_admin() {
        assert_eq!(resolve_role("admin", "alice", false), Role::Other);
    }

    #[test]
    fn visibility_is_total() {
        let profile = create_test_profile("alice");
        assert_eq!(visible_location(&profile, Role::Admin), profile.real_location);
        assert_eq!(visible_location(&profile, Role::Owner), profile.real_location);
        assert_eq!(visible_location(&profile, Role::Other), profile.fake_location);
    }

    #[test]
    fn delete_authorization() {
        assert!(ensure_can_delete(Role::Admin).is_ok());
        assert!(ensure_can_delete(Role::Owner).is_ok());
        assert!(matches!(
            ensure_can_delete(Role::Other),
            Err(ProfileError::Forbidden(_))
        ));
    }

    #[test]
    fn policy_uses_configured_admin() {
        let policy = AccessPolicy::new("root");
        let profile = create_test_profile("alice");

        assert!(policy.is_admin("root"));
        assert!(!policy.is_admin("admin"));
        assert_eq!(policy.role_for("root", &profile), Role::Admin);
        assert_eq!(policy.role_for("admin", &profile), Role::Other);
        assert_eq!(policy.role_for("alice", &profile), Role::Owner);
    }

    #[test]
    fn default_policy_admin_is_admin() {
        let policy = AccessPolicy::default();
        assert_eq!(policy.admin_id(), DEFAULT_ADMIN_ID);
        assert!(policy.is_admin("admin"));
    }

    #[test]
    fn role_strings() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::Owner.as_str(), "owner");
        assert_eq!(Role::Other.as_str(), "other");
    }
}
