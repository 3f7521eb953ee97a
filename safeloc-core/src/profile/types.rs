//! Core types for profile management.
//!
//! A profile pairs a person's real location with an approximate one that is
//! computed once, at registration, and stored next to it. Which of the two a
//! reader receives is decided per request by [`crate::access`].

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ProfileError;
use crate::location::Coordinate;

/// Store-assigned profile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(i64);

impl ProfileId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProfileId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A stored profile.
///
/// Profiles are never mutated in place: they are inserted once and deleted
/// explicitly.
#[derive(Clone, PartialEq)]
pub struct Profile {
    /// Identifier assigned by the store.
    pub id: ProfileId,
    /// Display name (trimmed, non-empty).
    pub full_name: String,
    /// Location the owner registered.
    pub real_location: Coordinate,
    /// Approximate location disclosed to other callers.
    pub fake_location: Coordinate,
    /// Caller identity that created the profile.
    pub owner_id: String,
    /// When the profile was registered (Unix timestamp).
    pub created_at: i64,
}

// Keep the real location out of debug output.
impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("real_location", &"[redacted]")
            .field("fake_location", &self.fake_location)
            .field("owner_id", &self.owner_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// A profile ready for insertion, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    /// Display name.
    pub full_name: String,
    /// Location the owner registered.
    pub real_location: Coordinate,
    /// Pre-computed approximate location.
    pub fake_location: Coordinate,
    /// Caller identity creating the profile.
    pub owner_id: String,
    /// Registration time (Unix timestamp).
    pub created_at: i64,
}

/// Caller-supplied registration data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRegistration {
    /// Display name.
    pub full_name: String,
    /// Real location.
    pub location: Coordinate,
}

impl ProfileRegistration {
    /// Creates a registration.
    #[must_use]
    pub fn new(full_name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            full_name: full_name.into(),
            location,
        }
    }

    /// Returns the trimmed full name.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidName`] if the name is empty after
    /// trimming.
    pub fn validated_name(&self) -> Result<&str, ProfileError> {
        let name = self.full_name.trim();
        if name.is_empty() {
            return Err(ProfileError::InvalidName("Name field is empty".to_string()));
        }
        Ok(name)
    }
}

/// Criteria for listing profile ids. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    /// Only profiles created by this caller.
    pub owner_id: Option<String>,
    /// Only profiles whose name contains this fragment (case-insensitive).
    pub name_contains: Option<String>,
}

impl ProfileFilter {
    /// Matches every profile.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to profiles owned by `owner_id`.
    #[must_use]
    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Restricts to profiles whose name contains `fragment`.
    #[must_use]
    pub fn with_name(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }
}

/// A profile as rendered for a specific caller.
///
/// `location` is the coordinate that caller's role is entitled to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    /// Profile identifier.
    pub id: ProfileId,
    /// Display name.
    pub full_name: String,
    /// Real or approximate location.
    pub location: Coordinate,
}
