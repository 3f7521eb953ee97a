//! High-level profile API.
//!
//! [`ProfileService`] combines a [`ProfileStore`] with the access policy and
//! the location approximation to serve requests from asserted caller
//! identities.
//!
//! The store is injected; there is no process-wide connection.

use super::error::{ProfileError, Result};
use super::storage::{ProfileStore, SqliteProfileStore};
use super::types::{NewProfile, ProfileFilter, ProfileId, ProfileRegistration, ProfileView};
use crate::access::{ensure_can_delete, visible_location, AccessPolicy, Role};
use crate::config::ServiceConfig;
use crate::location::approximate;

/// Request-level profile operations.
///
/// # Example
///
/// ```
/// use safeloc_core::config::ServiceConfig;
/// use safeloc_core::location::Coordinate;
/// use safeloc_core::profile::{ProfileRegistration, ProfileService, SqliteProfileStore};
///
/// let store = SqliteProfileStore::in_memory().unwrap();
/// let service = ProfileService::new(store, &ServiceConfig::default());
///
/// let home = Coordinate::new(56.32, 65.23).unwrap();
/// let id = service.register("u1", &ProfileRegistration::new("User One", home)).unwrap();
///
/// assert_eq!(service.get_profile(id, "u1").unwrap().location, home);
/// assert_ne!(service.get_profile(id, "u2").unwrap().location, home);
/// ```
pub struct ProfileService<S: ProfileStore = SqliteProfileStore> {
    store: S,
    policy: AccessPolicy,
    approximation_radius_km: f64,
}

impl ProfileService<SqliteProfileStore> {
    /// Opens the `SQLite` database named by `config` and builds a service on it.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Config`] if the configuration is invalid, or a
    /// storage error if the database cannot be opened.
    pub fn open(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ProfileError::Storage(format!("Failed to create data directory: {e}"))
                })?;
            }
        }

        let store = SqliteProfileStore::new(&config.database_path)?;
        Ok(Self::new(store, config))
    }
}

impl<S: ProfileStore> ProfileService<S> {
    /// Creates a service over `store` using the admin identity and radius
    /// from `config`.
    #[must_use]
    pub fn new(store: S, config: &ServiceConfig) -> Self {
        Self {
            store,
            policy: AccessPolicy::new(config.admin_id.clone()),
            approximation_radius_km: config.approximation_radius_km,
        }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The access policy in effect.
    #[must_use]
    pub const fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Registers a profile owned by `caller_id`.
    ///
    /// The approximate location is computed here, once, and stored with the
    /// real one.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::MissingCaller`] if `caller_id` is empty
    /// - [`ProfileError::InvalidName`] if the name is blank
    /// - [`ProfileError::AlreadyExists`] if the caller already has a profile
    /// - [`ProfileError::Approximation`] if no approximate location could be drawn
    /// - a storage error if the insert fails
    pub fn register(&self, caller_id: &str, registration: &ProfileRegistration) -> Result<ProfileId> {
        require_caller(caller_id)?;
        let full_name = registration.validated_name()?;

        let fake_location = approximate(registration.location, self.approximation_radius_km)?;

        let new_profile = NewProfile {
            full_name: full_name.to_string(),
            real_location: registration.location,
            fake_location,
            owner_id: caller_id.to_string(),
            created_at: chrono::Utc::now().timestamp(),
        };

        let id = self.store.insert(&new_profile)?;
        tracing::info!(profile_id = %id, owner = caller_id, "registered profile");
        Ok(id)
    }

    /// Resolves the role of `caller_id` for profile `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::ProfileNotFound`] if the profile doesn't exist,
    /// including for the administrator.
    pub fn resolve_role(&self, id: ProfileId, caller_id: &str) -> Result<Role> {
        require_caller(caller_id)?;
        let profile = self
            .store
            .find_by_id(id)?
            .ok_or_else(|| ProfileError::ProfileNotFound(id.to_string()))?;

        let role = self.policy.role_for(caller_id, &profile);
        tracing::debug!(profile_id = %id, caller = caller_id, role = %role, "resolved role");
        Ok(role)
    }

    /// Reads profile `id` as seen by `caller_id`.
    ///
    /// Admin and owner receive the real location; everyone else receives the
    /// approximate one.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::ProfileNotFound`] if the profile doesn't exist.
    pub fn get_profile(&self, id: ProfileId, caller_id: &str) -> Result<ProfileView> {
        require_caller(caller_id)?;
        let profile = self
            .store
            .find_by_id(id)?
            .ok_or_else(|| ProfileError::ProfileNotFound(id.to_string()))?;

        let role = self.policy.role_for(caller_id, &profile);
        tracing::debug!(profile_id = %id, caller = caller_id, role = %role, "reading profile");

        Ok(ProfileView {
            id: profile.id,
            location: visible_location(&profile, role),
            full_name: profile.full_name,
        })
    }

    /// Deletes profile `id` on behalf of `caller_id`.
    ///
    /// # Errors
    ///
    /// - [`ProfileError::ProfileNotFound`] if the profile doesn't exist
    /// - [`ProfileError::Forbidden`] if the caller is neither owner nor admin
    pub fn delete_profile(&self, id: ProfileId, caller_id: &str) -> Result<()> {
        let role = self.resolve_role(id, caller_id)?;

        if let Err(err) = ensure_can_delete(role) {
            tracing::warn!(profile_id = %id, caller = caller_id, "rejected profile deletion");
            return Err(err);
        }

        self.store.delete(id)?;
        tracing::info!(profile_id = %id, caller = caller_id, role = %role, "deleted profile");
        Ok(())
    }

    /// Lists ids of profiles matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn list_profile_ids(&self, filter: &ProfileFilter) -> Result<Vec<ProfileId>> {
        self.store.list_ids(filter)
    }

    /// Returns the id of the profile created by `owner_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn profile_for_owner(&self, owner_id: &str) -> Result<Option<ProfileId>> {
        Ok(self.store.find_by_owner(owner_id)?.map(|profile| profile.id))
    }
}

fn require_caller(caller_id: &str) -> Result<()> {
    if caller_id.trim().is_empty() {
        return Err(ProfileError::MissingCaller);
    }
    Ok(())
}
