//! Profile persistence.
//!
//! [`ProfileStore`] is the seam between the service and whatever keeps the
//! records. [`SqliteProfileStore`] is the bundled implementation.
//!
//! # Consistency
//!
//! One profile per owner is enforced by a `UNIQUE` constraint on `owner_id`,
//! so the uniqueness check and the insert happen atomically inside `SQLite`.

// SQLite operations need to hold the lock for the duration of the operation.
#![allow(clippy::significant_drop_tightening)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use super::error::{ProfileError, Result};
use super::types::{NewProfile, Profile, ProfileFilter, ProfileId};
use crate::location::Coordinate;

/// Record storage for profiles.
///
/// Implementations must be safe to share between threads; the service holds
/// a single store and serves concurrent callers from it.
pub trait ProfileStore: Send + Sync {
    /// Finds the profile created by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn find_by_owner(&self, owner_id: &str) -> Result<Option<Profile>>;

    /// Finds a profile by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn find_by_id(&self, id: ProfileId) -> Result<Option<Profile>>;

    /// Inserts a profile and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::AlreadyExists`] if the owner already has a
    /// profile, or another error if the underlying storage fails.
    fn insert(&self, profile: &NewProfile) -> Result<ProfileId>;

    /// Deletes a profile.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::ProfileNotFound`] if nothing was deleted.
    fn delete(&self, id: ProfileId) -> Result<()>;

    /// Lists ids of profiles matching `filter`, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn list_ids(&self, filter: &ProfileFilter) -> Result<Vec<ProfileId>>;
}

/// `SQLite`-based profile storage.
///
/// Thread-safe wrapper around a `SQLite` connection.
pub struct SqliteProfileStore {
    conn: Mutex<Connection>,
}

const SELECT_PROFILE: &str = r"
    SELECT id, full_name, real_lat, real_lon, fake_lat, fake_lon, owner_id, created_at
    FROM profiles
";

impl SqliteProfileStore {
    /// Opens (or creates) the database at `path`.
    ///
    /// Creates the profiles table if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        tracing::debug!(path = %path.display(), "opened profile database");
        Ok(store)
    }

    /// Creates an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ProfileError::Storage(format!("Failed to acquire database lock: {e}")))
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL,
                real_lat REAL NOT NULL,
                real_lon REAL NOT NULL,
                fake_lat REAL NOT NULL,
                fake_lon REAL NOT NULL,
                created_at INTEGER NOT NULL
            );
            ",
        )?;

        Ok(())
    }
}

/// Raw column values, validated after the query finishes.
struct ProfileRow {
    id: i64,
    full_name: String,
    real: (f64, f64),
    fake: (f64, f64),
    owner_id: String,
    created_at: i64,
}

impl ProfileRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            full_name: row.get(1)?,
            real: (row.get(2)?, row.get(3)?),
            fake: (row.get(4)?, row.get(5)?),
            owner_id: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_profile(self) -> Result<Profile> {
        let real_location = Coordinate::new(self.real.0, self.real.1).map_err(|e| {
            ProfileError::Storage(format!("Corrupt real location for profile {}: {e}", self.id))
        })?;
        let fake_location = Coordinate::new(self.fake.0, self.fake.1).map_err(|e| {
            ProfileError::Storage(format!("Corrupt fake location for profile {}: {e}", self.id))
        })?;

        Ok(Profile {
            id: ProfileId::new(self.id),
            full_name: self.full_name,
            real_location,
            fake_location,
            owner_id: self.owner_id,
            created_at: self.created_at,
        })
    }
}

impl ProfileStore for SqliteProfileStore {
    fn find_by_owner(&self, owner_id: &str) -> Result<Option<Profile>> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                &format!("{SELECT_PROFILE} WHERE owner_id = ?1"),
                params![owner_id],
                ProfileRow::read,
            )
            .optional()?;

        row.map(ProfileRow::into_profile).transpose()
    }

    fn find_by_id(&self, id: ProfileId) -> Result<Option<Profile>> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                &format!("{SELECT_PROFILE} WHERE id = ?1"),
                params![id.get()],
                ProfileRow::read,
            )
            .optional()?;

        row.map(ProfileRow::into_profile).transpose()
    }

    fn insert(&self, profile: &NewProfile) -> Result<ProfileId> {
        let conn = self.lock()?;

        let result = conn.execute(
            r"
            INSERT INTO profiles (owner_id, full_name, real_lat, real_lon, fake_lat, fake_lon, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                &profile.owner_id,
                &profile.full_name,
                profile.real_location.latitude(),
                profile.real_location.longitude(),
                profile.fake_location.latitude(),
                profile.fake_location.longitude(),
                profile.created_at,
            ],
        );

        match result {
            Ok(_) => Ok(ProfileId::new(conn.last_insert_rowid())),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(ProfileError::AlreadyExists(format!(
                    "Owner '{}' already has a profile",
                    profile.owner_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, id: ProfileId) -> Result<()> {
        let conn = self.lock()?;

        let rows = conn.execute("DELETE FROM profiles WHERE id = ?1", params![id.get()])?;
        if rows == 0 {
            return Err(ProfileError::ProfileNotFound(id.to_string()));
        }

        Ok(())
    }

    fn list_ids(&self, filter: &ProfileFilter) -> Result<Vec<ProfileId>> {
        let conn = self.lock()?;

        // NULL parameters disable their criterion.
        let mut stmt = conn.prepare(
            r"
            SELECT id FROM profiles
            WHERE (?1 IS NULL OR owner_id = ?1)
              AND (?2 IS NULL OR instr(lower(full_name), lower(?2)) > 0)
            ORDER BY id
            ",
        )?;

        let ids = stmt
            .query_map(
                params![filter.owner_id.as_deref(), filter.name_contains.as_deref()],
                |row| row.get::<_, i64>(0),
            )?
            .map(|id| id.map(ProfileId::new))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ids)
    }
}
