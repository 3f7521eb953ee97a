//! Profile management.
//!
//! A profile stores a person's real location next to an approximate one.
//! Readers get one or the other depending on their role.
//!
//! # Architecture
//!
//! ```text
//! ProfileService (request-level API)
//!     ├── AccessPolicy (role resolution and visibility)
//!     ├── location::approximate (fake location at registration)
//!     └── ProfileStore (SqliteProfileStore by default)
//! ```
//!
//! # Types
//!
//! - [`Profile`]: a stored record with both locations
//! - [`ProfileRegistration`]: caller input for creating a profile
//! - [`ProfileView`]: a profile rendered for one caller
//! - [`ProfileFilter`]: criteria for listing profile ids

mod error;
mod service;
mod storage;
pub mod types;

pub use error::{ProfileError, Result};
pub use service::ProfileService;
pub use storage::{ProfileStore, SqliteProfileStore};
pub use types::{NewProfile, Profile, ProfileFilter, ProfileId, ProfileRegistration, ProfileView};
