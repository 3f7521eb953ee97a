//! SafeLocation Core Library
//!
//! Core functionality for SafeLocation - location profiles that disclose
//! the real position only to their owner and the administrator.
//! Everyone else sees an approximate position computed once at registration.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod access;
pub mod config;
pub mod location;
pub mod profile;

pub use access::{resolve_role, visible_location, AccessPolicy, Role};
pub use config::ServiceConfig;
pub use location::{approximate, distance_km, Coordinate};
pub use profile::{ProfileError, ProfileService};
