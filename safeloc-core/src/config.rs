//! Service configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::DEFAULT_ADMIN_ID;
use crate::location::DEFAULT_APPROXIMATION_RADIUS_KM;

/// Default database file name, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "profiles.db";

/// Error type for configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config JSON is malformed.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Settings for the profile service.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
///
/// # Example
///
/// ```
/// use safeloc_core::config::ServiceConfig;
///
/// let config = ServiceConfig::from_json(r#"{"admin_id": "root"}"#).unwrap();
/// assert_eq!(config.admin_id, "root");
/// assert_eq!(config.approximation_radius_km, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Caller identity treated as administrator.
    pub admin_id: String,

    /// Maximum distance between real and approximate locations, in km.
    pub approximation_radius_km: f64,

    /// `SQLite` database file.
    pub database_path: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            admin_id: DEFAULT_ADMIN_ID.to_string(),
            approximation_radius_km: DEFAULT_APPROXIMATION_RADIUS_KM,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

impl ServiceConfig {
    /// Parses and validates a JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read, is malformed, or holds an
    /// invalid value.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty admin id or a radius
    /// that is not finite and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_id.trim().is_empty() {
            return Err(ConfigError::Invalid("admin_id must not be empty".to_string()));
        }
        if !self.approximation_radius_km.is_finite() || self.approximation_radius_km <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "approximation_radius_km must be positive, got {}",
                self.approximation_radius_km
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = ServiceConfig::default();

        assert_eq!(config.admin_id, "admin");
        assert_eq!(config.approximation_radius_km, 1.0);
        assert_eq!(config.database_path, PathBuf::from("profiles.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ServiceConfig::from_json(r#"{"approximation_radius_km": 2.5}"#).unwrap();
        assert_eq!(config.approximation_radius_km, 2.5);
        assert_eq!(config.admin_id, "admin");
    }

    #[test]
    fn rejects_invalid_radius() {
        for radius in ["0.0", "-3.0"] {
            let json = format!(r#"{{"approximation_radius_km": {radius}}}"#);
            assert!(matches!(
                ServiceConfig::from_json(&json),
                Err(ConfigError::Invalid(_))
            ));
        }
    }

    #[test]
    fn rejects_blank_admin() {
        let result = ServiceConfig::from_json(r#"{"admin_id": "  "}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_malformed_json() {
        let result = ServiceConfig::from_json("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("safeloc.json");
        std::fs::write(
            &path,
            r#"{"admin_id": "root", "database_path": "/var/lib/safeloc/profiles.db"}"#,
        )
        .unwrap();

        let config = ServiceConfig::load(&path).unwrap();
        assert_eq!(config.admin_id, "root");
        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/safeloc/profiles.db")
        );
    }

    #[test]
    fn load_missing_file() {
        let result = ServiceConfig::load(Path::new("/nonexistent/safeloc.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn roundtrip_json() {
        let config = ServiceConfig {
            admin_id: "root".to_string(),
            approximation_radius_km: 0.5,
            database_path: PathBuf::from("data/p.db"),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ServiceConfig::from_json(&json).unwrap(), config);
    }
}
