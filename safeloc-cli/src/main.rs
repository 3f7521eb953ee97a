//! `safeloc` command-line driver for the profile service.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use safeloc_core::config::ServiceConfig;
use safeloc_core::location::{approximate, distance_km, Coordinate};
use safeloc_core::profile::{ProfileFilter, ProfileId, ProfileRegistration, ProfileService};
use tracing::debug;

mod logging;

#[derive(Parser, Debug)]
#[command(name = "safeloc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database file, overrides the config
    #[arg(long, env = "SAFELOC_DB")]
    db: Option<PathBuf>,

    /// Administrator identity, overrides the config
    #[arg(long, env = "SAFELOC_ADMIN_ID")]
    admin_id: Option<String>,

    /// Log filter used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a profile owned by the caller
    Register {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    /// Show a profile as the caller sees it
    Show {
        id: ProfileId,
        #[arg(long)]
        caller: String,
    },
    /// Delete a profile
    Delete {
        id: ProfileId,
        #[arg(long)]
        caller: String,
    },
    /// List profile ids
    List {
        /// Only profiles created by this owner
        #[arg(long)]
        owner: Option<String>,
        /// Case-insensitive name fragment
        #[arg(long)]
        name: Option<String>,
    },
    /// Geodesic distance between two points, in km
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
    /// Draw an approximate location for a point
    Approximate {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        /// Maximum offset in km, defaults to the configured radius
        #[arg(long)]
        radius: Option<f64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(&logging::LogConfig {
        level: args.log_level.clone(),
        json_format: args.json_logs,
    })?;

    let config = load_config(&args)?;
    debug!(database = %config.database_path.display(), "configuration loaded");

    run(args.command, &config)
}

/// Reads the optional config file and applies command-line overrides.
fn load_config(args: &Args) -> Result<ServiceConfig> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    if let Some(db) = &args.db {
        config.database_path.clone_from(db);
    }
    if let Some(admin_id) = &args.admin_id {
        config.admin_id.clone_from(admin_id);
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run(command: Command, config: &ServiceConfig) -> Result<()> {
    match command {
        Command::Register {
            caller,
            name,
            lat,
            lon,
        } => {
            let location = Coordinate::new(lat, lon)?;
            let service = open_service(config)?;
            let id = service.register(&caller, &ProfileRegistration::new(name, location))?;
            println!("{id}");
        }
        Command::Show { id, caller } => {
            let view = open_service(config)?.get_profile(id, &caller)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::Delete { id, caller } => {
            open_service(config)?.delete_profile(id, &caller)?;
        }
        Command::List { owner, name } => {
            let mut filter = ProfileFilter::all();
            if let Some(owner) = owner {
                filter = filter.with_owner(owner);
            }
            if let Some(name) = name {
                filter = filter.with_name(name);
            }
            let ids = open_service(config)?.list_profile_ids(&filter)?;
            println!("{}", serde_json::to_string(&ids)?);
        }
        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let a = Coordinate::new(lat1, lon1)?;
            let b = Coordinate::new(lat2, lon2)?;
            println!("{}", distance_km(a, b));
        }
        Command::Approximate { lat, lon, radius } => {
            let real = Coordinate::new(lat, lon)?;
            let fake = approximate(real, radius.unwrap_or(config.approximation_radius_km))?;
            println!("{}", serde_json::to_string(&fake)?);
        }
    }
    Ok(())
}

fn open_service(config: &ServiceConfig) -> Result<ProfileService> {
    ProfileService::open(config)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn parses_negative_coordinates() {
        let args = parse(&["safeloc", "distance", "-37.95", "144.42", "-37.65", "143.93"]);
        match args.command {
            Command::Distance { lat1, lat2, .. } => {
                assert_eq!(lat1, -37.95);
                assert_eq!(lat2, -37.65);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_register_flags() {
        let args = parse(&[
            "safeloc", "register", "--caller", "u1", "--name", "Ada", "--lat", "-1.5", "--lon",
            "2.5",
        ]);
        match args.command {
            Command::Register { caller, lat, .. } => {
                assert_eq!(caller, "u1");
                assert_eq!(lat, -1.5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_profile_ids() {
        let args = parse(&["safeloc", "show", "42", "--caller", "u1"]);
        match args.command {
            Command::Show { id, caller } => {
                assert_eq!(id, ProfileId::new(42));
                assert_eq!(caller, "u1");
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Args::try_parse_from(["safeloc", "delete", "abc", "--caller", "u1"]).is_err());
    }

    #[test]
    fn overrides_apply_on_top_of_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("safeloc.json");
        std::fs::write(&config_path, r#"{"admin_id": "root", "approximation_radius_km": 2.0}"#)
            .unwrap();
        let db = dir.path().join("p.db");

        let args = parse(&[
            "safeloc",
            "--config",
            config_path.to_str().unwrap(),
            "--db",
            db.to_str().unwrap(),
            "list",
        ]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.database_path, db);
        assert_eq!(config.approximation_radius_km, 2.0);
    }

    #[test]
    fn register_then_show_through_commands() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig {
            database_path: dir.path().join("p.db"),
            ..ServiceConfig::default()
        };

        run(
            Command::Register {
                caller: "u1".to_string(),
                name: "Ada".to_string(),
                lat: 56.32,
                lon: 65.23,
            },
            &config,
        )
        .unwrap();

        let service = ProfileService::open(&config).unwrap();
        let id = service.profile_for_owner("u1").unwrap().unwrap();
        assert!(run(
            Command::Delete {
                id,
                caller: "u2".to_string(),
            },
            &config,
        )
        .is_err());
        assert!(run(
            Command::Delete {
                id,
                caller: "u1".to_string(),
            },
            &config,
        )
        .is_ok());
    }

    #[test]
    fn invalid_coordinate_is_an_error() {
        let config = ServiceConfig::default();
        let result = run(
            Command::Distance {
                lat1: 90.0,
                lon1: 0.0,
                lat2: 0.0,
                lon2: 0.0,
            },
            &config,
        );
        assert!(result.is_err());
    }
}
