use dotenvy::dotenv;
use std::env;

use bancho_types::errors::AppError;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_FILE: &str = "bancho";
const DEFAULT_LOG_FILTER: &str = "info,bancho=debug,bancho_db=debug";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Directory for the daily rotated log files.
    pub log_dir: String,
    /// Log file prefix, files are named `<prefix>.<date>.log`.
    pub log_file: String,
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").map_err(|_| AppError::MissingEnv("DATABASE_URL"))?;
        let db_max_connections = parse_max_connections(env::var("BANCHO_DB_MAX_CONNECTIONS").ok())?;

        Ok(Self {
            database_url,
            db_max_connections,
            log_dir: or_default(env::var("BANCHO_LOG_DIR").ok(), DEFAULT_LOG_DIR),
            log_file: or_default(env::var("BANCHO_LOG_FILE").ok(), DEFAULT_LOG_FILE),
            log_filter: or_default(env::var("BANCHO_LOG_FILTER").ok(), DEFAULT_LOG_FILTER),
        })
    }
}

/// Blank values count as unset.
fn or_default(raw: Option<String>, default: &str) -> String {
    raw.map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_max_connections(raw: Option<String>) -> Result<u32, AppError> {
    match raw {
        Some(val) => val
            .trim()
            .parse::<u32>()
            .map(|n| n.clamp(1, 100))
            .map_err(|_| AppError::InvalidEnv("BANCHO_DB_MAX_CONNECTIONS")),
        None => Ok(DEFAULT_DB_MAX_CONNECTIONS),
    }
}
