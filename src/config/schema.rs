//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Lowest work factor bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;
/// Highest work factor bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;
/// Longest idle timeout accepted, one year
pub const MAX_IDLE_TIMEOUT_MINUTES: i64 = 60 * 24 * 365;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Test mode: relaxed hashing cost, no background housekeeping
    #[serde(default)]
    pub testing: bool,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Server configuration for the HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// SQLite database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./taskr.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Session cookie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Idle timeout in minutes
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_minutes: i64,
}

fn default_cookie_name() -> String {
    "session".to_string()
}

fn default_idle_timeout() -> i64 {
    30
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_minutes: default_idle_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// bcrypt work factor (4..=31)
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl Config {
    /// Configuration used by the test suite: a throwaway database file and
    /// the cheapest bcrypt cost.
    pub fn for_testing(db_path: impl AsRef<Path>) -> Self {
        Self {
            testing: true,
            database: DatabaseConfig {
                path: db_path.as_ref().to_path_buf(),
                max_connections: 1,
            },
            security: SecurityConfig {
                bcrypt_cost: MIN_BCRYPT_COST,
            },
            ..Default::default()
        }
    }

    /// Reject values that would only fail later, at request time
    pub fn validate(&self) -> Result<()> {
        let cost = self.security.bcrypt_cost;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(Error::Config(format!(
                "security.bcrypt_cost must be between {} and {}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, cost
            )));
        }

        let idle = self.session.idle_timeout_minutes;
        if !(1..=MAX_IDLE_TIMEOUT_MINUTES).contains(&idle) {
            return Err(Error::Config(format!(
                "session.idle_timeout_minutes must be between 1 and {}, got {}",
                MAX_IDLE_TIMEOUT_MINUTES, idle
            )));
        }

        if self.session.cookie_name.is_empty() {
            return Err(Error::Config("session.cookie_name must not be empty".to_string()));
        }

        Ok(())
    }
}
