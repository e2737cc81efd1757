//! Server configuration from environment variables.
//!
//! Listen address comes from CLI flags in the binary; everything else is read here.

use std::path::PathBuf;

use thiserror::Error;

const DEV_JWT_SECRET: &str = "hiroba_local_development_jwt_secret_must_be_32_chars";
const DEFAULT_OUTBOUND_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidCapacity { key: &'static str, value: String },
}

/// Core server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HS256 secret shared with the token issuer.
    pub jwt_secret: String,
    /// Capacity of each session's outbound queue.
    pub outbound_queue_capacity: usize,
    /// JSON array of `{ "id", "name", "avatar" }`.
    pub profiles_file: Option<PathBuf>,
    /// JSON array of `{ "roomId", "passwordHash" }`.
    pub rooms_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Parse configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `HIROBA_JWT_SECRET` | dev-only placeholder |
    /// | `HIROBA_OUTBOUND_QUEUE_CAPACITY` | `256` |
    /// | `HIROBA_PROFILES_FILE` | *(none)* |
    /// | `HIROBA_ROOMS_FILE` | *(none)* |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_fn(|key| std::env::var(key))
    }

    /// Testable constructor that accepts an environment lookup function.
    fn from_env_fn<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let jwt_secret = env("HIROBA_JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.into());

        let outbound_queue_capacity = match env("HIROBA_OUTBOUND_QUEUE_CAPACITY") {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    return Err(ConfigError::InvalidCapacity {
                        key: "HIROBA_OUTBOUND_QUEUE_CAPACITY",
                        value,
                    });
                }
            },
            Err(_) => DEFAULT_OUTBOUND_QUEUE_CAPACITY,
        };

        let profiles_file = env("HIROBA_PROFILES_FILE").ok().map(PathBuf::from);
        let rooms_file = env("HIROBA_ROOMS_FILE").ok().map(PathBuf::from);

        Ok(Self {
            jwt_secret,
            outbound_queue_capacity,
            profiles_file,
            rooms_file,
        })
    }

    /// Returns true when using the development-only JWT secret.
    pub fn is_dev_jwt_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.into(),
            outbound_queue_capacity: DEFAULT_OUTBOUND_QUEUE_CAPACITY,
            profiles_file: None,
            rooms_file: None,
        }
    }
}
