//! Engine configuration
//!
//! Layered with the `config` crate, lowest precedence first:
//! built-in defaults, an optional TOML file, then `PLACEBOOK__*`
//! environment variables (`PLACEBOOK__AUTH__TOKEN_TTL_SECS=600`).

use placebook_core::errors::{ExError, ExErrorKind, Result};
use placebook_core::geocode::DEFAULT_LOCATION;
use placebook_core::model::Location;
use placebook_core::rules::validation::MIN_PASSWORD_LEN;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "PLACEBOOK";

/// Secret used when none is configured; only suitable for local development
pub const DEV_TOKEN_SECRET: &str = "placebook-dev-secret-change-me";

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub database: DatabaseConfig,
    pub assets: AssetsConfig,
    pub auth: AuthConfig,
    pub geocoding: GeocodingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    pub root: PathBuf,
    pub allowed_mime_types: Vec<String>,
    pub max_bytes: usize,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub token_secret: String,
    pub token_ttl_secs: i64,
    pub min_password_len: usize,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"***REDACTED***")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("min_password_len", &self.min_password_len)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingConfig {
    /// No key means geocoding is disabled and the fallback is always used
    pub api_key: Option<String>,
    pub endpoint: String,
    pub fallback_lat: f64,
    pub fallback_lng: f64,
}

impl GeocodingConfig {
    pub fn fallback(&self) -> Location {
        Location::new(self.fallback_lat, self.fallback_lng)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub profile: String,
}

fn config_error(err: config::ConfigError) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_config")
        .with_message(format!("Invalid configuration: {}", err))
}

impl EngineConfig {
    /// Load configuration; `file` is optional and may be absent on disk
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::defaults()?;
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("assets.allowed_mime_types")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .and_then(|c| c.try_deserialize::<EngineConfig>())
            .map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults only, no file or environment
    pub fn from_defaults() -> Result<Self> {
        let config = Self::defaults()?
            .build()
            .and_then(|c| c.try_deserialize::<EngineConfig>())
            .map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        config::Config::builder()
            .set_default("database.path", ".placebook/placebook.db")
            .and_then(|b| b.set_default("assets.root", ".placebook/uploads/images"))
            .and_then(|b| {
                b.set_default(
                    "assets.allowed_mime_types",
                    vec!["image/png", "image/jpeg", "image/jpg"],
                )
            })
            .and_then(|b| b.set_default("assets.max_bytes", 500_000_i64))
            .and_then(|b| b.set_default("auth.token_secret", DEV_TOKEN_SECRET))
            .and_then(|b| b.set_default("auth.token_ttl_secs", 3600_i64))
            .and_then(|b| b.set_default("auth.min_password_len", MIN_PASSWORD_LEN as i64))
            .and_then(|b| b.set_default("auth.argon2_memory_kib", 19_456_i64))
            .and_then(|b| b.set_default("auth.argon2_iterations", 2_i64))
            .and_then(|b| {
                b.set_default(
                    "geocoding.endpoint",
                    "https://maps.googleapis.com/maps/api/geocode/json",
                )
            })
            .and_then(|b| b.set_default("geocoding.fallback_lat", DEFAULT_LOCATION.lat))
            .and_then(|b| b.set_default("geocoding.fallback_lng", DEFAULT_LOCATION.lng))
            .and_then(|b| b.set_default("logging.profile", "development"))
            .map_err(config_error)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |message: &str| {
            Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_config")
                .with_message(message.to_string()))
        };

        if self.auth.token_secret.trim().is_empty() {
            return invalid("auth.token_secret must not be empty");
        }
        if self.auth.token_ttl_secs <= 0 {
            return invalid("auth.token_ttl_secs must be positive");
        }
        if self.assets.allowed_mime_types.is_empty() {
            return invalid("assets.allowed_mime_types must list at least one type");
        }
        if !self.geocoding.fallback().is_valid() {
            return invalid("geocoding fallback coordinate is out of range");
        }
        if self.logging.profile.parse::<placebook_core::logging_facility::Profile>().is_err() {
            return invalid("logging.profile must be 'development' or 'production'");
        }
        Ok(())
    }

    /// Whether the built-in development secret is still in use
    pub fn uses_dev_secret(&self) -> bool {
        self.auth.token_secret == DEV_TOKEN_SECRET
    }
}
