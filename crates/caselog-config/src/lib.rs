//! # caselog-config
//!
//! Layered configuration loading for caselog using figment.
//!
//! Layers, later ones overriding earlier ones:
//! 1. Environment variables (`CASELOG_*` prefix, `__` as separator)
//! 2. Project-level `.caselog/config.toml`
//! 3. User-level `~/.config/caselog/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CASELOG_DATABASE__PATH` -> `database.path`,
//! `CASELOG_ACTOR__USERNAME` -> `actor.username`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use caselog_config::CaseConfig;
//!
//! let config = CaseConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod actor;
mod database;
mod error;
mod general;

pub use actor::ActorConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory holding project-local state (config and the default database).
pub const PROJECT_DIR: &str = ".caselog";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CaseConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub actor: ActorConfig,
}

impl CaseConfig {
    /// Extract and check the merged layers.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed, or
    /// `ConfigError::InvalidValue` if a loaded value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is not an error.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("CASELOG_").split("__"))
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        self.general.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("caselog").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CaseConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.actor.is_configured());
    }

    #[test]
    fn empty_database_path_is_invalid() {
        let mut config = CaseConfig::default();
        config.database.path = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "database.path"
        ));
    }
}
