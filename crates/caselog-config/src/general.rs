//! General application configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

fn default_log_level() -> String {
    "warn".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Tracing level used when `CASELOG_LOG` is unset and no verbosity flag
    /// is given.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl GeneralConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `log_level` is not a tracing level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if LOG_LEVELS.contains(&self.log_level.as_str()) {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field: "general.log_level".into(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            })
        }
    }
}
