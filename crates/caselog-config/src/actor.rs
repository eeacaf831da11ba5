//! Acting user for mutations issued from this installation.
//!
//! Authentication is handled elsewhere; the configured identity is recorded
//! verbatim as `created_by`/`updated_by`/`action_by`.

use caselog_core::identity::User;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActorConfig {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub email: String,
}

impl ActorConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.username.trim().is_empty()
    }

    /// The configured identity. Empty optional fields become `None`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` if no username is set.
    pub fn to_user(&self) -> Result<User, ConfigError> {
        if !self.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "actor".into(),
            });
        }
        Ok(User {
            username: self.username.trim().to_string(),
            full_name: non_empty(&self.full_name),
            email: non_empty(&self.email),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
