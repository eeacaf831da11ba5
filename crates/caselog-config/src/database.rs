//! Local libSQL database configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".caselog/caselog.db".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path of the database file, relative to the working directory unless
    /// absolute.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub fn path_buf(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_project_local() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path_buf(), PathBuf::from(".caselog/caselog.db"));
    }
}
