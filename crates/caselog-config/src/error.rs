//! Errors raised while loading or checking caselog settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read or did not match the expected shape.
    #[error("failed to load caselog config: {0}")]
    Figment(#[from] figment::Error),

    /// The section is present but lacks the fields needed to use it.
    #[error("[{section}] is not set up; run `caselog init` or set CASELOG_{}__* variables", section.to_uppercase())]
    NotConfigured { section: String },

    #[error("bad value for `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },
}
