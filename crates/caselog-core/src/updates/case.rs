//! Case patch and builder.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Case, CaseSettings, ConnectorRef};
use crate::enums::CaseStatus;
use crate::errors::CoreError;
use crate::identity::User;
use crate::validation::{validate_connector, validate_tags, validate_title};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CasePatch {
    pub id: String,
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector: Option<ConnectorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<CaseSettings>,
}

impl CasePatch {
    /// Parse a patch from loosely typed JSON.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for unknown fields or ill-typed values.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value)
            .map_err(|e| CoreError::validation(format!("malformed case patch: {e}")))
    }

    /// Whether the patch requests no change at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.connector.is_none()
            && self.settings.is_none()
    }

    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a bad title, tag set or connector.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::validation("case patch needs an id"));
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        if let Some(connector) = &self.connector {
            validate_connector(connector)?;
        }
        Ok(())
    }

    /// Produce the next snapshot of `prior` with this patch applied.
    ///
    /// Bumps the version and stamps `updated_*`. Moving into `closed` records
    /// the closure; moving out of it clears the closure.
    #[must_use]
    pub fn apply_to(&self, prior: &Case, user: &User, now: DateTime<Utc>) -> Case {
        let mut next = prior.clone();
        next.version = prior.version + 1;
        next.updated_at = Some(now);
        next.updated_by = Some(user.clone());

        if let Some(status) = self.status {
            next.status = status;
            match (prior.status, status) {
                (CaseStatus::Closed, CaseStatus::Closed) => {}
                (_, CaseStatus::Closed) => {
                    next.closed_at = Some(now);
                    next.closed_by = Some(user.clone());
                }
                _ => {
                    next.closed_at = None;
                    next.closed_by = None;
                }
            }
        }
        if let Some(title) = &self.title {
            next.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            next.description.clone_from(description);
        }
        if let Some(tags) = &self.tags {
            next.tags.clone_from(tags);
        }
        if let Some(connector) = &self.connector {
            next.connector = connector.clone();
        }
        if let Some(settings) = self.settings {
            next.settings = settings;
        }
        next
    }
}

pub struct CasePatchBuilder(CasePatch);

impl CasePatchBuilder {
    #[must_use]
    pub fn new(id: impl Into<String>, version: u64) -> Self {
        Self(CasePatch {
            id: id.into(),
            version,
            ..CasePatch::default()
        })
    }

    #[must_use]
    pub const fn status(mut self, status: CaseStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn connector(mut self, connector: ConnectorRef) -> Self {
        self.0.connector = Some(connector);
        self
    }

    #[must_use]
    pub const fn settings(mut self, settings: CaseSettings) -> Self {
        self.0.settings = Some(settings);
        self
    }

    #[must_use]
    pub fn build(self) -> CasePatch {
        self.0
    }
}
