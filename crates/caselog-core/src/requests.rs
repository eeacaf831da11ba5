//! Creation and push requests.
//!
//! These are the payloads a caller submits; the `create` and
//! `push-to-service` user actions capture them as submitted.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Case, CaseSettings, ConnectorRef, ExternalService};
use crate::enums::CaseStatus;
use crate::errors::CoreError;
use crate::identity::User;
use crate::validation::{validate_connector, validate_tags, validate_title};

/// Request to open a new case.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CaseCreate {
    pub description: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CaseStatus>,
    #[serde(default)]
    pub connector: ConnectorRef,
    #[serde(default)]
    pub settings: CaseSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl CaseCreate {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a bad title, tag set or connector.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_title(&self.title)?;
        validate_tags(&self.tags)?;
        validate_connector(&self.connector)
    }

    /// Build the first snapshot of the case (version 1).
    #[must_use]
    pub fn to_case(&self, id: String, user: &User, now: DateTime<Utc>) -> Case {
        let status = self.status.unwrap_or(CaseStatus::Open);
        let closed = status == CaseStatus::Closed;
        Case {
            id,
            version: 1,
            title: self.title.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            status,
            connector: self.connector.clone(),
            settings: self.settings,
            owner: self
                .owner
                .clone()
                .unwrap_or_else(|| user.username.clone()),
            external_service: None,
            created_at: now,
            created_by: user.clone(),
            updated_at: None,
            updated_by: None,
            closed_at: closed.then_some(now),
            closed_by: closed.then(|| user.clone()),
        }
    }
}

/// Request to push a case to its external connector.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PushRequest {
    pub connector_id: String,
    pub connector_name: String,
    pub external_id: String,
    pub external_title: String,
    pub external_url: String,
}

impl PushRequest {
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the connector or external id is empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.connector_id.trim().is_empty() {
            return Err(CoreError::validation("connector_id must not be empty"));
        }
        if self.external_id.trim().is_empty() {
            return Err(CoreError::validation("external_id must not be empty"));
        }
        Ok(())
    }

    #[must_use]
    pub fn into_external_service(self, user: &User, now: DateTime<Utc>) -> ExternalService {
        ExternalService {
            pushed_at: now,
            pushed_by: user.clone(),
            connector_id: self.connector_id,
            connector_name: self.connector_name,
            external_id: self.external_id,
            external_title: self.external_title,
            external_url: self.external_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CaseCreate {
        CaseCreate {
            description: "This is a brand new case of a bad meanie defacing data".into(),
            title: "Super Bad Security Issue".into(),
            tags: vec!["defacement".into()],
            status: None,
            connector: ConnectorRef::none(),
            settings: CaseSettings::default(),
            owner: None,
        }
    }

    #[test]
    fn to_case_starts_open_at_version_one() {
        let user = User::new("elastic");
        let case = request().to_case("cas-00000001".into(), &user, Utc::now());
        assert_eq!(case.version, 1);
        assert_eq!(case.status, CaseStatus::Open);
        assert_eq!(case.owner, "elastic");
        assert!(case.closed_at.is_none());
        assert!(case.connector.is_none());
    }

    #[test]
    fn created_closed_case_records_closure() {
        let user = User::new("elastic");
        let mut req = request();
        req.status = Some(CaseStatus::Closed);
        let case = req.to_case("cas-00000001".into(), &user, Utc::now());
        assert!(case.closed_at.is_some());
        assert_eq!(case.closed_by, Some(user));
    }

    #[test]
    fn omitted_status_is_not_serialized() {
        let json = serde_json::to_value(request()).unwrap();
        assert!(json.get("status").is_none());
        assert!(json.get("owner").is_none());
    }

    #[test]
    fn unknown_request_field_is_rejected() {
        let result = serde_json::from_str::<CaseCreate>(
            r#"{"description":"d","title":"t","tags":[],"severity":"high"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn push_requires_ids() {
        let push = PushRequest {
            connector_id: String::new(),
            connector_name: "sn".into(),
            external_id: "ext".into(),
            external_title: "INC1".into(),
            external_url: "https://example.com".into(),
        };
        assert!(push.validate().is_err());
    }
}
