use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{ConnectorRef, ExternalService};
use crate::enums::CaseStatus;
use crate::identity::User;

/// Per-case settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CaseSettings {
    #[serde(rename = "syncAlerts")]
    pub sync_alerts: bool,
}

impl Default for CaseSettings {
    fn default() -> Self {
        Self { sync_alerts: true }
    }
}

/// A case record.
///
/// `version` starts at 1 and increases by one with every accepted mutation
/// (patch, comment change, push).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Case {
    pub id: String,
    pub version: u64,
    pub title: String,
    pub description: String,
    /// Ordered set: insertion order, no duplicates.
    pub tags: Vec<String>,
    pub status: CaseStatus,
    pub connector: ConnectorRef,
    pub settings: CaseSettings,
    pub owner: String,
    pub external_service: Option<ExternalService>,
    pub created_at: DateTime<Utc>,
    pub created_by: User,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<User>,
    pub closed_at: Option<DateTime<Utc>>,
    pub closed_by: Option<User>,
}
