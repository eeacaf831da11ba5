use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::identity::User;

/// Metadata recorded when a case is pushed to an external system.
///
/// Stored on the case and captured as the `new_value` of the
/// `push-to-service` user action.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExternalService {
    pub pushed_at: DateTime<Utc>,
    pub pushed_by: User,
    pub connector_id: String,
    pub connector_name: String,
    pub external_id: String,
    pub external_title: String,
    pub external_url: String,
}
