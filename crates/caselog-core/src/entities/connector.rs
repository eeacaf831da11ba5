use schemars::JsonSchema;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::enums::ConnectorType;

/// Reference to the external connector a case pushes to.
///
/// `fields` holds the connector-type-specific settings. Keys are kept sorted
/// and values are flat (see `validate_connector`), so two equal connectors
/// always serialize to the same bytes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConnectorRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub connector_type: ConnectorType,
    #[serde(default)]
    pub fields: Option<BTreeMap<String, Value>>,
}

impl ConnectorRef {
    /// The "no connector configured" value. It is an ordinary connector that
    /// participates in comparisons like any other.
    #[must_use]
    pub fn none() -> Self {
        Self {
            id: "none".to_string(),
            name: "none".to_string(),
            connector_type: ConnectorType::None,
            fields: None,
        }
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.connector_type == ConnectorType::None
    }
}

impl Default for ConnectorRef {
    fn default() -> Self {
        Self::none()
    }
}
