//! Text captures of field values for the audit trail.
//!
//! Three formats, chosen by the kind of value:
//! - scalars and enums are stored as their literal text;
//! - structured values are stored as compact JSON. Struct fields keep their
//!   declaration order and free-form maps keep sorted keys, so equal values
//!   always produce identical bytes;
//! - collection deltas are a human-readable `", "` join of the elements.

use serde::Serialize;

use crate::errors::CoreError;

/// Separator between elements of a collection delta.
pub const DELTA_SEPARATOR: &str = ", ";

#[must_use]
pub fn scalar(value: &str) -> String {
    value.to_string()
}

/// # Errors
///
/// Returns `CoreError::Serialization` if the value cannot be rendered as JSON.
pub fn structured<T: Serialize + ?Sized>(value: &T) -> Result<String, CoreError> {
    Ok(serde_json::to_string(value)?)
}

#[must_use]
pub fn delta<'a, I>(elements: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    elements.into_iter().collect::<Vec<_>>().join(DELTA_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ConnectorRef;
    use crate::enums::ConnectorType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn scalar_is_literal() {
        assert_eq!(scalar("closed"), "closed");
    }

    #[test]
    fn delta_joins_with_comma_space() {
        assert_eq!(delta(["cool", "neat"]), "cool, neat");
        assert_eq!(delta(["only"]), "only");
        assert_eq!(delta(std::iter::empty()), "");
    }

    #[test]
    fn equal_connectors_serialize_identically() {
        let a: ConnectorRef = serde_json::from_value(json!({
            "id": "123",
            "name": "Connector",
            "type": ".jira",
            "fields": {"priority": "High", "issueType": "Task", "parent": null}
        }))
        .unwrap();
        let b: ConnectorRef = serde_json::from_value(json!({
            "fields": {"parent": null, "issueType": "Task", "priority": "High"},
            "type": ".jira",
            "name": "Connector",
            "id": "123"
        }))
        .unwrap();
        assert_eq!(structured(&a).unwrap(), structured(&b).unwrap());
        assert_eq!(
            structured(&a).unwrap(),
            r#"{"id":"123","name":"Connector","type":".jira","fields":{"issueType":"Task","parent":null,"priority":"High"}}"#
        );
        assert_eq!(a.connector_type, ConnectorType::Jira);
    }
}
