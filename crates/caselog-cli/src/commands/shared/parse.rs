use caselog_core::entities::ConnectorRef;
use caselog_core::errors::CoreError;
use serde::de::DeserializeOwned;

/// Parse an enum value using serde-deserialization.
///
/// Accepts the kebab-case wire form as well as snake_case spellings.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('_', "-");
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .or_else(|_| serde_json::from_value(serde_json::Value::String(normalized)))
        .map_err(|error| CoreError::Validation(format!("invalid {field} '{raw}': {error}")).into())
}

/// Parse a `--connector` JSON argument.
pub fn parse_connector(raw: &str) -> anyhow::Result<ConnectorRef> {
    serde_json::from_str(raw)
        .map_err(|error| CoreError::Validation(format!("invalid connector JSON: {error}")).into())
}

#[cfg(test)]
mod tests {
    use caselog_core::enums::{CaseStatus, CommentType, ConnectorType};
    use caselog_core::errors::CoreError;

    use super::{parse_connector, parse_enum};

    #[test]
    fn parses_kebab_case_enum() {
        let status: CaseStatus = parse_enum("in-progress", "status").expect("status should parse");
        assert_eq!(status, CaseStatus::InProgress);
    }

    #[test]
    fn parses_underscore_alias() {
        let status: CaseStatus = parse_enum("in_progress", "status").expect("status should parse");
        assert_eq!(status, CaseStatus::InProgress);
        let kind: CommentType = parse_enum("alert", "type").expect("type should parse");
        assert_eq!(kind, CommentType::Alert);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<CaseStatus>("done", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'done'"));
        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation(_))));
    }

    #[test]
    fn parses_connector_json() {
        let connector = parse_connector(
            r#"{"id":"123","name":"Jira","type":".jira","fields":{"issueType":"Task"}}"#,
        )
        .expect("connector should parse");
        assert_eq!(connector.connector_type, ConnectorType::Jira);
        let err = parse_connector(r#"{"id":"123"}"#).expect_err("incomplete connector");
        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation(_))));
    }
}
