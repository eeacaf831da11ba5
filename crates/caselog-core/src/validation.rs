//! Request validation shared by case creation, case patches and comments.
//!
//! Every check returns `CoreError::Validation`; nothing here touches storage.

use std::collections::HashSet;

use crate::entities::{CommentContent, ConnectorRef};
use crate::errors::CoreError;

/// Longest accepted case title, in characters.
pub const MAX_TITLE_LENGTH: usize = 64;

/// # Errors
///
/// Returns `CoreError::Validation` if the title is blank or longer than
/// [`MAX_TITLE_LENGTH`] characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::validation("title must not be empty"));
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(CoreError::validation(format!(
            "title is {len} characters, the maximum is {MAX_TITLE_LENGTH}"
        )));
    }
    Ok(())
}

/// Tags form an ordered set: no blank entries, no duplicates.
///
/// # Errors
///
/// Returns `CoreError::Validation` on the first offending tag.
pub fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(tags.len());
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(CoreError::validation("tags must not be blank"));
        }
        if !seen.insert(tag.as_str()) {
            return Err(CoreError::validation(format!("duplicate tag '{tag}'")));
        }
    }
    Ok(())
}

/// Check the connector's `fields` against what its type accepts.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the id is empty, a `.none` connector
/// carries fields, a field key is not accepted by the connector type, or a
/// field value is a nested object.
pub fn validate_connector(connector: &ConnectorRef) -> Result<(), CoreError> {
    if connector.id.trim().is_empty() {
        return Err(CoreError::validation("connector id must not be empty"));
    }
    let Some(fields) = &connector.fields else {
        return Ok(());
    };
    if connector.is_none() {
        return Err(CoreError::validation(
            "connector of type .none must have null fields",
        ));
    }
    let allowed = connector.connector_type.allowed_fields();
    if let Some(key) = fields.keys().find(|key| !allowed.contains(&key.as_str())) {
        return Err(CoreError::validation(format!(
            "field '{key}' is not valid for connector type {}",
            connector.connector_type
        )));
    }
    if let Some((key, _)) = fields.iter().find(|(_, value)| !is_flat(value)) {
        return Err(CoreError::validation(format!(
            "connector field '{key}' must be a scalar or a list of scalars"
        )));
    }
    Ok(())
}

fn is_flat(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Object(_) => false,
        serde_json::Value::Array(items) => items
            .iter()
            .all(|item| !item.is_object() && !item.is_array()),
        _ => true,
    }
}

/// # Errors
///
/// Returns `CoreError::Validation` if the comment text or alert reference is
/// blank.
pub fn validate_comment_content(content: &CommentContent) -> Result<(), CoreError> {
    match content {
        CommentContent::User { comment } if comment.trim().is_empty() => {
            Err(CoreError::validation("comment must not be empty"))
        }
        CommentContent::Alert { alert_id, index }
            if alert_id.trim().is_empty() || index.trim().is_empty() =>
        {
            Err(CoreError::validation("alert comments need an alertId and an index"))
        }
        _ => Ok(()),
    }
}
