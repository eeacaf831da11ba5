//! Field diffing between a prior case snapshot and a requested patch.
//!
//! The result lists one [`FieldChange`] per changed top-level field, except
//! tags which may produce an added and a removed change. Changes are emitted
//! in [`UserActionField::CANONICAL_ORDER`], which is also the order of the
//! user actions appended for the patch.

use std::collections::HashSet;

use crate::audit::serialize;
use crate::entities::Case;
use crate::enums::UserActionField;
use crate::errors::CoreError;
use crate::updates::case::CasePatch;

/// How a field changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// The whole value was replaced.
    Update,
    /// Elements were added to a collection field.
    CollectionAdd,
    /// Elements were removed from a collection field.
    CollectionDelete,
}

/// One detected change with its captured values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: UserActionField,
    pub kind: ChangeKind,
    /// `None` for collection deltas.
    pub old_value: Option<String>,
    pub new_value: String,
}

impl FieldChange {
    fn update(field: UserActionField, old_value: String, new_value: String) -> Self {
        Self {
            field,
            kind: ChangeKind::Update,
            old_value: Some(old_value),
            new_value,
        }
    }
}

/// Diff `patch` against `prior`.
///
/// # Errors
///
/// - `CoreError::Conflict` if the patch targets another case or a version
///   other than the prior snapshot's. Nothing is diffed in that case.
/// - `CoreError::Validation` if the patch is malformed.
/// - `CoreError::Serialization` if a structured value cannot be captured.
pub fn diff_case(prior: &Case, patch: &CasePatch) -> Result<Vec<FieldChange>, CoreError> {
    if patch.id != prior.id || patch.version != prior.version {
        return Err(CoreError::conflict(
            "case",
            &patch.id,
            patch.version,
            prior.version,
        ));
    }
    patch.validate()?;

    let mut changes = Vec::new();
    for field in UserActionField::CANONICAL_ORDER {
        diff_field(field, prior, patch, &mut changes)?;
    }
    Ok(changes)
}

fn diff_field(
    field: UserActionField,
    prior: &Case,
    patch: &CasePatch,
    changes: &mut Vec<FieldChange>,
) -> Result<(), CoreError> {
    match field {
        UserActionField::Status => {
            if let Some(status) = patch.status.filter(|s| *s != prior.status) {
                changes.push(FieldChange::update(
                    field,
                    serialize::scalar(prior.status.as_str()),
                    serialize::scalar(status.as_str()),
                ));
            }
        }
        UserActionField::Title => {
            if let Some(title) = patch.title.as_ref().filter(|t| **t != prior.title) {
                changes.push(FieldChange::update(
                    field,
                    serialize::scalar(&prior.title),
                    serialize::scalar(title),
                ));
            }
        }
        UserActionField::Description => {
            if let Some(description) = patch
                .description
                .as_ref()
                .filter(|d| **d != prior.description)
            {
                changes.push(FieldChange::update(
                    field,
                    serialize::scalar(&prior.description),
                    serialize::scalar(description),
                ));
            }
        }
        UserActionField::Tags => {
            if let Some(tags) = &patch.tags {
                changes.extend(diff_tags(&prior.tags, tags));
            }
        }
        UserActionField::Connector => {
            if let Some(connector) = &patch.connector {
                let old = serialize::structured(&prior.connector)?;
                let new = serialize::structured(connector)?;
                if old != new {
                    changes.push(FieldChange::update(field, old, new));
                }
            }
        }
        UserActionField::Settings => {
            if let Some(settings) = &patch.settings {
                let old = serialize::structured(&prior.settings)?;
                let new = serialize::structured(settings)?;
                if old != new {
                    changes.push(FieldChange::update(field, old, new));
                }
            }
        }
        UserActionField::Comment | UserActionField::Pushed => {
            return Err(CoreError::validation(format!(
                "field '{field}' cannot be changed through a case patch"
            )));
        }
    }
    Ok(())
}

/// Set difference between the prior and requested tags.
///
/// Added tags keep their requested order, removed tags their prior order.
/// The add change always precedes the delete change.
#[must_use]
pub fn diff_tags(prior: &[String], requested: &[String]) -> Vec<FieldChange> {
    let prior_set: HashSet<&str> = prior.iter().map(String::as_str).collect();
    let requested_set: HashSet<&str> = requested.iter().map(String::as_str).collect();

    let added: Vec<&str> = requested
        .iter()
        .map(String::as_str)
        .filter(|tag| !prior_set.contains(tag))
        .collect();
    let removed: Vec<&str> = prior
        .iter()
        .map(String::as_str)
        .filter(|tag| !requested_set.contains(tag))
        .collect();

    let mut changes = Vec::with_capacity(2);
    if !added.is_empty() {
        changes.push(FieldChange {
            field: UserActionField::Tags,
            kind: ChangeKind::CollectionAdd,
            old_value: None,
            new_value: serialize::delta(added),
        });
    }
    if !removed.is_empty() {
        changes.push(FieldChange {
            field: UserActionField::Tags,
            kind: ChangeKind::CollectionDelete,
            old_value: None,
            new_value: serialize::delta(removed),
        });
    }
    changes
}
