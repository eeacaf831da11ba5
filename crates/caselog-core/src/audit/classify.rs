//! Mapping of detected changes and structural events to user actions.
//!
//! Field changes come from [`crate::audit::diff`]. Structural events
//! (creation, comments, pushes) bypass the diff and map directly to a single
//! action each.

use crate::audit::diff::{ChangeKind, FieldChange};
use crate::audit::serialize;
use crate::entities::{Comment, ExternalService, NewUserAction};
use crate::enums::{UserActionField, UserActionKind};
use crate::errors::CoreError;
use crate::requests::CaseCreate;
use crate::updates::comment::CommentPatch;

/// A change to a case that is recorded without diffing.
#[derive(Debug, Clone, Copy)]
pub enum CaseEvent<'a> {
    CaseCreated {
        request: &'a CaseCreate,
    },
    CommentCreated {
        comment: &'a Comment,
    },
    /// `prior` is the comment as stored before the edit.
    CommentUpdated {
        prior: &'a Comment,
        patch: &'a CommentPatch,
    },
    CommentDeleted {
        prior: &'a Comment,
    },
    Pushed {
        external_service: &'a ExternalService,
    },
}

#[must_use]
pub const fn action_kind(kind: ChangeKind) -> UserActionKind {
    match kind {
        ChangeKind::Update => UserActionKind::Update,
        ChangeKind::CollectionAdd => UserActionKind::Add,
        ChangeKind::CollectionDelete => UserActionKind::Delete,
    }
}

#[must_use]
pub fn classify_change(case_id: &str, change: FieldChange) -> NewUserAction {
    NewUserAction {
        case_id: case_id.to_string(),
        comment_id: None,
        action: action_kind(change.kind),
        action_field: vec![change.field],
        old_value: change.old_value,
        new_value: Some(change.new_value),
    }
}

/// Classify a diff, keeping its order.
#[must_use]
pub fn classify_changes(case_id: &str, changes: Vec<FieldChange>) -> Vec<NewUserAction> {
    changes
        .into_iter()
        .map(|change| classify_change(case_id, change))
        .collect()
}

/// Classify a structural event into its single user action.
///
/// A comment edit captures the full prior content as the old value and only
/// the submitted patch fields as the new value.
///
/// # Errors
///
/// - `CoreError::Validation` if a comment belongs to another case or the
///   edit does not apply to the prior content.
/// - `CoreError::Conflict` if a comment edit targets another comment or a
///   stale version.
/// - `CoreError::Serialization` if a payload cannot be captured.
pub fn classify_event(case_id: &str, event: CaseEvent<'_>) -> Result<NewUserAction, CoreError> {
    match event {
        CaseEvent::CaseCreated { request } => Ok(NewUserAction {
            case_id: case_id.to_string(),
            comment_id: None,
            action: UserActionKind::Create,
            action_field: UserActionField::CREATE_FIELDS.to_vec(),
            old_value: None,
            new_value: Some(serialize::structured(request)?),
        }),
        CaseEvent::CommentCreated { comment } => {
            ensure_same_case(case_id, comment)?;
            Ok(comment_action(
                comment,
                UserActionKind::Create,
                None,
                Some(serialize::structured(&comment.content)?),
            ))
        }
        CaseEvent::CommentUpdated { prior, patch } => {
            ensure_same_case(case_id, prior)?;
            if patch.id != prior.id || patch.version != prior.version {
                return Err(CoreError::conflict(
                    "comment",
                    &patch.id,
                    patch.version,
                    prior.version,
                ));
            }
            patch.apply_to(&prior.content)?;
            Ok(comment_action(
                prior,
                UserActionKind::Update,
                Some(serialize::structured(&prior.content)?),
                Some(serialize::structured(&patch.changes())?),
            ))
        }
        CaseEvent::CommentDeleted { prior } => {
            ensure_same_case(case_id, prior)?;
            Ok(comment_action(
                prior,
                UserActionKind::Delete,
                Some(serialize::structured(&prior.content)?),
                None,
            ))
        }
        CaseEvent::Pushed { external_service } => Ok(NewUserAction {
            case_id: case_id.to_string(),
            comment_id: None,
            action: UserActionKind::PushToService,
            action_field: vec![UserActionField::Pushed],
            old_value: None,
            new_value: Some(serialize::structured(external_service)?),
        }),
    }
}

fn ensure_same_case(case_id: &str, comment: &Comment) -> Result<(), CoreError> {
    if comment.case_id == case_id {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "comment {} belongs to case {}, not {case_id}",
            comment.id, comment.case_id
        )))
    }
}

fn comment_action(
    comment: &Comment,
    action: UserActionKind,
    old_value: Option<String>,
    new_value: Option<String>,
) -> NewUserAction {
    NewUserAction {
        case_id: comment.case_id.clone(),
        comment_id: Some(comment.id.clone()),
        action,
        action_field: vec![UserActionField::Comment],
        old_value,
        new_value,
    }
}
