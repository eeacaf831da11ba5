use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{UserActionField, UserActionKind};
use crate::identity::User;

/// An immutable audit trail entry.
///
/// `seq` is the record's committed position within its case, starting at 0
/// for the `create` action. Records are never updated once appended.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserAction {
    pub action_id: String,
    pub case_id: String,
    pub comment_id: Option<String>,
    pub seq: u64,
    pub action: UserActionKind,
    pub action_field: Vec<UserActionField>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub action_by: User,
    pub action_at: DateTime<Utc>,
}

/// A classified change waiting to be appended.
///
/// The store assigns id, position, actor and timestamp at append time.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewUserAction {
    pub case_id: String,
    pub comment_id: Option<String>,
    pub action: UserActionKind,
    pub action_field: Vec<UserActionField>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl NewUserAction {
    #[must_use]
    pub fn into_user_action(
        self,
        action_id: String,
        seq: u64,
        action_by: User,
        action_at: DateTime<Utc>,
    ) -> UserAction {
        UserAction {
            action_id,
            case_id: self.case_id,
            comment_id: self.comment_id,
            seq,
            action: self.action,
            action_field: self.action_field,
            old_value: self.old_value,
            new_value: self.new_value,
            action_by,
            action_at,
        }
    }
}
