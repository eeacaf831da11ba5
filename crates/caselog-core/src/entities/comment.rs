use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::enums::CommentType;
use crate::identity::User;

/// What a comment says, tagged by comment type.
///
/// Doubles as the comment creation request: the submitted value is what the
/// `create` user action captures. Serialized in submission order, the type
/// tag last.
#[derive(Debug, Clone, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum CommentContent {
    User {
        comment: String,
    },
    Alert {
        #[serde(rename = "alertId")]
        alert_id: String,
        index: String,
    },
}

impl CommentContent {
    #[must_use]
    pub const fn comment_type(&self) -> CommentType {
        match self {
            Self::User { .. } => CommentType::User,
            Self::Alert { .. } => CommentType::Alert,
        }
    }
}

impl Serialize for CommentContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::User { comment } => {
                let mut state = serializer.serialize_struct("CommentContent", 2)?;
                state.serialize_field("comment", comment)?;
                state.serialize_field("type", &CommentType::User)?;
                state.end()
            }
            Self::Alert { alert_id, index } => {
                let mut state = serializer.serialize_struct("CommentContent", 3)?;
                state.serialize_field("alertId", alert_id)?;
                state.serialize_field("index", index)?;
                state.serialize_field("type", &CommentType::Alert)?;
                state.end()
            }
        }
    }
}

/// A comment attached to a case.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub case_id: String,
    pub version: u64,
    pub content: CommentContent,
    pub created_at: DateTime<Utc>,
    pub created_by: User,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<User>,
}
