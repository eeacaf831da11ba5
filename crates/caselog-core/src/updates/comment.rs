//! Comment patch and builder.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::CommentContent;
use crate::enums::CommentType;
use crate::errors::CoreError;
use crate::validation::validate_comment_content;

/// A comment edit. Only the `Some` fields were submitted by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CommentPatch {
    pub id: String,
    pub version: u64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub comment_type: Option<CommentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "alertId", default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

/// The submitted portion of a [`CommentPatch`], without id and version.
///
/// This is what the comment `update` user action captures as its new value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CommentChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "alertId", default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub comment_type: Option<CommentType>,
}

impl CommentPatch {
    #[must_use]
    pub fn changes(&self) -> CommentChanges {
        CommentChanges {
            comment_type: self.comment_type,
            comment: self.comment.clone(),
            alert_id: self.alert_id.clone(),
            index: self.index.clone(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.comment_type.is_none()
            && self.comment.is_none()
            && self.alert_id.is_none()
            && self.index.is_none()
    }

    /// Merge the patch into the prior content.
    ///
    /// The target type is the submitted `type`, or the prior type when none
    /// was submitted. Switching type requires every field of the new type.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the patch is empty, carries fields
    /// that do not belong to the target type, or leaves the content incomplete.
    pub fn apply_to(&self, prior: &CommentContent) -> Result<CommentContent, CoreError> {
        if self.is_empty() {
            return Err(CoreError::validation("comment patch has no fields to update"));
        }
        let target = self.comment_type.unwrap_or_else(|| prior.comment_type());
        let next = match target {
            CommentType::User => {
                if self.alert_id.is_some() || self.index.is_some() {
                    return Err(CoreError::validation(
                        "alertId and index are not valid on a user comment",
                    ));
                }
                let comment = match (&self.comment, prior) {
                    (Some(comment), _) => comment.clone(),
                    (None, CommentContent::User { comment }) => comment.clone(),
                    (None, CommentContent::Alert { .. }) => {
                        return Err(CoreError::validation(
                            "changing a comment to type user requires comment text",
                        ));
                    }
                };
                CommentContent::User { comment }
            }
            CommentType::Alert => {
                if self.comment.is_some() {
                    return Err(CoreError::validation(
                        "comment text is not valid on an alert comment",
                    ));
                }
                let (prior_alert, prior_index) = match prior {
                    CommentContent::Alert { alert_id, index } => (Some(alert_id), Some(index)),
                    CommentContent::User { .. } => (None, None),
                };
                let alert_id = self.alert_id.as_ref().or(prior_alert).cloned();
                let index = self.index.as_ref().or(prior_index).cloned();
                let (Some(alert_id), Some(index)) = (alert_id, index) else {
                    return Err(CoreError::validation(
                        "changing a comment to type alert requires alertId and index",
                    ));
                };
                CommentContent::Alert { alert_id, index }
            }
        };
        validate_comment_content(&next)?;
        Ok(next)
    }
}

pub struct CommentPatchBuilder(CommentPatch);

impl CommentPatchBuilder {
    #[must_use]
    pub fn new(id: impl Into<String>, version: u64) -> Self {
        Self(CommentPatch {
            id: id.into(),
            version,
            ..CommentPatch::default()
        })
    }

    #[must_use]
    pub const fn comment_type(mut self, comment_type: CommentType) -> Self {
        self.0.comment_type = Some(comment_type);
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.0.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn alert(mut self, alert_id: impl Into<String>, index: impl Into<String>) -> Self {
        self.0.alert_id = Some(alert_id.into());
        self.0.index = Some(index.into());
        self
    }

    #[must_use]
    pub fn build(self) -> CommentPatch {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_comment() -> CommentContent {
        CommentContent::User {
            comment: "This is a cool comment".into(),
        }
    }

    #[test]
    fn text_edit_keeps_type() {
        let patch = CommentPatchBuilder::new("cmt-1", 1).comment("edited").build();
        let next = patch.apply_to(&user_comment()).unwrap();
        assert_eq!(next, CommentContent::User { comment: "edited".into() });
    }

    #[test]
    fn empty_patch_is_rejected() {
        let patch = CommentPatchBuilder::new("cmt-1", 1).build();
        assert!(matches!(
            patch.apply_to(&user_comment()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn switch_to_alert_needs_alert_fields() {
        let incomplete = CommentPatchBuilder::new("cmt-1", 1)
            .comment_type(CommentType::Alert)
            .build();
        assert!(incomplete.apply_to(&user_comment()).is_err());

        let complete = CommentPatchBuilder::new("cmt-1", 1)
            .comment_type(CommentType::Alert)
            .alert("alert-1", ".siem-signals")
            .build();
        assert_eq!(
            complete.apply_to(&user_comment()).unwrap(),
            CommentContent::Alert {
                alert_id: "alert-1".into(),
                index: ".siem-signals".into(),
            }
        );
    }

    #[test]
    fn foreign_fields_are_rejected() {
        let patch = CommentPatchBuilder::new("cmt-1", 1)
            .alert("alert-1", "idx")
            .build();
        assert!(patch.apply_to(&user_comment()).is_err());
    }

    #[test]
    fn changes_omit_id_and_version() {
        let patch = CommentPatchBuilder::new("cmt-1", 4)
            .comment("new text")
            .comment_type(CommentType::User)
            .build();
        let json = serde_json::to_string(&patch.changes()).unwrap();
        assert_eq!(json, r#"{"comment":"new text","type":"user"}"#);
    }
}
