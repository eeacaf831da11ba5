//! Comment repository.
//!
//! Comments are children of a case: every comment mutation also bumps the
//! case version and is recorded in the case's user actions.

use chrono::Utc;
use libsql::Connection;

use caselog_core::audit::{CaseEvent, classify_event};
use caselog_core::entities::{Comment, CommentContent};
use caselog_core::identity::User;
use caselog_core::ids::PREFIX_COMMENT;
use caselog_core::updates::comment::CommentPatch;
use caselog_core::validation::validate_comment_content;

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_json, parse_optional_datetime, parse_optional_json,
    to_i64, to_json, to_u64,
};
use crate::repos::case::{get_case_in, touched, write_case};
use crate::repos::user_action::append_user_actions;
use crate::service::CaseService;

const SELECT_COLS: &str =
    "id, case_id, version, content, created_at, created_by, updated_at, updated_by";

fn row_to_comment(row: &libsql::Row) -> Result<Comment, DatabaseError> {
    Ok(Comment {
        id: row.get(0)?,
        case_id: row.get(1)?,
        version: to_u64(row.get::<i64>(2)?, "version")?,
        content: parse_json(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        created_by: parse_json(&row.get::<String>(5)?)?,
        updated_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        updated_by: parse_optional_json(get_opt_string(row, 7)?.as_deref())?,
    })
}

/// Fetch a comment, treating a comment of another case as missing.
async fn get_comment_in(
    conn: &Connection,
    case_id: &str,
    comment_id: &str,
) -> Result<Comment, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM comments WHERE id = ?1 AND case_id = ?2"),
            [comment_id, case_id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("comment", comment_id))?;
    row_to_comment(&row)
}

/// Bump the parent case for a comment change; returns the new case version.
async fn touch_case(
    conn: &Connection,
    case_id: &str,
    user: &User,
    now: chrono::DateTime<Utc>,
) -> Result<u64, DatabaseError> {
    let prior = get_case_in(conn, case_id).await?;
    let next = touched(&prior, user, now);
    write_case(conn, &next, prior.version).await?;
    Ok(next.version)
}

impl CaseService {
    /// Attach a comment to a case.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the case does not exist, or `Validation` for
    /// empty content.
    pub async fn create_comment(
        &self,
        case_id: &str,
        content: CommentContent,
        user: &User,
    ) -> Result<Comment, DatabaseError> {
        validate_comment_content(&content)?;
        let _section = self.locks().acquire(case_id).await;
        let now = Utc::now();

        let tx = self.db().begin().await?;
        let result: Result<_, DatabaseError> = async {
            let case_version = touch_case(&tx, case_id, user, now).await?;
            let comment = Comment {
                id: generate_id(&tx, PREFIX_COMMENT).await?,
                case_id: case_id.to_string(),
                version: 1,
                content,
                created_at: now,
                created_by: user.clone(),
                updated_at: None,
                updated_by: None,
            };
            tx.execute(
                "INSERT INTO comments (id, case_id, version, type, content, created_at, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    comment.id.as_str(),
                    case_id,
                    1_i64,
                    comment.content.comment_type().as_str(),
                    to_json(&comment.content)?,
                    now.to_rfc3339(),
                    to_json(user)?
                ],
            )
            .await?;
            let draft = classify_event(case_id, CaseEvent::CommentCreated { comment: &comment })?;
            append_user_actions(&tx, case_id, vec![draft], Some(case_version), user, now).await?;
            Ok(comment)
        }
        .await;
        let comment = tx.finish(result).await?;

        tracing::info!(case_id, comment_id = %comment.id, "comment created");
        Ok(comment)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the comment does not exist on this case.
    pub async fn get_comment(&self, case_id: &str, comment_id: &str) -> Result<Comment, DatabaseError> {
        let conn = self.db().conn().await;
        get_comment_in(&conn, case_id, comment_id).await
    }

    /// Comments of a case, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_comments(&self, case_id: &str) -> Result<Vec<Comment>, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM comments WHERE case_id = ?1 ORDER BY created_at, rowid"
                ),
                [case_id],
            )
            .await?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next().await? {
            comments.push(row_to_comment(&row)?);
        }
        Ok(comments)
    }

    /// Apply a version-checked comment edit.
    ///
    /// The user action keeps the full prior content as its old value and only
    /// the submitted patch fields as its new value.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the comment does not exist on this case.
    /// - `Conflict` if `patch.version` is not the stored version.
    /// - `Validation` if the patch is empty or does not fit the comment type.
    pub async fn update_comment(
        &self,
        case_id: &str,
        patch: &CommentPatch,
        user: &User,
    ) -> Result<Comment, DatabaseError> {
        let _section = self.locks().acquire(case_id).await;
        let now = Utc::now();

        let tx = self.db().begin().await?;
        let result: Result<_, DatabaseError> = async {
            let prior = get_comment_in(&tx, case_id, &patch.id).await?;
            let draft = classify_event(
                case_id,
                CaseEvent::CommentUpdated {
                    prior: &prior,
                    patch,
                },
            )?;
            let content = patch.apply_to(&prior.content)?;
            let next = Comment {
                version: prior.version + 1,
                content,
                updated_at: Some(now),
                updated_by: Some(user.clone()),
                ..prior.clone()
            };
            let changed = tx
                .execute(
                    "UPDATE comments SET version = ?1, type = ?2, content = ?3, updated_at = ?4, updated_by = ?5
                     WHERE id = ?6 AND version = ?7",
                    libsql::params![
                        to_i64(next.version, "version")?,
                        next.content.comment_type().as_str(),
                        to_json(&next.content)?,
                        now.to_rfc3339(),
                        to_json(user)?,
                        next.id.as_str(),
                        to_i64(prior.version, "version")?
                    ],
                )
                .await?;
            if changed == 0 {
                return Err(DatabaseError::InvalidState(format!(
                    "comment {} changed under an exclusive section",
                    next.id
                )));
            }
            let case_version = touch_case(&tx, case_id, user, now).await?;
            append_user_actions(&tx, case_id, vec![draft], Some(case_version), user, now).await?;
            Ok(next)
        }
        .await;

        match tx.finish(result).await {
            Ok(comment) => {
                tracing::info!(case_id, comment_id = %comment.id, version = comment.version, "comment updated");
                Ok(comment)
            }
            Err(error) => {
                tracing::warn!(case_id, comment_id = %patch.id, %error, "comment update rejected");
                Err(error)
            }
        }
    }

    /// Remove a comment. Its history stays in the case's user actions.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the comment does not exist on this case.
    pub async fn delete_comment(
        &self,
        case_id: &str,
        comment_id: &str,
        user: &User,
    ) -> Result<(), DatabaseError> {
        let _section = self.locks().acquire(case_id).await;
        let now = Utc::now();

        let tx = self.db().begin().await?;
        let result: Result<_, DatabaseError> = async {
            let prior = get_comment_in(&tx, case_id, comment_id).await?;
            let draft = classify_event(case_id, CaseEvent::CommentDeleted { prior: &prior })?;
            tx.execute("DELETE FROM comments WHERE id = ?1", [comment_id])
                .await?;
            let case_version = touch_case(&tx, case_id, user, now).await?;
            append_user_actions(&tx, case_id, vec![draft], Some(case_version), user, now).await?;
            Ok(())
        }
        .await;
        tx.finish(result).await?;

        tracing::info!(case_id, comment_id, "comment deleted");
        Ok(())
    }
}
