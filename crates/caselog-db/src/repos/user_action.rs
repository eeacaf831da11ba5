//! User action store.
//!
//! Append-only. A batch is appended inside the caller's transaction: each
//! record receives an id, the next position for its case, the actor and the
//! timestamp. Listing returns records in position order, verbatim.

use chrono::{DateTime, Utc};
use libsql::Connection;

use caselog_core::entities::{NewUserAction, UserAction};
use caselog_core::enums::UserActionKind;
use caselog_core::errors::CoreError;
use caselog_core::identity::User;
use caselog_core::ids::PREFIX_USER_ACTION;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_json, to_i64, to_json, to_u64};
use crate::service::CaseService;

const SELECT_COLS: &str = "id, case_id, comment_id, seq, action, action_field, old_value, new_value, action_by, action_at";

fn row_to_user_action(row: &libsql::Row) -> Result<UserAction, DatabaseError> {
    Ok(UserAction {
        action_id: row.get(0)?,
        case_id: row.get(1)?,
        comment_id: get_opt_string(row, 2)?,
        seq: to_u64(row.get::<i64>(3)?, "seq")?,
        action: parse_enum(&row.get::<String>(4)?)?,
        action_field: parse_json(&row.get::<String>(5)?)?,
        old_value: row.get::<Option<String>>(6)?,
        new_value: row.get::<Option<String>>(7)?,
        action_by: parse_json(&row.get::<String>(8)?)?,
        action_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

/// Next free position in the case's log.
async fn next_seq(conn: &Connection, case_id: &str) -> Result<u64, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT COALESCE(MAX(seq) + 1, 0) FROM user_actions WHERE case_id = ?1",
            [case_id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::Query("seq lookup returned no row".into()))?;
    to_u64(row.get::<i64>(0)?, "seq")
}

/// Highest case version already recorded for `case_id`.
async fn last_case_version(conn: &Connection, case_id: &str) -> Result<Option<u64>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT MAX(case_version) FROM user_actions WHERE case_id = ?1",
            [case_id],
        )
        .await?;
    let Some(row) = rows.next().await? else {
        return Ok(None);
    };
    row.get::<Option<i64>>(0)?
        .map(|v| to_u64(v, "case_version"))
        .transpose()
}

/// Position 0 holds the case's only `create` record.
fn check_lifecycle(case_id: &str, first_seq: u64, drafts: &[NewUserAction]) -> Result<(), DatabaseError> {
    for (position, draft) in (first_seq..).zip(drafts) {
        let is_create = draft.action == UserActionKind::Create && draft.comment_id.is_none();
        if position == 0 && !is_create {
            return Err(DatabaseError::not_found("case", case_id));
        }
        if position > 0 && is_create {
            return Err(DatabaseError::Core(CoreError::Validation(format!(
                "case {case_id} already has a create record"
            ))));
        }
    }
    Ok(())
}

/// Ids are derived from the record's position, which is unique per case.
fn action_id(case_id: &str, seq: u64) -> String {
    format!("{PREFIX_USER_ACTION}-{case_id}-{seq}")
}

/// Append `drafts` for `case_id` in order.
///
/// `case_version` is the case version the batch brings the case to, when the
/// caller knows it; a version at or below one already recorded is a replay
/// of an audited transition.
///
/// Must run inside a transaction; a failure part-way leaves the rollback to
/// the caller.
///
/// # Errors
///
/// - `InvalidState` if a draft belongs to another case.
/// - `NotFound` if the log is empty and the batch does not open with the
///   case `create` record.
/// - `Validation` for a second case `create` record.
/// - `Conflict` if `case_version` was already recorded.
pub(crate) async fn append_user_actions(
    conn: &Connection,
    case_id: &str,
    drafts: Vec<NewUserAction>,
    case_version: Option<u64>,
    user: &User,
    now: DateTime<Utc>,
) -> Result<Vec<UserAction>, DatabaseError> {
    if let Some(stray) = drafts.iter().find(|d| d.case_id != case_id) {
        return Err(DatabaseError::InvalidState(format!(
            "user action for case {} appended to case {case_id}",
            stray.case_id
        )));
    }

    let mut seq = next_seq(conn, case_id).await?;
    check_lifecycle(case_id, seq, &drafts)?;
    if let Some(version) = case_version {
        if let Some(last) = last_case_version(conn, case_id).await? {
            if last >= version {
                tracing::warn!(case_id, version, last, "case version already audited");
                return Err(DatabaseError::conflict("case", case_id, version.saturating_sub(1), last));
            }
        }
    }

    let action_by = to_json(user)?;
    let recorded_version = case_version.map(|v| to_i64(v, "case_version")).transpose()?;
    let mut appended = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let action_id = action_id(case_id, seq);
        conn.execute(
            "INSERT INTO user_actions (id, case_id, comment_id, seq, action, action_field, old_value, new_value, action_by, action_at, case_version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            libsql::params![
                action_id.as_str(),
                case_id,
                draft.comment_id.as_deref(),
                to_i64(seq, "seq")?,
                draft.action.as_str(),
                to_json(&draft.action_field)?,
                draft.old_value.as_deref(),
                draft.new_value.as_deref(),
                action_by.as_str(),
                now.to_rfc3339(),
                recorded_version
            ],
        )
        .await?;
        appended.push(draft.into_user_action(action_id, seq, user.clone(), now));
        seq += 1;
    }

    tracing::debug!(case_id, count = appended.len(), next_seq = seq, "appended user actions");
    Ok(appended)
}

pub(crate) async fn list_user_actions_in(
    conn: &Connection,
    case_id: &str,
) -> Result<Vec<UserAction>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM user_actions WHERE case_id = ?1 ORDER BY seq ASC"),
            [case_id],
        )
        .await?;
    let mut actions = Vec::new();
    while let Some(row) = rows.next().await? {
        actions.push(row_to_user_action(&row)?);
    }
    Ok(actions)
}

impl CaseService {
    /// All user actions of a case in append order. Unknown cases have an
    /// empty history.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be decoded.
    pub async fn list_user_actions(&self, case_id: &str) -> Result<Vec<UserAction>, DatabaseError> {
        let conn = self.db().conn().await;
        list_user_actions_in(&conn, case_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{elastic, test_service};
    use caselog_core::enums::UserActionField;
    use pretty_assertions::assert_eq;

    fn opened(case_id: &str) -> NewUserAction {
        NewUserAction {
            case_id: case_id.into(),
            comment_id: None,
            action: UserActionKind::Create,
            action_field: UserActionField::CREATE_FIELDS.to_vec(),
            old_value: None,
            new_value: Some("{}".into()),
        }
    }

    fn draft(case_id: &str, new_value: &str) -> NewUserAction {
        NewUserAction {
            case_id: case_id.into(),
            comment_id: None,
            action: UserActionKind::Update,
            action_field: vec![UserActionField::Title],
            old_value: Some("old".into()),
            new_value: Some(new_value.into()),
        }
    }

    async fn append(
        svc: &CaseService,
        case_id: &str,
        drafts: Vec<NewUserAction>,
        case_version: Option<u64>,
    ) -> Result<Vec<UserAction>, DatabaseError> {
        let tx = svc.db().begin().await?;
        let result = append_user_actions(&tx, case_id, drafts, case_version, &elastic(), Utc::now()).await;
        tx.finish(result).await
    }

    #[tokio::test]
    async fn batches_get_consecutive_positions() {
        let svc = test_service().await;
        append(&svc, "cas-1", vec![opened("cas-1"), draft("cas-1", "a")], Some(1))
            .await
            .unwrap();
        let second = append(&svc, "cas-1", vec![draft("cas-1", "b")], Some(2))
            .await
            .unwrap();
        assert_eq!(second[0].seq, 2);

        let listed = svc.list_user_actions("cas-1").await.unwrap();
        let values: Vec<_> = listed
            .iter()
            .map(|a| (a.seq, a.new_value.clone().unwrap()))
            .collect();
        assert_eq!(
            values,
            vec![(0, "{}".into()), (1, "a".into()), (2, "b".into())]
        );
        assert_eq!(listed[0].action_by, elastic());
    }

    #[tokio::test]
    async fn ids_follow_case_and_position() {
        let svc = test_service().await;
        let appended = append(&svc, "cas-1", vec![opened("cas-1"), draft("cas-1", "a")], None)
            .await
            .unwrap();
        let ids: Vec<_> = appended.iter().map(|a| a.action_id.as_str()).collect();
        assert_eq!(ids, vec!["uac-cas-1-0", "uac-cas-1-1"]);
    }

    #[tokio::test]
    async fn positions_are_per_case() {
        let svc = test_service().await;
        append(&svc, "cas-1", vec![opened("cas-1")], None).await.unwrap();
        let other = append(&svc, "cas-2", vec![opened("cas-2")], None).await.unwrap();
        assert_eq!(other[0].seq, 0);
    }

    #[tokio::test]
    async fn empty_log_needs_create_first() {
        let svc = test_service().await;
        let err = append(&svc, "cas-1", vec![draft("cas-1", "a")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::NotFound { .. })));
        assert!(svc.list_user_actions("cas-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_only_at_position_zero() {
        let svc = test_service().await;
        let err = append(&svc, "cas-1", vec![opened("cas-1"), opened("cas-1")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::Validation(_))));

        append(&svc, "cas-1", vec![opened("cas-1")], None).await.unwrap();
        let err = append(&svc, "cas-1", vec![opened("cas-1")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::Validation(_))));
        assert_eq!(svc.list_user_actions("cas-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn recorded_version_is_not_recorded_again() {
        let svc = test_service().await;
        append(&svc, "cas-1", vec![opened("cas-1")], Some(1)).await.unwrap();
        append(&svc, "cas-1", vec![draft("cas-1", "a")], Some(2)).await.unwrap();
        append(&svc, "cas-1", vec![draft("cas-1", "note")], None).await.unwrap();

        let err = append(&svc, "cas-1", vec![draft("cas-1", "b")], Some(2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Core(CoreError::Conflict {
                expected: 1,
                actual: 2,
                ..
            })
        ));
        append(&svc, "cas-1", vec![draft("cas-1", "c")], Some(3)).await.unwrap();
        assert_eq!(svc.list_user_actions("cas-1").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn stray_draft_fails_whole_batch() {
        let svc = test_service().await;
        let result = append(&svc, "cas-1", vec![opened("cas-1"), draft("cas-2", "b")], None).await;
        assert!(matches!(result, Err(DatabaseError::InvalidState(_))));
        assert!(svc.list_user_actions("cas-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_are_immutable() {
        let svc = test_service().await;
        append(&svc, "cas-1", vec![opened("cas-1")], Some(1)).await.unwrap();

        let conn = svc.db().conn().await;
        assert!(
            conn.execute("UPDATE user_actions SET new_value = 'x'", ())
                .await
                .is_err()
        );
        assert!(conn.execute("DELETE FROM user_actions", ()).await.is_err());
    }

    #[tokio::test]
    async fn unknown_case_has_empty_history() {
        let svc = test_service().await;
        assert!(svc.list_user_actions("cas-missing").await.unwrap().is_empty());
    }
}
