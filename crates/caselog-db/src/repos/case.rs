//! Case repository: creation, lookup, listing and version-checked patches.

use chrono::Utc;
use libsql::Connection;

use caselog_core::audit::{self, CaseEvent, classify_event};
use caselog_core::entities::Case;
use caselog_core::enums::CaseStatus;
use caselog_core::identity::User;
use caselog_core::ids::PREFIX_CASE;
use caselog_core::requests::{CaseCreate, PushRequest};
use caselog_core::updates::case::CasePatch;

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_json, parse_optional_datetime,
    parse_optional_json, to_i64, to_json, to_u64,
};
use crate::repos::user_action::append_user_actions;
use crate::service::CaseService;

const SELECT_COLS: &str = "id, version, title, description, tags, status, connector, settings, owner, \
     external_service, created_at, created_by, updated_at, updated_by, closed_at, closed_by";

/// Filter criteria for case listing.
#[derive(Debug, Default)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    pub tag: Option<String>,
    pub limit: Option<u32>,
}

fn row_to_case(row: &libsql::Row) -> Result<Case, DatabaseError> {
    Ok(Case {
        id: row.get(0)?,
        version: to_u64(row.get::<i64>(1)?, "version")?,
        title: row.get(2)?,
        description: row.get(3)?,
        tags: parse_json(&row.get::<String>(4)?)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        connector: parse_json(&row.get::<String>(6)?)?,
        settings: parse_json(&row.get::<String>(7)?)?,
        owner: row.get(8)?,
        external_service: parse_optional_json(get_opt_string(row, 9)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(10)?)?,
        created_by: parse_json(&row.get::<String>(11)?)?,
        updated_at: parse_optional_datetime(get_opt_string(row, 12)?.as_deref())?,
        updated_by: parse_optional_json(get_opt_string(row, 13)?.as_deref())?,
        closed_at: parse_optional_datetime(get_opt_string(row, 14)?.as_deref())?,
        closed_by: parse_optional_json(get_opt_string(row, 15)?.as_deref())?,
    })
}

/// Encode the mutable columns of a case, in `SET` order.
fn case_values(case: &Case) -> Result<Vec<libsql::Value>, DatabaseError> {
    let opt_json = |value: Option<String>| value.map_or(libsql::Value::Null, Into::into);
    Ok(vec![
        to_i64(case.version, "version")?.into(),
        case.title.clone().into(),
        case.description.clone().into(),
        to_json(&case.tags)?.into(),
        case.status.as_str().into(),
        to_json(&case.connector)?.into(),
        to_json(&case.settings)?.into(),
        case.owner.clone().into(),
        opt_json(case.external_service.as_ref().map(to_json).transpose()?),
        opt_json(case.updated_at.map(|t| t.to_rfc3339())),
        opt_json(case.updated_by.as_ref().map(to_json).transpose()?),
        opt_json(case.closed_at.map(|t| t.to_rfc3339())),
        opt_json(case.closed_by.as_ref().map(to_json).transpose()?),
    ])
}

async fn insert_case(conn: &Connection, case: &Case) -> Result<(), DatabaseError> {
    let mut params = vec![libsql::Value::from(case.id.clone())];
    params.extend(case_values(case)?);
    params.push(case.created_at.to_rfc3339().into());
    params.push(to_json(&case.created_by)?.into());
    conn.execute(
        "INSERT INTO cases (id, version, title, description, tags, status, connector, settings, owner,
                            external_service, updated_at, updated_by, closed_at, closed_by, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        libsql::params_from_iter(params),
    )
    .await?;
    Ok(())
}

/// Overwrite the stored case with `next`, provided the stored version is
/// still `expected_version`.
///
/// # Errors
///
/// Returns a `Conflict` if another writer got there first.
pub(crate) async fn write_case(
    conn: &Connection,
    next: &Case,
    expected_version: u64,
) -> Result<(), DatabaseError> {
    let mut params = case_values(next)?;
    params.push(next.id.clone().into());
    params.push(to_i64(expected_version, "version")?.into());
    let changed = conn
        .execute(
            "UPDATE cases SET version = ?1, title = ?2, description = ?3, tags = ?4, status = ?5,
                              connector = ?6, settings = ?7, owner = ?8, external_service = ?9,
                              updated_at = ?10, updated_by = ?11, closed_at = ?12, closed_by = ?13
             WHERE id = ?14 AND version = ?15",
            libsql::params_from_iter(params),
        )
        .await?;
    if changed == 0 {
        let actual = get_case_in(conn, &next.id).await?.version;
        return Err(DatabaseError::conflict(
            "case",
            &next.id,
            expected_version,
            actual,
        ));
    }
    Ok(())
}

pub(crate) async fn get_case_in(conn: &Connection, id: &str) -> Result<Case, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM cases WHERE id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found("case", id))?;
    row_to_case(&row)
}

/// Bump the case version and stamp `updated_*` for a change made through
/// one of its children (comments, pushes).
pub(crate) fn touched(prior: &Case, user: &User, now: chrono::DateTime<Utc>) -> Case {
    let mut next = prior.clone();
    next.version = prior.version + 1;
    next.updated_at = Some(now);
    next.updated_by = Some(user.clone());
    next
}

impl CaseService {
    /// Open a new case and record its `create` action at position 0.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error for a malformed request, or the store
    /// error that rolled the creation back.
    pub async fn create_case(&self, request: CaseCreate, user: &User) -> Result<Case, DatabaseError> {
        request.validate()?;
        let now = Utc::now();

        let tx = self.db().begin().await?;
        let result: Result<_, DatabaseError> = async {
            let id = generate_id(&tx, PREFIX_CASE).await?;
            let case = request.to_case(id, user, now);
            insert_case(&tx, &case).await?;
            let draft = classify_event(&case.id, CaseEvent::CaseCreated { request: &request })?;
            append_user_actions(&tx, &case.id, vec![draft], Some(case.version), user, now).await?;
            Ok(case)
        }
        .await;
        let case = tx.finish(result).await?;

        tracing::info!(case_id = %case.id, user = %user.username, "case created");
        Ok(case)
    }

    /// # Errors
    ///
    /// Returns a `NotFound` error if no case has this id.
    pub async fn get_case(&self, id: &str) -> Result<Case, DatabaseError> {
        let conn = self.db().conn().await;
        get_case_in(&conn, id).await
    }

    /// Cases matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_cases(&self, filter: &CaseFilter) -> Result<Vec<Case>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status {
            params.push(status.as_str().into());
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(ref tag) = filter.tag {
            params.push(tag.clone().into());
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM json_each(cases.tags) WHERE json_each.value = ?{})",
                params.len()
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM cases {where_clause} ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let conn = self.db().conn().await;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut cases = Vec::new();
        while let Some(row) = rows.next().await? {
            cases.push(row_to_case(&row)?);
        }
        Ok(cases)
    }

    /// Apply a version-checked patch and record one user action per change.
    ///
    /// A patch that changes nothing returns the current case unchanged: no
    /// version bump, no user actions.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the case does not exist.
    /// - `Conflict` if `patch.version` is not the stored version.
    /// - `Validation` if the patch is malformed.
    ///
    /// Nothing is written or appended on any error.
    pub async fn update_case(&self, patch: &CasePatch, user: &User) -> Result<Case, DatabaseError> {
        let _section = self.locks().acquire(&patch.id).await;
        let now = Utc::now();

        let tx = self.db().begin().await?;
        let result: Result<_, DatabaseError> = async {
            let prior = get_case_in(&tx, &patch.id).await?;
            let drafts = audit::case_updated(&prior, patch)?;
            if drafts.is_empty() {
                return Ok((prior, 0));
            }
            let next = patch.apply_to(&prior, user, now);
            write_case(&tx, &next, prior.version).await?;
            let appended = append_user_actions(&tx, &next.id, drafts, Some(next.version), user, now).await?;
            Ok((next, appended.len()))
        }
        .await;

        match tx.finish(result).await {
            Ok((case, 0)) => {
                tracing::debug!(case_id = %case.id, version = case.version, "case patch changed nothing");
                Ok(case)
            }
            Ok((case, actions)) => {
                tracing::info!(case_id = %case.id, version = case.version, actions, "case updated");
                Ok(case)
            }
            Err(error) => {
                tracing::warn!(case_id = %patch.id, version = patch.version, %error, "case update rejected");
                Err(error)
            }
        }
    }

    /// Record a push of the case to its external connector.
    ///
    /// Stores the push metadata as the case's `external_service`, bumps the
    /// version and appends a `push-to-service` action. The transport itself
    /// happens elsewhere; this records its outcome.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the case does not exist, or `Validation` for an
    /// incomplete request.
    pub async fn push_case(
        &self,
        case_id: &str,
        request: PushRequest,
        user: &User,
    ) -> Result<Case, DatabaseError> {
        request.validate()?;
        let _section = self.locks().acquire(case_id).await;
        let now = Utc::now();

        let tx = self.db().begin().await?;
        let result: Result<_, DatabaseError> = async {
            let prior = get_case_in(&tx, case_id).await?;
            let external_service = request.into_external_service(user, now);
            let draft = classify_event(
                case_id,
                CaseEvent::Pushed {
                    external_service: &external_service,
                },
            )?;
            let mut next = touched(&prior, user, now);
            next.external_service = Some(external_service);
            write_case(&tx, &next, prior.version).await?;
            append_user_actions(&tx, case_id, vec![draft], Some(next.version), user, now).await?;
            Ok(next)
        }
        .await;
        let case = tx.finish(result).await?;

        tracing::info!(case_id, version = case.version, "case pushed");
        Ok(case)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::helpers::{create_test_case, elastic, test_service};
    use caselog_core::updates::case::CasePatchBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn create_and_get_roundtrip() {
        let svc = test_service().await;
        let created = create_test_case(&svc).await;
        let fetched = svc.get_case(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.version, 1);
    }

    #[tokio::test]
    async fn get_missing_case_is_not_found() {
        let svc = test_service().await;
        let err = svc.get_case("cas-missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn invalid_request_creates_nothing() {
        let svc = test_service().await;
        let mut request = crate::test_support::helpers::case_request();
        request.title = String::new();
        let err = svc.create_case(request, &elastic()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(svc.list_cases(&CaseFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_bumps_version_and_stamps_user() {
        let svc = test_service().await;
        let case = create_test_case(&svc).await;
        let analyst = User::new("analyst");

        let patch = CasePatchBuilder::new(&case.id, 1).title("Renamed").build();
        let updated = svc.update_case(&patch, &analyst).await.unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.updated_by.as_ref(), Some(&analyst));
        assert_eq!(svc.get_case(&case.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn closing_and_reopening_tracks_closure() {
        let svc = test_service().await;
        let case = create_test_case(&svc).await;

        let closed = svc
            .update_case(
                &CasePatchBuilder::new(&case.id, 1).status(CaseStatus::Closed).build(),
                &elastic(),
            )
            .await
            .unwrap();
        assert!(closed.closed_at.is_some());
        assert_eq!(closed.closed_by.as_ref(), Some(&elastic()));

        let reopened = svc
            .update_case(
                &CasePatchBuilder::new(&case.id, 2).status(CaseStatus::Open).build(),
                &elastic(),
            )
            .await
            .unwrap();
        assert!(reopened.closed_at.is_none());
        assert!(reopened.closed_by.is_none());
    }

    #[tokio::test]
    async fn list_filters_by_status_and_tag() {
        let svc = test_service().await;
        let first = create_test_case(&svc).await;
        let second = create_test_case(&svc).await;
        svc.update_case(
            &CasePatchBuilder::new(&second.id, 1)
                .status(CaseStatus::InProgress)
                .tags(["phishing"])
                .build(),
            &elastic(),
        )
        .await
        .unwrap();

        let all = svc.list_cases(&CaseFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let open = svc
            .list_cases(&CaseFilter {
                status: Some(CaseStatus::Open),
                ..CaseFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(open.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec![first.id.as_str()]);

        let tagged = svc
            .list_cases(&CaseFilter {
                tag: Some("phishing".into()),
                ..CaseFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].id, second.id);
    }

    #[tokio::test]
    async fn write_case_rejects_stale_expected_version() {
        let svc = test_service().await;
        let case = create_test_case(&svc).await;
        let next = touched(&case, &elastic(), Utc::now());

        let tx = svc.db().begin().await.unwrap();
        let result = write_case(&tx, &next, 7).await;
        let err = tx.finish(result).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(svc.get_case(&case.id).await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn push_records_external_service() {
        let svc = test_service().await;
        let case = create_test_case(&svc).await;
        let request = PushRequest {
            connector_id: "sn-1".into(),
            connector_name: "ServiceNow".into(),
            external_id: "INC0001".into(),
            external_title: "INC0001".into(),
            external_url: "https://example.service-now.com/INC0001".into(),
        };

        let pushed = svc.push_case(&case.id, request, &elastic()).await.unwrap();
        assert_eq!(pushed.version, 2);
        let external = pushed.external_service.as_ref().unwrap();
        assert_eq!(external.external_id, "INC0001");
        assert_eq!(external.pushed_by, elastic());
        assert_eq!(svc.get_case(&case.id).await.unwrap(), pushed);
    }
}
