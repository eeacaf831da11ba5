//! Audit trail hooks.
//!
//! Standalone entry points for callers that persist cases themselves and
//! only need the trail: each hook classifies the change from the snapshots
//! it is handed and appends the resulting user actions atomically, inside
//! the case's exclusive section. The mutation methods of `CaseService` do
//! the same work inside their own write transaction instead.
//!
//! The log itself guards what the snapshots cannot: a case's log opens with
//! its single `create` record, and a case version that has already been
//! audited is never audited again.

use chrono::Utc;

use caselog_core::audit::{self, CaseEvent, classify_event};
use caselog_core::entities::{Case, Comment, ExternalService, NewUserAction, UserAction};
use caselog_core::identity::User;
use caselog_core::requests::CaseCreate;
use caselog_core::updates::case::CasePatch;
use caselog_core::updates::comment::CommentPatch;

use crate::error::DatabaseError;
use crate::repos::user_action::append_user_actions;
use crate::service::CaseService;

impl CaseService {
    async fn append_batch(
        &self,
        case_id: &str,
        drafts: Vec<NewUserAction>,
        case_version: Option<u64>,
        user: &User,
    ) -> Result<Vec<UserAction>, DatabaseError> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }
        let _section = self.locks().acquire(case_id).await;
        let tx = self.db().begin().await?;
        let result =
            append_user_actions(&tx, case_id, drafts, case_version, user, Utc::now()).await;
        tx.finish(result).await
    }

    async fn record_event(
        &self,
        case_id: &str,
        event: CaseEvent<'_>,
        user: &User,
    ) -> Result<Vec<UserAction>, DatabaseError> {
        let draft = classify_event(case_id, event)?;
        self.append_batch(case_id, vec![draft], None, user).await
    }

    /// Record the `create` action of a freshly opened case.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the case's log already has entries, or
    /// `DatabaseError` if the request cannot be captured or the append fails.
    pub async fn on_case_created(
        &self,
        case: &Case,
        request: &CaseCreate,
        user: &User,
    ) -> Result<Vec<UserAction>, DatabaseError> {
        let draft = classify_event(&case.id, CaseEvent::CaseCreated { request })?;
        self.append_batch(&case.id, vec![draft], Some(case.version), user)
            .await
    }

    /// Record one action per field `patch` changes on `prior`, in canonical
    /// order. A patch that changes nothing appends nothing.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the patch targets another version of the case than
    ///   `prior`, or if the transition from `patch.version` was already
    ///   recorded.
    /// - `Validation` if the patch is malformed.
    /// - `NotFound` if the case has no `create` record.
    ///
    /// Nothing is appended on any error.
    pub async fn on_case_updated(
        &self,
        prior: &Case,
        patch: &CasePatch,
        user: &User,
    ) -> Result<Vec<UserAction>, DatabaseError> {
        let drafts = match audit::case_updated(prior, patch) {
            Ok(drafts) => drafts,
            Err(error) => {
                tracing::warn!(case_id = %prior.id, %error, "case patch not recorded");
                return Err(error.into());
            }
        };
        self.append_batch(&prior.id, drafts, Some(prior.version + 1), user)
            .await
    }

    /// # Errors
    ///
    /// Returns `Validation` if the comment belongs to another case, or
    /// `NotFound` if the case has no `create` record.
    pub async fn on_comment_created(
        &self,
        case_id: &str,
        comment: &Comment,
        user: &User,
    ) -> Result<Vec<UserAction>, DatabaseError> {
        self.record_event(case_id, CaseEvent::CommentCreated { comment }, user)
            .await
    }

    /// Record a comment edit: full prior content as the old value, only the
    /// submitted fields as the new value.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` for a stale patch and `Validation` for one that does
    /// not apply to the prior content.
    pub async fn on_comment_updated(
        &self,
        case_id: &str,
        prior: &Comment,
        patch: &CommentPatch,
        user: &User,
    ) -> Result<Vec<UserAction>, DatabaseError> {
        self.record_event(case_id, CaseEvent::CommentUpdated { prior, patch }, user)
            .await
    }

    /// # Errors
    ///
    /// Returns `Validation` if the comment belongs to another case.
    pub async fn on_comment_deleted(
        &self,
        case_id: &str,
        prior: &Comment,
        user: &User,
    ) -> Result<Vec<UserAction>, DatabaseError> {
        self.record_event(case_id, CaseEvent::CommentDeleted { prior }, user)
            .await
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the case has no `create` record, or
    /// `DatabaseError` if the metadata cannot be captured or the append fails.
    pub async fn on_pushed(
        &self,
        case_id: &str,
        external_service: &ExternalService,
        user: &User,
    ) -> Result<Vec<UserAction>, DatabaseError> {
        self.record_event(case_id, CaseEvent::Pushed { external_service }, user)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::helpers::{case_request, elastic, test_service, user_comment};
    use caselog_core::enums::{UserActionField, UserActionKind};
    use caselog_core::updates::case::CasePatchBuilder;
    use caselog_core::updates::comment::CommentPatchBuilder;
    use pretty_assertions::assert_eq;

    fn snapshot() -> Case {
        case_request().to_case("cas-00000001".into(), &elastic(), Utc::now())
    }

    fn comment(case: &Case) -> Comment {
        Comment {
            id: "cmt-00000001".into(),
            case_id: case.id.clone(),
            version: 1,
            content: user_comment("a comment"),
            created_at: Utc::now(),
            created_by: elastic(),
            updated_at: None,
            updated_by: None,
        }
    }

    #[tokio::test]
    async fn hooks_append_in_call_order() {
        let svc = test_service().await;
        let case = snapshot();
        let comment = comment(&case);

        svc.on_case_created(&case, &case_request(), &elastic())
            .await
            .unwrap();
        let patch = CasePatchBuilder::new(&case.id, 1)
            .title("New title")
            .tags(["malware"])
            .build();
        let updated = svc.on_case_updated(&case, &patch, &elastic()).await.unwrap();
        assert_eq!(updated.len(), 3);
        svc.on_comment_created(&case.id, &comment, &elastic())
            .await
            .unwrap();
        svc.on_comment_deleted(&case.id, &comment, &elastic())
            .await
            .unwrap();

        let actions = svc.list_user_actions(&case.id).await.unwrap();
        let summary: Vec<_> = actions
            .iter()
            .map(|a| (a.seq, a.action, a.action_field.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, UserActionKind::Create, UserActionField::CREATE_FIELDS.to_vec()),
                (1, UserActionKind::Update, vec![UserActionField::Title]),
                (2, UserActionKind::Add, vec![UserActionField::Tags]),
                (3, UserActionKind::Delete, vec![UserActionField::Tags]),
                (4, UserActionKind::Create, vec![UserActionField::Comment]),
                (5, UserActionKind::Delete, vec![UserActionField::Comment]),
            ]
        );
    }

    #[tokio::test]
    async fn no_op_patch_appends_nothing() {
        let svc = test_service().await;
        let case = snapshot();
        let patch = CasePatchBuilder::new(&case.id, 1).title(case.title.clone()).build();
        assert!(svc.on_case_updated(&case, &patch, &elastic()).await.unwrap().is_empty());
        assert!(svc.list_user_actions(&case.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stale_hooks_append_nothing() {
        let svc = test_service().await;
        let case = snapshot();
        let comment = comment(&case);

        let err = svc
            .on_case_updated(&case, &CasePatchBuilder::new(&case.id, 2).title("x").build(), &elastic())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = svc
            .on_comment_updated(
                &case.id,
                &comment,
                &CommentPatchBuilder::new(&comment.id, 5).comment("x").build(),
                &elastic(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(svc.list_user_actions(&case.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn push_hook_is_not_comment_scoped() {
        let svc = test_service().await;
        let case = snapshot();
        let external_service = ExternalService {
            pushed_at: Utc::now(),
            pushed_by: elastic(),
            connector_id: "jira-1".into(),
            connector_name: "Jira".into(),
            external_id: "SEC-1".into(),
            external_title: "SEC-1".into(),
            external_url: "https://example.atlassian.net/browse/SEC-1".into(),
        };
        svc.on_case_created(&case, &case_request(), &elastic())
            .await
            .unwrap();
        let actions = svc.on_pushed(&case.id, &external_service, &elastic()).await.unwrap();
        assert_eq!(actions[0].action, UserActionKind::PushToService);
        assert!(actions[0].comment_id.is_none());
        assert_eq!(actions[0].seq, 1);
    }

    #[tokio::test]
    async fn log_must_open_with_create() {
        let svc = test_service().await;
        let case = snapshot();
        let comment = comment(&case);

        let err = svc
            .on_comment_created(&case.id, &comment, &elastic())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let patch = CasePatchBuilder::new(&case.id, 1).title("x").build();
        let err = svc.on_case_updated(&case, &patch, &elastic()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(svc.list_user_actions(&case.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_create_is_rejected() {
        let svc = test_service().await;
        let case = snapshot();
        svc.on_case_created(&case, &case_request(), &elastic())
            .await
            .unwrap();

        let err = svc
            .on_case_created(&case, &case_request(), &elastic())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let actions = svc.list_user_actions(&case.id).await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].action, UserActionKind::Create);
    }

    #[tokio::test]
    async fn same_transition_is_recorded_once() {
        let svc = test_service().await;
        let case = snapshot();
        let user = elastic();
        svc.on_case_created(&case, &case_request(), &user).await.unwrap();

        let first = CasePatchBuilder::new(&case.id, 1).title("first").build();
        let second = CasePatchBuilder::new(&case.id, 1).title("second").build();
        let (a, b) = tokio::join!(
            svc.on_case_updated(&case, &first, &user),
            svc.on_case_updated(&case, &second, &user)
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = outcomes.into_iter().find_map(Result::err).unwrap();
        assert_eq!(loser.kind(), ErrorKind::Conflict);

        let actions = svc.list_user_actions(&case.id).await.unwrap();
        let kinds: Vec<_> = actions.iter().map(|a| a.action).collect();
        assert_eq!(kinds, vec![UserActionKind::Create, UserActionKind::Update]);
    }

    #[tokio::test]
    async fn later_snapshot_follows_recorded_one() {
        let svc = test_service().await;
        let case = snapshot();
        let user = elastic();
        svc.on_case_created(&case, &case_request(), &user).await.unwrap();

        let patch = CasePatchBuilder::new(&case.id, 1).title("first").build();
        svc.on_case_updated(&case, &patch, &user).await.unwrap();
        let next = patch.apply_to(&case, &user, Utc::now());
        let patch = CasePatchBuilder::new(&next.id, 2).title("second").build();
        svc.on_case_updated(&next, &patch, &user).await.unwrap();

        let stale = CasePatchBuilder::new(&case.id, 1).title("again").build();
        let err = svc.on_case_updated(&case, &stale, &user).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Core(caselog_core::errors::CoreError::Conflict {
                expected: 1,
                actual: 3,
                ..
            })
        ));
        assert_eq!(svc.list_user_actions(&case.id).await.unwrap().len(), 3);
    }
}
