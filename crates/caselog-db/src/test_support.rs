//! Shared test utilities for caselog-db unit tests.

pub(crate) mod helpers {
    use caselog_core::entities::{Case, CaseSettings, CommentContent, ConnectorRef};
    use caselog_core::identity::User;
    use caselog_core::requests::CaseCreate;

    use crate::service::CaseService;

    /// In-memory service with an empty schema.
    pub async fn test_service() -> CaseService {
        CaseService::new_local(":memory:").await.unwrap()
    }

    pub fn elastic() -> User {
        User::new("elastic")
    }

    pub fn case_request() -> CaseCreate {
        CaseCreate {
            description: "This is a brand new case of a bad meanie defacing data".into(),
            title: "Super Bad Security Issue".into(),
            tags: vec!["defacement".into()],
            status: None,
            connector: ConnectorRef::none(),
            settings: CaseSettings::default(),
            owner: None,
        }
    }

    pub async fn create_test_case(svc: &CaseService) -> Case {
        svc.create_case(case_request(), &elastic()).await.unwrap()
    }

    pub fn user_comment(text: &str) -> CommentContent {
        CommentContent::User {
            comment: text.into(),
        }
    }
}
