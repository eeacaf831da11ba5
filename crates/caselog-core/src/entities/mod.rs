//! Entity structs for all caselog domain objects.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON roundtrip and schema
//! validation.

mod case;
mod comment;
mod connector;
mod external_service;
mod user_action;

pub use case::{Case, CaseSettings};
pub use comment::{Comment, CommentContent};
pub use connector::ConnectorRef;
pub use external_service::ExternalService;
pub use user_action::{NewUserAction, UserAction};
