use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identity of the user performing a mutation.
///
/// Authentication happens outside caselog; callers hand in whoever they
/// resolved. Serialized with explicit nulls because the value is captured
/// verbatim into push metadata.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl User {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: None,
            email: None,
        }
    }
}
