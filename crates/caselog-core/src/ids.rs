//! ID prefix constants.
//!
//! IDs are `{prefix}-{8 hex chars}`, generated by the database.

pub const PREFIX_CASE: &str = "cas";
pub const PREFIX_COMMENT: &str = "cmt";
pub const PREFIX_USER_ACTION: &str = "uac";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_CASE, PREFIX_COMMENT, PREFIX_USER_ACTION];
