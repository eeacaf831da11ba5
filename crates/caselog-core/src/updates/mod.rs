//! Patch types for case and comment mutations.
//!
//! Each patch carries the target id and the version the caller last saw,
//! plus `Option` fields for what it wants to change. Only `Some` fields are
//! applied, diffed and written. Builders mirror the patch fields for callers
//! that assemble patches in code.

pub mod case;
pub mod comment;
