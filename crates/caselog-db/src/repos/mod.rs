//! Repository methods on `CaseService`, one module per table.
//!
//! Each module exposes `pub(crate)` functions taking a `&Connection` so they
//! run unchanged inside a write transaction or under a read guard.

pub mod case;
pub mod comment;
pub mod user_action;
