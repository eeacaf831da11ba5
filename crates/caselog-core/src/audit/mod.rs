//! Audit trail engine: the pure part.
//!
//! Given explicit snapshots, computes the user actions a mutation produces.
//! Appending them is the job of the store in `caselog-db`; nothing here reads
//! or writes shared state.

pub mod classify;
pub mod diff;
pub mod serialize;

pub use classify::{CaseEvent, classify_event};
pub use diff::{ChangeKind, FieldChange, diff_case};

use crate::entities::{Case, NewUserAction};
use crate::errors::CoreError;
use crate::updates::case::CasePatch;

/// User actions for a case patch, in canonical field order.
///
/// An empty result means the patch changes nothing.
///
/// # Errors
///
/// Propagates the `Conflict`/`Validation` errors of [`diff_case`].
pub fn case_updated(prior: &Case, patch: &CasePatch) -> Result<Vec<NewUserAction>, CoreError> {
    let changes = diff_case(prior, patch)?;
    Ok(classify::classify_changes(&prior.id, changes))
}
