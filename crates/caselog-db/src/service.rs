//! Service layer binding persistence to the audit trail.
//!
//! `CaseService` wraps `CaseDb` (raw database access) and `CaseLocks`
//! (per-case exclusive sections). All repo methods and audit hooks are
//! implemented as `impl CaseService`.

use crate::CaseDb;
use crate::error::DatabaseError;
use crate::locks::CaseLocks;

/// Orchestrates case mutations with their user actions.
///
/// Mutations all run the same sequence:
/// 1. Acquire the case's exclusive section
/// 2. Begin transaction
/// 3. Read the prior snapshot and check the requested version
/// 4. Diff and classify against the prior snapshot
/// 5. Write the new snapshot (`WHERE version = ?`)
/// 6. Append the user actions (inside transaction)
/// 7. Commit, or roll back everything on the first error
pub struct CaseService {
    db: CaseDb,
    locks: CaseLocks,
}

impl CaseService {
    /// Open (or create) the database file at `db_path`; `:memory:` works too.
    ///
    /// `db_path` is the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = CaseDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    #[must_use]
    pub fn from_db(db: CaseDb) -> Self {
        Self {
            db,
            locks: CaseLocks::new(),
        }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &CaseDb {
        &self.db
    }

    #[must_use]
    pub const fn locks(&self) -> &CaseLocks {
        &self.locks
    }
}
