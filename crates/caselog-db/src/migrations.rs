//! Embedded schema, applied every time a database is opened.
//!
//! Statements are idempotent (`IF NOT EXISTS`), so reopening an existing
//! file is safe.

use crate::CaseDb;
use crate::error::DatabaseError;

/// `(name, sql)` pairs, applied in order.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    include_str!("../migrations/001_initial.sql"),
)];

impl CaseDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::trace!(migration = *name, "applied");
        }
        Ok(())
    }
}
