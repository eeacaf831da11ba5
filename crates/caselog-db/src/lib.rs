//! # caselog-db
//!
//! libSQL persistence for cases and comments, and the append side of the
//! audit trail engine.
//!
//! Every mutation runs inside a per-case exclusive section
//! ([`locks::CaseLocks`]) and a single database transaction that covers the
//! prior-snapshot read, the version-checked write and the user action append.
//! A mutation either commits all of them or none.

pub mod audit_trail;
pub mod error;
pub mod helpers;
pub mod locks;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

use std::ops::Deref;

use error::DatabaseError;
use libsql::{Builder, Connection, Transaction};
use tokio::sync::{Mutex, MutexGuard};

/// Central database handle.
///
/// Wraps a libSQL database and its single connection. The connection admits
/// one open transaction at a time, so every access goes through `gate`:
/// writers hold it for a whole transaction, readers for a statement batch.
pub struct CaseDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: Connection,
    gate: Mutex<()>,
}

impl CaseDb {
    /// Open a local-only database at the given path. `":memory:"` works for
    /// tests.
    ///
    /// Applies the embedded schema before returning.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let case_db = Self {
            db,
            conn,
            gate: Mutex::new(()),
        };
        case_db.run_migrations().await?;
        tracing::debug!(path, "opened case database");
        Ok(case_db)
    }

    /// Shared access to the connection for reads.
    ///
    /// Waits for any in-flight transaction, so readers never observe a
    /// partially appended batch.
    pub async fn conn(&self) -> ConnGuard<'_> {
        ConnGuard {
            conn: &self.conn,
            _gate: self.gate.lock().await,
        }
    }

    /// Start a write transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if `BEGIN` fails.
    pub async fn begin(&self) -> Result<WriteTx<'_>, DatabaseError> {
        let gate = self.gate.lock().await;
        let tx = self.conn.transaction().await?;
        Ok(WriteTx { tx, _gate: gate })
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"cas-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Query` if SQLite produced no value.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let conn = self.conn().await;
        generate_id(&conn, prefix).await
    }
}

/// Generate a prefixed ID on an already held connection or transaction.
///
/// The id is `{prefix}-` followed by four random bytes in lowercase hex.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if SQLite produced no value.
pub async fn generate_id(conn: &Connection, prefix: &str) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
            (),
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::Query(format!("no {prefix} id generated")))?;
    Ok(row.get::<String>(0)?)
}

/// Connection access held for the duration of a read.
pub struct ConnGuard<'a> {
    conn: &'a Connection,
    _gate: MutexGuard<'a, ()>,
}

impl Deref for ConnGuard<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn
    }
}

/// An open write transaction. Dereferences to the connection so repo
/// functions take `&Connection` either way.
pub struct WriteTx<'a> {
    tx: Transaction,
    _gate: MutexGuard<'a, ()>,
}

impl WriteTx<'_> {
    /// Commit on `Ok`, roll back on `Err`, and hand the result through.
    ///
    /// # Errors
    ///
    /// Returns the original error, or `DatabaseError::LibSql` if `COMMIT` fails.
    pub async fn finish<T>(self, result: Result<T, DatabaseError>) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                self.tx.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = self.tx.rollback().await {
                    tracing::warn!(%rollback_error, "rollback failed");
                }
                Err(error)
            }
        }
    }
}

impl Deref for WriteTx<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> CaseDb {
        CaseDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;
        let conn = db.conn().await;
        for table in ["cases", "comments", "user_actions"] {
            let mut rows = conn
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            assert!(
                rows.next().await.unwrap().is_some(),
                "table '{table}' should exist"
            );
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("cas").await.unwrap();
        assert!(id.starts_with("cas-"), "ID should start with 'cas-': {id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn rolled_back_writes_are_invisible() {
        let db = test_db().await;
        let tx = db.begin().await.unwrap();
        let result: Result<(), DatabaseError> = async {
            tx.execute(
                "INSERT INTO user_actions (id, case_id, seq, action, action_field, action_by, action_at)
                 VALUES ('uac-1', 'cas-1', 0, 'create', '[]', '{}', '2026-01-01T00:00:00Z')",
                (),
            )
            .await?;
            Err(DatabaseError::InvalidState("abort".into()))
        }
        .await;
        assert!(tx.finish(result).await.is_err());

        let conn = db.conn().await;
        let mut rows = conn
            .query("SELECT COUNT(*) FROM user_actions", ())
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 0);
    }
}
