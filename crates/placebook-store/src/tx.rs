//! Transaction Coordinator
//!
//! Owns the single SQLite connection. Reads and single-row writes go
//! through [`TxCoordinator::read`] / [`TxCoordinator::write`]; multi-row
//! changes that must land together go through [`TxCoordinator::run_atomic`].
//!
//! `run_atomic` commits when the closure returns `Ok` and rolls back
//! otherwise. Whatever aborted the session is reported as
//! `OperationFailed`, with the original error kept as internal detail.

use crate::db;
use crate::errors::{from_rusqlite, Result};
use placebook_core::errors::ExError;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct TxCoordinator {
    conn: Mutex<Connection>,
}

impl TxCoordinator {
    /// Wrap an already configured and migrated connection
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (creating if needed) and migrate the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        db::open_ready(path).map(Self::new)
    }

    pub fn open_in_memory() -> Result<Self> {
        db::open_ready_in_memory().map(Self::new)
    }

    fn lock(&self, op: &str) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ExError::operation_failed(op, "connection lock poisoned"))
    }

    /// Run a read-only lookup
    pub fn read<T>(&self, op: &str, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock(op)?;
        f(&conn)
    }

    /// Run a single-statement write outside any session
    pub fn write<T>(&self, op: &str, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.lock(op)?;
        f(&conn)
    }

    /// Run `f` inside one transaction
    pub fn run_atomic<T>(
        &self,
        op: &str,
        f: impl FnOnce(&Transaction<'_>) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.lock(op)?;
        let tx = conn
            .transaction()
            .map_err(|e| from_rusqlite(e).into_operation_failed(op))?;

        match f(&tx) {
            Ok(value) => {
                tx.commit()
                    .map_err(|e| ExError::operation_failed(op, e.to_string()))?;
                tracing::debug!(op, "Transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    tracing::warn!(op, error = %rollback_err, "Rollback failed");
                }
                tracing::debug!(op, err.code = err.code(), "Transaction rolled back");
                Err(err.into_operation_failed(op))
            }
        }
    }
}
