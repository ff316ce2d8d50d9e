//! BEGIN IMMEDIATE transactions on the write connection.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use verity_core::errors::StorageError;

use crate::to_storage_err;

/// Execute `f` inside a BEGIN IMMEDIATE transaction.
///
/// The write lock is taken at BEGIN, so every read `f` performs sees the
/// latest committed state and no other writer can interleave. The
/// transaction commits only if `f` returns `Ok`; any error drops it, which
/// rolls back every statement `f` ran.
pub fn with_immediate_transaction<F, T, E>(conn: &Connection, f: F) -> Result<T, E>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
    E: From<StorageError>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|e| E::from(to_storage_err(e)))?;

    let result = f(&tx)?;

    tx.commit().map_err(|e| E::from(to_storage_err(e)))?;
    Ok(result)
}
