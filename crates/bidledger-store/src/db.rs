//! Connection management and transaction boundaries
//!
//! Every request opens its own connection. Writes go through
//! [`with_immediate`], which takes the database write lock up front so the
//! locking read, the version increment and the snapshot land in one
//! serialized unit.
//!
//! SQLite has no row locks: `BEGIN IMMEDIATE` takes the database-wide write
//! lock, so writes to different tenders or bids also queue behind each
//! other for up to the busy timeout. Reads in [`with_read`] are not blocked
//! under WAL.

use std::path::Path;
use std::time::Duration;

use bidledger_core::errors::LedgerError;
use bidledger_core_types::RequestContext;
use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::errors::{from_ledger, from_rusqlite, Result};

/// Busy timeout applied when the caller does not choose one
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply connection pragmas: how long a writer waits for the lock before
/// failing, foreign keys, and WAL.
///
/// The busy timeout is set first so that switching a fresh database to WAL
/// waits for a concurrent opener instead of failing.
pub fn configure(conn: &Connection, busy_timeout: Duration) -> Result<()> {
    conn.busy_timeout(busy_timeout).map_err(from_rusqlite)?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(from_rusqlite)?;
    Ok(())
}

fn check_deadline(ctx: &RequestContext) -> Result<()> {
    if ctx.is_expired() {
        let err = from_ledger(LedgerError::DeadlineExceeded);
        return Err(err.with_request_id(ctx.request_id.clone()));
    }
    Ok(())
}

/// Run `work` inside `BEGIN IMMEDIATE` and commit if it succeeds.
///
/// The deadline is checked before the transaction starts and again right
/// before commit. On any error the transaction is dropped, which rolls it
/// back.
///
/// # Errors
/// Whatever `work` returns, or `StorageFailure` for lock timeouts, commit
/// failures and an expired deadline.
pub fn with_immediate<T, F>(conn: &mut Connection, ctx: &RequestContext, work: F) -> Result<T>
where
    F: FnOnce(&Transaction<'_>) -> Result<T>,
{
    check_deadline(ctx)?;
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;
    tracing::debug!(request_id = %ctx.request_id, "write lock acquired");

    let value = work(&tx)?;

    check_deadline(ctx)?;
    tx.commit().map_err(from_rusqlite)?;
    Ok(value)
}

/// Run read-only `work` against one consistent snapshot of the database.
///
/// # Errors
/// Whatever `work` returns, or `StorageFailure`.
pub fn with_read<T, F>(conn: &mut Connection, ctx: &RequestContext, work: F) -> Result<T>
where
    F: FnOnce(&Transaction<'_>) -> Result<T>,
{
    check_deadline(ctx)?;
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Deferred)
        .map_err(from_rusqlite)?;
    let value = work(&tx)?;
    tx.finish().map_err(from_rusqlite)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidledger_core::errors::OpErrorKind;
    use std::time::Instant;

    #[test]
    fn test_expired_deadline_rejected_before_begin() {
        let mut conn = open_in_memory().unwrap();
        let ctx = RequestContext::new().with_deadline(Instant::now());

        let err = with_immediate(&mut conn, &ctx, |_| Ok(())).unwrap_err();

        assert_eq!(err.kind(), OpErrorKind::StorageFailure);
        assert_eq!(err.request_id(), Some(&ctx.request_id));
    }

    #[test]
    fn test_failed_work_rolls_back() {
        let mut conn = open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER)").unwrap();
        let ctx = RequestContext::new();

        let result: Result<()> = with_immediate(&mut conn, &ctx, |tx| {
            tx.execute("INSERT INTO t VALUES (1)", []).map_err(from_rusqlite)?;
            Err(from_ledger(LedgerError::DeadlineExceeded))
        });
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_deadline_passing_mid_transaction_aborts_commit() {
        let mut conn = open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER)").unwrap();
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(20));

        let result = with_immediate(&mut conn, &ctx, |tx| {
            tx.execute("INSERT INTO t VALUES (1)", []).map_err(from_rusqlite)?;
            std::thread::sleep(Duration::from_millis(40));
            Ok(())
        });
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
