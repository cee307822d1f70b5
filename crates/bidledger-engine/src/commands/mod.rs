//! Operation handlers with boundary logging.
//!
//! ## Logging Ownership
//!
//! Handlers here own lifecycle logging for every operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

pub mod bid;
pub mod review;
pub mod tender;

use std::time::Instant;

use bidledger_core::auth::AuthorizationGate;
use bidledger_core::errors::OpError;
use bidledger_core::log_op_error;
use bidledger_core_types::RequestContext;
use bidledger_store::SqliteDirectory;
use rusqlite::Connection;

/// Authorization gate reading through `conn`, usually the operation's transaction
pub(crate) fn gate(conn: &Connection) -> AuthorizationGate<SqliteDirectory<'_>> {
    AuthorizationGate::new(SqliteDirectory::new(conn))
}

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Attach the operation and request to `err` and log it.
pub(crate) fn failed(
    op: &'static str,
    ctx: &RequestContext,
    start: Instant,
    err: OpError,
) -> OpError {
    let mut err = err.with_op(op).with_request_id(ctx.request_id.clone());
    if let Some(trace_id) = &ctx.trace_id {
        err = err.with_trace_id(trace_id.clone());
    }
    log_op_error!(op, ctx = ctx, err.clone(), duration_ms = elapsed_ms(start));
    err
}
