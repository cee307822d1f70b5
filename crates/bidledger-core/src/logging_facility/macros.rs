//! Operation boundary macros
//!
//! Every arm accepts an optional `ctx = <&RequestContext>` immediately after
//! the operation name; when present the event carries `request_id`.

/// Log the start of an operation
///
/// ```
/// # use bidledger_core::log_op_start;
/// # let ctx = bidledger_core_types::RequestContext::new();
/// log_op_start!("tender_create");
/// log_op_start!("tender_edit", ctx = &ctx, tender_id = "t-123");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr, ctx = $ctx:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bidledger_core_types::schema::EVENT_START,
            request_id = %$ctx.request_id,
        );
    };
    ($op:expr, ctx = $ctx:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bidledger_core_types::schema::EVENT_START,
            request_id = %$ctx.request_id,
            $($field)*
        );
    };
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bidledger_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bidledger_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use bidledger_core::log_op_end;
/// # let ctx = bidledger_core_types::RequestContext::new();
/// log_op_end!("tender_create", duration_ms = 42);
/// log_op_end!("tender_edit", ctx = &ctx, duration_ms = 3, version = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, ctx = $ctx:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bidledger_core_types::schema::EVENT_END,
            request_id = %$ctx.request_id,
            duration_ms = $duration,
        );
    };
    ($op:expr, ctx = $ctx:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bidledger_core_types::schema::EVENT_END,
            request_id = %$ctx.request_id,
            duration_ms = $duration,
            $($field)*
        );
    };
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bidledger_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = bidledger_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation failure with its kind and stable code
///
/// Accepts anything convertible into `OpError`.
///
/// ```
/// # use bidledger_core::{log_op_error, errors::LedgerError};
/// let err = LedgerError::BidNotFound { bid_id: "b1".to_string() };
/// log_op_error!("bid_edit", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, ctx = $ctx:expr, $err:expr, duration_ms = $duration:expr) => {{
        let op_err: $crate::errors::OpError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = bidledger_core_types::schema::EVENT_END_ERROR,
            request_id = %$ctx.request_id,
            duration_ms = $duration,
            err.kind = ?op_err.kind(),
            err.code = op_err.code(),
            err.message = op_err.message(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let op_err: $crate::errors::OpError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = bidledger_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?op_err.kind(),
            err.code = op_err.code(),
            err.message = op_err.message(),
        );
    }};
}
