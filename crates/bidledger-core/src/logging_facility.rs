//! Structured logging facility for bidledger
//!
//! - Single initialization point via `init(profile)`
//! - Boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`) that
//!   tag every event with the operation name and, when given a
//!   `RequestContext`, the request id
//! - Test capture mode for deterministic assertions
//!
//! The engine owns the start/end/error events of every operation. The store
//! and the core only emit `tracing::debug!` details underneath them.
//!
//! ```rust
//! use bidledger_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, init_with_filter, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
