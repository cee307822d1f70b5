//! Types shared by the error and logging facilities of every bidledger crate
//!
//! - [`correlation`]: request and trace ids, request deadlines
//! - [`schema`]: canonical log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
