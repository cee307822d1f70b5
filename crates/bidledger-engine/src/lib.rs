//! bidledger engine - operation layer
//!
//! Every state-changing operation runs the same sequence: validate the
//! input, resolve the caller's identity, check organizational
//! responsibility, check the status transition, then hand the change to the
//! versioned store. Steps two to five share one immediate transaction, so
//! nothing is written unless every check passed.

pub mod commands;
pub mod config;

pub use config::{ConfigError, Settings};
