//! Schema migrations
//!
//! Embedded SQL applied in order, each recorded in `schema_version` with a
//! checksum. Re-running is a no-op; an edited migration that was already
//! applied is reported instead of silently skipped.

mod checksums;
mod embedded;
mod runner;

pub use runner::{applied_migrations, apply_migrations};
