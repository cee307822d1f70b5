//! bidledger store - SQLite persistence for the bidledger domain
//!
//! Provides:
//! - Connection setup and transaction boundaries with request deadlines
//! - Embedded, checksummed schema migrations
//! - The versioned record store for tenders and bids
//! - Directory (identities, organizations, memberships) and feedback repositories

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

pub use errors::Result;
pub use repo::{
    DirectoryRepo, Employee, FeedbackRepo, Organization, RecordTable, SqliteDirectory,
    VersionedStore,
};
