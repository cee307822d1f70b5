//! Repositories over the SQLite schema

pub mod directory;
pub mod feedback;
pub mod records;
mod rows;
pub mod versioned_store;

pub use directory::{DirectoryRepo, Employee, Organization, SqliteDirectory};
pub use feedback::FeedbackRepo;
pub use records::RecordTable;
pub use versioned_store::VersionedStore;
