//! SQL migrations compiled into the binary

/// One schema step, applied at most once
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// All migrations in application order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_directory",
            sql: include_str!("../../migrations/001_directory.sql"),
        },
        Migration {
            id: "002_versioned_records",
            sql: include_str!("../../migrations/002_versioned_records.sql"),
        },
        Migration {
            id: "003_bid_feedback",
            sql: include_str!("../../migrations/003_bid_feedback.sql"),
        },
    ]
}
