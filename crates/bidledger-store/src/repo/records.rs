//! Table mappings for the versioned record kinds

use bidledger_core::errors::LedgerError;
use bidledger_core::model::{Bid, Tender};
use bidledger_core::versioned::Versioned;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::repo::rows::{label, timestamp};

/// How a [`Versioned`] record maps onto its live table and history table.
///
/// Live rows are `id`, the mutable columns, `version` and `created_at`.
/// History rows hold the whole record as JSON keyed by `(entity_id, version)`.
pub trait RecordTable: Versioned + Serialize + DeserializeOwned {
    const LIVE_TABLE: &'static str;
    const HISTORY_TABLE: &'static str;

    /// Columns a patch or rollback may change, in `mutable_values` order
    const MUTABLE_COLUMNS: &'static [&'static str];

    fn created_at_millis(&self) -> i64;

    fn mutable_values(&self) -> Vec<Value>;

    /// Decode a row selected with every live column by name
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn not_found(id: &str) -> LedgerError;
}

impl RecordTable for Tender {
    const LIVE_TABLE: &'static str = "tenders";
    const HISTORY_TABLE: &'static str = "tender_history";
    const MUTABLE_COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "status",
        "service_type",
        "organization_id",
        "creator_id",
    ];

    fn created_at_millis(&self) -> i64 {
        self.created_at.timestamp_millis()
    }

    fn mutable_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.description.clone()),
            Value::Text(self.status.to_string()),
            Value::Text(self.service_type.to_string()),
            Value::Text(self.organization_id.clone()),
            Value::Text(self.creator_id.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Tender {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            status: label(row, "status")?,
            service_type: label(row, "service_type")?,
            organization_id: row.get("organization_id")?,
            creator_id: row.get("creator_id")?,
            version: row.get("version")?,
            created_at: timestamp(row, "created_at")?,
        })
    }

    fn not_found(id: &str) -> LedgerError {
        LedgerError::TenderNotFound {
            tender_id: id.to_string(),
        }
    }
}

impl RecordTable for Bid {
    const LIVE_TABLE: &'static str = "bids";
    const HISTORY_TABLE: &'static str = "bid_history";
    const MUTABLE_COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "status",
        "tender_id",
        "author_type",
        "author_id",
        "organization_id",
        "creator_id",
    ];

    fn created_at_millis(&self) -> i64 {
        self.created_at.timestamp_millis()
    }

    fn mutable_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.description.clone()),
            Value::Text(self.status.to_string()),
            Value::Text(self.tender_id.clone()),
            Value::Text(self.author_type.to_string()),
            Value::Text(self.author_id.clone()),
            Value::Text(self.organization_id.clone()),
            Value::Text(self.creator_id.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Bid {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            status: label(row, "status")?,
            tender_id: row.get("tender_id")?,
            author_type: label(row, "author_type")?,
            author_id: row.get("author_id")?,
            organization_id: row.get("organization_id")?,
            creator_id: row.get("creator_id")?,
            version: row.get("version")?,
            created_at: timestamp(row, "created_at")?,
        })
    }

    fn not_found(id: &str) -> LedgerError {
        LedgerError::BidNotFound {
            bid_id: id.to_string(),
        }
    }
}
