use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full snapshot of a record as it was at `version`, keyed by (entity_id, version)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord<T> {
    pub entity_id: String,
    pub version: u32,
    pub snapshot: T,
    /// When the revision was superseded
    pub recorded_at: DateTime<Utc>,
}
