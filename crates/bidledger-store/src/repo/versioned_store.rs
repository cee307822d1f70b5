//! Versioned record store
//!
//! `apply` snapshots the live row into history, applies the patch and bumps
//! the version. `rollback` restores a history snapshot, takes its version and
//! prunes every history row at or above it. The `*_in` variants run inside a
//! caller's transaction so authorization reads and the write share one unit;
//! the plain variants open their own `BEGIN IMMEDIATE` transaction.

use bidledger_core::errors::LedgerError;
use bidledger_core::model::HistoryRecord;
use bidledger_core::versioned::{next_revision, restored_revision};
use bidledger_core_types::RequestContext;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use crate::db::{with_immediate, with_read};
use crate::errors::{from_ledger, from_rusqlite, row_count, snapshot_codec, Result};
use crate::repo::records::RecordTable;
use crate::repo::rows::{timestamp, to_millis, truncate_to_millis};

/// Generic persistence for every [`RecordTable`] kind
pub struct VersionedStore;

impl VersionedStore {
    /// Insert a brand-new record. Its version must be 1 and it has no history.
    ///
    /// Returns the record as it will be read back.
    pub fn insert_new<T: RecordTable>(conn: &Connection, record: &T) -> Result<T> {
        let columns = T::MUTABLE_COLUMNS;
        let placeholders: Vec<String> = (1..=columns.len() + 3).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} (id, {}, version, created_at) VALUES ({})",
            T::LIVE_TABLE,
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut values = vec![rusqlite::types::Value::Text(record.id().to_string())];
        values.extend(record.mutable_values());
        values.push(rusqlite::types::Value::Integer(i64::from(record.version())));
        values.push(rusqlite::types::Value::Integer(record.created_at_millis()));

        conn.execute(&sql, params_from_iter(values))
            .map_err(from_rusqlite)?;
        tracing::debug!(entity_kind = %T::KIND, entity_id = record.id(), "record inserted");

        Self::require(conn, record.id())
    }

    /// Load the live row, if any
    pub fn load<T: RecordTable>(conn: &Connection, id: &str) -> Result<Option<T>> {
        let sql = format!(
            "SELECT id, {}, version, created_at FROM {} WHERE id = ?1",
            T::MUTABLE_COLUMNS.join(", "),
            T::LIVE_TABLE
        );
        conn.query_row(&sql, [id], |row| T::from_row(row))
            .optional()
            .map_err(from_rusqlite)
    }

    /// Load the live row or fail with the kind's not-found error
    pub fn require<T: RecordTable>(conn: &Connection, id: &str) -> Result<T> {
        Self::load(conn, id)?.ok_or_else(|| from_ledger(T::not_found(id)))
    }

    /// Snapshot, patch and bump `id` inside the caller's transaction.
    pub fn apply_in<T: RecordTable>(conn: &Connection, id: &str, patch: &T::Patch) -> Result<T> {
        let current: T = Self::require(conn, id)?;
        let next = next_revision(&current, patch);

        Self::write_history(conn, &current)?;
        Self::overwrite_live(conn, &next, current.version())?;

        tracing::debug!(
            entity_kind = %T::KIND,
            entity_id = id,
            version = next.version(),
            "revision applied"
        );
        Ok(next)
    }

    /// Restore `id` to `target` inside the caller's transaction.
    ///
    /// Rolling back to the live version changes nothing, so repeating a
    /// rollback yields the same state.
    pub fn rollback_in<T: RecordTable>(conn: &Connection, id: &str, target: u32) -> Result<T> {
        let current: T = Self::require(conn, id)?;
        if target == current.version() {
            return Ok(current);
        }
        let snapshot: T = Self::history_at(conn, id, target)?.ok_or_else(|| {
            from_ledger(LedgerError::VersionNotFound {
                kind: T::KIND,
                entity_id: id.to_string(),
                version: target,
            })
        })?;
        let restored = restored_revision(&current, &snapshot);

        Self::overwrite_live(conn, &restored, current.version())?;
        let pruned = conn
            .execute(
                &format!(
                    "DELETE FROM {} WHERE entity_id = ?1 AND version >= ?2",
                    T::HISTORY_TABLE
                ),
                params![id, target],
            )
            .map_err(from_rusqlite)?;

        tracing::debug!(
            entity_kind = %T::KIND,
            entity_id = id,
            version = target,
            pruned,
            "history pruned"
        );
        Ok(restored)
    }

    /// [`Self::apply_in`] in its own immediate transaction
    pub fn apply<T: RecordTable>(
        conn: &mut Connection,
        ctx: &RequestContext,
        id: &str,
        patch: &T::Patch,
    ) -> Result<T> {
        with_immediate(conn, ctx, |tx| Self::apply_in(tx, id, patch))
    }

    /// [`Self::rollback_in`] in its own immediate transaction
    pub fn rollback<T: RecordTable>(
        conn: &mut Connection,
        ctx: &RequestContext,
        id: &str,
        target: u32,
    ) -> Result<T> {
        with_immediate(conn, ctx, |tx| Self::rollback_in(tx, id, target))
    }

    /// Superseded revisions of `id`, ascending by version
    pub fn history<T: RecordTable>(conn: &Connection, id: &str) -> Result<Vec<HistoryRecord<T>>> {
        let sql = format!(
            "SELECT entity_id, version, snapshot, recorded_at FROM {}
             WHERE entity_id = ?1 ORDER BY version ASC",
            T::HISTORY_TABLE
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let raw = stmt
            .query_map([id], |row| {
                Ok((
                    row.get::<_, String>("entity_id")?,
                    row.get::<_, u32>("version")?,
                    row.get::<_, String>("snapshot")?,
                    timestamp(row, "recorded_at")?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        raw.into_iter()
            .map(|(entity_id, version, json, recorded_at)| {
                let snapshot = serde_json::from_str(&json).map_err(|e| snapshot_codec(id, e))?;
                Ok(HistoryRecord {
                    entity_id,
                    version,
                    snapshot,
                    recorded_at,
                })
            })
            .collect()
    }

    /// Version numbers present in history for `id`, ascending
    pub fn history_versions<T: RecordTable>(conn: &Connection, id: &str) -> Result<Vec<u32>> {
        let sql = format!(
            "SELECT version FROM {} WHERE entity_id = ?1 ORDER BY version ASC",
            T::HISTORY_TABLE
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let versions = stmt
            .query_map([id], |row| row.get(0))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<u32>, _>>()
            .map_err(from_rusqlite)?;
        Ok(versions)
    }

    /// History for `id` read in its own snapshot transaction
    pub fn read_history<T: RecordTable>(
        conn: &mut Connection,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<Vec<HistoryRecord<T>>> {
        with_read(conn, ctx, |tx| Self::history(tx, id))
    }

    fn history_at<T: RecordTable>(conn: &Connection, id: &str, version: u32) -> Result<Option<T>> {
        let sql = format!(
            "SELECT snapshot FROM {} WHERE entity_id = ?1 AND version = ?2",
            T::HISTORY_TABLE
        );
        let json: Option<String> = conn
            .query_row(&sql, params![id, version], |row| row.get(0))
            .optional()
            .map_err(from_rusqlite)?;
        json.map(|json| serde_json::from_str(&json).map_err(|e| snapshot_codec(id, e)))
            .transpose()
    }

    fn write_history<T: RecordTable>(conn: &Connection, current: &T) -> Result<()> {
        let json = serde_json::to_string(current).map_err(|e| snapshot_codec(current.id(), e))?;
        let recorded_at = truncate_to_millis(chrono::Utc::now());
        conn.execute(
            &format!(
                "INSERT INTO {} (entity_id, version, snapshot, recorded_at) VALUES (?1, ?2, ?3, ?4)",
                T::HISTORY_TABLE
            ),
            params![current.id(), current.version(), json, to_millis(&recorded_at)],
        )
        .map_err(from_rusqlite)?;
        tracing::debug!(
            entity_kind = %T::KIND,
            entity_id = current.id(),
            version = current.version(),
            "snapshot written"
        );
        Ok(())
    }

    /// Replace the live row's mutable columns and version, guarded on the
    /// version that was read.
    fn overwrite_live<T: RecordTable>(conn: &Connection, next: &T, read_version: u32) -> Result<()> {
        let columns = T::MUTABLE_COLUMNS;
        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect();
        let n = columns.len();
        let sql = format!(
            "UPDATE {} SET {}, version = ?{} WHERE id = ?{} AND version = ?{}",
            T::LIVE_TABLE,
            assignments.join(", "),
            n + 1,
            n + 2,
            n + 3
        );

        let mut values = next.mutable_values();
        values.push(rusqlite::types::Value::Integer(i64::from(next.version())));
        values.push(rusqlite::types::Value::Text(next.id().to_string()));
        values.push(rusqlite::types::Value::Integer(i64::from(read_version)));

        let changed = conn
            .execute(&sql, params_from_iter(values))
            .map_err(from_rusqlite)?;
        if changed != 1 {
            return Err(row_count(next.id(), 1, changed));
        }
        Ok(())
    }
}
