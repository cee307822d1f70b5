//! Row decoding helpers shared by the repositories

use std::str::FromStr;

use bidledger_core::errors::LedgerError;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

pub(crate) fn to_millis(at: &DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Read a Unix-millisecond column
pub(crate) fn timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(column)?;
    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(column_index(row, column), millis)
    })
}

/// Read a text column holding one of the closed label vocabularies
pub(crate) fn label<L>(row: &Row<'_>, column: &str) -> rusqlite::Result<L>
where
    L: FromStr<Err = LedgerError>,
{
    let raw: String = row.get(column)?;
    raw.parse::<L>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column_index(row, column), Type::Text, Box::new(e))
    })
}

fn column_index(row: &Row<'_>, column: &str) -> usize {
    row.as_ref().column_index(column).unwrap_or(0)
}

/// Drop sub-millisecond precision so a value survives a round trip through
/// the database unchanged.
pub(crate) fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(at.timestamp_millis())
        .single()
        .unwrap_or(at)
}
