//! Bid feedback rows; written once, never updated

use bidledger_core::model::Feedback;
use rusqlite::{params, Connection};

use crate::errors::{from_rusqlite, Result};
use crate::repo::rows::{timestamp, to_millis};

pub struct FeedbackRepo;

impl FeedbackRepo {
    pub fn insert(conn: &Connection, feedback: &Feedback) -> Result<()> {
        conn.execute(
            "INSERT INTO bid_feedback (id, bid_id, author_id, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                feedback.id,
                feedback.bid_id,
                feedback.author_id,
                feedback.description,
                to_millis(&feedback.created_at),
            ],
        )
        .map_err(from_rusqlite)?;
        tracing::debug!(bid_id = %feedback.bid_id, feedback_id = %feedback.id, "feedback stored");
        Ok(())
    }

    /// Feedback on one bid, newest first
    pub fn list_for_bid(conn: &Connection, bid_id: &str) -> Result<Vec<Feedback>> {
        Self::query(
            conn,
            "SELECT f.id, f.bid_id, f.author_id, f.description, f.created_at
             FROM bid_feedback f
             WHERE f.bid_id = ?1
             ORDER BY f.created_at DESC, f.id DESC",
            params![bid_id],
        )
    }

    /// Feedback left on the bids that `author_id` authored or submitted for
    /// `tender_id`, newest first
    pub fn list_for_author_on_tender(
        conn: &Connection,
        tender_id: &str,
        author_id: &str,
    ) -> Result<Vec<Feedback>> {
        Self::query(
            conn,
            "SELECT f.id, f.bid_id, f.author_id, f.description, f.created_at
             FROM bid_feedback f
             JOIN bids b ON b.id = f.bid_id
             WHERE b.tender_id = ?1 AND (b.author_id = ?2 OR b.creator_id = ?2)
             ORDER BY f.created_at DESC, f.id DESC",
            params![tender_id, author_id],
        )
    }

    fn query(conn: &Connection, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Feedback>> {
        let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params, |row| {
                Ok(Feedback {
                    id: row.get("id")?,
                    bid_id: row.get("bid_id")?,
                    author_id: row.get("author_id")?,
                    description: row.get("description")?,
                    created_at: timestamp(row, "created_at")?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }
}
