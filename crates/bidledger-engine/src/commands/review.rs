//! Feedback on bids, written and read by the tender's organization

use std::time::Instant;

use bidledger_core::model::feedback::validate_feedback_text;
use bidledger_core::model::{new_record_id, Bid, EntityKind, Feedback};
use bidledger_core::{log_op_end, log_op_start};
use bidledger_core_types::RequestContext;
use bidledger_store::db::{with_immediate, with_read};
use bidledger_store::errors::Result;
use bidledger_store::{FeedbackRepo, VersionedStore};
use rusqlite::Connection;

use super::{elapsed_ms, failed, gate};

/// Attach review text to a bid. The bid itself, including its version, is
/// unchanged and returned as is.
///
/// ## Errors
///
/// - `ValidationError`: text blank or longer than 1000 characters
/// - `Unauthorized`: unknown username
/// - `Forbidden`: caller not responsible for the tender the bid targets
/// - `NotFound`: bid does not exist
/// - `StorageFailure`
pub fn bid_attach_feedback(
    conn: &mut Connection,
    ctx: &RequestContext,
    bid_id: &str,
    username: &str,
    text: &str,
) -> Result<Bid> {
    log_op_start!("bid_attach_feedback", ctx = ctx, bid_id = bid_id, username = username);
    let start = Instant::now();

    let bid = bid_attach_feedback_impl(conn, ctx, bid_id, username, text)
        .map_err(|e| failed("bid_attach_feedback", ctx, start, e))?;

    log_op_end!(
        "bid_attach_feedback",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        bid_id = bid_id
    );
    Ok(bid)
}

fn bid_attach_feedback_impl(
    conn: &mut Connection,
    ctx: &RequestContext,
    bid_id: &str,
    username: &str,
    text: &str,
) -> Result<Bid> {
    validate_feedback_text(text)?;

    with_immediate(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_membership(&identity)?;

        let bid = VersionedStore::require::<Bid>(tx, bid_id)?;
        auth.require_responsible(&identity, EntityKind::Tender, &bid.tender_id)?;

        let feedback = Feedback::new(
            new_record_id(),
            bid.id.clone(),
            identity.to_string(),
            text.to_string(),
        );
        FeedbackRepo::insert(tx, &feedback)?;
        Ok(bid)
    })
}

/// Feedback left on the bids `author_username` submitted for a tender,
/// newest first. Only the tender's organization may read it.
///
/// ## Errors
///
/// - `Unauthorized`: either username unknown
/// - `Forbidden`: requester not responsible for the tender
/// - `NotFound`: tender does not exist
/// - `StorageFailure`
pub fn bid_reviews(
    conn: &mut Connection,
    ctx: &RequestContext,
    tender_id: &str,
    author_username: &str,
    requester_username: &str,
) -> Result<Vec<Feedback>> {
    log_op_start!(
        "bid_reviews",
        ctx = ctx,
        tender_id = tender_id,
        author = author_username,
        username = requester_username
    );
    let start = Instant::now();

    let reviews = with_read(conn, ctx, |tx| {
        let auth = gate(tx);
        let requester = auth.resolve_identity(requester_username)?;
        let author = auth.resolve_identity(author_username)?;
        auth.require_responsible(&requester, EntityKind::Tender, tender_id)?;
        FeedbackRepo::list_for_author_on_tender(tx, tender_id, author.as_str())
    })
    .map_err(|e| failed("bid_reviews", ctx, start, e))?;

    log_op_end!(
        "bid_reviews",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        records = reviews.len()
    );
    Ok(reviews)
}
