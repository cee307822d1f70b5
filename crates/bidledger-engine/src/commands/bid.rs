//! Bid operations
//!
//! A bid belongs to the organization of the tender it targets. Editing,
//! status changes and rollback require responsibility for that organization
//! (bid ownership is organizational, not authorship). Decisions are taken by
//! whoever is responsible for the tender.

use std::time::Instant;

use bidledger_core::errors::LedgerError;
use bidledger_core::lifecycle::validate_transition;
use bidledger_core::model::{
    new_record_id, AuthorType, Bid, BidDecision, BidPatch, BidStatus, EntityKind, HistoryRecord,
    NewBid, Tender,
};
use bidledger_core::rules::validation::validate_version;
use bidledger_core::{log_op_end, log_op_start};
use bidledger_core_types::RequestContext;
use bidledger_store::db::{with_immediate, with_read};
use bidledger_store::errors::Result;
use bidledger_store::VersionedStore;
use rusqlite::Connection;

use super::{elapsed_ms, failed, gate};

/// Submit a bid against a tender.
///
/// The creator must hold a membership. A `User` author must be an existing
/// identity; an `Organization` author must be the creator's organization.
/// The bid's owning organization is copied from the tender.
///
/// ## Errors
///
/// - `ValidationError`: malformed input
/// - `Unauthorized`: unknown creator, or unknown `User` author
/// - `Forbidden`: creator without membership, or foreign `Organization` author
/// - `NotFound`: tender does not exist
/// - `StorageFailure`
pub fn bid_create(conn: &mut Connection, ctx: &RequestContext, request: &NewBid) -> Result<Bid> {
    log_op_start!(
        "bid_create",
        ctx = ctx,
        tender_id = %request.tender_id,
        username = %request.creator_username
    );
    let start = Instant::now();

    let bid =
        bid_create_impl(conn, ctx, request).map_err(|e| failed("bid_create", ctx, start, e))?;

    log_op_end!(
        "bid_create",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        bid_id = %bid.id
    );
    Ok(bid)
}

fn bid_create_impl(conn: &mut Connection, ctx: &RequestContext, request: &NewBid) -> Result<Bid> {
    request.validate()?;

    with_immediate(conn, ctx, |tx| {
        let auth = gate(tx);
        let creator = auth.resolve_identity(&request.creator_username)?;
        let organization = auth.require_membership(&creator)?;
        let tender = VersionedStore::require::<Tender>(tx, &request.tender_id)?;

        match request.author_type {
            AuthorType::User => auth.require_identity_exists(&request.author_id)?,
            AuthorType::Organization => {
                if organization.as_str() != request.author_id {
                    return Err(LedgerError::NotResponsibleForOrganization {
                        identity_id: creator.to_string(),
                        organization_id: request.author_id.clone(),
                    }
                    .into());
                }
            }
        }

        let bid = Bid::new(
            new_record_id(),
            request.name.clone(),
            request.description.clone(),
            tender.id,
            request.author_type,
            request.author_id.clone(),
            tender.organization_id,
            creator.to_string(),
        );
        VersionedStore::insert_new(tx, &bid)
    })
}

/// Apply a sparse edit to a bid's name or description.
///
/// ## Errors
///
/// - `ValidationError`: empty patch, status in patch, or bad field
/// - `Unauthorized` / `Forbidden` / `NotFound`
/// - `StorageFailure`
pub fn bid_edit(
    conn: &mut Connection,
    ctx: &RequestContext,
    bid_id: &str,
    username: &str,
    patch: &BidPatch,
) -> Result<Bid> {
    log_op_start!("bid_edit", ctx = ctx, bid_id = bid_id, username = username);
    let start = Instant::now();

    let bid = bid_edit_impl(conn, ctx, bid_id, username, patch)
        .map_err(|e| failed("bid_edit", ctx, start, e))?;

    log_op_end!(
        "bid_edit",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        bid_id = bid_id,
        version = bid.version
    );
    Ok(bid)
}

fn bid_edit_impl(
    conn: &mut Connection,
    ctx: &RequestContext,
    bid_id: &str,
    username: &str,
    patch: &BidPatch,
) -> Result<Bid> {
    patch.validate_edit(bid_id)?;

    with_immediate(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_owner(&identity, bid_id)?;
        VersionedStore::apply_in::<Bid>(tx, bid_id, patch)
    })
}

/// Move a bid to `Published` or `Canceled` through the bid state machine.
///
/// `Approved` and `Rejected` are reached only through
/// [`bid_record_decision`] and are refused here.
///
/// ## Errors
///
/// - `Unauthorized` / `Forbidden` / `NotFound`
/// - `InvalidTransition`
/// - `StorageFailure`
pub fn bid_change_status(
    conn: &mut Connection,
    ctx: &RequestContext,
    bid_id: &str,
    username: &str,
    target: BidStatus,
) -> Result<Bid> {
    log_op_start!(
        "bid_change_status",
        ctx = ctx,
        bid_id = bid_id,
        username = username,
        target = %target
    );
    let start = Instant::now();

    let bid = with_immediate(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_owner(&identity, bid_id)?;

        let current = VersionedStore::require::<Bid>(tx, bid_id)?;
        if matches!(target, BidStatus::Approved | BidStatus::Rejected) {
            return Err(LedgerError::InvalidTransition {
                kind: EntityKind::Bid,
                from: current.status.to_string(),
                to: target.to_string(),
            }
            .into());
        }
        validate_transition(current.status, target)?;
        VersionedStore::apply_in::<Bid>(tx, bid_id, &BidPatch::status(target))
    })
    .map_err(|e| failed("bid_change_status", ctx, start, e))?;

    log_op_end!(
        "bid_change_status",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        bid_id = bid_id,
        version = bid.version
    );
    Ok(bid)
}

/// Approve or reject a published bid on behalf of the tender's organization.
///
/// ## Errors
///
/// - `Unauthorized`: unknown username
/// - `Forbidden`: caller not responsible for the tender the bid targets
/// - `NotFound`: bid does not exist
/// - `InvalidTransition`: bid is not `Published`
/// - `StorageFailure`
pub fn bid_record_decision(
    conn: &mut Connection,
    ctx: &RequestContext,
    bid_id: &str,
    username: &str,
    decision: BidDecision,
) -> Result<Bid> {
    log_op_start!(
        "bid_record_decision",
        ctx = ctx,
        bid_id = bid_id,
        username = username,
        decision = %decision
    );
    let start = Instant::now();

    let bid = with_immediate(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_membership(&identity)?;

        let current = VersionedStore::require::<Bid>(tx, bid_id)?;
        auth.require_responsible(&identity, EntityKind::Tender, &current.tender_id)?;

        let target = decision.target_status();
        validate_transition(current.status, target)?;
        VersionedStore::apply_in::<Bid>(tx, bid_id, &BidPatch::status(target))
    })
    .map_err(|e| failed("bid_record_decision", ctx, start, e))?;

    log_op_end!(
        "bid_record_decision",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        bid_id = bid_id,
        status = %bid.status,
        version = bid.version
    );
    Ok(bid)
}

/// Restore a bid to an earlier version without consulting the state machine.
///
/// ## Errors
///
/// - `ValidationError`: version 0
/// - `Unauthorized` / `Forbidden` / `NotFound` (including unknown version)
/// - `StorageFailure`
pub fn bid_rollback(
    conn: &mut Connection,
    ctx: &RequestContext,
    bid_id: &str,
    version: u32,
    username: &str,
) -> Result<Bid> {
    log_op_start!(
        "bid_rollback",
        ctx = ctx,
        bid_id = bid_id,
        username = username,
        target_version = version
    );
    let start = Instant::now();

    let bid = bid_rollback_impl(conn, ctx, bid_id, version, username)
        .map_err(|e| failed("bid_rollback", ctx, start, e))?;

    log_op_end!(
        "bid_rollback",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        bid_id = bid_id,
        version = bid.version
    );
    Ok(bid)
}

fn bid_rollback_impl(
    conn: &mut Connection,
    ctx: &RequestContext,
    bid_id: &str,
    version: u32,
    username: &str,
) -> Result<Bid> {
    validate_version(version)?;

    with_immediate(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_owner(&identity, bid_id)?;
        VersionedStore::rollback_in::<Bid>(tx, bid_id, version)
    })
}

/// Current status of a bid the caller's organization owns
pub fn bid_status(
    conn: &mut Connection,
    ctx: &RequestContext,
    bid_id: &str,
    username: &str,
) -> Result<BidStatus> {
    log_op_start!("bid_status", ctx = ctx, bid_id = bid_id);
    let start = Instant::now();

    let status = with_read(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_owner(&identity, bid_id)?;
        Ok(VersionedStore::require::<Bid>(tx, bid_id)?.status)
    })
    .map_err(|e| failed("bid_status", ctx, start, e))?;

    log_op_end!("bid_status", ctx = ctx, duration_ms = elapsed_ms(start));
    Ok(status)
}

/// Superseded versions of a bid, oldest first
pub fn bid_history(
    conn: &mut Connection,
    ctx: &RequestContext,
    bid_id: &str,
    username: &str,
) -> Result<Vec<HistoryRecord<Bid>>> {
    log_op_start!("bid_history", ctx = ctx, bid_id = bid_id);
    let start = Instant::now();

    let history = with_read(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_owner(&identity, bid_id)?;
        VersionedStore::history::<Bid>(tx, bid_id)
    })
    .map_err(|e| failed("bid_history", ctx, start, e))?;

    log_op_end!(
        "bid_history",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        records = history.len()
    );
    Ok(history)
}
