//! Tender operations

use std::time::Instant;

use bidledger_core::lifecycle::validate_transition;
use bidledger_core::model::{
    new_record_id, EntityKind, HistoryRecord, NewTender, Tender, TenderPatch, TenderStatus,
};
use bidledger_core::rules::validation::validate_version;
use bidledger_core::{log_op_end, log_op_start};
use bidledger_core_types::RequestContext;
use bidledger_store::db::{with_immediate, with_read};
use bidledger_store::errors::Result;
use bidledger_store::VersionedStore;
use rusqlite::Connection;

use super::{elapsed_ms, failed, gate};

/// Create a tender at version 1 in status `Created`.
///
/// The creator must be responsible for `request.organization_id`.
///
/// ## Errors
///
/// - `ValidationError`: name or description out of bounds
/// - `Unauthorized`: unknown creator username
/// - `Forbidden`: creator not responsible for the organization
/// - `StorageFailure`: database error or expired deadline
pub fn tender_create(
    conn: &mut Connection,
    ctx: &RequestContext,
    request: &NewTender,
) -> Result<Tender> {
    log_op_start!(
        "tender_create",
        ctx = ctx,
        organization_id = %request.organization_id,
        username = %request.creator_username
    );
    let start = Instant::now();

    let tender = tender_create_impl(conn, ctx, request)
        .map_err(|e| failed("tender_create", ctx, start, e))?;

    log_op_end!(
        "tender_create",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        tender_id = %tender.id
    );
    Ok(tender)
}

fn tender_create_impl(
    conn: &mut Connection,
    ctx: &RequestContext,
    request: &NewTender,
) -> Result<Tender> {
    request.validate()?;

    with_immediate(conn, ctx, |tx| {
        let auth = gate(tx);
        let creator = auth.resolve_identity(&request.creator_username)?;
        auth.require_organization(&creator, &request.organization_id)?;

        let tender = Tender::new(
            new_record_id(),
            request.name.clone(),
            request.description.clone(),
            request.service_type,
            request.organization_id.clone(),
            creator.to_string(),
        );
        VersionedStore::insert_new(tx, &tender)
    })
}

/// Apply a sparse edit to a tender's name, description or service type.
///
/// ## Errors
///
/// - `ValidationError`: empty patch, status in patch, or bad field
/// - `Unauthorized` / `Forbidden` / `NotFound`
/// - `StorageFailure`
pub fn tender_edit(
    conn: &mut Connection,
    ctx: &RequestContext,
    tender_id: &str,
    username: &str,
    patch: &TenderPatch,
) -> Result<Tender> {
    log_op_start!("tender_edit", ctx = ctx, tender_id = tender_id, username = username);
    let start = Instant::now();

    let tender = tender_edit_impl(conn, ctx, tender_id, username, patch)
        .map_err(|e| failed("tender_edit", ctx, start, e))?;

    log_op_end!(
        "tender_edit",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        tender_id = tender_id,
        version = tender.version
    );
    Ok(tender)
}

fn tender_edit_impl(
    conn: &mut Connection,
    ctx: &RequestContext,
    tender_id: &str,
    username: &str,
    patch: &TenderPatch,
) -> Result<Tender> {
    patch.validate_edit(tender_id)?;

    with_immediate(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_responsible(&identity, EntityKind::Tender, tender_id)?;
        VersionedStore::apply_in::<Tender>(tx, tender_id, patch)
    })
}

/// Move a tender to `target` through the tender state machine.
///
/// ## Errors
///
/// - `Unauthorized` / `Forbidden` / `NotFound`
/// - `InvalidTransition`: `target` is not reachable from the current status
/// - `StorageFailure`
pub fn tender_change_status(
    conn: &mut Connection,
    ctx: &RequestContext,
    tender_id: &str,
    username: &str,
    target: TenderStatus,
) -> Result<Tender> {
    log_op_start!(
        "tender_change_status",
        ctx = ctx,
        tender_id = tender_id,
        username = username,
        target = %target
    );
    let start = Instant::now();

    let tender = with_immediate(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_responsible(&identity, EntityKind::Tender, tender_id)?;

        let current = VersionedStore::require::<Tender>(tx, tender_id)?;
        validate_transition(current.status, target)?;
        VersionedStore::apply_in::<Tender>(tx, tender_id, &TenderPatch::status(target))
    })
    .map_err(|e| failed("tender_change_status", ctx, start, e))?;

    log_op_end!(
        "tender_change_status",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        tender_id = tender_id,
        version = tender.version
    );
    Ok(tender)
}

/// Restore a tender to an earlier version. The state machine is not
/// consulted: the restored status is whatever that version held.
///
/// ## Errors
///
/// - `ValidationError`: version 0
/// - `Unauthorized` / `Forbidden` / `NotFound` (including unknown version)
/// - `StorageFailure`
pub fn tender_rollback(
    conn: &mut Connection,
    ctx: &RequestContext,
    tender_id: &str,
    version: u32,
    username: &str,
) -> Result<Tender> {
    log_op_start!(
        "tender_rollback",
        ctx = ctx,
        tender_id = tender_id,
        username = username,
        target_version = version
    );
    let start = Instant::now();

    let tender = tender_rollback_impl(conn, ctx, tender_id, version, username)
        .map_err(|e| failed("tender_rollback", ctx, start, e))?;

    log_op_end!(
        "tender_rollback",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        tender_id = tender_id,
        version = tender.version
    );
    Ok(tender)
}

fn tender_rollback_impl(
    conn: &mut Connection,
    ctx: &RequestContext,
    tender_id: &str,
    version: u32,
    username: &str,
) -> Result<Tender> {
    validate_version(version)?;

    with_immediate(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_responsible(&identity, EntityKind::Tender, tender_id)?;
        VersionedStore::rollback_in::<Tender>(tx, tender_id, version)
    })
}

/// Current status of a tender the caller is responsible for
pub fn tender_status(
    conn: &mut Connection,
    ctx: &RequestContext,
    tender_id: &str,
    username: &str,
) -> Result<TenderStatus> {
    log_op_start!("tender_status", ctx = ctx, tender_id = tender_id);
    let start = Instant::now();

    let status = with_read(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_responsible(&identity, EntityKind::Tender, tender_id)?;
        Ok(VersionedStore::require::<Tender>(tx, tender_id)?.status)
    })
    .map_err(|e| failed("tender_status", ctx, start, e))?;

    log_op_end!("tender_status", ctx = ctx, duration_ms = elapsed_ms(start));
    Ok(status)
}

/// Superseded versions of a tender, oldest first
pub fn tender_history(
    conn: &mut Connection,
    ctx: &RequestContext,
    tender_id: &str,
    username: &str,
) -> Result<Vec<HistoryRecord<Tender>>> {
    log_op_start!("tender_history", ctx = ctx, tender_id = tender_id);
    let start = Instant::now();

    let history = with_read(conn, ctx, |tx| {
        let auth = gate(tx);
        let identity = auth.resolve_identity(username)?;
        auth.require_responsible(&identity, EntityKind::Tender, tender_id)?;
        VersionedStore::history::<Tender>(tx, tender_id)
    })
    .map_err(|e| failed("tender_history", ctx, start, e))?;

    log_op_end!(
        "tender_history",
        ctx = ctx,
        duration_ms = elapsed_ms(start),
        records = history.len()
    );
    Ok(history)
}
