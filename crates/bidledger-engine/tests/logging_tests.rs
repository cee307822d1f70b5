mod common;

use bidledger_core::logging_facility::init_test_capture;
use bidledger_core::model::{BidStatus, TenderPatch};
use bidledger_core_types::schema::{
    EVENT_START, FIELD_BID_ID, FIELD_TENDER_ID, FIELD_USERNAME, FIELD_VERSION,
};
use bidledger_engine::commands::bid::bid_change_status;
use bidledger_engine::commands::tender::tender_edit;
use common::World;

#[test]
fn test_successful_operation_logs_start_and_end() {
    let capture = init_test_capture();
    let mut w = World::new();
    let tender = w.tender();
    let ctx = w.ctx();

    tender_edit(
        &mut w.conn,
        &ctx,
        &tender.id,
        "user1",
        &TenderPatch {
            name: Some("Logged".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    capture.assert_completed(ctx.request_id.as_str());
    let events = capture.events_for_request(ctx.request_id.as_str());
    assert_eq!(events[0].event(), Some(EVENT_START));
    assert_eq!(events[0].field(FIELD_TENDER_ID), Some(tender.id.as_str()));
    assert_eq!(events[0].field(FIELD_USERNAME), Some("user1"));
    assert_eq!(events[1].op(), Some("tender_edit"));
    assert_eq!(events[1].field(FIELD_VERSION), Some("2"));
}

#[test]
fn test_bid_operations_log_bid_id() {
    let capture = init_test_capture();
    let mut w = World::new();
    let tender = w.tender();
    let bid = w.bid(&tender);
    let ctx = w.ctx();

    bid_change_status(&mut w.conn, &ctx, &bid.id, "user1", BidStatus::Published).unwrap();

    capture.assert_completed(ctx.request_id.as_str());
    let events = capture.events_for_request(ctx.request_id.as_str());
    assert_eq!(events[0].op(), Some("bid_change_status"));
    assert_eq!(events[0].field(FIELD_BID_ID), Some(bid.id.as_str()));
}

#[test]
fn test_failed_operation_logs_stable_code() {
    let capture = init_test_capture();
    let mut w = World::new();
    let tender = w.tender();
    let ctx = w.ctx();

    let err = tender_edit(
        &mut w.conn,
        &ctx,
        &tender.id,
        "user2",
        &TenderPatch {
            name: Some("Nope".to_string()),
            ..Default::default()
        },
    )
    .unwrap_err();

    assert_eq!(err.request_id(), Some(&ctx.request_id));
    capture.assert_failed_with(ctx.request_id.as_str(), "ERR_FORBIDDEN");
}

#[test]
fn test_failure_carries_caller_trace_id() {
    let mut w = World::new();
    let tender = w.tender();
    let ctx = w.ctx().with_trace_id("trace-from-caller");

    let err = tender_edit(&mut w.conn, &ctx, &tender.id, "user1", &TenderPatch::default())
        .unwrap_err();

    assert_eq!(err.code(), "ERR_VALIDATION");
    assert_eq!(err.op(), Some("tender_edit"));
    assert_eq!(err.trace_id().map(|t| t.as_str()), Some("trace-from-caller"));
}
