#![allow(clippy::unwrap_used, clippy::expect_used)]

use bidledger_core::errors::LedgerError;
use bidledger_core::logging_facility::init_test_capture;
use bidledger_core::{log_op_end, log_op_error, log_op_start};
use bidledger_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_COMPONENT, FIELD_DURATION_MS, FIELD_ERR_KIND,
    FIELD_ERR_MESSAGE, FIELD_TENDER_ID, FIELD_VERSION,
};
use bidledger_core_types::RequestContext;

#[test]
fn test_start_event_carries_op_name() {
    let capture = init_test_capture();
    let op = "logging_start_probe";

    log_op_start!(op);

    capture.assert_event_exists(op, EVENT_START);
}

#[test]
fn test_end_event_records_duration() {
    let capture = init_test_capture();
    let op = "logging_end_probe";

    log_op_end!(op, duration_ms = 42);

    let ends: Vec<_> = capture
        .events_for_op(op)
        .into_iter()
        .filter(|e| e.event() == Some(EVENT_END))
        .collect();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].field(FIELD_DURATION_MS), Some("42"));
    assert!(ends[0].field(FIELD_COMPONENT).is_some());
}

#[test]
fn test_error_event_carries_stable_code() {
    let capture = init_test_capture();
    let op = "logging_error_probe";

    let err = LedgerError::TenderNotFound {
        tender_id: "t-missing".to_string(),
    };
    log_op_error!(op, err, duration_ms = 7);

    let errors: Vec<_> = capture
        .events_for_op(op)
        .into_iter()
        .filter(|e| e.event() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].err_code(), Some("ERR_NOT_FOUND"));
    assert_eq!(errors[0].field(FIELD_ERR_KIND), Some("NotFound"));
    assert!(errors[0].field(FIELD_ERR_MESSAGE).unwrap().contains("t-missing"));
}

#[test]
fn test_request_scoped_lifecycle() {
    let capture = init_test_capture();
    let ctx = RequestContext::new();
    let request_id = ctx.request_id.to_string();

    log_op_start!("logging_lifecycle_probe", ctx = &ctx, tender_id = "t1");
    log_op_end!("logging_lifecycle_probe", ctx = &ctx, duration_ms = 1, version = 2u32);

    capture.assert_completed(&request_id);
    let events = capture.events_for_request(&request_id);
    assert_eq!(events[0].field(FIELD_TENDER_ID), Some("t1"));
    assert_eq!(events[1].field(FIELD_VERSION), Some("2"));
}

#[test]
fn test_request_scoped_failure() {
    let capture = init_test_capture();
    let ctx = RequestContext::new();
    let request_id = ctx.request_id.to_string();

    log_op_start!("logging_failure_probe", ctx = &ctx);
    log_op_error!(
        "logging_failure_probe",
        ctx = &ctx,
        LedgerError::DeadlineExceeded,
        duration_ms = 3
    );

    capture.assert_failed_with(&request_id, "ERR_STORAGE_FAILURE");
}
