use bidledger_core::errors::{LedgerError, OpError, OpErrorKind};
use bidledger_core::model::EntityKind;

#[test]
fn test_missing_tender_is_not_found_with_entity() {
    let err: OpError = LedgerError::TenderNotFound {
        tender_id: "t-404".to_string(),
    }
    .into();

    assert_eq!(err.kind(), OpErrorKind::NotFound);
    assert_eq!(err.code(), "ERR_NOT_FOUND");
    assert_eq!(err.entity_id(), Some("t-404"));
}

#[test]
fn test_unknown_username_is_unauthorized_not_forbidden() {
    let err: OpError = LedgerError::IdentityNotFound {
        username: "ghost".to_string(),
    }
    .into();

    assert_eq!(err.kind(), OpErrorKind::Unauthorized);
    assert_eq!(err.code(), "ERR_UNAUTHORIZED");
}

#[test]
fn test_responsibility_failures_are_forbidden() {
    let cases = [
        LedgerError::NoMembership {
            identity_id: "u1".to_string(),
        },
        LedgerError::NotResponsible {
            identity_id: "u1".to_string(),
            kind: EntityKind::Bid,
            entity_id: "b1".to_string(),
        },
        LedgerError::NotResponsibleForOrganization {
            identity_id: "u1".to_string(),
            organization_id: "org-2".to_string(),
        },
    ];

    for case in cases {
        let err: OpError = case.into();
        assert_eq!(err.code(), "ERR_FORBIDDEN");
    }
}

#[test]
fn test_transition_error_names_both_statuses() {
    let err: OpError = LedgerError::InvalidTransition {
        kind: EntityKind::Tender,
        from: "Closed".to_string(),
        to: "Published".to_string(),
    }
    .into();

    assert_eq!(err.kind(), OpErrorKind::InvalidTransition);
    assert!(err.message().contains("Closed -> Published"));
}

#[test]
fn test_validation_family() {
    for case in [
        LedgerError::EmptyPatch {
            entity_id: "t1".to_string(),
        },
        LedgerError::InvalidField {
            field: "name".to_string(),
            reason: "too long".to_string(),
        },
        LedgerError::UnknownLabel {
            vocabulary: "tender status".to_string(),
            value: "OPEN".to_string(),
        },
    ] {
        let err: OpError = case.into();
        assert_eq!(err.kind(), OpErrorKind::ValidationError);
        assert!(!err.kind().is_retryable());
    }
}

#[test]
fn test_deadline_is_retryable_storage_failure() {
    let err: OpError = LedgerError::DeadlineExceeded.into();

    assert_eq!(err.kind(), OpErrorKind::StorageFailure);
    assert!(err.kind().is_retryable());
}

#[test]
fn test_display_includes_code_and_op() {
    let err = OpError::new(OpErrorKind::Forbidden)
        .with_op("bid_edit")
        .with_entity_id("b1")
        .with_message("not responsible");

    let rendered = err.to_string();
    assert!(rendered.contains("ERR_FORBIDDEN"));
    assert!(rendered.contains("bid_edit"));
    assert!(rendered.contains("b1"));
}
