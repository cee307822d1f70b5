mod common;

use bidledger_core::errors::OpErrorKind;
use bidledger_engine::commands::bid::bid_history;
use bidledger_engine::commands::review::{bid_attach_feedback, bid_reviews};
use common::World;

#[test]
fn test_feedback_leaves_bid_version_alone() {
    let mut w = World::new();
    let ctx = w.ctx();
    let tender = w.tender();
    let bid = w.bid(&tender);

    let returned = bid_attach_feedback(&mut w.conn, &ctx, &bid.id, "user1", "Too expensive").unwrap();

    assert_eq!(returned, bid);
    assert!(bid_history(&mut w.conn, &ctx, &bid.id, "user1")
        .unwrap()
        .is_empty());
}

#[test]
fn test_reviews_visible_to_tender_organization() {
    let mut w = World::new();
    let ctx = w.ctx();
    let tender = w.tender();
    let bid = w.bid(&tender);
    bid_attach_feedback(&mut w.conn, &ctx, &bid.id, "user1", "First look").unwrap();
    bid_attach_feedback(&mut w.conn, &ctx, &bid.id, "user1", "Second look").unwrap();

    let reviews = bid_reviews(&mut w.conn, &ctx, &tender.id, "user2", "user1").unwrap();

    assert_eq!(reviews.len(), 2);
    assert!(reviews[0].created_at >= reviews[1].created_at);
    assert!(reviews.iter().all(|r| r.author_id == w.u1.id));
}

#[test]
fn test_feedback_authorization() {
    let mut w = World::new();
    let ctx = w.ctx();
    let tender = w.tender();
    let bid = w.bid(&tender);

    let err = bid_attach_feedback(&mut w.conn, &ctx, &bid.id, "user2", "self praise").unwrap_err();
    assert_eq!(err.kind(), OpErrorKind::Forbidden);

    let err = bid_attach_feedback(&mut w.conn, &ctx, &bid.id, "ghost", "hi").unwrap_err();
    assert_eq!(err.kind(), OpErrorKind::Unauthorized);

    let err = bid_attach_feedback(&mut w.conn, &ctx, "missing", "user1", "hi").unwrap_err();
    assert_eq!(err.kind(), OpErrorKind::NotFound);

    let err = bid_attach_feedback(&mut w.conn, &ctx, &bid.id, "user1", "").unwrap_err();
    assert_eq!(err.kind(), OpErrorKind::ValidationError);

    let err = bid_reviews(&mut w.conn, &ctx, &tender.id, "user2", "user2").unwrap_err();
    assert_eq!(err.kind(), OpErrorKind::Forbidden);

    let err = bid_reviews(&mut w.conn, &ctx, &tender.id, "ghost", "user1").unwrap_err();
    assert_eq!(err.kind(), OpErrorKind::Unauthorized);
}
