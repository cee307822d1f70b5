mod common;

use bidledger_core::model::{new_record_id, Feedback};
use bidledger_store::FeedbackRepo;
use common::Fixture;

#[test]
fn test_feedback_listed_newest_first() {
    let fx = Fixture::new();
    let tender = fx.tender();
    let bid = fx.bid(&tender);

    let mut first = Feedback::new(new_record_id(), bid.id.clone(), fx.user.id.clone(), "slow".into());
    first.created_at -= chrono::Duration::seconds(10);
    let second = Feedback::new(new_record_id(), bid.id.clone(), fx.user.id.clone(), "fast".into());
    FeedbackRepo::insert(&fx.conn, &first).unwrap();
    FeedbackRepo::insert(&fx.conn, &second).unwrap();

    let listed = FeedbackRepo::list_for_bid(&fx.conn, &bid.id).unwrap();
    let texts: Vec<&str> = listed.iter().map(|f| f.description.as_str()).collect();
    assert_eq!(texts, vec!["fast", "slow"]);
}

#[test]
fn test_reviews_scoped_to_author_and_tender() {
    let fx = Fixture::new();
    let tender = fx.tender();
    let other_tender = fx.tender();
    let bid = fx.bid(&tender);
    let other_bid = fx.bid(&other_tender);

    for (bid_id, text) in [(&bid.id, "on target"), (&other_bid.id, "elsewhere")] {
        let feedback = Feedback::new(new_record_id(), bid_id.clone(), fx.user.id.clone(), text.into());
        FeedbackRepo::insert(&fx.conn, &feedback).unwrap();
    }

    let reviews = FeedbackRepo::list_for_author_on_tender(&fx.conn, &tender.id, &fx.user.id).unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].description, "on target");

    let none = FeedbackRepo::list_for_author_on_tender(&fx.conn, &tender.id, "someone-else").unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_feedback_requires_existing_bid() {
    let fx = Fixture::new();
    let orphan = Feedback::new(new_record_id(), "no-bid".into(), fx.user.id.clone(), "text".into());

    assert!(FeedbackRepo::insert(&fx.conn, &orphan).is_err());
}
