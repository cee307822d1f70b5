// Concurrent writers on separate connections against one database file.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use bidledger_core::model::{BidPatch, Tender, TenderPatch};
use bidledger_engine::commands::bid::bid_edit;
use bidledger_engine::commands::tender::{tender_edit, tender_history};
use bidledger_engine::Settings;
use bidledger_store::migrations::applied_migrations;
use bidledger_store::VersionedStore;
use common::World;
use tempfile::TempDir;

const WRITERS: usize = 4;
const EDITS_PER_WRITER: usize = 5;

#[test]
fn test_concurrent_edits_produce_gapless_versions() {
    let mut w = World::new();
    let tender = w.tender();
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let settings = w.settings.clone();
            let tender_id = tender.id.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut conn = settings.connect().unwrap();
                barrier.wait();
                let mut versions = Vec::new();
                for i in 0..EDITS_PER_WRITER {
                    let ctx = settings.request_context();
                    let patch = TenderPatch {
                        description: Some(format!("writer {writer} edit {i}")),
                        ..Default::default()
                    };
                    let updated = tender_edit(&mut conn, &ctx, &tender_id, "user1", &patch).unwrap();
                    versions.push(updated.version);
                }
                versions
            })
        })
        .collect();

    let mut all_versions: Vec<u32> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    all_versions.sort_unstable();

    let total = (WRITERS * EDITS_PER_WRITER) as u32;
    let expected: Vec<u32> = (2..=total + 1).collect();
    assert_eq!(all_versions, expected);

    let ctx = w.ctx();
    let history: Vec<u32> = tender_history(&mut w.conn, &ctx, &tender.id, "user1")
        .unwrap()
        .iter()
        .map(|h| h.version)
        .collect();
    let prefix: Vec<u32> = (1..=total).collect();
    assert_eq!(history, prefix);

    let live = VersionedStore::require::<Tender>(&w.conn, &tender.id).unwrap();
    assert_eq!(live.version, total + 1);
}

#[test]
fn test_writers_on_different_records_do_not_interfere() {
    let mut w = World::new();
    let tender = w.tender();
    let bid = w.bid(&tender);

    let tender_writer = {
        let settings = w.settings.clone();
        let id = tender.id.clone();
        thread::spawn(move || {
            let mut conn = settings.connect().unwrap();
            for i in 0..EDITS_PER_WRITER {
                let ctx = settings.request_context();
                let patch = TenderPatch {
                    name: Some(format!("tender {i}")),
                    ..Default::default()
                };
                tender_edit(&mut conn, &ctx, &id, "user1", &patch).unwrap();
            }
        })
    };
    let bid_writer = {
        let settings = w.settings.clone();
        let id = bid.id.clone();
        thread::spawn(move || {
            let mut conn = settings.connect().unwrap();
            for i in 0..EDITS_PER_WRITER {
                let ctx = settings.request_context();
                let patch = BidPatch {
                    name: Some(format!("bid {i}")),
                    ..Default::default()
                };
                bid_edit(&mut conn, &ctx, &id, "user1", &patch).unwrap();
            }
        })
    };
    tender_writer.join().unwrap();
    bid_writer.join().unwrap();

    let tender_now = VersionedStore::require::<Tender>(&w.conn, &tender.id).unwrap();
    let bid_now = VersionedStore::require::<bidledger_core::model::Bid>(&w.conn, &bid.id).unwrap();
    assert_eq!(tender_now.version, 1 + EDITS_PER_WRITER as u32);
    assert_eq!(bid_now.version, 1 + EDITS_PER_WRITER as u32);
}

#[test]
fn test_concurrent_openers_migrate_fresh_database_once() {
    for _ in 0..10 {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            database_path: dir.path().join("fresh.db"),
            ..Settings::default()
        };
        let barrier = Arc::new(Barrier::new(WRITERS));

        let handles: Vec<_> = (0..WRITERS)
            .map(|_| {
                let settings = settings.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    settings.open_store().map(|_| ())
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let conn = settings.connect().unwrap();
        assert_eq!(
            applied_migrations(&conn).unwrap(),
            vec!["001_directory", "002_versioned_records", "003_bid_feedback"]
        );
    }
}
