use bidledger_store::migrations::{applied_migrations, apply_migrations};
use rusqlite::Connection;

fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = Connection::open_in_memory().unwrap();

    apply_migrations(&mut conn).unwrap();

    let tables = table_names(&conn);
    for expected in [
        "schema_version",
        "employee",
        "organization",
        "organization_responsible",
        "tenders",
        "tender_history",
        "bids",
        "bid_history",
        "bid_feedback",
    ] {
        assert!(tables.contains(&expected.to_string()), "missing table {expected}");
    }
}

#[test]
fn test_migrations_recorded_in_order_with_checksums() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    assert_eq!(
        applied_migrations(&conn).unwrap(),
        vec!["001_directory", "002_versioned_records", "003_bid_feedback"]
    );

    let checksums: Vec<String> = conn
        .prepare("SELECT checksum FROM schema_version")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert!(checksums.iter().all(|c| c.len() == 64));
}

#[test]
fn test_reapplying_is_a_no_op() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 3);
}

#[test]
fn test_status_column_rejects_unknown_labels() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    conn.execute_batch(
        "INSERT INTO organization (id, name, created_at) VALUES ('o1', 'Acme', 0);
         INSERT INTO employee (id, username, created_at) VALUES ('u1', 'alice', 0);",
    )
    .unwrap();

    let result = conn.execute(
        "INSERT INTO tenders (id, name, description, status, service_type, organization_id,
                              creator_id, version, created_at)
         VALUES ('t1', 'n', 'd', 'CREATED', 'Delivery', 'o1', 'u1', 1, 0)",
        [],
    );
    assert!(result.is_err());
}
