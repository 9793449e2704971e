//! Migration framework integration tests

use narcotrack_store::{db, migrations};

#[test]
fn test_fresh_database_gets_full_schema() {
    let mut conn = db::open_in_memory().unwrap();
    db::configure(&conn).unwrap();
    migrations::apply_migrations(&mut conn).unwrap();

    for table in [
        "medications",
        "adjustments",
        "reporting_periods",
        "provenance_events",
        "schema_version",
    ] {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1, "table {} should exist", table);
    }
}

#[test]
fn test_migrations_recorded_with_checksums() {
    let mut conn = db::open_in_memory().unwrap();
    migrations::apply_migrations(&mut conn).unwrap();

    let rows: Vec<(String, Option<String>)> = conn
        .prepare("SELECT migration_id, checksum FROM schema_version ORDER BY migration_id")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, "001_initial_schema");
    assert_eq!(rows[1].0, "002_provenance_events");
    for (_, checksum) in rows {
        assert_eq!(checksum.expect("checksum recorded").len(), 64);
    }
}

#[test]
fn test_reapplication_is_idempotent() {
    let mut conn = db::open_in_memory().unwrap();
    migrations::apply_migrations(&mut conn).unwrap();
    migrations::apply_migrations(&mut conn).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_persisted_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.db");

    {
        let mut conn = db::open(&path).unwrap();
        db::configure(&conn).unwrap();
        migrations::apply_migrations(&mut conn).unwrap();
    }

    let mut conn = db::open(&path).unwrap();
    db::configure(&conn).unwrap();
    migrations::apply_migrations(&mut conn).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}
