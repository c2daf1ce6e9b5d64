use rusqlite::Connection;
use wordgraph_core::db::migrations::latest_version;
use wordgraph_core::db::{open_db, open_db_in_memory, schema_version, DbError};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    for table in ["graphs", "words", "links", "word_edges", "words_fts"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn in_memory_stores_are_independent() {
    let first = open_db_in_memory().unwrap();
    first
        .execute(
            "INSERT INTO graphs (uuid, owner_id, name) VALUES ('g', 'u', 'n');",
            [],
        )
        .unwrap();

    let second = open_db_in_memory().unwrap();
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM graphs;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn opening_same_database_twice_is_idempotent_and_uses_wal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wordgraph.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    let mode: String = conn_second
        .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
    let foreign_keys: i64 = conn_second
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn link_pair_uniqueness_is_enforced_by_schema() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO graphs (uuid, owner_id, name) VALUES ('g', 'u', 'n');
         INSERT INTO words (uuid, graph_uuid, owner_id, content) VALUES ('a', 'g', 'u', 'a');
         INSERT INTO words (uuid, graph_uuid, owner_id, content) VALUES ('b', 'g', 'u', 'b');
         INSERT INTO links (uuid, word1_uuid, word2_uuid, owner_id, content)
         VALUES ('l1', 'a', 'b', 'u', 'x');",
    )
    .unwrap();

    let reversed = conn.execute(
        "INSERT INTO links (uuid, word1_uuid, word2_uuid, owner_id, content)
         VALUES ('l2', 'b', 'a', 'u', 'y');",
        [],
    );
    assert!(reversed.is_err());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
