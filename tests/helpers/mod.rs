#![allow(dead_code)]

use chainer::db;
use chainer::engine::RuleKind;
use chainer::store::{knowledge, rules};
use rusqlite::Connection;

/// Open a fresh in-memory database with schema initialized.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.pragma_update(None, "foreign_keys", "ON").unwrap();
    db::schema::init_schema(&conn).unwrap();
    conn
}

/// Insert a rule through the store. Returns its code.
pub fn insert_rule(conn: &Connection, name: &str, position: i64, kind: RuleKind, definition: &str) -> i64 {
    rules::save_rule(
        conn,
        &rules::NewRule {
            name,
            position,
            kind,
            definition,
        },
    )
    .unwrap()
}

/// Insert a rule row directly, bypassing definition validation.
pub fn insert_raw_rule(conn: &Connection, name: &str, position: i64, kind: i64, definition: &str) -> i64 {
    conn.execute(
        "INSERT INTO rules (name, position, kind, definition) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![name, position, kind, definition],
    )
    .unwrap();
    conn.last_insert_rowid()
}

/// Insert a knowledge entry with an explicit code, so rules can refer to it.
pub fn insert_knowledge_with_code(conn: &Connection, code: i64, name: &str, classification: i64) {
    conn.execute(
        "INSERT INTO knowledge (code, name, classification) VALUES (?1, ?2, ?3)",
        rusqlite::params![code, name, classification],
    )
    .unwrap();
}

/// Insert a knowledge entry through the store. Returns its code.
pub fn insert_knowledge(conn: &Connection, name: &str, classification: i64) -> i64 {
    knowledge::save_knowledge(conn, name, classification).unwrap()
}

/// The two-rule chain: `1+2=3` (intermediate), then `3+4=5` (terminal), with
/// knowledge entry 5.
pub fn seed_chain(conn: &Connection) {
    insert_rule(conn, "one-two", 1, RuleKind::Intermediate, "1+2=3");
    insert_rule(conn, "three-four", 2, RuleKind::Terminal, "3+4=5");
    insert_knowledge_with_code(conn, 5, "tiger", 1);
}
