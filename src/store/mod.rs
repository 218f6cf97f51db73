//! SQLite persistence for rules and knowledge.
//!
//! [`SqliteStore`] adapts a borrowed connection to the engine's [`RuleSource`] and
//! [`KnowledgeSource`] traits. A shared `Mutex<Connection>` implements them too, taking
//! the lock only for the duration of each call.

pub mod knowledge;
pub mod rules;

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use std::sync::Mutex;

use crate::engine::source::{KnowledgeSource, RuleSource};
use crate::engine::types::{Knowledge, RuleRecord};

/// Read-only view of the rule and knowledge tables for one inference.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl RuleSource for SqliteStore<'_> {
    fn fetch_all_rules(&self) -> Result<Vec<RuleRecord>> {
        rules::all_rules(self.conn)
    }
}

impl KnowledgeSource for SqliteStore<'_> {
    fn lookup_knowledge(&self, code: &str) -> Result<Option<Knowledge>> {
        // Terminal tokens are free text; only integer tokens can name a code.
        match code.parse::<i64>() {
            Ok(code) => knowledge::select_knowledge(self.conn, code),
            Err(_) => Ok(None),
        }
    }
}

impl RuleSource for Mutex<Connection> {
    fn fetch_all_rules(&self) -> Result<Vec<RuleRecord>> {
        let conn = self.lock().map_err(|e| anyhow!("db lock poisoned: {e}"))?;
        SqliteStore::new(&conn).fetch_all_rules()
    }
}

impl KnowledgeSource for Mutex<Connection> {
    fn lookup_knowledge(&self, code: &str) -> Result<Option<Knowledge>> {
        let conn = self.lock().map_err(|e| anyhow!("db lock poisoned: {e}"))?;
        SqliteStore::new(&conn).lookup_knowledge(code)
    }
}
