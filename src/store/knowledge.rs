//! Knowledge table CRUD.

use anyhow::{bail, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::engine::types::Knowledge;

/// Filters for [`list_knowledge`]. `None` fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeFilter {
    /// Substring match on the name.
    pub name: Option<String>,
    pub classification: Option<i64>,
}

fn row_to_knowledge(row: &Row<'_>) -> rusqlite::Result<Knowledge> {
    Ok(Knowledge {
        code: row.get(0)?,
        name: row.get(1)?,
        classification: row.get(2)?,
    })
}

fn code_for_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
    Ok(conn
        .query_row(
            "SELECT code FROM knowledge WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?)
}

/// Insert an entry and return its code.
pub fn save_knowledge(conn: &Connection, name: &str, classification: i64) -> Result<i64> {
    if name.is_empty() {
        bail!("knowledge name must not be empty");
    }
    if code_for_name(conn, name)?.is_some() {
        bail!("the name is already exist, please change a new one: {name}");
    }

    conn.execute(
        "INSERT INTO knowledge (name, classification) VALUES (?1, ?2)",
        params![name, classification],
    )?;
    let code = conn.last_insert_rowid();
    tracing::info!(code, name, classification, "knowledge saved");
    Ok(code)
}

/// Fetch one entry by code.
pub fn select_knowledge(conn: &Connection, code: i64) -> Result<Option<Knowledge>> {
    Ok(conn
        .query_row(
            "SELECT code, name, classification FROM knowledge WHERE code = ?1",
            params![code],
            row_to_knowledge,
        )
        .optional()?)
}

/// Replace the name and classification of an existing entry.
pub fn update_knowledge(conn: &Connection, knowledge: &Knowledge) -> Result<()> {
    if knowledge.name.is_empty() {
        bail!("knowledge name must not be empty");
    }
    if select_knowledge(conn, knowledge.code)?.is_none() {
        bail!("record is not exist: knowledge {}", knowledge.code);
    }
    if let Some(other) = code_for_name(conn, &knowledge.name)? {
        if other != knowledge.code {
            bail!("the name is already exist, pls change a new one: {}", knowledge.name);
        }
    }

    conn.execute(
        "UPDATE knowledge SET name = ?1, classification = ?2 WHERE code = ?3",
        params![knowledge.name, knowledge.classification, knowledge.code],
    )?;
    tracing::info!(code = knowledge.code, name = %knowledge.name, "knowledge updated");
    Ok(())
}

/// Delete an entry by code.
pub fn delete_knowledge(conn: &Connection, code: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM knowledge WHERE code = ?1", params![code])?;
    if deleted == 0 {
        bail!("record is not exist: knowledge {code}");
    }
    tracing::info!(code, "knowledge deleted");
    Ok(())
}

/// List entries matching `filter`, ascending by code.
pub fn list_knowledge(conn: &Connection, filter: &KnowledgeFilter) -> Result<Vec<Knowledge>> {
    let mut sql = String::from("SELECT code, name, classification FROM knowledge WHERE 1=1");
    let mut args: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(name) = &filter.name {
        args.push(format!("%{name}%").into());
        sql.push_str(&format!(" AND name LIKE ?{}", args.len()));
    }
    if let Some(classification) = filter.classification {
        args.push(classification.into());
        sql.push_str(&format!(" AND classification = ?{}", args.len()));
    }
    sql.push_str(" ORDER BY code");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(args), row_to_knowledge)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
