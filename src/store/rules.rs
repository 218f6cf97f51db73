//! Rule table CRUD.
//!
//! Names are unique across rules. Definitions are validated on write; the engine still
//! rejects malformed rows that reach the table some other way.

use anyhow::{bail, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::engine::types::{parse_definition, RuleKind, RuleRecord};

/// Fields for creating or replacing a rule.
#[derive(Debug, Clone)]
pub struct NewRule<'a> {
    pub name: &'a str,
    pub position: i64,
    pub kind: RuleKind,
    pub definition: &'a str,
}

/// Filters for [`list_rules`]. `None` fields are ignored.
#[derive(Debug, Clone, Default)]
pub struct RuleFilter {
    /// Substring match on the name.
    pub name: Option<String>,
    pub kind: Option<RuleKind>,
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<RuleRecord> {
    Ok(RuleRecord {
        code: row.get(0)?,
        name: row.get(1)?,
        position: row.get(2)?,
        kind: RuleKind::from_code(row.get(3)?),
        definition: row.get(4)?,
    })
}

fn validate(rule: &NewRule<'_>) -> Result<()> {
    if rule.name.is_empty() {
        bail!("rule name must not be empty");
    }
    if let Err(reason) = parse_definition(rule.definition) {
        bail!("invalid rule definition {:?}: {reason}", rule.definition);
    }
    Ok(())
}

fn code_for_name(conn: &Connection, name: &str) -> Result<Option<i64>> {
    Ok(conn
        .query_row("SELECT code FROM rules WHERE name = ?1", params![name], |row| row.get(0))
        .optional()?)
}

/// Insert a rule and return its code.
pub fn save_rule(conn: &Connection, rule: &NewRule<'_>) -> Result<i64> {
    validate(rule)?;
    if code_for_name(conn, rule.name)?.is_some() {
        bail!("the name is already exist, please change a new one: {}", rule.name);
    }

    conn.execute(
        "INSERT INTO rules (name, position, kind, definition) VALUES (?1, ?2, ?3, ?4)",
        params![rule.name, rule.position, rule.kind.as_code(), rule.definition],
    )?;
    let code = conn.last_insert_rowid();
    tracing::info!(code, name = rule.name, definition = rule.definition, "rule saved");
    Ok(code)
}

/// Fetch one rule by code.
pub fn select_rule(conn: &Connection, code: i64) -> Result<Option<RuleRecord>> {
    Ok(conn
        .query_row(
            "SELECT code, name, position, kind, definition FROM rules WHERE code = ?1",
            params![code],
            row_to_record,
        )
        .optional()?)
}

/// Replace every field of an existing rule.
pub fn update_rule(conn: &Connection, code: i64, rule: &NewRule<'_>) -> Result<()> {
    validate(rule)?;
    if select_rule(conn, code)?.is_none() {
        bail!("record is not exist: rule {code}");
    }
    if let Some(other) = code_for_name(conn, rule.name)? {
        if other != code {
            bail!("the name is already exist, pls change a new one: {}", rule.name);
        }
    }

    conn.execute(
        "UPDATE rules SET name = ?1, position = ?2, kind = ?3, definition = ?4 WHERE code = ?5",
        params![rule.name, rule.position, rule.kind.as_code(), rule.definition, code],
    )?;
    tracing::info!(code, name = rule.name, "rule updated");
    Ok(())
}

/// Delete a rule by code.
pub fn delete_rule(conn: &Connection, code: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM rules WHERE code = ?1", params![code])?;
    if deleted == 0 {
        bail!("record is not exist: rule {code}");
    }
    tracing::info!(code, "rule deleted");
    Ok(())
}

/// List rules matching `filter`, ascending by position.
pub fn list_rules(conn: &Connection, filter: &RuleFilter) -> Result<Vec<RuleRecord>> {
    let mut sql =
        String::from("SELECT code, name, position, kind, definition FROM rules WHERE 1=1");
    let mut args: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(name) = &filter.name {
        args.push(format!("%{name}%").into());
        sql.push_str(&format!(" AND name LIKE ?{}", args.len()));
    }
    match filter.kind {
        Some(RuleKind::Terminal) => sql.push_str(" AND kind = 1"),
        // Anything other than 1 is intermediate.
        Some(RuleKind::Intermediate) => sql.push_str(" AND kind != 1"),
        None => {}
    }
    sql.push_str(" ORDER BY position, code");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(rusqlite::params_from_iter(args), row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Every rule in evaluation order; the driver's snapshot source.
pub fn all_rules(conn: &Connection) -> Result<Vec<RuleRecord>> {
    list_rules(conn, &RuleFilter::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_rule<'a>(name: &'a str, position: i64, definition: &'a str) -> NewRule<'a> {
        NewRule {
            name,
            position,
            kind: RuleKind::Intermediate,
            definition,
        }
    }

    #[test]
    fn save_and_select() {
        let conn = crate::db::open_memory_database().unwrap();
        let code = save_rule(&conn, &new_rule("fur", 1, "hair=mammal")).unwrap();

        let record = select_rule(&conn, code).unwrap().unwrap();
        assert_eq!(record.name, "fur");
        assert_eq!(record.definition, "hair=mammal");
        assert_eq!(record.kind, RuleKind::Intermediate);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let conn = crate::db::open_memory_database().unwrap();
        save_rule(&conn, &new_rule("fur", 1, "hair=mammal")).unwrap();
        let err = save_rule(&conn, &new_rule("fur", 2, "milk=mammal")).unwrap_err();
        assert!(err.to_string().contains("already exist"));
    }

    #[test]
    fn malformed_definition_is_rejected() {
        let conn = crate::db::open_memory_database().unwrap();
        let err = save_rule(&conn, &new_rule("bad", 1, "hair")).unwrap_err();
        assert!(err.to_string().contains("invalid rule definition"));
    }

    #[test]
    fn update_keeps_own_name() {
        let conn = crate::db::open_memory_database().unwrap();
        let code = save_rule(&conn, &new_rule("fur", 1, "hair=mammal")).unwrap();
        update_rule(&conn, code, &new_rule("fur", 5, "hair+milk=mammal")).unwrap();

        let record = select_rule(&conn, code).unwrap().unwrap();
        assert_eq!(record.position, 5);
        assert_eq!(record.definition, "hair+milk=mammal");
    }

    #[test]
    fn update_rejects_name_of_other_rule() {
        let conn = crate::db::open_memory_database().unwrap();
        save_rule(&conn, &new_rule("fur", 1, "hair=mammal")).unwrap();
        let code = save_rule(&conn, &new_rule("feathers", 2, "feather=bird")).unwrap();
        assert!(update_rule(&conn, code, &new_rule("fur", 2, "feather=bird")).is_err());
    }

    #[test]
    fn list_orders_by_position_and_filters_kind() {
        let conn = crate::db::open_memory_database().unwrap();
        save_rule(&conn, &new_rule("late", 9, "a=b")).unwrap();
        save_rule(&conn, &new_rule("early", 1, "b=c")).unwrap();
        save_rule(
            &conn,
            &NewRule {
                name: "final",
                position: 5,
                kind: RuleKind::Terminal,
                definition: "c=d",
            },
        )
        .unwrap();

        let names: Vec<String> = all_rules(&conn).unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["early", "final", "late"]);

        let terminal = list_rules(
            &conn,
            &RuleFilter {
                name: None,
                kind: Some(RuleKind::Terminal),
            },
        )
        .unwrap();
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].name, "final");

        let intermediate = list_rules(
            &conn,
            &RuleFilter {
                name: Some("a".into()),
                kind: Some(RuleKind::Intermediate),
            },
        )
        .unwrap();
        let names: Vec<&str> = intermediate.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["early", "late"]);
    }

    #[test]
    fn delete_missing_rule_fails() {
        let conn = crate::db::open_memory_database().unwrap();
        let err = delete_rule(&conn, 42).unwrap_err();
        assert!(err.to_string().contains("record is not exist"));
    }
}
