use anyhow::Result;

use chainer::config::ChainerConfig;
use chainer::engine::RuleKind;
use chainer::store::rules::{self, NewRule, RuleFilter};

pub fn add(config: &ChainerConfig, name: &str, definition: &str, position: i64, terminal: bool) -> Result<()> {
    let conn = chainer::db::open_database(config.resolved_db_path())?;
    let kind = if terminal {
        RuleKind::Terminal
    } else {
        RuleKind::Intermediate
    };
    let code = rules::save_rule(
        &conn,
        &NewRule {
            name,
            position,
            kind,
            definition,
        },
    )?;
    println!("Saved rule {code}: {name} ({kind}) {definition}");
    Ok(())
}

pub fn list(config: &ChainerConfig, name: Option<String>) -> Result<()> {
    let conn = chainer::db::open_database(config.resolved_db_path())?;
    let rows = rules::list_rules(&conn, &RuleFilter { name, kind: None })?;

    if rows.is_empty() {
        println!("No rules.");
        return Ok(());
    }
    println!("{:>6} {:>8} {:<12} {:<20} DEFINITION", "CODE", "POSITION", "KIND", "NAME");
    for r in rows {
        println!(
            "{:>6} {:>8} {:<12} {:<20} {}",
            r.code, r.position, r.kind.as_str(), r.name, r.definition
        );
    }
    Ok(())
}

pub fn remove(config: &ChainerConfig, code: i64) -> Result<()> {
    let conn = chainer::db::open_database(config.resolved_db_path())?;
    rules::delete_rule(&conn, code)?;
    println!("Deleted rule {code}");
    Ok(())
}
