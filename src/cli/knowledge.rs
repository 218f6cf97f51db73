use anyhow::Result;

use chainer::config::ChainerConfig;
use chainer::store::knowledge::{self, KnowledgeFilter};

pub fn add(config: &ChainerConfig, name: &str, classification: i64) -> Result<()> {
    let conn = chainer::db::open_database(config.resolved_db_path())?;
    let code = knowledge::save_knowledge(&conn, name, classification)?;
    println!("Saved knowledge {code}: {name} (classification {classification})");
    Ok(())
}

pub fn list(config: &ChainerConfig, name: Option<String>, classification: Option<i64>) -> Result<()> {
    let conn = chainer::db::open_database(config.resolved_db_path())?;
    let rows = knowledge::list_knowledge(&conn, &KnowledgeFilter { name, classification })?;

    if rows.is_empty() {
        println!("No knowledge entries.");
        return Ok(());
    }
    println!("{:>6} {:>14} NAME", "CODE", "CLASSIFICATION");
    for k in rows {
        println!("{:>6} {:>14} {}", k.code, k.classification, k.name);
    }
    Ok(())
}

pub fn remove(config: &ChainerConfig, code: i64) -> Result<()> {
    let conn = chainer::db::open_database(config.resolved_db_path())?;
    knowledge::delete_knowledge(&conn, code)?;
    println!("Deleted knowledge {code}");
    Ok(())
}
