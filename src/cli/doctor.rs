//! CLI `doctor` command — run database diagnostics and print a health report.

use anyhow::{Context, Result};

use chainer::config::ChainerConfig;
use chainer::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &ChainerConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `chainer serve` or `chainer rule add` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("chainer Health Report");
    println!("=====================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!();
    println!("Row counts:");
    println!("  Rules:           {}", report.rule_count);
    println!("  Knowledge:       {}", report.knowledge_count);
    println!();
    println!("Inference limits:");
    println!("  Max passes:      {}", config.inference.max_passes);
    match config.inference.deadline_ms {
        0 => println!("  Deadline:        none"),
        ms => println!("  Deadline:        {ms} ms"),
    }
    println!();
    if report.malformed_rules.is_empty() {
        println!("Rule definitions:  OK");
    } else {
        println!(
            "Rule definitions:  {} malformed (codes {:?}), skipped during inference",
            report.malformed_rules.len(),
            report.malformed_rules
        );
    }
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
