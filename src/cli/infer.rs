//! CLI `infer` command — classify one token string against the stored rules.

use anyhow::{ensure, Result};

use chainer::config::ChainerConfig;
use chainer::engine::{InferenceDriver, Outcome};
use chainer::store::SqliteStore;

/// Run one inference and print the outcome, optionally with every pass.
pub fn infer(config: &ChainerConfig, input: &str, trace: bool, max_passes: Option<usize>) -> Result<()> {
    let conn = chainer::db::open_database(config.resolved_db_path())?;
    let store = SqliteStore::new(&conn);

    let mut limits = config.inference.limits();
    if let Some(max) = max_passes {
        ensure!(max >= 1, "--max-passes must be at least 1");
        limits.max_passes = max;
    }

    let run = InferenceDriver::new(&store, &store)
        .with_limits(limits)
        .run(input)?;

    for rejected in &run.rejected_rules {
        println!("skipped: {rejected}");
    }

    if trace {
        for pass in &run.trace {
            println!(
                "pass {:>3}: {:<30} -> {:<30} {:?}",
                pass.pass,
                pass.before.to_string(),
                pass.after.to_string(),
                pass.signal
            );
        }
        println!();
    }

    match &run.outcome {
        Outcome::Classified(k) => {
            println!("Classified as {} (code {}, classification {})", k.name, k.code, k.classification);
        }
        Outcome::Unclassified { reason, .. } => {
            println!("Unclassified: {reason}");
        }
    }
    println!("Passes: {}, final memory: {}", run.passes, run.final_memory);

    Ok(())
}
