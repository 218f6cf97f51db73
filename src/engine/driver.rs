//! The inference loop.
//!
//! [`InferenceDriver::run`] builds a rule snapshot, splits the input into
//! [`WorkingMemory`], and calls [`match_pass`] until a pass reports `NoMatch` or
//! `FiredTerminal`. The loop is bounded by [`InferenceLimits`].

use std::time::{Duration, Instant};

use serde::Serialize;

use super::error::InferenceError;
use super::matcher::{match_pass, Signal};
use super::memory::WorkingMemory;
use super::source::{KnowledgeSource, RuleSource};
use super::types::{Outcome, Rule, RuleRecord};

/// Default upper bound on passes per inference.
pub const DEFAULT_MAX_PASSES: usize = 1000;

/// Per-invocation bounds on the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceLimits {
    /// Passes allowed before failing with `NonTerminating`.
    pub max_passes: usize,
    /// Wall-clock budget, checked between passes.
    pub deadline: Option<Duration>,
}

impl Default for InferenceLimits {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            deadline: None,
        }
    }
}

/// Parsed, position-ordered rules plus the records that failed to parse.
#[derive(Debug, Clone, Default)]
pub struct RuleSnapshot {
    pub rules: Vec<Rule>,
    pub rejected: Vec<InferenceError>,
}

impl RuleSnapshot {
    /// Parse every record. Malformed ones are logged and set aside.
    pub fn build(records: &[RuleRecord]) -> Self {
        let mut snapshot = Self::default();
        for record in records {
            match Rule::try_from(record) {
                Ok(rule) => snapshot.rules.push(rule),
                Err(err) => {
                    tracing::warn!(rule = record.code, name = %record.name, error = %err, "rejecting rule");
                    snapshot.rejected.push(err);
                }
            }
        }
        snapshot
    }
}

/// Memory before and after one pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassTrace {
    pub pass: usize,
    pub before: WorkingMemory,
    pub signal: Signal,
    pub after: WorkingMemory,
}

/// Everything observed during one inference.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRun {
    pub outcome: Outcome,
    pub passes: usize,
    pub trace: Vec<PassTrace>,
    pub final_memory: WorkingMemory,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected_rules: Vec<String>,
}

/// Runs inferences against a rule source and a knowledge source.
pub struct InferenceDriver<R, K> {
    rules: R,
    knowledge: K,
    limits: InferenceLimits,
}

impl<R: RuleSource, K: KnowledgeSource> InferenceDriver<R, K> {
    pub fn new(rules: R, knowledge: K) -> Self {
        Self {
            rules,
            knowledge,
            limits: InferenceLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: InferenceLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> InferenceLimits {
        self.limits
    }

    /// Classify `input`, a `+`-joined token string.
    pub fn infer(&self, input: &str) -> Result<Outcome, InferenceError> {
        self.run(input).map(|run| run.outcome)
    }

    /// Classify `input` and keep the per-pass trace.
    pub fn run(&self, input: &str) -> Result<InferenceRun, InferenceError> {
        if input.is_empty() {
            return Err(InferenceError::EmptyInput);
        }
        let mut memory = WorkingMemory::from_input(input);

        let records = self
            .rules
            .fetch_all_rules()
            .map_err(InferenceError::storage)?;
        let snapshot = RuleSnapshot::build(&records);
        tracing::debug!(
            rules = snapshot.rules.len(),
            rejected = snapshot.rejected.len(),
            input = %memory,
            "starting inference"
        );

        let started = Instant::now();
        let mut trace = Vec::new();
        let mut passes = 0;
        let signal = loop {
            if passes >= self.limits.max_passes {
                tracing::warn!(passes, memory = %memory, "pass limit reached");
                return Err(InferenceError::NonTerminating { passes });
            }
            if let Some(deadline) = self.limits.deadline {
                let elapsed = started.elapsed();
                if elapsed >= deadline {
                    return Err(InferenceError::DeadlineExceeded {
                        elapsed_ms: elapsed.as_millis(),
                        passes,
                    });
                }
            }

            let before = memory.clone();
            let signal = match_pass(&snapshot.rules, &mut memory);
            passes += 1;
            tracing::debug!(pass = passes, ?signal, memory = %memory, "pass complete");
            trace.push(PassTrace {
                pass: passes,
                before,
                signal,
                after: memory.clone(),
            });

            if signal != Signal::FiredIntermediate {
                break signal;
            }
        };

        let outcome = match signal {
            Signal::FiredTerminal => self.resolve(&memory)?,
            _ => Outcome::no_match(),
        };
        tracing::info!(passes, classified = outcome.is_classified(), "inference finished");

        Ok(InferenceRun {
            outcome,
            passes,
            trace,
            final_memory: memory,
            rejected_rules: snapshot.rejected.iter().map(ToString::to_string).collect(),
        })
    }

    /// Look up the token a terminal rule left at the end of memory.
    fn resolve(&self, memory: &WorkingMemory) -> Result<Outcome, InferenceError> {
        let Some(token) = memory.last() else {
            return Ok(Outcome::record_not_found(""));
        };
        let found = self
            .knowledge
            .lookup_knowledge(token)
            .map_err(InferenceError::storage)?;
        Ok(match found {
            Some(knowledge) => Outcome::Classified(knowledge),
            None => Outcome::record_not_found(token),
        })
    }
}
