//! A single matching pass over the rule snapshot.
//!
//! [`match_pass`] evaluates every rule, in order, against the memory as it stands at
//! that point in the pass. Two behaviors are kept on purpose and pinned by tests:
//!
//! - An antecedent token is compared against every memory position, so duplicate
//!   tokens in memory each add to the match count. `["a","a"]` never satisfies `a=b`
//!   (count 2, length 1) but does satisfy `a+c=d`.
//! - The returned signal belongs to the last rule that fired in the pass. A terminal
//!   firing followed by an intermediate firing reports `FiredIntermediate`.
//!
//! Whether either is intended is an open question; see DESIGN.md.

use serde::Serialize;

use super::memory::WorkingMemory;
use super::types::Rule;

/// Outcome of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    NoMatch,
    FiredIntermediate,
    FiredTerminal,
}

/// Memory positions matching the rule's antecedent, one entry per (token, position)
/// equality. Positions repeat when the antecedent repeats a token.
fn matched_indices(rule: &Rule, memory: &WorkingMemory) -> Vec<usize> {
    let mut indices = Vec::new();
    for wanted in rule.antecedent() {
        for (index, token) in memory.iter().enumerate() {
            if token == wanted {
                indices.push(index);
            }
        }
    }
    indices
}

/// Apply every rule once, mutating `memory` as rules fire.
///
/// `rules` must already be in ascending position order.
pub fn match_pass(rules: &[Rule], memory: &mut WorkingMemory) -> Signal {
    let mut signal = Signal::NoMatch;

    for rule in rules {
        let indices = matched_indices(rule, memory);
        if indices.len() != rule.antecedent().len() {
            continue;
        }

        memory.remove_indices(indices);
        memory.append_unique(rule.consequent());

        signal = if rule.is_terminal() {
            Signal::FiredTerminal
        } else {
            Signal::FiredIntermediate
        };
        tracing::trace!(
            rule = rule.code,
            name = %rule.name,
            consequent = rule.consequent(),
            memory = %memory,
            "rule fired"
        );
    }

    signal
}
