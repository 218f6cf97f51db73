//! Forward-chaining inference core.
//!
//! Rules are evaluated by [`matcher::match_pass`] against a [`memory::WorkingMemory`]
//! and the pass loop is driven by [`driver::InferenceDriver`]. Rules and knowledge are
//! read through the [`source::RuleSource`] and [`source::KnowledgeSource`] traits; the
//! engine never writes to storage.

pub mod driver;
pub mod error;
pub mod matcher;
pub mod memory;
pub mod source;
pub mod types;

pub use driver::{InferenceDriver, InferenceLimits, InferenceRun, PassTrace, RuleSnapshot};
pub use error::InferenceError;
pub use matcher::{match_pass, Signal};
pub use memory::WorkingMemory;
pub use source::{KnowledgeSource, RuleSource, StaticSource};
pub use types::{Knowledge, Outcome, Rule, RuleKind, RuleRecord, UnclassifiedReason};
