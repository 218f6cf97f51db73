//! Storage collaborators the driver reads from.
//!
//! Both traits are synchronous; callers in async contexts should use
//! `tokio::task::spawn_blocking`. Failures are plain `anyhow` errors and surface from
//! the driver as [`InferenceError::StorageUnavailable`](super::InferenceError).

use anyhow::Result;

use super::types::{Knowledge, RuleRecord};

/// Supplies the rule table.
pub trait RuleSource {
    /// Every stored rule, ascending by position. An empty list is valid.
    fn fetch_all_rules(&self) -> Result<Vec<RuleRecord>>;
}

/// Resolves terminal tokens to knowledge entries.
pub trait KnowledgeSource {
    /// Look up the entry whose code equals `code`. Tokens that are not codes are not found.
    fn lookup_knowledge(&self, code: &str) -> Result<Option<Knowledge>>;
}

impl<T: RuleSource + ?Sized> RuleSource for &T {
    fn fetch_all_rules(&self) -> Result<Vec<RuleRecord>> {
        (**self).fetch_all_rules()
    }
}

impl<T: KnowledgeSource + ?Sized> KnowledgeSource for &T {
    fn lookup_knowledge(&self, code: &str) -> Result<Option<Knowledge>> {
        (**self).lookup_knowledge(code)
    }
}

/// In-memory rule and knowledge tables, for tests and fixtures.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub rules: Vec<RuleRecord>,
    pub knowledge: Vec<Knowledge>,
}

impl StaticSource {
    pub fn new(rules: Vec<RuleRecord>, knowledge: Vec<Knowledge>) -> Self {
        Self { rules, knowledge }
    }
}

impl RuleSource for StaticSource {
    fn fetch_all_rules(&self) -> Result<Vec<RuleRecord>> {
        let mut rules = self.rules.clone();
        rules.sort_by_key(|r| (r.position, r.code));
        Ok(rules)
    }
}

impl KnowledgeSource for StaticSource {
    fn lookup_knowledge(&self, code: &str) -> Result<Option<Knowledge>> {
        let Ok(code) = code.parse::<i64>() else {
            return Ok(None);
        };
        Ok(self.knowledge.iter().find(|k| k.code == code).cloned())
    }
}
