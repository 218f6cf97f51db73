//! Working memory: the token sequence reduced during one inference.

use serde::Serialize;

use super::types::TOKEN_DELIMITER;

/// Ordered token sequence owned by a single inference run.
///
/// Duplicates are allowed and positionally distinct; removal is by index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkingMemory {
    tokens: Vec<String>,
}

impl WorkingMemory {
    /// Split caller input on `+`. Always yields at least one token, possibly empty.
    pub fn from_input(input: &str) -> Self {
        Self {
            tokens: input.split(TOKEN_DELIMITER).map(str::to_string).collect(),
        }
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// The most recently appended token; terminal rules leave their result here.
    pub fn last(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }

    /// Remove the given positions, highest first so earlier indices stay valid.
    ///
    /// Indices may repeat. A position that no longer exists after earlier removals is
    /// skipped. Returns how many tokens were actually removed.
    pub fn remove_indices(&mut self, mut indices: Vec<usize>) -> usize {
        indices.sort_unstable_by(|a, b| b.cmp(a));
        let mut removed = 0;
        for index in indices {
            if index < self.tokens.len() {
                self.tokens.remove(index);
                removed += 1;
            } else {
                tracing::debug!(index, len = self.tokens.len(), "skipping stale memory index");
            }
        }
        removed
    }

    /// Append `token` unless an equal token is already present. Returns whether it was added.
    pub fn append_unique(&mut self, token: &str) -> bool {
        if self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }
}

impl std::fmt::Display for WorkingMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tokens.join("+"))
    }
}
