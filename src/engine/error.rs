use thiserror::Error;

/// Failures of a single inference invocation.
///
/// `Unclassified` is not represented here: it is a legitimate [`Outcome`](super::Outcome).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InferenceError {
    /// A stored rule definition could not be parsed. Rejected rules are skipped while
    /// building the snapshot; this variant never aborts an inference on its own.
    #[error("malformed rule {code} ({definition:?}): {reason}")]
    MalformedRule {
        code: i64,
        definition: String,
        reason: String,
    },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("inference did not terminate within {passes} passes")]
    NonTerminating { passes: usize },

    #[error("inference exceeded its deadline after {elapsed_ms} ms ({passes} passes)")]
    DeadlineExceeded { elapsed_ms: u128, passes: usize },

    #[error("input must contain at least one token")]
    EmptyInput,
}

impl InferenceError {
    pub(crate) fn storage(err: anyhow::Error) -> Self {
        Self::StorageUnavailable(format!("{err:#}"))
    }
}
