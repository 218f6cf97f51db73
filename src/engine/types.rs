//! Rule and knowledge record definitions.
//!
//! Defines [`RuleKind`], the stored [`RuleRecord`] with its raw definition text, the
//! parsed [`Rule`] the matcher works on, [`Knowledge`] entries, and the [`Outcome`] of
//! one inference run.

use serde::{Deserialize, Serialize};

use super::error::InferenceError;

/// Separates the antecedent from the consequent in a rule definition.
pub const DEFINITION_SEPARATOR: char = '=';

/// Joins tokens in rule antecedents and in caller input.
pub const TOKEN_DELIMITER: char = '+';

/// Whether firing a rule ends inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Produces a token that later rules may consume.
    Intermediate,
    /// Produces a classification key and stops the driver loop.
    Terminal,
}

impl RuleKind {
    /// Integer representation used by the `rules.kind` column.
    pub fn as_code(&self) -> i64 {
        match self {
            Self::Intermediate => 0,
            Self::Terminal => 1,
        }
    }

    /// Anything other than `1` is an intermediate rule.
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            Self::Terminal
        } else {
            Self::Intermediate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intermediate => "intermediate",
            Self::Terminal => "terminal",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intermediate" | "0" => Ok(Self::Intermediate),
            "terminal" | "1" => Ok(Self::Terminal),
            _ => Err(format!("unknown rule kind: {s}")),
        }
    }
}

/// A rule as stored, matching the `rules` table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Storage-assigned primary key.
    pub code: i64,
    /// Unique display label.
    pub name: String,
    /// Evaluation priority, ascending.
    pub position: i64,
    pub kind: RuleKind,
    /// Raw `tok1+tok2=result` text.
    #[serde(rename = "rule")]
    pub definition: String,
}

/// A parsed rule, ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub code: i64,
    pub name: String,
    pub position: i64,
    pub kind: RuleKind,
    antecedent: Vec<String>,
    consequent: String,
}

impl Rule {
    /// Build a rule directly from its parts. Fails if the antecedent is empty or the
    /// consequent is not a single token.
    pub fn new(
        code: i64,
        name: impl Into<String>,
        position: i64,
        kind: RuleKind,
        definition: &str,
    ) -> Result<Self, InferenceError> {
        let (antecedent, consequent) =
            parse_definition(definition).map_err(|reason| InferenceError::MalformedRule {
                code,
                definition: definition.to_string(),
                reason,
            })?;
        Ok(Self {
            code,
            name: name.into(),
            position,
            kind,
            antecedent,
            consequent,
        })
    }

    pub fn antecedent(&self) -> &[String] {
        &self.antecedent
    }

    pub fn consequent(&self) -> &str {
        &self.consequent
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == RuleKind::Terminal
    }
}

impl TryFrom<&RuleRecord> for Rule {
    type Error = InferenceError;

    fn try_from(record: &RuleRecord) -> Result<Self, Self::Error> {
        Rule::new(
            record.code,
            record.name.clone(),
            record.position,
            record.kind,
            &record.definition,
        )
    }
}

/// Split a definition into its antecedent tokens and consequent token.
///
/// Exactly one `=` is required. The left side must be non-empty; its tokens are kept
/// verbatim, so `a++b` yields an empty middle token. The right side must be one
/// non-empty token.
pub fn parse_definition(definition: &str) -> Result<(Vec<String>, String), String> {
    let parts: Vec<&str> = definition.split(DEFINITION_SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(format!(
            "expected exactly one '{DEFINITION_SEPARATOR}', found {}",
            parts.len() - 1
        ));
    }
    let (left, right) = (parts[0], parts[1]);
    if left.is_empty() {
        return Err("antecedent is empty".into());
    }
    if right.is_empty() {
        return Err("consequent is empty".into());
    }
    if right.contains(TOKEN_DELIMITER) {
        return Err(format!("consequent must be a single token, got: {right}"));
    }

    let antecedent = left
        .split(TOKEN_DELIMITER)
        .map(str::to_string)
        .collect::<Vec<_>>();
    Ok((antecedent, right.to_string()))
}

/// An entry in the knowledge table; terminal tokens resolve to one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Knowledge {
    pub code: i64,
    pub name: String,
    /// Category tag. Accepts the legacy `type` field name on input.
    #[serde(alias = "type")]
    pub classification: i64,
}

/// Code and classification reported when inference does not classify the input.
pub const UNCLASSIFIED_SENTINEL: i64 = -1;

/// Why an inference produced no classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum UnclassifiedReason {
    /// No rule fired in the final pass.
    NoMatch,
    /// A terminal rule fired but its token has no knowledge entry.
    RecordNotFound { token: String },
}

impl std::fmt::Display for UnclassifiedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatch => f.write_str("no matching result"),
            Self::RecordNotFound { token } => write!(f, "record not found: {token}"),
        }
    }
}

/// The result of one inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Outcome {
    Classified(Knowledge),
    Unclassified {
        reason: UnclassifiedReason,
        code: i64,
        classification: i64,
    },
}

impl Outcome {
    pub fn no_match() -> Self {
        Self::Unclassified {
            reason: UnclassifiedReason::NoMatch,
            code: UNCLASSIFIED_SENTINEL,
            classification: UNCLASSIFIED_SENTINEL,
        }
    }

    pub fn record_not_found(token: impl Into<String>) -> Self {
        Self::Unclassified {
            reason: UnclassifiedReason::RecordNotFound {
                token: token.into(),
            },
            code: UNCLASSIFIED_SENTINEL,
            classification: UNCLASSIFIED_SENTINEL,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, Self::Classified(_))
    }

    pub fn knowledge(&self) -> Option<&Knowledge> {
        match self {
            Self::Classified(k) => Some(k),
            Self::Unclassified { .. } => None,
        }
    }
}
