//! Runtime error types

use crate::diagnostics::EvaluationTrace;
use thiserror::Error;

/// Per-call resolution failure
///
/// These are expected runtime outcomes and must never panic the caller.
/// `ModelViolation` is the defensive exception: it reports a defect the
/// build-time validation should have caught.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No decision path reached an endpoint result
    #[error("no rule matched the supplied parameters")]
    NoRuleMatched { trace: EvaluationTrace },

    /// A rule-defined error result was reached; the message is authored
    /// by the rule set and surfaced verbatim
    #[error("{message}")]
    RuleError {
        message: String,
        trace: EvaluationTrace,
    },

    /// A supplied parameter is unknown, mistyped, or a required one is missing
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The model misbehaved at evaluation time despite validation
    #[error("rule model violation: {0}")]
    ModelViolation(String),
}

impl ResolveError {
    /// The diagnostic trace attached to rule-outcome failures
    pub fn trace(&self) -> Option<&EvaluationTrace> {
        match self {
            ResolveError::NoRuleMatched { trace } => Some(trace),
            ResolveError::RuleError { trace, .. } => Some(trace),
            _ => None,
        }
    }
}

/// Result type for resolve operations
pub type Result<T> = std::result::Result<T, ResolveError>;
