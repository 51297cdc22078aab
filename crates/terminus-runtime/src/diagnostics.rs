//! Call-scoped evaluation trace
//!
//! Captures every fresh condition evaluation of a single resolve call so
//! failures can report which conditions fired and with what values.

use serde::{Deserialize, Serialize};
use std::fmt;
use terminus_core::Value;

/// Record of a single fresh condition evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRecord {
    /// Index into the model's condition table
    pub condition: usize,

    /// Function the condition invoked
    pub function: String,

    /// Boolean outcome the decision walk branched on
    pub outcome: bool,

    /// Value the function produced; absent values are recorded as absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Trace of one resolve call
///
/// Memoized re-uses are not recorded: each condition appears at most once,
/// in evaluation order. Discarded when the call returns successfully.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTrace {
    /// Records in evaluation order
    pub records: Vec<ConditionRecord>,
}

impl EvaluationTrace {
    /// Create an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh evaluation
    pub fn record(&mut self, condition: usize, function: &str, outcome: bool, value: Option<Value>) {
        self.records.push(ConditionRecord {
            condition,
            function: function.to_string(),
            outcome,
            value,
        });
    }

    /// Number of recorded evaluations
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was evaluated
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Display for EvaluationTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.records.is_empty() {
            return write!(f, "no conditions evaluated");
        }
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "condition {} ({}) => {}",
                record.condition, record.function, record.outcome
            )?;
            if let Some(value) = &record.value {
                write!(f, " [{value:?}]")?;
            }
        }
        Ok(())
    }
}
