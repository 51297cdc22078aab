//! Per-call evaluation context

use std::collections::HashMap;
use terminus_core::Value;

/// Scratch space for one resolve call: variables bound by conditions as
/// the decision walk proceeds.
///
/// A binding stores `Option<Value>` so "evaluated, produced no value" is
/// distinguishable from "never evaluated" — coalesce over a tried-and-absent
/// binding must observe the absence, not re-trigger anything. The context
/// is never mutated once result rendering begins.
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    vars: HashMap<String, Option<Value>>,
}

impl EvaluationContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the result of a binding condition, absent included
    pub fn bind(&mut self, name: String, value: Option<Value>) {
        self.vars.insert(name, value);
    }

    /// Look up a variable.
    ///
    /// Outer `None` means the binding condition never ran on this call's
    /// path; inner `None` means it ran and produced no value.
    pub fn get(&self, name: &str) -> Option<&Option<Value>> {
        self.vars.get(name)
    }

    /// Whether a binding was performed, regardless of its value
    pub fn is_bound(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Number of performed bindings
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no bindings were performed
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
