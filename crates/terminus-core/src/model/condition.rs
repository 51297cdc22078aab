//! Condition table entries

use crate::model::Expr;
use crate::types::ValueType;
use serde::{Deserialize, Serialize};

/// An indexed boolean test over parameters and bound variables
///
/// Conditions never mutate after the model is built. Their ordinal index
/// in the model's condition table is the identity the decision diagram
/// and the runtime memo table key on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Registry identifier of the function to invoke
    pub function: String,

    /// Ordered argument expressions
    pub args: Vec<Expr>,

    /// Context variable the function's result is stored under, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<Binding>,
}

/// Descriptor for a condition's bound variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// Variable name later expressions reference
    pub name: String,

    /// Declared type of the bound value
    pub value_type: ValueType,
}

impl Condition {
    /// A condition without a binding
    pub fn new(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            function: function.into(),
            args,
            bind: None,
        }
    }

    /// Attach a binding descriptor
    pub fn with_binding(mut self, name: impl Into<String>, value_type: ValueType) -> Self {
        self.bind = Some(Binding {
            name: name.into(),
            value_type,
        });
        self
    }
}
