//! Parameter declarations

use crate::types::{Value, ValueType};
use serde::{Deserialize, Serialize};

/// A declared input parameter
///
/// Declared once when the model is built; values are supplied fresh on
/// every resolve call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,

    /// Declared type; only String, Boolean, and StringArray are legal here
    pub value_type: ValueType,

    /// Whether a value must be available (supplied or defaulted) per call
    #[serde(default)]
    pub required: bool,

    /// Value used when the caller supplies none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Author-facing description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Parameter {
    /// Declare a parameter
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            required: false,
            default: None,
            documentation: None,
        }
    }

    /// Mark the parameter required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Set the documentation string
    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}
