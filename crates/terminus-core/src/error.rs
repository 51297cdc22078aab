//! Error types for Terminus Core

use crate::types::ValueType;
use thiserror::Error;

/// Build-time model error
///
/// Everything in this enum is a programming or authoring error in the
/// compiled model, caught once at model load rather than on the request
/// path.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to parse rule model: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("reference {reference} in {context} is out of range")]
    InvalidReference { reference: i64, context: String },

    #[error("decision node {node} participates in a cycle")]
    CycleDetected { node: usize },

    #[error("condition {condition} reads variable '{name}' before every path binds it")]
    UnboundVariable { condition: usize, name: String },

    #[error("expression references undeclared parameter '{name}'")]
    UnknownParameter { name: String },

    #[error("expression references variable '{name}', which no condition binds")]
    UnknownVariable { name: String },

    #[error("duplicate parameter declaration '{name}'")]
    DuplicateParameter { name: String },

    #[error("conditions {first} and {second} both bind variable '{name}'")]
    DuplicateBinding {
        first: usize,
        second: usize,
        name: String,
    },

    #[error("default for parameter '{name}' does not match its declared type {expected:?}")]
    DefaultTypeMismatch { name: String, expected: ValueType },

    #[error("parameter '{name}' declares type {declared:?}, which is not a parameter type")]
    UnsupportedParameterType { name: String, declared: ValueType },

    #[error("no function '{id}' is registered")]
    FunctionNotFound { id: String },
}

/// Result type for model construction and validation
pub type Result<T> = std::result::Result<T, ModelError>;
