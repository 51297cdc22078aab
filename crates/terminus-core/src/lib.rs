//! Terminus Core - Core types and compiled model definitions
//!
//! This crate provides the immutable data consumed by the Terminus runtime:
//! - Value types for runtime data
//! - Compiled rule model tables (parameters, conditions, results, nodes)
//! - Build-time validation and error types

pub mod error;
pub mod model;
pub mod types;

// Re-export commonly used types
pub use error::ModelError;
pub use model::{
    Binding, Condition, DecisionNode, Expr, HeaderTemplate, NodeRef, Parameter, PathSegment,
    PropertyTemplate, ResultSpec, RuleModel, NO_MATCH,
};
pub use types::{Arn, Partition, UrlParts, Value, ValueType};
