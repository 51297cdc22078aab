//! Compiled rule model
//!
//! The model is the immutable output of an external compilation step: flat,
//! index-addressed tables of parameters, conditions, and results, plus a
//! node array forming an acyclic decision diagram. Everything here is plain
//! data; evaluation lives in the runtime crate.

mod condition;
mod expr;
mod node;
mod parameter;
mod result;
mod validate;

pub use condition::{Binding, Condition};
pub use expr::{Expr, PathSegment};
pub use node::{DecisionNode, NodeRef, NO_MATCH};
pub use parameter::Parameter;
pub use result::{HeaderTemplate, PropertyTemplate, ResultSpec};

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// A compiled rule model ready for evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleModel {
    /// Rule set version, stamped by the compiler
    #[serde(default = "default_version")]
    pub version: String,

    /// Declared input parameters
    pub parameters: Vec<Parameter>,

    /// Ordered condition table; conditions are addressed by index
    pub conditions: Vec<Condition>,

    /// Ordered result table; results are addressed by index
    pub results: Vec<ResultSpec>,

    /// Decision diagram nodes, addressed by index
    pub nodes: Vec<DecisionNode>,

    /// Root reference, in the encoding documented on [`NodeRef`]
    pub root: i64,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl RuleModel {
    /// Create a new model
    pub fn new(
        parameters: Vec<Parameter>,
        conditions: Vec<Condition>,
        results: Vec<ResultSpec>,
        nodes: Vec<DecisionNode>,
        root: i64,
    ) -> Self {
        Self {
            version: default_version(),
            parameters,
            conditions,
            results,
            nodes,
            root,
        }
    }

    /// Parse a model from its JSON document form
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a model from an already-deserialized JSON value
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// The decoded root reference
    pub fn root_ref(&self) -> NodeRef {
        NodeRef::decode(self.root)
    }

    /// Look up a parameter declaration by name
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Validate the model, failing fast on the first defect found.
    ///
    /// See [`ModelError`] for the checked classes: reference ranges, graph
    /// acyclicity, binding dataflow, and declaration consistency.
    pub fn validate(&self) -> std::result::Result<(), ModelError> {
        validate::validate(self)
    }
}
