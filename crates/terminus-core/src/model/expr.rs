//! Argument and result expressions
//!
//! The expression vocabulary is fixed to endpoint resolution needs:
//! literals, parameter and bound-variable references, attribute access,
//! string templates, registry function calls, and coalesce.

use crate::types::Value;
use serde::{Deserialize, Serialize};

/// A single expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A constant value
    Literal { value: Value },

    /// Reference to a declared input parameter
    Param { name: String },

    /// Reference to a variable bound by an earlier condition
    Var { name: String },

    /// Attribute access into a structured value
    GetAttr { target: Box<Expr>, path: Vec<PathSegment> },

    /// String template: concatenation of stringified parts
    Concat { parts: Vec<Expr> },

    /// Call into the function registry
    Call { function: String, args: Vec<Expr> },

    /// First present value wins, else the result of the final entry
    Coalesce { exprs: Vec<Expr> },
}

/// One step of an attribute path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    /// Named field of a structured value
    Field(String),
    /// Index into a string array
    Index(usize),
}

impl Expr {
    /// A literal value expression
    pub fn literal(value: Value) -> Self {
        Expr::Literal { value }
    }

    /// A parameter reference
    pub fn param(name: impl Into<String>) -> Self {
        Expr::Param { name: name.into() }
    }

    /// A bound-variable reference
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var { name: name.into() }
    }

    /// Attribute access on a target expression
    pub fn get_attr(target: Expr, path: Vec<PathSegment>) -> Self {
        Expr::GetAttr {
            target: Box::new(target),
            path,
        }
    }

    /// A string template
    pub fn concat(parts: Vec<Expr>) -> Self {
        Expr::Concat { parts }
    }

    /// A function call
    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            function: function.into(),
            args,
        }
    }

    /// A coalesce over possibly-absent sub-expressions
    pub fn coalesce(exprs: Vec<Expr>) -> Self {
        Expr::Coalesce { exprs }
    }

    /// Visit this expression and every sub-expression, pre-order
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a Expr)) {
        visitor(self);
        match self {
            Expr::GetAttr { target, .. } => target.visit(visitor),
            Expr::Concat { parts } => {
                for part in parts {
                    part.visit(visitor);
                }
            }
            Expr::Call { args, .. } => {
                for arg in args {
                    arg.visit(visitor);
                }
            }
            Expr::Coalesce { exprs } => {
                for expr in exprs {
                    expr.visit(visitor);
                }
            }
            Expr::Literal { .. } | Expr::Param { .. } | Expr::Var { .. } => {}
        }
    }
}
