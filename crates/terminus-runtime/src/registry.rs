//! Function registry
//!
//! Maps function identifiers to implementations. The registry is populated
//! at startup and frozen by construction: it moves into the resolver
//! before the first resolve call and is never mutated afterward.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use terminus_core::model::{Expr, ResultSpec, RuleModel};
use terminus_core::{ModelError, Value};
use thiserror::Error;

/// Error produced by a function implementation
///
/// These indicate a mistyped model, not a legitimate runtime condition:
/// bad *input data* yields absent, bad argument *types* yield an error.
#[derive(Error, Debug)]
pub enum FunctionError {
    #[error("argument {index} has unexpected type: expected {expected}, got {actual}")]
    ArgumentType {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("expected {expected} arguments, got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    #[error("{0}")]
    Other(String),
}

/// A registered condition/expression function.
///
/// Arguments arrive as possibly-absent values so presence tests work and
/// parsers can yield absent. Implementations must be non-blocking and free
/// of side effects beyond their returned value; the engine handles the
/// binding side effect itself.
pub trait Function: Send + Sync {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError>;
}

struct FunctionEntry {
    function: Arc<dyn Function>,
    needs_extra_state: bool,
}

/// Identifier-keyed registry of function implementations
pub struct FunctionRegistry {
    entries: HashMap<String, FunctionEntry>,
}

impl FunctionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry preloaded with the built-in function library.
    ///
    /// `partition` is not included: it needs a host-supplied table, so it
    /// is registered explicitly via [`PartitionLookup`](crate::PartitionLookup).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::functions::register_builtins(&mut registry);
        registry
    }

    /// Register a function.
    ///
    /// `needs_extra_state` marks implementations that carry auxiliary data
    /// beyond the call parameters (lookup tables and the like), letting a
    /// host ask which state a given model actually requires.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        function: Arc<dyn Function>,
        needs_extra_state: bool,
    ) {
        self.entries.insert(
            id.into(),
            FunctionEntry {
                function,
                needs_extra_state,
            },
        );
    }

    /// Look up a function by identifier
    pub fn lookup(&self, id: &str) -> Option<&Arc<dyn Function>> {
        self.entries.get(id).map(|entry| &entry.function)
    }

    /// Whether an identifier is registered
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered functions
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Identifiers of every function the model references, in conditions
    /// and in result expressions
    pub fn used_functions(&self, model: &RuleModel) -> BTreeSet<String> {
        let mut used = BTreeSet::new();
        visit_model_functions(model, &mut |id| {
            used.insert(id.to_string());
        });
        used
    }

    /// Used functions that carry extra state, so the host can include
    /// only what this model needs
    pub fn state_requirements(&self, model: &RuleModel) -> BTreeSet<String> {
        self.used_functions(model)
            .into_iter()
            .filter(|id| {
                self.entries
                    .get(id)
                    .map(|entry| entry.needs_extra_state)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Check that every function the model references is registered
    pub fn validate_model(&self, model: &RuleModel) -> Result<(), ModelError> {
        let mut missing = None;
        visit_model_functions(model, &mut |id| {
            if missing.is_none() && !self.entries.contains_key(id) {
                missing = Some(id.to_string());
            }
        });
        match missing {
            Some(id) => Err(ModelError::FunctionNotFound { id }),
            None => Ok(()),
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Invoke `visitor` for every function identifier the model references
fn visit_model_functions(model: &RuleModel, visitor: &mut impl FnMut(&str)) {
    fn visit_expr(expr: &Expr, visitor: &mut impl FnMut(&str)) {
        expr.visit(&mut |e| {
            if let Expr::Call { function, .. } = e {
                visitor(function);
            }
        });
    }

    for condition in &model.conditions {
        visitor(&condition.function);
        for arg in &condition.args {
            visit_expr(arg, visitor);
        }
    }
    for result in &model.results {
        match result {
            ResultSpec::Error { message } => visit_expr(message, visitor),
            ResultSpec::Endpoint {
                url,
                headers,
                properties,
            } => {
                visit_expr(url, visitor);
                for header in headers {
                    for value in &header.values {
                        visit_expr(value, visitor);
                    }
                }
                for property in properties {
                    visit_expr(&property.value, visitor);
                }
            }
        }
    }
}
