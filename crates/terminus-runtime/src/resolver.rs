//! Endpoint resolver
//!
//! The resolver owns the compiled model and the frozen function registry.
//! Both are validated once at construction and immutable afterward, so a
//! resolver can be shared across threads; every `resolve` call gets its
//! own memo table, context, and trace.

use crate::context::EvaluationContext;
use crate::diagnostics::EvaluationTrace;
use crate::endpoint::Endpoint;
use crate::error::{ResolveError, Result};
use crate::evaluator::Evaluator;
use crate::registry::FunctionRegistry;
use crate::render::render_terminal;
use std::collections::HashMap;
use terminus_core::model::{NodeRef, RuleModel};
use terminus_core::{ModelError, Value};
use tracing::debug;

/// Memo slot for one condition of one resolve call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Memo {
    Unevaluated,
    True,
    False,
}

/// Resolves endpoints by walking a compiled decision diagram
pub struct EndpointResolver {
    model: RuleModel,
    registry: FunctionRegistry,
}

impl EndpointResolver {
    /// Validate the model structurally and against the registry, then
    /// freeze both into a resolver.
    ///
    /// This is where the build-time error class surfaces; after `new`
    /// succeeds, only per-call failures remain.
    pub fn new(
        model: RuleModel,
        registry: FunctionRegistry,
    ) -> std::result::Result<Self, ModelError> {
        model.validate()?;
        registry.validate_model(&model)?;
        Ok(Self { model, registry })
    }

    /// The compiled model
    pub fn model(&self) -> &RuleModel {
        &self.model
    }

    /// The frozen registry
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Resolve the endpoint for one call.
    ///
    /// Walks the diagram from the root, evaluating each condition at most
    /// once per call: the memo table is keyed by condition index, so nodes
    /// sharing a condition share one evaluation and its single binding
    /// side effect.
    pub fn resolve(&self, params: &HashMap<String, Value>) -> Result<Endpoint> {
        let params = self.bind_parameters(params)?;
        debug!(parameters = params.len(), "resolving endpoint");

        let evaluator = Evaluator {
            model: &self.model,
            registry: &self.registry,
            params: &params,
        };
        let mut ctx = EvaluationContext::new();
        let mut diagnostics = EvaluationTrace::new();
        let mut memo = vec![Memo::Unevaluated; self.model.conditions.len()];

        let mut current = self.model.root_ref();
        let mut steps = 0usize;
        loop {
            match current {
                NodeRef::Node(index) => {
                    // The graph is validated acyclic; the budget is a
                    // guard against a model mutated after validation.
                    steps += 1;
                    if steps > self.model.nodes.len() {
                        return Err(ResolveError::ModelViolation(
                            "decision walk exceeded the node budget".to_string(),
                        ));
                    }
                    let node = self.model.nodes.get(index).ok_or_else(|| {
                        ResolveError::ModelViolation(format!(
                            "node index {index} is out of range"
                        ))
                    })?;
                    let condition = node.condition as usize;
                    let outcome = match memo[condition] {
                        Memo::True => true,
                        Memo::False => false,
                        Memo::Unevaluated => {
                            let fresh = evaluator.evaluate_condition(
                                condition,
                                &mut ctx,
                                &mut diagnostics,
                            )?;
                            memo[condition] = if fresh { Memo::True } else { Memo::False };
                            fresh
                        }
                    };
                    current = NodeRef::decode(if outcome { node.high } else { node.low });
                }
                terminal => {
                    return render_terminal(&evaluator, terminal, &ctx, diagnostics);
                }
            }
        }
    }

    /// Overlay supplied values onto declared defaults, rejecting unknown
    /// names, type mismatches, and missing required parameters.
    fn bind_parameters(&self, supplied: &HashMap<String, Value>) -> Result<HashMap<String, Value>> {
        for name in supplied.keys() {
            if self.model.parameter(name).is_none() {
                return Err(ResolveError::InvalidParameter {
                    name: name.clone(),
                    reason: "not declared by the rule model".to_string(),
                });
            }
        }

        let mut bound = HashMap::with_capacity(self.model.parameters.len());
        for parameter in &self.model.parameters {
            match supplied.get(&parameter.name) {
                Some(value) => {
                    if value.value_type() != parameter.value_type {
                        return Err(ResolveError::InvalidParameter {
                            name: parameter.name.clone(),
                            reason: format!(
                                "expected a {:?} value, got a {} value",
                                parameter.value_type,
                                value.type_name()
                            ),
                        });
                    }
                    bound.insert(parameter.name.clone(), value.clone());
                }
                None => match &parameter.default {
                    Some(default) => {
                        bound.insert(parameter.name.clone(), default.clone());
                    }
                    None if parameter.required => {
                        return Err(ResolveError::InvalidParameter {
                            name: parameter.name.clone(),
                            reason: "required but not supplied".to_string(),
                        });
                    }
                    None => {}
                },
            }
        }
        Ok(bound)
    }
}
