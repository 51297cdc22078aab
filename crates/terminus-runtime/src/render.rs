//! Terminal rendering
//!
//! Turns the terminal a decision walk reached into the caller-visible
//! outcome: a resolved endpoint, a rule-defined error, or the no-match
//! failure. Rendering reads bindings leniently — a variable whose
//! condition never ran on this path is simply absent.

use crate::context::EvaluationContext;
use crate::diagnostics::EvaluationTrace;
use crate::endpoint::Endpoint;
use crate::error::ResolveError;
use crate::evaluator::{stringify, Evaluator, VarMode};
use std::collections::HashMap;
use terminus_core::model::{Expr, NodeRef, ResultSpec};
use terminus_core::Value;
use tracing::debug;

pub(crate) fn render_terminal(
    evaluator: &Evaluator<'_>,
    terminal: NodeRef,
    ctx: &EvaluationContext,
    diagnostics: EvaluationTrace,
) -> Result<Endpoint, ResolveError> {
    match terminal {
        NodeRef::NoMatch => {
            debug!(evaluated = diagnostics.len(), "no rule matched");
            Err(ResolveError::NoRuleMatched { trace: diagnostics })
        }

        NodeRef::Node(index) => Err(ResolveError::ModelViolation(format!(
            "node {index} is not a terminal"
        ))),

        NodeRef::Result(index) => {
            let result = evaluator.model.results.get(index).ok_or_else(|| {
                ResolveError::ModelViolation(format!("result index {index} is out of range"))
            })?;
            match result {
                ResultSpec::Error { message } => {
                    let message = require_string(evaluator, message, ctx, "error message")?;
                    debug!(result = index, "rule-defined error reached");
                    Err(ResolveError::RuleError {
                        message,
                        trace: diagnostics,
                    })
                }
                ResultSpec::Endpoint {
                    url,
                    headers,
                    properties,
                } => {
                    let url = require_string(evaluator, url, ctx, "endpoint url")?;

                    let mut rendered_headers: HashMap<String, Vec<String>> = HashMap::new();
                    for header in headers {
                        let mut values = Vec::with_capacity(header.values.len());
                        for expr in &header.values {
                            if let Some(value) =
                                evaluator.eval_expr(expr, ctx, VarMode::Lenient)?
                            {
                                values.push(header_value(&header.name, &value)?);
                            }
                        }
                        if !values.is_empty() {
                            rendered_headers.insert(header.name.clone(), values);
                        }
                    }

                    let mut rendered_properties: HashMap<String, Value> = HashMap::new();
                    for property in properties {
                        if let Some(value) =
                            evaluator.eval_expr(&property.value, ctx, VarMode::Lenient)?
                        {
                            rendered_properties.insert(property.name.clone(), value);
                        }
                    }

                    debug!(result = index, url = %url, "endpoint resolved");
                    Ok(Endpoint {
                        url,
                        headers: rendered_headers,
                        properties: rendered_properties,
                    })
                }
            }
        }
    }
}

fn require_string(
    evaluator: &Evaluator<'_>,
    expr: &Expr,
    ctx: &EvaluationContext,
    what: &str,
) -> Result<String, ResolveError> {
    match evaluator.eval_expr(expr, ctx, VarMode::Lenient)? {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(ResolveError::ModelViolation(format!(
            "{what} must be a string, got a {} value",
            other.type_name()
        ))),
        None => Err(ResolveError::ModelViolation(format!(
            "{what} evaluated to no value"
        ))),
    }
}

fn header_value(name: &str, value: &Value) -> Result<String, ResolveError> {
    stringify(value).ok_or_else(|| {
        ResolveError::ModelViolation(format!(
            "header '{name}' value must be a string, got a {} value",
            value.type_name()
        ))
    })
}
