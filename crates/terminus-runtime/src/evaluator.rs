//! Expression and condition evaluation

use crate::context::EvaluationContext;
use crate::diagnostics::EvaluationTrace;
use crate::error::ResolveError;
use crate::registry::FunctionRegistry;
use std::collections::HashMap;
use terminus_core::model::{Expr, RuleModel};
use terminus_core::Value;
use tracing::trace;

/// How a bound-variable reference that was never evaluated is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VarMode {
    /// Condition arguments: an unevaluated reference is a model defect
    Strict,
    /// Result rendering: an unevaluated reference reads as absent
    Lenient,
}

/// Shared read-only pieces of one resolve call
pub(crate) struct Evaluator<'a> {
    pub(crate) model: &'a RuleModel,
    pub(crate) registry: &'a FunctionRegistry,
    pub(crate) params: &'a HashMap<String, Value>,
}

impl Evaluator<'_> {
    /// Evaluate an expression to a possibly-absent value
    pub(crate) fn eval_expr(
        &self,
        expr: &Expr,
        ctx: &EvaluationContext,
        mode: VarMode,
    ) -> Result<Option<Value>, ResolveError> {
        match expr {
            Expr::Literal { value } => Ok(Some(value.clone())),

            Expr::Param { name } => Ok(self.params.get(name).cloned()),

            Expr::Var { name } => match ctx.get(name) {
                Some(slot) => Ok(slot.clone()),
                None => match mode {
                    VarMode::Strict => Err(ResolveError::ModelViolation(format!(
                        "condition argument reads variable '{name}' before it is bound"
                    ))),
                    VarMode::Lenient => Ok(None),
                },
            },

            Expr::GetAttr { target, path } => Ok(self
                .eval_expr(target, ctx, mode)?
                .and_then(|value| value.get_path(path))),

            Expr::Concat { parts } => {
                let mut out = String::new();
                for part in parts {
                    match self.eval_expr(part, ctx, mode)? {
                        None => return Ok(None),
                        Some(value) => match stringify(&value) {
                            Some(fragment) => out.push_str(&fragment),
                            None => {
                                return Err(ResolveError::ModelViolation(format!(
                                    "a {} value cannot be interpolated into a string template",
                                    value.type_name()
                                )))
                            }
                        },
                    }
                }
                Ok(Some(Value::String(out)))
            }

            Expr::Call { function, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg, ctx, mode)?);
                }
                let implementation = self.registry.lookup(function).ok_or_else(|| {
                    ResolveError::ModelViolation(format!("no function '{function}' is registered"))
                })?;
                implementation
                    .evaluate(&values)
                    .map_err(|e| ResolveError::ModelViolation(format!("function '{function}': {e}")))
            }

            // Every entry is evaluated exactly once, in order, and only
            // then is the first present value selected. Short-circuiting
            // here would skip evaluations the model is entitled to.
            Expr::Coalesce { exprs } => {
                let mut values = Vec::with_capacity(exprs.len());
                for expr in exprs {
                    values.push(self.eval_expr(expr, ctx, mode)?);
                }
                Ok(values.into_iter().flatten().next())
            }
        }
    }

    /// Evaluate one condition: resolve arguments, invoke the function once,
    /// record the fresh evaluation, and perform the binding side effect —
    /// absent results included.
    pub(crate) fn evaluate_condition(
        &self,
        index: usize,
        ctx: &mut EvaluationContext,
        diagnostics: &mut EvaluationTrace,
    ) -> Result<bool, ResolveError> {
        let condition = self.model.conditions.get(index).ok_or_else(|| {
            ResolveError::ModelViolation(format!("condition index {index} is out of range"))
        })?;

        let mut args = Vec::with_capacity(condition.args.len());
        for arg in &condition.args {
            args.push(self.eval_expr(arg, ctx, VarMode::Strict)?);
        }

        let implementation = self.registry.lookup(&condition.function).ok_or_else(|| {
            ResolveError::ModelViolation(format!(
                "no function '{}' is registered",
                condition.function
            ))
        })?;
        let value = implementation.evaluate(&args).map_err(|e| {
            ResolveError::ModelViolation(format!("function '{}': {e}", condition.function))
        })?;

        let outcome = truthiness(value.as_ref());
        trace!(
            condition = index,
            function = %condition.function,
            outcome,
            "condition evaluated"
        );
        diagnostics.record(index, &condition.function, outcome, value.clone());

        if let Some(binding) = &condition.bind {
            if let Some(bound) = &value {
                if bound.value_type() != binding.value_type {
                    return Err(ResolveError::ModelViolation(format!(
                        "condition {index} bound '{}' to a {} value, but declares {:?}",
                        binding.name,
                        bound.type_name(),
                        binding.value_type
                    )));
                }
            }
            ctx.bind(binding.name.clone(), value);
        }

        Ok(outcome)
    }
}

/// Condition truthiness: absent and empty are false, booleans are
/// themselves, any other present value is true.
pub(crate) fn truthiness(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::StringArray(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Render a value as a string-template fragment
pub(crate) fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Int(i) => Some(i.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
