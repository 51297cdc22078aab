//! Build-time model validation
//!
//! The upstream compiler guarantees these invariants; this module detects
//! violations once, at model load, so the request path never has to.

use crate::error::ModelError;
use crate::model::{Expr, NodeRef, ResultSpec, RuleModel};
use crate::types::ValueType;
use std::collections::{HashMap, HashSet};

pub(crate) fn validate(model: &RuleModel) -> Result<(), ModelError> {
    check_parameters(model)?;
    let bindings = check_bindings(model)?;
    check_references(model)?;
    let order = topological_order(model)?;
    check_expression_names(model, &bindings)?;
    check_argument_dataflow(model, &order)?;
    Ok(())
}

fn check_parameters(model: &RuleModel) -> Result<(), ModelError> {
    let mut seen = HashSet::new();
    for parameter in &model.parameters {
        if !seen.insert(parameter.name.as_str()) {
            return Err(ModelError::DuplicateParameter {
                name: parameter.name.clone(),
            });
        }
        match parameter.value_type {
            ValueType::String | ValueType::Boolean | ValueType::StringArray => {}
            declared => {
                return Err(ModelError::UnsupportedParameterType {
                    name: parameter.name.clone(),
                    declared,
                })
            }
        }
        if let Some(default) = &parameter.default {
            if default.value_type() != parameter.value_type {
                return Err(ModelError::DefaultTypeMismatch {
                    name: parameter.name.clone(),
                    expected: parameter.value_type,
                });
            }
        }
    }
    Ok(())
}

/// Collect binding names, rejecting duplicates across conditions
fn check_bindings(model: &RuleModel) -> Result<HashMap<&str, usize>, ModelError> {
    let mut bindings: HashMap<&str, usize> = HashMap::new();
    for (index, condition) in model.conditions.iter().enumerate() {
        if let Some(binding) = &condition.bind {
            if let Some(&first) = bindings.get(binding.name.as_str()) {
                return Err(ModelError::DuplicateBinding {
                    first,
                    second: index,
                    name: binding.name.clone(),
                });
            }
            bindings.insert(binding.name.as_str(), index);
        }
    }
    Ok(bindings)
}

fn check_references(model: &RuleModel) -> Result<(), ModelError> {
    check_ref(model, model.root, "root")?;
    for (index, node) in model.nodes.iter().enumerate() {
        if node.condition as usize >= model.conditions.len() {
            return Err(ModelError::InvalidReference {
                reference: node.condition as i64,
                context: format!("node {index} condition"),
            });
        }
        check_ref(model, node.high, &format!("node {index} high"))?;
        check_ref(model, node.low, &format!("node {index} low"))?;
    }
    Ok(())
}

fn check_ref(model: &RuleModel, raw: i64, context: &str) -> Result<(), ModelError> {
    let in_range = match NodeRef::decode(raw) {
        NodeRef::NoMatch => true,
        NodeRef::Result(index) => index < model.results.len(),
        NodeRef::Node(index) => index < model.nodes.len(),
    };
    if in_range {
        Ok(())
    } else {
        Err(ModelError::InvalidReference {
            reference: raw,
            context: context.to_string(),
        })
    }
}

/// Topological order over the node array; fails on a cycle.
///
/// Iterative three-color DFS: a gray successor is an ancestor still on the
/// active path, which is exactly a cycle.
fn topological_order(model: &RuleModel) -> Result<Vec<usize>, ModelError> {
    const WHITE: u8 = 0;
    const GRAY: u8 = 1;
    const BLACK: u8 = 2;

    let mut color = vec![WHITE; model.nodes.len()];
    let mut order = Vec::with_capacity(model.nodes.len());

    for start in 0..model.nodes.len() {
        if color[start] != WHITE {
            continue;
        }
        let mut stack = vec![(start, false)];
        while let Some((node, children_done)) = stack.pop() {
            if children_done {
                color[node] = BLACK;
                order.push(node);
                continue;
            }
            if color[node] != WHITE {
                continue;
            }
            color[node] = GRAY;
            stack.push((node, true));
            for raw in [model.nodes[node].high, model.nodes[node].low] {
                if let NodeRef::Node(next) = NodeRef::decode(raw) {
                    match color[next] {
                        WHITE => stack.push((next, false)),
                        GRAY => return Err(ModelError::CycleDetected { node: next }),
                        _ => {}
                    }
                }
            }
        }
    }

    order.reverse();
    Ok(order)
}

/// Every referenced name must be declared somewhere: parameters in the
/// parameter table, variables in some condition's binding. Whether a
/// variable is bound on the *path* is the dataflow check's concern, and
/// only for condition arguments; result expressions may read variables
/// their path never bound (they render as absent).
fn check_expression_names(
    model: &RuleModel,
    bindings: &HashMap<&str, usize>,
) -> Result<(), ModelError> {
    let parameters: HashSet<&str> = model.parameters.iter().map(|p| p.name.as_str()).collect();

    let mut defect = None;
    let mut check = |expr: &Expr| {
        if defect.is_some() {
            return;
        }
        match expr {
            Expr::Param { name } if !parameters.contains(name.as_str()) => {
                defect = Some(ModelError::UnknownParameter { name: name.clone() });
            }
            Expr::Var { name } if !bindings.contains_key(name.as_str()) => {
                defect = Some(ModelError::UnknownVariable { name: name.clone() });
            }
            _ => {}
        }
    };

    for condition in &model.conditions {
        for arg in &condition.args {
            arg.visit(&mut check);
        }
    }
    for result in &model.results {
        match result {
            ResultSpec::Error { message } => message.visit(&mut check),
            ResultSpec::Endpoint {
                url,
                headers,
                properties,
            } => {
                url.visit(&mut check);
                for header in headers {
                    for value in &header.values {
                        value.visit(&mut check);
                    }
                }
                for property in properties {
                    property.value.visit(&mut check);
                }
            }
        }
    }

    match defect {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Forward dataflow over the diagram: a condition argument may only read
/// variables bound on *every* path reaching its node. A binding counts on
/// both branch outcomes, because evaluating a condition performs its
/// binding even when the produced value is absent.
fn check_argument_dataflow(model: &RuleModel, order: &[usize]) -> Result<(), ModelError> {
    let root = match model.root_ref() {
        NodeRef::Node(index) => index,
        _ => return Ok(()),
    };

    let mut reachable = HashSet::new();
    let mut queue = vec![root];
    while let Some(node) = queue.pop() {
        if !reachable.insert(node) {
            continue;
        }
        for raw in [model.nodes[node].high, model.nodes[node].low] {
            if let NodeRef::Node(next) = NodeRef::decode(raw) {
                queue.push(next);
            }
        }
    }

    let mut bound_in: HashMap<usize, HashSet<String>> = HashMap::new();
    bound_in.insert(root, HashSet::new());

    for &node in order {
        if !reachable.contains(&node) {
            continue;
        }
        let entry = bound_in.get(&node).cloned().unwrap_or_default();
        let condition_index = model.nodes[node].condition as usize;
        let condition = &model.conditions[condition_index];

        let mut unbound = None;
        for arg in &condition.args {
            arg.visit(&mut |expr| {
                if unbound.is_none() {
                    if let Expr::Var { name } = expr {
                        if !entry.contains(name) {
                            unbound = Some(name.clone());
                        }
                    }
                }
            });
        }
        if let Some(name) = unbound {
            return Err(ModelError::UnboundVariable {
                condition: condition_index,
                name,
            });
        }

        let mut exit = entry;
        if let Some(binding) = &condition.bind {
            exit.insert(binding.name.clone());
        }
        for raw in [model.nodes[node].high, model.nodes[node].low] {
            if let NodeRef::Node(next) = NodeRef::decode(raw) {
                bound_in
                    .entry(next)
                    .and_modify(|existing| existing.retain(|name| exit.contains(name)))
                    .or_insert_with(|| exit.clone());
            }
        }
    }

    Ok(())
}
