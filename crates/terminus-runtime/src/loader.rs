//! Model file loading
//!
//! Convenience layer for hosts that keep compiled models on disk. Parsing
//! and validation failures are reported with the file path attached.

use crate::registry::FunctionRegistry;
use crate::resolver::EndpointResolver;
use anyhow::{Context, Result};
use std::path::Path;
use terminus_core::model::RuleModel;
use tracing::{debug, info};

/// Load and validate a rule model from a JSON file
pub fn load_model(path: impl AsRef<Path>) -> Result<RuleModel> {
    let path = path.as_ref();
    debug!("loading rule model from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rule model file: {}", path.display()))?;

    let model = RuleModel::from_json_str(&content)
        .with_context(|| format!("failed to parse rule model file: {}", path.display()))?;

    model
        .validate()
        .with_context(|| format!("rule model failed validation: {}", path.display()))?;

    info!(
        "loaded rule model version {} with {} conditions, {} results, {} nodes from: {}",
        model.version,
        model.conditions.len(),
        model.results.len(),
        model.nodes.len(),
        path.display()
    );
    Ok(model)
}

/// Load a model file and freeze it with the given registry into a resolver
pub fn build_resolver(
    path: impl AsRef<Path>,
    registry: FunctionRegistry,
) -> Result<EndpointResolver> {
    let path = path.as_ref();
    let model = load_model(path)?;
    EndpointResolver::new(model, registry)
        .with_context(|| format!("rule model rejected by the function registry: {}", path.display()))
}
