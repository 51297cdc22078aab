//! End-to-end resolver tests
//!
//! Exercises the full resolve pipeline: parameter binding, the decision
//! walk with memoization, binding side effects, result rendering, and
//! failure traces.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use terminus_core::model::{
    Condition, DecisionNode, Expr, NodeRef, Parameter, PathSegment, ResultSpec, RuleModel, NO_MATCH,
};
use terminus_core::{Value, ValueType};
use terminus_runtime::{
    load_model, EndpointResolver, Function, FunctionError, FunctionRegistry, PartitionLookup,
    PartitionTable, ResolveError,
};

fn params(entries: &[(&str, Value)]) -> HashMap<String, Value> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// Returns true and counts how many times it was invoked
struct CountingTrue {
    calls: AtomicUsize,
}

impl CountingTrue {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

impl Function for CountingTrue {
    fn evaluate(&self, _args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Value::Bool(true)))
    }
}

// =============================================================================
// Presence branching and dead-result coverage
// =============================================================================

fn presence_model() -> RuleModel {
    RuleModel::new(
        vec![Parameter::new("service_tier", ValueType::String)],
        vec![Condition::new("is_set", vec![Expr::param("service_tier")])],
        vec![
            ResultSpec::endpoint(Expr::literal(Value::from("https://a.example.com")))
                .with_header("x-endpoint-class", vec![Expr::literal(Value::from("tiered"))])
                .with_property("service_tier", Expr::param("service_tier")),
            ResultSpec::endpoint(Expr::literal(Value::from("https://b.example.com"))),
        ],
        vec![DecisionNode {
            condition: 0,
            high: NodeRef::result(0),
            low: NodeRef::result(1),
        }],
        0,
    )
}

#[test]
fn test_presence_branching() {
    let resolver =
        EndpointResolver::new(presence_model(), FunctionRegistry::with_builtins()).unwrap();

    let endpoint = resolver
        .resolve(&params(&[("service_tier", Value::from("gold"))]))
        .unwrap();
    assert_eq!(endpoint.url, "https://a.example.com");
    assert_eq!(
        endpoint.header("x-endpoint-class"),
        Some(&["tiered".to_string()][..])
    );
    assert_eq!(endpoint.property("service_tier"), Some(&Value::from("gold")));

    let endpoint = resolver.resolve(&params(&[])).unwrap();
    assert_eq!(endpoint.url, "https://b.example.com");
    assert!(endpoint.headers.is_empty());
}

#[test]
fn test_every_result_reachable_by_some_assignment() {
    let resolver =
        EndpointResolver::new(presence_model(), FunctionRegistry::with_builtins()).unwrap();

    let assignments = [params(&[]), params(&[("service_tier", Value::from("x"))])];
    let mut reached: Vec<String> = assignments
        .iter()
        .map(|assignment| resolver.resolve(assignment).unwrap().url)
        .collect();
    reached.sort();
    reached.dedup();
    assert_eq!(
        reached,
        vec!["https://a.example.com", "https://b.example.com"]
    );
}

#[test]
fn test_resolution_is_deterministic() {
    let resolver =
        EndpointResolver::new(presence_model(), FunctionRegistry::with_builtins()).unwrap();
    let assignment = params(&[("service_tier", Value::from("gold"))]);

    let first = resolver.resolve(&assignment).unwrap();
    for _ in 0..10 {
        assert_eq!(resolver.resolve(&assignment).unwrap(), first);
    }
}

// =============================================================================
// Binding and attribute access
// =============================================================================

fn arn_model() -> RuleModel {
    RuleModel::new(
        vec![Parameter::new("resource", ValueType::String)],
        vec![Condition::new("parse_arn", vec![Expr::param("resource")])
            .with_binding("arn_parts", ValueType::Arn)],
        vec![
            ResultSpec::endpoint(Expr::concat(vec![
                Expr::literal(Value::from("https://storage.example.com/")),
                Expr::get_attr(
                    Expr::var("arn_parts"),
                    vec![
                        PathSegment::Field("resource_id".to_string()),
                        PathSegment::Index(1),
                    ],
                ),
            ])),
            ResultSpec::endpoint(Expr::literal(Value::from("https://fallback.example.com"))),
        ],
        vec![DecisionNode {
            condition: 0,
            high: NodeRef::result(0),
            low: NodeRef::result(1),
        }],
        0,
    )
}

#[test]
fn test_arn_binding_feeds_result_url() {
    let resolver = EndpointResolver::new(arn_model(), FunctionRegistry::with_builtins()).unwrap();

    let endpoint = resolver
        .resolve(&params(&[(
            "resource",
            Value::from("arn:core:storage:east-1:123456789012:bucket/key"),
        )]))
        .unwrap();
    assert_eq!(endpoint.url, "https://storage.example.com/key");
}

#[test]
fn test_failed_parse_takes_false_branch() {
    let resolver = EndpointResolver::new(arn_model(), FunctionRegistry::with_builtins()).unwrap();

    let endpoint = resolver
        .resolve(&params(&[("resource", Value::from("not-an-arn"))]))
        .unwrap();
    assert_eq!(endpoint.url, "https://fallback.example.com");
}

// =============================================================================
// Shared-condition memoization
// =============================================================================

#[test]
fn test_shared_condition_evaluates_once_per_call() {
    // Nodes 0 and 2 both reference condition 0; one traversal crosses both.
    let model = RuleModel::new(
        vec![Parameter::new("service_tier", ValueType::String)],
        vec![
            Condition::new("counted_true", vec![]),
            Condition::new("is_set", vec![Expr::param("service_tier")]),
        ],
        vec![ResultSpec::endpoint(Expr::literal(Value::from(
            "https://a.example.com",
        )))],
        vec![
            DecisionNode {
                condition: 0,
                high: NodeRef::node(1),
                low: NO_MATCH,
            },
            DecisionNode {
                condition: 1,
                high: NodeRef::node(2),
                low: NodeRef::node(2),
            },
            DecisionNode {
                condition: 0,
                high: NodeRef::result(0),
                low: NO_MATCH,
            },
        ],
        0,
    );

    let counter = CountingTrue::new();
    let mut registry = FunctionRegistry::with_builtins();
    registry.register("counted_true", counter.clone(), false);
    let resolver = EndpointResolver::new(model, registry).unwrap();

    let endpoint = resolver.resolve(&params(&[])).unwrap();
    assert_eq!(endpoint.url, "https://a.example.com");
    assert_eq!(counter.calls.load(Ordering::SeqCst), 1);

    // A second call re-evaluates: the memo table is call-scoped.
    resolver.resolve(&params(&[])).unwrap();
    assert_eq!(counter.calls.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Unset binding tolerated at render time
// =============================================================================

#[test]
fn test_render_tolerates_unset_binding() {
    // The low branch of node 0 skips the binding condition entirely, yet
    // the shared result coalesces over the bound variable.
    let model = RuleModel::new(
        vec![Parameter::new("account", ValueType::String)],
        vec![
            Condition::new("is_set", vec![Expr::param("account")]),
            Condition::new("parse_arn", vec![Expr::param("account")])
                .with_binding("parsed", ValueType::Arn),
        ],
        vec![ResultSpec::endpoint(Expr::coalesce(vec![
            Expr::concat(vec![
                Expr::literal(Value::from("https://")),
                Expr::get_attr(
                    Expr::var("parsed"),
                    vec![PathSegment::Field("service".to_string())],
                ),
                Expr::literal(Value::from(".example.com")),
            ]),
            Expr::literal(Value::from("https://default.example.com")),
        ]))],
        vec![
            DecisionNode {
                condition: 0,
                high: NodeRef::node(1),
                low: NodeRef::result(0),
            },
            DecisionNode {
                condition: 1,
                high: NodeRef::result(0),
                low: NodeRef::result(0),
            },
        ],
        0,
    );
    let resolver = EndpointResolver::new(model, FunctionRegistry::with_builtins()).unwrap();

    // Unset binding: the coalesce falls through to the default.
    let endpoint = resolver.resolve(&params(&[])).unwrap();
    assert_eq!(endpoint.url, "https://default.example.com");

    // Bound: the first coalesce entry renders.
    let endpoint = resolver
        .resolve(&params(&[(
            "account",
            Value::from("arn:core:storage:east-1:42:bucket"),
        )]))
        .unwrap();
    assert_eq!(endpoint.url, "https://storage.example.com");

    // Tried-and-absent: parsing fails, the binding holds an absent value,
    // and the coalesce still falls through cleanly.
    let endpoint = resolver
        .resolve(&params(&[("account", Value::from("not-an-arn"))]))
        .unwrap();
    assert_eq!(endpoint.url, "https://default.example.com");
}

// =============================================================================
// No-match failures carry a trace
// =============================================================================

#[test]
fn test_no_match_carries_trace() {
    let model = RuleModel::new(
        vec![Parameter::new("region", ValueType::String)],
        vec![Condition::new("is_set", vec![Expr::param("region")])],
        vec![ResultSpec::endpoint(Expr::literal(Value::from(
            "https://regional.example.com",
        )))],
        vec![DecisionNode {
            condition: 0,
            high: NodeRef::result(0),
            low: NO_MATCH,
        }],
        0,
    );
    let resolver = EndpointResolver::new(model, FunctionRegistry::with_builtins()).unwrap();

    let error = resolver.resolve(&params(&[])).unwrap_err();
    match &error {
        ResolveError::NoRuleMatched { trace } => {
            assert!(!trace.is_empty());
            assert_eq!(trace.records[0].condition, 0);
            assert_eq!(trace.records[0].function, "is_set");
            assert!(!trace.records[0].outcome);
        }
        other => panic!("expected a no-match failure, got {other:?}"),
    }
    assert!(error.trace().is_some());
}

// =============================================================================
// Rule-defined errors
// =============================================================================

#[test]
fn test_rule_defined_error_surfaces_message() {
    let model = RuleModel::new(
        vec![Parameter::new("region", ValueType::String)],
        vec![Condition::new("is_set", vec![Expr::param("region")])],
        vec![
            ResultSpec::endpoint(Expr::concat(vec![
                Expr::literal(Value::from("https://")),
                Expr::param("region"),
                Expr::literal(Value::from(".example.com")),
            ])),
            ResultSpec::error(Expr::literal(Value::from(
                "region must be set to resolve an endpoint",
            ))),
        ],
        vec![DecisionNode {
            condition: 0,
            high: NodeRef::result(0),
            low: NodeRef::result(1),
        }],
        0,
    );
    let resolver = EndpointResolver::new(model, FunctionRegistry::with_builtins()).unwrap();

    let endpoint = resolver
        .resolve(&params(&[("region", Value::from("east-1"))]))
        .unwrap();
    assert_eq!(endpoint.url, "https://east-1.example.com");

    let error = resolver.resolve(&params(&[])).unwrap_err();
    match &error {
        ResolveError::RuleError { message, trace } => {
            assert_eq!(message, "region must be set to resolve an endpoint");
            assert!(!trace.is_empty());
        }
        other => panic!("expected a rule-defined error, got {other:?}"),
    }
    assert_eq!(
        error.to_string(),
        "region must be set to resolve an endpoint"
    );
}

// =============================================================================
// Partition lookup end to end
// =============================================================================

#[test]
fn test_partition_lookup_feeds_endpoint() {
    let table = PartitionTable::from_json_str(
        r#"{
            "partitions": [{
                "id": "core",
                "region_regex": "^(east|west)-\\d+$",
                "regions": ["east-1"],
                "outputs": {
                    "name": "core",
                    "dns_suffix": "example.com",
                    "dual_stack_dns_suffix": "api.example.com",
                    "supports_fips": true,
                    "supports_dual_stack": true
                }
            }]
        }"#,
    )
    .unwrap();

    let model = RuleModel::new(
        vec![Parameter::new("region", ValueType::String).required()],
        vec![Condition::new("partition", vec![Expr::param("region")])
            .with_binding("part", ValueType::Partition)],
        vec![ResultSpec::endpoint(Expr::concat(vec![
            Expr::literal(Value::from("https://svc.")),
            Expr::param("region"),
            Expr::literal(Value::from(".")),
            Expr::get_attr(
                Expr::var("part"),
                vec![PathSegment::Field("dns_suffix".to_string())],
            ),
        ]))],
        vec![DecisionNode {
            condition: 0,
            high: NodeRef::result(0),
            low: NO_MATCH,
        }],
        0,
    );

    let mut registry = FunctionRegistry::with_builtins();
    registry.register(
        "partition",
        Arc::new(PartitionLookup::new(table).unwrap()),
        true,
    );

    let stateful = registry.state_requirements(&model);
    assert!(stateful.contains("partition"));

    let resolver = EndpointResolver::new(model, registry).unwrap();
    let endpoint = resolver
        .resolve(&params(&[("region", Value::from("west-2"))]))
        .unwrap();
    assert_eq!(endpoint.url, "https://svc.west-2.example.com");

    let error = resolver
        .resolve(&params(&[("region", Value::from("unknown-zone"))]))
        .unwrap_err();
    assert!(matches!(error, ResolveError::NoRuleMatched { .. }));
}

// =============================================================================
// Loading from disk
// =============================================================================

#[test]
fn test_load_model_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("endpoints.json");
    std::fs::write(&path, serde_json::to_string(&presence_model()).unwrap()).unwrap();

    let model = load_model(&path).unwrap();
    assert_eq!(model.results.len(), 2);

    let resolver =
        terminus_runtime::build_resolver(&path, FunctionRegistry::with_builtins()).unwrap();
    let endpoint = resolver.resolve(&params(&[])).unwrap();
    assert_eq!(endpoint.url, "https://b.example.com");
}

#[test]
fn test_load_model_reports_bad_documents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"nodes\": \"nope\"}").unwrap();

    assert!(load_model(&path).is_err());
    assert!(load_model(dir.path().join("missing.json")).is_err());
}
