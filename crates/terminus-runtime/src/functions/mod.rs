//! Built-in function library
//!
//! One module per function family, mirroring how conditions use them:
//! presence and string tests, URI/URL handling, resource-name parsing,
//! and partition lookup. All built-ins are total over their inputs: bad
//! input data yields absent, only a mistyped argument is an error.

pub mod arn;
pub mod partition;
pub mod strings;
pub mod uri;

use crate::registry::{FunctionError, FunctionRegistry};
use std::sync::Arc;
use terminus_core::Value;

/// Register every stateless built-in.
///
/// `partition` is deliberately absent: it carries a host-supplied table
/// and is registered separately with `needs_extra_state = true`.
pub(crate) fn register_builtins(registry: &mut FunctionRegistry) {
    registry.register("is_set", Arc::new(strings::IsSet), false);
    registry.register("not", Arc::new(strings::Not), false);
    registry.register("string_equals", Arc::new(strings::StringEquals), false);
    registry.register("boolean_equals", Arc::new(strings::BooleanEquals), false);
    registry.register("substring", Arc::new(strings::Substring), false);
    registry.register("uri_encode", Arc::new(uri::UriEncode), false);
    registry.register(
        "is_valid_host_label",
        Arc::new(uri::ValidHostLabel::new()),
        false,
    );
    registry.register("parse_url", Arc::new(uri::ParseUrl), false);
    registry.register("parse_arn", Arc::new(arn::ParseArn), false);
}

pub(crate) fn expect_args(args: &[Option<Value>], expected: usize) -> Result<(), FunctionError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(FunctionError::ArgumentCount {
            expected,
            actual: args.len(),
        })
    }
}

pub(crate) fn opt_str(args: &[Option<Value>], index: usize) -> Result<Option<&str>, FunctionError> {
    match &args[index] {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(FunctionError::ArgumentType {
            index,
            expected: "string",
            actual: other.type_name(),
        }),
    }
}

pub(crate) fn opt_bool(args: &[Option<Value>], index: usize) -> Result<Option<bool>, FunctionError> {
    match &args[index] {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(FunctionError::ArgumentType {
            index,
            expected: "boolean",
            actual: other.type_name(),
        }),
    }
}

pub(crate) fn opt_int(args: &[Option<Value>], index: usize) -> Result<Option<i64>, FunctionError> {
    match &args[index] {
        None => Ok(None),
        Some(Value::Int(i)) => Ok(Some(*i)),
        Some(other) => Err(FunctionError::ArgumentType {
            index,
            expected: "integer",
            actual: other.type_name(),
        }),
    }
}
