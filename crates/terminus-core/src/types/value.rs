//! Runtime value types for rule evaluation
//!
//! The `Value` enum represents every value the engine can produce or
//! consume: plain parameter values plus the structured descriptors
//! returned by parsing functions.

use crate::model::PathSegment;
use crate::types::{Arn, Partition, UrlParts};
use serde::{Deserialize, Serialize};

/// Runtime value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Integer value (substring index literals)
    Int(i64),
    /// String value
    String(String),
    /// Array of strings
    StringArray(Vec<String>),
    /// Partition descriptor
    Partition(Partition),
    /// Parsed resource name descriptor
    Arn(Arn),
    /// Parsed URL descriptor
    Url(UrlParts),
}

/// Declared type of a parameter, binding, or value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueType {
    Boolean,
    Integer,
    String,
    StringArray,
    Partition,
    Arn,
    Url,
}

impl Value {
    /// The type this value inhabits
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Boolean,
            Value::Int(_) => ValueType::Integer,
            Value::String(_) => ValueType::String,
            Value::StringArray(_) => ValueType::StringArray,
            Value::Partition(_) => ValueType::Partition,
            Value::Arn(_) => ValueType::Arn,
            Value::Url(_) => ValueType::Url,
        }
    }

    /// A human-readable type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::String(_) => "string",
            Value::StringArray(_) => "string array",
            Value::Partition(_) => "partition",
            Value::Arn(_) => "arn",
            Value::Url(_) => "url",
        }
    }

    /// Extract a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract a string array
    pub fn as_string_array(&self) -> Option<&[String]> {
        match self {
            Value::StringArray(items) => Some(items),
            _ => None,
        }
    }

    /// Walk an attribute path into this value.
    ///
    /// Field access applies to structured descriptors, index access to
    /// string arrays. Any miss (unknown field, out-of-range index, access
    /// on a scalar) is absent, never an error.
    pub fn get_path(&self, path: &[PathSegment]) -> Option<Value> {
        let mut current = self.clone();
        for segment in path {
            current = current.get_segment(segment)?;
        }
        Some(current)
    }

    fn get_segment(&self, segment: &PathSegment) -> Option<Value> {
        match (self, segment) {
            (Value::Arn(arn), PathSegment::Field(name)) => match name.as_str() {
                "partition" => Some(Value::String(arn.partition.clone())),
                "service" => Some(Value::String(arn.service.clone())),
                "region" => Some(Value::String(arn.region.clone())),
                "account_id" => Some(Value::String(arn.account_id.clone())),
                "resource_id" => Some(Value::StringArray(arn.resource_id.clone())),
                _ => None,
            },
            (Value::Url(url), PathSegment::Field(name)) => match name.as_str() {
                "scheme" => Some(Value::String(url.scheme.clone())),
                "authority" => Some(Value::String(url.authority.clone())),
                "path" => Some(Value::String(url.path.clone())),
                "normalized_path" => Some(Value::String(url.normalized_path.clone())),
                "is_ip" => Some(Value::Bool(url.is_ip)),
                _ => None,
            },
            (Value::Partition(partition), PathSegment::Field(name)) => match name.as_str() {
                "name" => Some(Value::String(partition.name.clone())),
                "dns_suffix" => Some(Value::String(partition.dns_suffix.clone())),
                "dual_stack_dns_suffix" => {
                    Some(Value::String(partition.dual_stack_dns_suffix.clone()))
                }
                "supports_fips" => Some(Value::Bool(partition.supports_fips)),
                "supports_dual_stack" => Some(Value::Bool(partition.supports_dual_stack)),
                _ => None,
            },
            (Value::StringArray(items), PathSegment::Index(index)) => {
                items.get(*index).cloned().map(Value::String)
            }
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}
