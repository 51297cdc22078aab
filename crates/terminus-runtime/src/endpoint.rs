//! Resolved endpoint type

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use terminus_core::Value;

/// The resolved network target for one outbound call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Target URL
    pub url: String,

    /// Extra request headers
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,

    /// Opaque per-call metadata such as signing-region overrides
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl Endpoint {
    /// Create an endpoint with no headers or properties
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            properties: HashMap::new(),
        }
    }

    /// Values of a header, if present
    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers.get(name).map(Vec::as_slice)
    }

    /// A named property, if present
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}
