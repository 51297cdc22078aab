//! Result table entries

use crate::model::Expr;
use serde::{Deserialize, Serialize};

/// A terminal template selected once a decision path completes.
///
/// The "no rule matched" terminal is the [`NO_MATCH`](crate::model::NO_MATCH)
/// sentinel reference, not a table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResultSpec {
    /// A rule-defined error with a caller-facing templated message
    Error { message: Expr },

    /// A resolved endpoint
    Endpoint {
        /// URL expression; must render to a present string
        url: Expr,
        /// Extra request headers
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        headers: Vec<HeaderTemplate>,
        /// Named connection/signing properties
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        properties: Vec<PropertyTemplate>,
    },
}

/// One header and its value expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderTemplate {
    pub name: String,
    pub values: Vec<Expr>,
}

/// One named property and its value expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyTemplate {
    pub name: String,
    pub value: Expr,
}

impl ResultSpec {
    /// An endpoint result with no headers or properties
    pub fn endpoint(url: Expr) -> Self {
        ResultSpec::Endpoint {
            url,
            headers: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// An error result
    pub fn error(message: Expr) -> Self {
        ResultSpec::Error { message }
    }

    /// Add a header template; no-op on error results
    pub fn with_header(mut self, name: impl Into<String>, values: Vec<Expr>) -> Self {
        if let ResultSpec::Endpoint { headers, .. } = &mut self {
            headers.push(HeaderTemplate {
                name: name.into(),
                values,
            });
        }
        self
    }

    /// Add a property template; no-op on error results
    pub fn with_property(mut self, name: impl Into<String>, value: Expr) -> Self {
        if let ResultSpec::Endpoint { properties, .. } = &mut self {
            properties.push(PropertyTemplate {
                name: name.into(),
                value,
            });
        }
        self
    }
}
