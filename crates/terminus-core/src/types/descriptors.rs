//! Structured descriptor values produced by parsing functions
//!
//! These are plain data with equality semantics independent of the engine:
//! the same input always parses to the same descriptor.

use serde::{Deserialize, Serialize};

/// A parsed resource name of the form
/// `arn:partition:service:region:account:resource`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    /// May be empty for global resources
    pub region: String,
    /// May be empty for anonymous resources
    pub account_id: String,
    /// Resource portion split on `:` and `/`
    pub resource_id: Vec<String>,
}

impl Arn {
    /// Parse the six-segment `arn:` form. Partition, service, and resource
    /// must be non-empty; region and account may be empty. Returns `None`
    /// for anything else.
    pub fn parse(input: &str) -> Option<Arn> {
        let mut segments = input.splitn(6, ':');
        if segments.next()? != "arn" {
            return None;
        }
        let partition = segments.next()?;
        let service = segments.next()?;
        let region = segments.next()?;
        let account_id = segments.next()?;
        let resource = segments.next()?;
        if partition.is_empty() || service.is_empty() || resource.is_empty() {
            return None;
        }
        let resource_id = resource
            .split(|c: char| c == ':' || c == '/')
            .map(str::to_string)
            .collect();
        Some(Arn {
            partition: partition.to_string(),
            service: service.to_string(),
            region: region.to_string(),
            account_id: account_id.to_string(),
            resource_id,
        })
    }
}

/// Components of a parsed endpoint URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlParts {
    /// `http` or `https`
    pub scheme: String,
    /// Host plus port when the port is not the scheme default
    pub authority: String,
    /// Path exactly as written
    pub path: String,
    /// Path with guaranteed leading and trailing `/`
    pub normalized_path: String,
    /// Whether the host is an IPv4 or IPv6 address
    pub is_ip: bool,
}

/// Outputs of a partition table entry for a matched region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub name: String,
    pub dns_suffix: String,
    pub dual_stack_dns_suffix: String,
    pub supports_fips: bool,
    pub supports_dual_stack: bool,
}
