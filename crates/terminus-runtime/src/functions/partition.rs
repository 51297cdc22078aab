//! Partition lookup
//!
//! `partition(region)` resolves a region name to the partition it belongs
//! to. The table is data the host supplies at startup — it is the
//! canonical example of a function with extra state, registered with
//! `needs_extra_state = true` so hosts can skip shipping the table for
//! models that never call it.

use super::{expect_args, opt_str};
use crate::registry::{Function, FunctionError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use terminus_core::{Partition, Value};

/// One partition of the deployment topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionSpec {
    /// Partition identifier
    pub id: String,

    /// Pattern matching region names that belong to this partition
    pub region_regex: String,

    /// Regions known to belong to this partition; consulted before the regex
    #[serde(default)]
    pub regions: BTreeSet<String>,

    /// Descriptor produced for a matched region
    pub outputs: Partition,
}

/// The full partition table, as loaded from its document form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionTable {
    pub partitions: Vec<PartitionSpec>,
}

impl PartitionTable {
    /// Parse a table from JSON
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

struct CompiledPartition {
    regex: Regex,
    regions: BTreeSet<String>,
    outputs: Partition,
}

/// The `partition` function: a table compiled for matching
pub struct PartitionLookup {
    partitions: Vec<CompiledPartition>,
}

impl PartitionLookup {
    /// Compile a table; fails if a `region_regex` is not a valid pattern
    pub fn new(table: PartitionTable) -> Result<Self, regex::Error> {
        let mut partitions = Vec::with_capacity(table.partitions.len());
        for spec in table.partitions {
            partitions.push(CompiledPartition {
                regex: Regex::new(&spec.region_regex)?,
                regions: spec.regions,
                outputs: spec.outputs,
            });
        }
        Ok(Self { partitions })
    }

    fn resolve(&self, region: &str) -> Option<&Partition> {
        // Exact region membership wins over pattern matching.
        if let Some(partition) = self
            .partitions
            .iter()
            .find(|p| p.regions.contains(region))
        {
            return Some(&partition.outputs);
        }
        self.partitions
            .iter()
            .find(|p| p.regex.is_match(region))
            .map(|p| &p.outputs)
    }
}

impl Function for PartitionLookup {
    fn evaluate(&self, args: &[Option<Value>]) -> Result<Option<Value>, FunctionError> {
        expect_args(args, 1)?;
        let Some(region) = opt_str(args, 0)? else {
            return Ok(None);
        };
        Ok(self.resolve(region).cloned().map(Value::Partition))
    }
}
