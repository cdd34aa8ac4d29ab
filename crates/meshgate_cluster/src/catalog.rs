//! Catalog view of logical tables: distribution strategies and data nodes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use meshgate_common::types::TargetName;

/// One physical location holding part of a logical table's data.
/// Immutable once produced by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataNode {
    pub target: TargetName,
    pub schema: String,
    pub table: String,
}

impl DataNode {
    pub fn new(
        target: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        DataNode {
            target: TargetName::new(target),
            schema: schema.into(),
            table: table.into(),
        }
    }
}

/// How a logical table is laid out across physical locations.
///
/// Exactly one variant per table. The node list is entirely sharded or
/// entirely global, never mixed; adding a new kind here forces every
/// consumer match to be revisited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionStrategy {
    /// Each node holds one shard of the table.
    Sharded(Vec<DataNode>),
    /// Every node holds a full copy of the table.
    Global(Vec<DataNode>),
}

impl DistributionStrategy {
    pub fn data_nodes(&self) -> &[DataNode] {
        match self {
            DistributionStrategy::Sharded(nodes) => nodes,
            DistributionStrategy::Global(nodes) => nodes,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            DistributionStrategy::Sharded(_) => "sharded",
            DistributionStrategy::Global(_) => "global",
        }
    }
}

/// In-memory `(schema, table) -> DistributionStrategy` lookup, loaded from
/// the external metadata store and read-only per request.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashMap<(String, String), DistributionStrategy>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        schema: impl Into<String>,
        table: impl Into<String>,
        strategy: DistributionStrategy,
    ) {
        self.tables.insert((schema.into(), table.into()), strategy);
    }

    pub fn strategy(&self, schema: &str, table: &str) -> Option<&DistributionStrategy> {
        self.tables
            .get(&(schema.to_string(), table.to_string()))
    }
}
