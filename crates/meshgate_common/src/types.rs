//! Identifier newtypes shared across the middleware core.

use serde::{Deserialize, Serialize};

/// Raw physical datasource identifier — one pooled backend connection target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DatasourceId(pub String);

impl DatasourceId {
    pub fn new(id: impl Into<String>) -> Self {
        DatasourceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DatasourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DatasourceId {
    fn from(s: &str) -> Self {
        DatasourceId(s.to_string())
    }
}

/// Logical target name: either a single datasource or a replica group.
///
/// Classification is performed by the topology registry at resolution time;
/// the name itself carries no kind information.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetName(pub String);

impl TargetName {
    pub fn new(name: impl Into<String>) -> Self {
        TargetName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TargetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TargetName {
    fn from(s: &str) -> Self {
        TargetName(s.to_string())
    }
}

/// A qualified logical object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaObject {
    pub schema: String,
    pub table: String,
}

impl SchemaObject {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        SchemaObject {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl std::fmt::Display for SchemaObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}
