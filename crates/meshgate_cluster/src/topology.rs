//! Target topology: resolving logical target names to datasource sets.

use std::collections::{HashMap, HashSet};

use meshgate_common::types::{DatasourceId, TargetName};

/// Static topology configuration: raw datasources and named replica groups.
///
/// Resolution is a configuration lookup, not a live health check. The
/// registry is built at startup (or on metadata reload) and read-only for
/// the duration of a request.
#[derive(Debug, Default)]
pub struct TopologyRegistry {
    datasources: HashSet<DatasourceId>,
    replica_groups: HashMap<String, HashSet<DatasourceId>>,
}

impl TopologyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_datasource(&mut self, id: impl Into<String>) {
        self.datasources.insert(DatasourceId(id.into()));
    }

    pub fn register_replica_group<I, S>(&mut self, name: impl Into<String>, members: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = members
            .into_iter()
            .map(|m| DatasourceId(m.into()))
            .collect();
        self.replica_groups.insert(name.into(), members);
    }

    pub fn is_datasource(&self, target: &TargetName) -> bool {
        self.datasources.contains(&DatasourceId(target.0.clone()))
    }

    pub fn is_replica_group(&self, target: &TargetName) -> bool {
        self.replica_groups.contains_key(target.as_str())
    }

    /// Resolve a target name to the set of datasources it denotes.
    ///
    /// Two independent classification checks are unioned: replica-group
    /// membership and raw-datasource recognition. A name matching both
    /// contributes the union, with duplicates collapsing under set
    /// semantics. No iteration order is guaranteed.
    ///
    /// An empty result means no destination is resolvable for this target;
    /// callers currently skip the location rather than failing the request,
    /// so the gap is surfaced here as a warning.
    pub fn resolve(&self, target: &TargetName) -> HashSet<DatasourceId> {
        let mut resolved = HashSet::new();
        if let Some(members) = self.replica_groups.get(target.as_str()) {
            resolved.extend(members.iter().cloned());
        }
        let raw = DatasourceId(target.0.clone());
        if self.datasources.contains(&raw) {
            resolved.insert(raw);
        }
        if resolved.is_empty() {
            tracing::warn!(target = %target, "target name resolved to no datasource");
        }
        resolved
    }
}
