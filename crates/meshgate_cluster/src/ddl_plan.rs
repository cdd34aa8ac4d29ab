//! Distribution plan building: expanding a logical table's distribution
//! plus a statement template into grouped, deduplicated per-datasource
//! tasks, split into two ordered phases.

use std::collections::{BTreeMap, BTreeSet};

use meshgate_common::error::{MeshgateResult, RequestError};
use meshgate_common::types::DatasourceId;

use crate::catalog::Catalog;
use crate::statement::{ensure_schema_statement, CreateTableTemplate};
use crate::topology::TopologyRegistry;

/// One rendered statement and the union of datasources it must run on.
///
/// Physical locations whose rendered text is byte-identical collapse into
/// a single task, so execution happens once per distinct
/// (text, destination) pair even when targets expand to overlapping
/// destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementTask {
    pub statement: String,
    pub datasources: BTreeSet<DatasourceId>,
}

impl StatementTask {
    /// Number of statement executions this task dispatches.
    pub fn unit_count(&self) -> usize {
        self.datasources.len()
    }
}

/// The two-phase plan: schema-ensure tasks, then object-create tasks.
/// Phase 2 never starts before phase 1's barrier resolves.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPhase {
    pub ensure_schema: Vec<StatementTask>,
    pub create_object: Vec<StatementTask>,
}

impl ExecutionPhase {
    pub fn unit_count(&self) -> usize {
        self.ensure_schema
            .iter()
            .chain(self.create_object.iter())
            .map(StatementTask::unit_count)
            .sum()
    }
}

/// Expands a table's distribution strategy into an `ExecutionPhase`.
pub struct DistributionPlanBuilder;

impl DistributionPlanBuilder {
    /// Build the two-phase plan for a CREATE TABLE against `schema.table`.
    ///
    /// Fails with a `RequestError` before any backend work when the table
    /// is not in the catalog. Every resolved datasource of every data node
    /// receives both a schema-ensure task and the node's create task, so
    /// datasources reused across multiple logical shards are fully covered.
    pub fn build_plan(
        catalog: &Catalog,
        topology: &TopologyRegistry,
        schema: &str,
        table: &str,
        template: &CreateTableTemplate,
    ) -> MeshgateResult<ExecutionPhase> {
        let strategy =
            catalog
                .strategy(schema, table)
                .ok_or_else(|| RequestError::UnknownTable {
                    schema: schema.to_string(),
                    table: table.to_string(),
                })?;
        let nodes = strategy.data_nodes();

        // Rendered create text -> union of destination datasources.
        let mut create_tasks: BTreeMap<String, BTreeSet<DatasourceId>> = BTreeMap::new();
        // Distinct (physical schema, datasource) pairs needing phase 1.
        let mut schema_pairs: BTreeSet<(String, DatasourceId)> = BTreeSet::new();

        for node in nodes {
            let rendered = template.rewrite_for(node)?.render();
            let resolved = topology.resolve(&node.target);
            for ds in resolved {
                schema_pairs.insert((node.schema.clone(), ds.clone()));
                create_tasks.entry(rendered.clone()).or_default().insert(ds);
            }
        }

        // Group phase-1 pairs by schema name: one ensure-schema statement
        // per schema, fanned out to every datasource that needs it.
        let mut ensure_schema: BTreeMap<String, BTreeSet<DatasourceId>> = BTreeMap::new();
        for (schema_name, ds) in schema_pairs {
            ensure_schema
                .entry(ensure_schema_statement(&schema_name))
                .or_default()
                .insert(ds);
        }

        let plan = ExecutionPhase {
            ensure_schema: ensure_schema
                .into_iter()
                .map(|(statement, datasources)| StatementTask {
                    statement,
                    datasources,
                })
                .collect(),
            create_object: create_tasks
                .into_iter()
                .map(|(statement, datasources)| StatementTask {
                    statement,
                    datasources,
                })
                .collect(),
        };
        tracing::debug!(
            schema = schema,
            table = table,
            distribution = strategy.kind_name(),
            ensure_schema_tasks = plan.ensure_schema.len(),
            create_tasks = plan.create_object.len(),
            units = plan.unit_count(),
            "built distribution plan"
        );
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DataNode, DistributionStrategy};
    use meshgate_common::error::MeshgateError;

    fn sharded_fixture() -> (Catalog, TopologyRegistry, CreateTableTemplate) {
        // t1 sharded across (targetA, schemaA, t1) and (targetB, schemaB, t1);
        // targetA -> {ds1}, targetB is a replica group -> {ds2, ds3}.
        let mut catalog = Catalog::new();
        catalog.register(
            "db1",
            "t1",
            DistributionStrategy::Sharded(vec![
                DataNode::new("targetA", "schemaA", "t1"),
                DataNode::new("targetB", "schemaB", "t1"),
            ]),
        );
        let mut topo = TopologyRegistry::new();
        topo.register_datasource("ds1");
        topo.register_datasource("ds2");
        topo.register_datasource("ds3");
        topo.register_replica_group("targetA", ["ds1"]);
        topo.register_replica_group("targetB", ["ds2", "ds3"]);
        let template = CreateTableTemplate::new(Some("db1".into()), "t1", "id BIGINT");
        (catalog, topo, template)
    }

    fn ds(id: &str) -> DatasourceId {
        DatasourceId::from(id)
    }

    #[test]
    fn test_two_phase_plan_groups_schemas_and_dedupes_creates() {
        let (catalog, topo, template) = sharded_fixture();
        let plan =
            DistributionPlanBuilder::build_plan(&catalog, &topo, "db1", "t1", &template).unwrap();

        // Phase 1: ensure schemaA on ds1; ensure schemaB on ds2 and ds3.
        assert_eq!(plan.ensure_schema.len(), 2);
        let by_stmt: BTreeMap<_, _> = plan
            .ensure_schema
            .iter()
            .map(|t| (t.statement.clone(), t.datasources.clone()))
            .collect();
        assert_eq!(
            by_stmt["CREATE SCHEMA IF NOT EXISTS \"schemaA\""],
            BTreeSet::from([ds("ds1")])
        );
        assert_eq!(
            by_stmt["CREATE SCHEMA IF NOT EXISTS \"schemaB\""],
            BTreeSet::from([ds("ds2"), ds("ds3")])
        );
        let phase1_units: usize = plan.ensure_schema.iter().map(StatementTask::unit_count).sum();
        assert_eq!(phase1_units, 3);

        // Phase 2: schemaA.t1 on ds1; schemaB.t1 on ds2 and ds3.
        assert_eq!(plan.create_object.len(), 2);
        let by_stmt: BTreeMap<_, _> = plan
            .create_object
            .iter()
            .map(|t| (t.statement.clone(), t.datasources.clone()))
            .collect();
        assert_eq!(
            by_stmt["CREATE TABLE IF NOT EXISTS \"schemaA\".\"t1\" (id BIGINT)"],
            BTreeSet::from([ds("ds1")])
        );
        assert_eq!(
            by_stmt["CREATE TABLE IF NOT EXISTS \"schemaB\".\"t1\" (id BIGINT)"],
            BTreeSet::from([ds("ds2"), ds("ds3")])
        );
    }

    #[test]
    fn test_unknown_table_fails_before_any_backend_work() {
        let (catalog, topo, template) = sharded_fixture();
        let err = DistributionPlanBuilder::build_plan(&catalog, &topo, "db1", "nope", &template)
            .unwrap_err();
        match err {
            MeshgateError::Request(RequestError::UnknownTable { schema, table }) => {
                assert_eq!(schema, "db1");
                assert_eq!(table, "nope");
            }
            other => panic!("expected UnknownTable, got {other}"),
        }
    }

    #[test]
    fn test_identical_rendered_text_collapses_to_one_task() {
        // Two shards on different targets but the same physical schema and
        // table render identically; the task's destination set is the union.
        let mut catalog = Catalog::new();
        catalog.register(
            "db1",
            "t1",
            DistributionStrategy::Sharded(vec![
                DataNode::new("ds1", "shared", "t1"),
                DataNode::new("ds2", "shared", "t1"),
            ]),
        );
        let mut topo = TopologyRegistry::new();
        topo.register_datasource("ds1");
        topo.register_datasource("ds2");
        let template = CreateTableTemplate::new(Some("db1".into()), "t1", "id BIGINT");

        let plan =
            DistributionPlanBuilder::build_plan(&catalog, &topo, "db1", "t1", &template).unwrap();
        assert_eq!(plan.create_object.len(), 1);
        assert_eq!(
            plan.create_object[0].datasources,
            BTreeSet::from([ds("ds1"), ds("ds2")])
        );
        // One ensure-schema task for the single shared schema, on both.
        assert_eq!(plan.ensure_schema.len(), 1);
        assert_eq!(
            plan.ensure_schema[0].datasources,
            BTreeSet::from([ds("ds1"), ds("ds2")])
        );
    }

    #[test]
    fn test_shared_datasource_backing_multiple_shards_is_fully_covered() {
        // Both shards resolve to the same raw datasource; each distinct
        // physical schema still gets its ensure task there, and both create
        // statements target it.
        let mut catalog = Catalog::new();
        catalog.register(
            "db1",
            "t1",
            DistributionStrategy::Sharded(vec![
                DataNode::new("ds1", "db1_0", "t1"),
                DataNode::new("ds1", "db1_1", "t1"),
            ]),
        );
        let mut topo = TopologyRegistry::new();
        topo.register_datasource("ds1");
        let template = CreateTableTemplate::new(Some("db1".into()), "t1", "id BIGINT");

        let plan =
            DistributionPlanBuilder::build_plan(&catalog, &topo, "db1", "t1", &template).unwrap();
        assert_eq!(plan.ensure_schema.len(), 2);
        for task in &plan.ensure_schema {
            assert_eq!(task.datasources, BTreeSet::from([ds("ds1")]));
        }
        assert_eq!(plan.create_object.len(), 2);
        for task in &plan.create_object {
            assert_eq!(task.datasources, BTreeSet::from([ds("ds1")]));
        }
    }

    #[test]
    fn test_global_distribution_builds_like_sharded() {
        let mut catalog = Catalog::new();
        catalog.register(
            "db1",
            "g1",
            DistributionStrategy::Global(vec![
                DataNode::new("ds1", "db1", "g1"),
                DataNode::new("ds2", "db1", "g1"),
            ]),
        );
        let mut topo = TopologyRegistry::new();
        topo.register_datasource("ds1");
        topo.register_datasource("ds2");
        let template = CreateTableTemplate::new(Some("db1".into()), "g1", "id BIGINT");

        let plan =
            DistributionPlanBuilder::build_plan(&catalog, &topo, "db1", "g1", &template).unwrap();
        // Same physical name everywhere: one create task on both datasources.
        assert_eq!(plan.create_object.len(), 1);
        assert_eq!(
            plan.create_object[0].datasources,
            BTreeSet::from([ds("ds1"), ds("ds2")])
        );
    }

    #[test]
    fn test_unresolvable_target_yields_no_task_for_that_location() {
        // Preserved legacy behavior: the location is skipped (with a
        // warning), not failed.
        let mut catalog = Catalog::new();
        catalog.register(
            "db1",
            "t1",
            DistributionStrategy::Sharded(vec![
                DataNode::new("ds1", "db1_0", "t1"),
                DataNode::new("ghost", "db1_1", "t1"),
            ]),
        );
        let mut topo = TopologyRegistry::new();
        topo.register_datasource("ds1");
        let template = CreateTableTemplate::new(Some("db1".into()), "t1", "id BIGINT");

        let plan =
            DistributionPlanBuilder::build_plan(&catalog, &topo, "db1", "t1", &template).unwrap();
        assert_eq!(plan.ensure_schema.len(), 1);
        assert_eq!(plan.create_object.len(), 1);
        assert!(plan.create_object[0]
            .statement
            .contains("\"db1_0\".\"t1\""));
    }
}
