//! CREATE TABLE entry point: build the distribution plan, fan it out,
//! report the aggregated result to the response sink.

use std::sync::Arc;
use std::time::Duration;

use meshgate_common::config::MeshgateConfig;
use meshgate_common::error::{MeshgateResult, RequestError};

use crate::catalog::Catalog;
use crate::ddl_plan::DistributionPlanBuilder;
use crate::fanout::{ExecutionResult, FanOutExecutor};
use crate::pool::ConnectionPool;
use crate::statement::CreateTableTemplate;
use crate::topology::TopologyRegistry;
use crate::worker_pool::WorkerPool;

/// Everything a request handler needs, threaded explicitly instead of
/// living in process-wide singletons. The catalog and topology views are
/// read-only per request; the pools are shared across all sessions.
#[derive(Clone)]
pub struct ClusterContext {
    pub catalog: Arc<Catalog>,
    pub topology: Arc<TopologyRegistry>,
    pub pool: Arc<dyn ConnectionPool>,
    pub workers: Arc<WorkerPool>,
    pub config: MeshgateConfig,
}

/// Handles a distributed CREATE TABLE request.
pub struct CreateTableHandler {
    ctx: ClusterContext,
}

impl CreateTableHandler {
    pub fn new(ctx: ClusterContext) -> Self {
        CreateTableHandler { ctx }
    }

    /// Resolve the logical table, build the two-phase plan, and execute it.
    ///
    /// `default_schema` is the session's current schema, used when the
    /// statement does not qualify its table name. A missing table name
    /// fails before any catalog or backend work. The returned
    /// `ExecutionResult` is what the response sink turns into an OK packet
    /// or an aggregated error.
    pub fn handle(
        &self,
        default_schema: &str,
        template: &CreateTableTemplate,
    ) -> MeshgateResult<ExecutionResult> {
        if template.table.is_empty() {
            return Err(RequestError::MissingTableName.into());
        }
        let schema = template
            .schema
            .clone()
            .unwrap_or_else(|| default_schema.to_string());

        let plan = DistributionPlanBuilder::build_plan(
            &self.ctx.catalog,
            &self.ctx.topology,
            &schema,
            &template.table,
            template,
        )?;
        let executor = FanOutExecutor::new(
            self.ctx.pool.clone(),
            self.ctx.workers.clone(),
            Duration::from_secs(self.ctx.config.fanout.phase_timeout_secs),
        );
        let result = executor.execute(&plan)?;
        tracing::info!(
            schema = schema.as_str(),
            table = template.table.as_str(),
            succeeded = result.succeeded,
            errors = result.errors.len(),
            "create table fan-out finished"
        );
        Ok(result)
    }
}
