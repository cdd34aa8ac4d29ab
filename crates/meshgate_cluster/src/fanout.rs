//! Concurrent statement fan-out with bounded phase barriers.
//!
//! Every (task, destination) pair becomes one independent unit on the
//! shared worker pool. Units in a phase may complete in any order; a
//! unit's failure is collected and never cancels its siblings. The phase
//! barrier waits up to a fixed bound; elapsing it fails the whole request,
//! while already-dispatched units keep running unobserved.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use meshgate_common::error::{BackendError, MeshgateError, MeshgateResult};
use meshgate_common::types::DatasourceId;

use crate::ddl_plan::{ExecutionPhase, StatementTask};
use crate::pool::ConnectionPool;
use crate::worker_pool::{PhaseBarrier, WorkerPool};

/// Aggregated outcome across both phases. Success iff no backend error was
/// collected; no distinction is surfaced between destinations that
/// succeeded and those that failed.
#[derive(Debug)]
pub struct ExecutionResult {
    pub succeeded: bool,
    pub errors: Vec<BackendError>,
}

/// Executes a two-phase plan against pooled connections.
pub struct FanOutExecutor {
    pool: Arc<dyn ConnectionPool>,
    workers: Arc<WorkerPool>,
    phase_timeout: Duration,
}

impl FanOutExecutor {
    pub fn new(
        pool: Arc<dyn ConnectionPool>,
        workers: Arc<WorkerPool>,
        phase_timeout: Duration,
    ) -> Self {
        FanOutExecutor {
            pool,
            workers,
            phase_timeout,
        }
    }

    /// Run phase 1 (ensure-schema) to its barrier, then phase 2
    /// (create-object). Phase-1 backend failures do not gate phase 2;
    /// only a barrier timeout aborts the request.
    pub fn execute(&self, plan: &ExecutionPhase) -> MeshgateResult<ExecutionResult> {
        let mut errors = Vec::new();
        errors.extend(self.execute_phase("ensure-schema", &plan.ensure_schema)?);
        errors.extend(self.execute_phase("create-object", &plan.create_object)?);
        Ok(ExecutionResult {
            succeeded: errors.is_empty(),
            errors,
        })
    }

    /// Dispatch one phase's units and join them at a bounded barrier.
    /// Returns the backend errors collected before the barrier resolved.
    fn execute_phase(
        &self,
        phase: &'static str,
        tasks: &[StatementTask],
    ) -> MeshgateResult<Vec<BackendError>> {
        let units: Vec<(String, DatasourceId)> = tasks
            .iter()
            .flat_map(|task| {
                task.datasources
                    .iter()
                    .map(|ds| (task.statement.clone(), ds.clone()))
            })
            .collect();

        let barrier = PhaseBarrier::new(units.len());
        let errors: Arc<Mutex<Vec<BackendError>>> = Arc::new(Mutex::new(Vec::new()));
        let started = Instant::now();

        for (statement, datasource) in units {
            let pool = self.pool.clone();
            let errors = errors.clone();
            let barrier = barrier.clone();
            self.workers.spawn(move || {
                // The pooled connection is scoped to this block; its guard
                // releases it on every exit path.
                let outcome = pool
                    .acquire(&datasource)
                    .and_then(|mut conn| conn.execute(&statement));
                if let Err(message) = outcome {
                    tracing::warn!(
                        datasource = %datasource,
                        phase = phase,
                        "statement failed: {message}"
                    );
                    errors.lock().push(BackendError {
                        datasource,
                        statement,
                        message,
                    });
                }
                barrier.unit_done();
            });
        }

        if !barrier.wait_timeout(self.phase_timeout) {
            let err = MeshgateError::PhaseTimeout {
                phase,
                elapsed_ms: started.elapsed().as_millis() as u64,
                pending: barrier.pending(),
            };
            err.log_if_fatal();
            return Err(err);
        }

        let collected = errors.lock().drain(..).collect();
        Ok(collected)
    }
}
