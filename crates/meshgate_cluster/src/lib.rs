//! Distributed statement fan-out for the meshgate sharding middleware.
//!
//! A schema-changing statement against one logical table is expanded into
//! per-datasource tasks: the catalog yields the table's distribution, the
//! topology registry resolves each logical target to concrete datasources,
//! identical rendered statements are deduplicated, and the resulting
//! two-phase plan (ensure-schema, then create-object) is executed
//! concurrently on a shared bounded worker pool with a bounded join barrier
//! and non-transactional partial-failure semantics.

pub mod catalog;
pub mod ddl;
pub mod ddl_plan;
pub mod fanout;
pub mod pool;
pub mod statement;
pub mod topology;
pub mod worker_pool;


pub use catalog::{Catalog, DataNode, DistributionStrategy};
pub use ddl::{ClusterContext, CreateTableHandler};
pub use ddl_plan::{DistributionPlanBuilder, ExecutionPhase, StatementTask};
pub use fanout::{ExecutionResult, FanOutExecutor};
pub use pool::{BackendConnection, ConnectionPool, FixedPool, PooledConn};
pub use statement::{ensure_schema_statement, CreateTableTemplate};
pub use topology::TopologyRegistry;
pub use worker_pool::{PhaseBarrier, WorkerPool};
