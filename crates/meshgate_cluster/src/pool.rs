//! Connection-pool seam: scoped acquisition with guaranteed release.
//!
//! The production pool lives outside this core; the traits here define the
//! contract the fan-out executor needs, and `FixedPool` is the in-memory
//! implementation used by tests and single-process deployments. Release is
//! tied to `Drop`, so a connection goes back to its pool on every exit
//! path — success, statement failure, or unwinding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};

use meshgate_common::types::DatasourceId;

/// One checked-out backend connection.
pub trait BackendConnection: Send {
    /// Execute a single DDL statement. The error string is the backend's
    /// failure message; classification happens at the fan-out layer.
    fn execute(&mut self, statement: &str) -> Result<(), String>;
}

/// Scoped acquisition per datasource. Implementations are process-wide and
/// shared across all concurrent requests.
pub trait ConnectionPool: Send + Sync {
    fn acquire(&self, datasource: &DatasourceId) -> Result<PooledConn, String>;
}

/// Guard wrapping a checked-out connection; runs its release hook on drop.
pub struct PooledConn {
    conn: Box<dyn BackendConnection>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl PooledConn {
    pub fn new(conn: Box<dyn BackendConnection>, release: impl FnOnce() + Send + 'static) -> Self {
        PooledConn {
            conn,
            release: Some(Box::new(release)),
        }
    }

    pub fn execute(&mut self, statement: &str) -> Result<(), String> {
        self.conn.execute(statement)
    }
}

impl Drop for PooledConn {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// One completed statement execution, in global completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub datasource: DatasourceId,
    pub statement: String,
}

struct SlotState {
    active: Mutex<usize>,
    available: Condvar,
    unreachable: AtomicBool,
    latency: Mutex<Option<Duration>>,
    fail_matching: Mutex<Option<String>>,
}

impl SlotState {
    fn new() -> Self {
        SlotState {
            active: Mutex::new(0),
            available: Condvar::new(),
            unreachable: AtomicBool::new(false),
            latency: Mutex::new(None),
            fail_matching: Mutex::new(None),
        }
    }
}

/// In-memory bounded pool with per-datasource slots, an execution log, and
/// fault injection (unreachable datasources, artificial latency).
pub struct FixedPool {
    slots: DashMap<DatasourceId, Arc<SlotState>>,
    max_per_datasource: usize,
    log: Arc<Mutex<Vec<ExecutionRecord>>>,
}

impl FixedPool {
    pub fn new(max_per_datasource: usize) -> Self {
        FixedPool {
            slots: DashMap::new(),
            max_per_datasource,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_datasource(&self, id: impl Into<String>) {
        self.slots
            .insert(DatasourceId(id.into()), Arc::new(SlotState::new()));
    }

    /// Make every statement against this datasource fail.
    pub fn set_unreachable(&self, id: &str) {
        if let Some(slot) = self.slots.get(&DatasourceId::from(id)) {
            slot.unreachable.store(true, Ordering::Relaxed);
        }
    }

    /// Make statements containing `pattern` fail on this datasource while
    /// everything else still succeeds.
    pub fn set_fail_matching(&self, id: &str, pattern: impl Into<String>) {
        if let Some(slot) = self.slots.get(&DatasourceId::from(id)) {
            *slot.fail_matching.lock() = Some(pattern.into());
        }
    }

    /// Delay every statement against this datasource.
    pub fn set_latency(&self, id: &str, latency: Duration) {
        if let Some(slot) = self.slots.get(&DatasourceId::from(id)) {
            *slot.latency.lock() = Some(latency);
        }
    }

    /// All completed executions, in completion order.
    pub fn executed(&self) -> Vec<ExecutionRecord> {
        self.log.lock().clone()
    }

    /// Statements completed against one datasource, in completion order.
    pub fn executed_on(&self, id: &str) -> Vec<String> {
        let ds = DatasourceId::from(id);
        self.log
            .lock()
            .iter()
            .filter(|r| r.datasource == ds)
            .map(|r| r.statement.clone())
            .collect()
    }
}

impl ConnectionPool for FixedPool {
    fn acquire(&self, datasource: &DatasourceId) -> Result<PooledConn, String> {
        let slot = self
            .slots
            .get(datasource)
            .map(|s| s.clone())
            .ok_or_else(|| format!("no connection pool for datasource `{datasource}`"))?;

        {
            let mut active = slot.active.lock();
            while *active >= self.max_per_datasource {
                slot.available.wait(&mut active);
            }
            *active += 1;
        }

        let conn = FixedConn {
            datasource: datasource.clone(),
            slot: slot.clone(),
            log: self.log.clone(),
        };
        Ok(PooledConn::new(
            Box::new(conn),
            move || {
                let mut active = slot.active.lock();
                *active -= 1;
                slot.available.notify_one();
            },
        ))
    }
}

struct FixedConn {
    datasource: DatasourceId,
    slot: Arc<SlotState>,
    log: Arc<Mutex<Vec<ExecutionRecord>>>,
}

impl BackendConnection for FixedConn {
    fn execute(&mut self, statement: &str) -> Result<(), String> {
        let latency = *self.slot.latency.lock();
        if let Some(d) = latency {
            std::thread::sleep(d);
        }
        if self.slot.unreachable.load(Ordering::Relaxed) {
            return Err(format!("datasource `{}` unreachable", self.datasource));
        }
        let fail_matching = self.slot.fail_matching.lock().clone();
        if let Some(pattern) = fail_matching {
            if statement.contains(&pattern) {
                return Err(format!("datasource `{}` unreachable", self.datasource));
            }
        }
        self.log.lock().push(ExecutionRecord {
            datasource: self.datasource.clone(),
            statement: statement.to_string(),
        });
        Ok(())
    }
}
