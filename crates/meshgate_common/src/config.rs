use serde::{Deserialize, Serialize};

/// Top-level middleware-core configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshgateConfig {
    #[serde(default)]
    pub fanout: FanOutConfig,
    #[serde(default)]
    pub pool: PoolConfig,
}

/// DDL fan-out configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanOutConfig {
    /// Upper bound on one phase barrier's wait, in seconds (default: 300).
    /// Elapsing this bound fails the request; dispatched units keep running.
    #[serde(default = "default_phase_timeout_secs")]
    pub phase_timeout_secs: u64,
    /// Worker threads in the shared statement-execution pool.
    /// The pool is process-wide and shared across all concurrent requests.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
}

fn default_phase_timeout_secs() -> u64 {
    300
}

fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            phase_timeout_secs: default_phase_timeout_secs(),
            worker_threads: default_worker_threads(),
        }
    }
}

/// Backend connection pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Max concurrently checked-out connections per datasource.
    #[serde(default = "default_max_conns")]
    pub max_conns_per_datasource: usize,
}

fn default_max_conns() -> usize {
    16
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_conns_per_datasource: default_max_conns(),
        }
    }
}
