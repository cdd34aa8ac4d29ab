//! Shared bounded worker pool and the per-phase join barrier.
//!
//! One pool serves all concurrent requests from all sessions; no capacity
//! is reserved per request, so a large fan-out can transiently occupy
//! workers needed by unrelated requests.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size pool of OS worker threads consuming a shared job queue.
pub struct WorkerPool {
    tx: Sender<Job>,
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        let (tx, rx) = channel::<Job>();
        let rx = Arc::new(Mutex::new(rx));
        for i in 0..threads {
            let rx = rx.clone();
            thread::Builder::new()
                .name(format!("meshgate-worker-{i}"))
                .spawn(move || worker_loop(rx))
                .expect("failed to spawn worker thread");
        }
        WorkerPool { tx, threads }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Enqueue one unit of work. Units may run and complete in any order.
    pub fn spawn(&self, job: impl FnOnce() + Send + 'static) {
        // Send only fails when every worker has exited, which means the
        // pool itself was torn down while a request was in flight.
        let _ = self.tx.send(Box::new(job));
    }
}

fn worker_loop(rx: Arc<Mutex<Receiver<Job>>>) {
    loop {
        let job = {
            let rx = rx.lock();
            rx.recv()
        };
        match job {
            Ok(job) => job(),
            Err(_) => break,
        }
    }
}

/// Join point for one phase's units: waits, up to a bound, until every
/// unit has reported completion.
#[derive(Clone)]
pub struct PhaseBarrier {
    inner: Arc<BarrierInner>,
}

struct BarrierInner {
    remaining: Mutex<usize>,
    done: Condvar,
}

impl PhaseBarrier {
    pub fn new(units: usize) -> Self {
        PhaseBarrier {
            inner: Arc::new(BarrierInner {
                remaining: Mutex::new(units),
                done: Condvar::new(),
            }),
        }
    }

    /// Report one unit finished, whatever its outcome.
    pub fn unit_done(&self) {
        let mut remaining = self.inner.remaining.lock();
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.inner.done.notify_all();
        }
    }

    /// Wait until all units finish or `bound` elapses. Returns true when
    /// every unit finished within the bound.
    pub fn wait_timeout(&self, bound: Duration) -> bool {
        let deadline = Instant::now() + bound;
        let mut remaining = self.inner.remaining.lock();
        while *remaining > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            if self
                .inner
                .done
                .wait_for(&mut remaining, deadline - now)
                .timed_out()
                && *remaining > 0
            {
                return false;
            }
        }
        true
    }

    /// Units not yet finished.
    pub fn pending(&self) -> usize {
        *self.inner.remaining.lock()
    }
}
