//! Benchmark worker thread implementation.
//!
//! Each worker owns its session and its sample buffer exclusively. The
//! only synchronization points are the start barrier and the sticky
//! flags in [`RunState`].

use std::time::Instant;

use tracing::{debug, error, warn};

use super::barrier::{BarrierWait, StartBarrier};
use super::state::RunState;
use super::timer::elapsed_nanos;
use crate::client::{CacheClient, Connector};

/// Latency series collected by one worker.
///
/// The buffer is reserved to the full request count before the thread
/// launches and never grows past it; a worker that stops early leaves
/// it partially filled. Ownership moves into the worker thread and
/// back to the harness through the join handle.
#[derive(Debug)]
pub struct WorkerSamples {
    pub worker_id: usize,
    /// Per-request latencies in nanoseconds, in issue order.
    pub samples: Vec<u64>,
}

/// One benchmark thread: establish a session, rendezvous at the start
/// line, run the timed get-loop.
pub struct Worker {
    id: usize,
    key: String,
    requests: u64,
    samples: Vec<u64>,
}

impl Worker {
    pub fn new(id: usize, key: String, requests: u64, samples: Vec<u64>) -> Self {
        Self {
            id,
            key,
            requests,
            samples,
        }
    }

    /// Run the worker to completion and hand back its samples.
    ///
    /// A session that cannot be established trips the failure flag and
    /// abandons the rendezvous so the remaining workers do not wait
    /// forever. Once the timed window is open, any absence or request
    /// error trips the flag and ends the loop; samples collected up to
    /// that point ride back in the report.
    pub fn run<C: Connector>(
        mut self,
        connector: &C,
        barrier: &StartBarrier,
        state: &RunState,
    ) -> WorkerSamples {
        let mut client = match connector.connect(self.id) {
            Ok(client) => client,
            Err(e) => {
                error!("Worker {}: session setup failed: {}", self.id, e);
                state.mark_failed();
                barrier.abort();
                return self.finish();
            }
        };

        if barrier.wait() == BarrierWait::Aborted {
            debug!("Worker {}: start aborted, skipping timed loop", self.id);
            return self.finish();
        }

        for request in 0..self.requests {
            if state.is_cancelled() {
                debug!("Worker {}: cancelled after {} requests", self.id, request);
                break;
            }

            let start = Instant::now();
            let outcome = client.get(&self.key);
            let end = Instant::now();

            match outcome {
                Ok(Some(_)) => self.samples.push(elapsed_nanos(start, end)),
                Ok(None) => {
                    warn!(
                        "Worker {}: key {:?} absent on request {}",
                        self.id, self.key, request
                    );
                    state.record_request_error();
                    state.mark_failed();
                    break;
                }
                Err(e) => {
                    warn!(
                        "Worker {}: request {} failed: {}",
                        self.id, request, e
                    );
                    state.record_request_error();
                    state.mark_failed();
                    break;
                }
            }
        }

        self.finish()
    }

    fn finish(self) -> WorkerSamples {
        WorkerSamples {
            worker_id: self.id,
            samples: self.samples,
        }
    }
}
