//! Benchmark coordination: buffer reservation, thread launch, result
//! collection, and the all-or-nothing output rule.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use tracing::{debug, error, warn};

use super::barrier::StartBarrier;
use super::state::RunState;
use super::worker::{Worker, WorkerSamples};
use crate::client::Connector;
use crate::config::BenchConfig;
use crate::utils::{BenchError, Result};

/// Owns one benchmark run from buffer reservation to the final verdict.
pub struct Harness<C: Connector> {
    config: Arc<BenchConfig>,
    connector: Arc<C>,
}

impl<C: Connector> Harness<C> {
    pub fn new(config: BenchConfig, connector: C) -> Self {
        Self {
            config: Arc::new(config),
            connector: Arc::new(connector),
        }
    }

    /// Execute one run and return every worker's full latency series in
    /// worker-index order.
    ///
    /// The result is all-or-nothing: if any worker trips the failure
    /// flag, the samples collected so far are discarded and
    /// [`BenchError::WorkerFailure`] comes back instead. Structural
    /// problems (buffer reservation, thread launch) abort earlier with
    /// their own error class.
    pub fn run(&self) -> Result<Vec<WorkerSamples>> {
        let workers = self.config.workers as usize;
        let requests = self.config.requests;

        let buffers = self.reserve_buffers(workers, requests)?;

        let barrier = Arc::new(StartBarrier::new(workers));
        let state = Arc::new(RunState::new());

        debug!(
            "launching {} workers, {} requests each, key {:?}",
            workers, requests, self.config.key
        );

        let mut handles: Vec<thread::JoinHandle<WorkerSamples>> = Vec::with_capacity(workers);
        for (id, samples) in buffers.into_iter().enumerate() {
            let worker_connector = Arc::clone(&self.connector);
            let worker_barrier = Arc::clone(&barrier);
            let worker_state = Arc::clone(&state);
            let key = self.config.key.clone();

            let spawned = thread::Builder::new()
                .name(format!("worker-{id}"))
                .spawn(move || {
                    Worker::new(id, key, requests, samples).run(
                        worker_connector.as_ref(),
                        &worker_barrier,
                        &worker_state,
                    )
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    warn!(
                        "Worker {} failed to launch, aborting {} started workers",
                        id,
                        handles.len()
                    );
                    abort_launch(&state, &barrier, handles);
                    return Err(BenchError::Launch { worker: id, source });
                }
            }
        }

        // Joining in spawn order keeps reports in worker-index order.
        let mut reports = Vec::with_capacity(workers);
        for handle in handles {
            match handle.join() {
                Ok(report) => reports.push(report),
                Err(_) => {
                    error!("a worker thread panicked");
                    state.mark_failed();
                }
            }
        }

        if state.is_failed() {
            warn!(
                "run failed with {} request errors, suppressing output",
                state.request_errors()
            );
            return Err(BenchError::WorkerFailure);
        }

        Ok(reports)
    }

    fn reserve_buffers(&self, workers: usize, requests: u64) -> Result<Vec<Vec<u64>>> {
        let mut buffers: Vec<Vec<u64>> = Vec::new();
        buffers
            .try_reserve_exact(workers)
            .map_err(|source| BenchError::Allocation {
                what: "worker report table",
                source,
            })?;

        for _ in 0..workers {
            let mut samples: Vec<u64> = Vec::new();
            samples
                .try_reserve_exact(requests as usize)
                .map_err(|source| BenchError::Allocation {
                    what: "latency sample buffer",
                    source,
                })?;
            buffers.push(samples);
        }
        Ok(buffers)
    }
}

/// Wind down a partial launch: mark the run failed, ask started workers
/// to stop, release any parked at the start line, and join them all so
/// none is left running behind the error return.
fn abort_launch(
    state: &RunState,
    barrier: &StartBarrier,
    handles: Vec<thread::JoinHandle<WorkerSamples>>,
) {
    state.mark_failed();
    state.cancel();
    barrier.abort();
    for handle in handles {
        let _ = handle.join();
    }
}

/// Render the collected series: one line per worker, the worker index
/// followed by its samples in nanoseconds, space-separated.
pub fn write_samples<W: Write>(mut out: W, reports: &[WorkerSamples]) -> io::Result<()> {
    for report in reports {
        write!(out, "{}", report.worker_id)?;
        for sample in &report.samples {
            write!(out, " {sample}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
