//! Benchmark engine
//!
//! The multi-threaded measurement core:
//! - StartBarrier: opens the timed window for every worker at once
//! - RunState: sticky failure flag and cooperative cancellation
//! - Worker: one thread issuing the bounded timed get-loop
//! - Harness: launches workers and enforces the all-or-nothing result

pub mod barrier;
pub mod harness;
pub mod state;
pub mod timer;
pub mod worker;

pub use barrier::{BarrierWait, StartBarrier};
pub use harness::{write_samples, Harness};
pub use state::RunState;
pub use timer::elapsed_nanos;
pub use worker::{Worker, WorkerSamples};
