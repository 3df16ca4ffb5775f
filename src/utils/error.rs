//! Error types for cache-latency-benchmark

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Top-level benchmark error.
///
/// Argument validation never reaches this enum; the CLI parser rejects
/// bad invocations with its own usage error before a run starts.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("failed to reserve {what}: {source}")]
    Allocation {
        what: &'static str,
        source: TryReserveError,
    },

    #[error("failed to launch worker {worker}: {source}")]
    Launch { worker: usize, source: io::Error },

    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("request error: {0}")]
    Request(#[from] RequestError),

    /// At least one worker tripped the failure flag; all output was
    /// suppressed. The details were already logged by the worker.
    #[error("benchmark run failed, output suppressed")]
    WorkerFailure,
}

/// Session establishment failures.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("failed to connect to {host}:{port}: {source}")]
    ConnectFailed {
        host: String,
        port: u16,
        source: io::Error,
    },

    #[error("session handshake failed: {0}")]
    Handshake(String),

    #[error("session refused: {0}")]
    Refused(String),
}

/// Failures of a single request on an established session.
///
/// Key absence is not an error at this level; clients report it as
/// `Ok(None)` and leave the verdict to the caller.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("server error: {0}")]
    Server(String),

    #[error("unexpected {command} reply: {reply}")]
    UnexpectedReply {
        command: &'static str,
        reply: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
