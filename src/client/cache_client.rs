//! Cache client capability.
//!
//! The benchmark core depends on these traits alone and never sees the
//! wire protocol. Two implementations exist: [`RespClient`] for real
//! servers and [`MockClient`] for deterministic offline runs.
//!
//! [`RespClient`]: super::resp_client::RespClient
//! [`MockClient`]: super::mock::MockClient

use crate::utils::{ConnectionError, RequestError};

/// One session against a cache server.
///
/// Sessions are single-threaded: each worker owns exactly one and the
/// harness never shares them. Dropping the client releases the session.
pub trait CacheClient {
    /// Fetch the value stored under `key`. A key the server does not
    /// hold comes back as `Ok(None)`; absence is not a request error
    /// and the caller decides what it means.
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, RequestError>;

    /// Store `value` under `key`.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), RequestError>;
}

/// Per-worker session factory, shared read-only across worker threads.
pub trait Connector: Send + Sync + 'static {
    type Client: CacheClient;

    /// Open an independent session for the worker with index `worker`.
    /// The index lets scripted implementations attribute sessions; the
    /// network connector ignores it.
    fn connect(&self, worker: usize) -> Result<Self::Client, ConnectionError>;
}
