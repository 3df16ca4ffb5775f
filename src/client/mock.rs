//! Deterministic in-memory cache for tests and offline runs.
//!
//! Sessions are cheap handles onto one shared store, and misbehavior
//! is scripted per worker index, so failure-path tests do not depend
//! on thread scheduling.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::cache_client::{CacheClient, Connector};
use crate::utils::{ConnectionError, RequestError};

type Store = Arc<Mutex<HashMap<String, Vec<u8>>>>;

/// Connector over a shared in-memory store.
///
/// Fault schedules are fixed at build time, before the connector is
/// shared; worker indices key them so each scripted event lands on
/// exactly the session it targets.
#[derive(Default)]
pub struct MockConnector {
    store: Store,
    refuse_connect: HashSet<usize>,
    absent_at: HashMap<usize, u64>,
    error_at: HashMap<usize, u64>,
    sessions: AtomicUsize,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write directly to the store, without a session.
    pub fn seed(&self, key: &str, value: &[u8]) {
        self.store.lock().insert(key.to_string(), value.to_vec());
    }

    /// Script a connect failure for the given worker.
    pub fn refuse_connect(mut self, worker: usize) -> Self {
        self.refuse_connect.insert(worker);
        self
    }

    /// Script an absent-key reply for the given worker's `request`-th
    /// get (zero-based).
    pub fn absent_at(mut self, worker: usize, request: u64) -> Self {
        self.absent_at.insert(worker, request);
        self
    }

    /// Script a server error for the given worker's `request`-th get
    /// (zero-based).
    pub fn error_at(mut self, worker: usize, request: u64) -> Self {
        self.error_at.insert(worker, request);
        self
    }

    /// Number of sessions opened so far.
    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::Relaxed)
    }
}

impl Connector for MockConnector {
    type Client = MockClient;

    fn connect(&self, worker: usize) -> Result<MockClient, ConnectionError> {
        if self.refuse_connect.contains(&worker) {
            return Err(ConnectionError::Refused(format!(
                "scripted connect failure for worker {worker}"
            )));
        }
        self.sessions.fetch_add(1, Ordering::Relaxed);
        Ok(MockClient {
            store: Arc::clone(&self.store),
            absent_at: self.absent_at.get(&worker).copied(),
            error_at: self.error_at.get(&worker).copied(),
            gets_served: 0,
        })
    }
}

/// One session onto the shared store.
pub struct MockClient {
    store: Store,
    absent_at: Option<u64>,
    error_at: Option<u64>,
    gets_served: u64,
}

impl CacheClient for MockClient {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, RequestError> {
        let request = self.gets_served;
        self.gets_served += 1;

        if self.error_at == Some(request) {
            return Err(RequestError::Server("scripted failure".to_string()));
        }
        if self.absent_at == Some(request) {
            return Ok(None);
        }
        Ok(self.store.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), RequestError> {
        self.store.lock().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_key_is_visible_to_sessions() {
        let connector = MockConnector::new();
        connector.seed("k", b"v");
        let mut client = connector.connect(0).unwrap();
        assert_eq!(client.get("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_sessions_share_the_store() {
        let connector = MockConnector::new();
        let mut writer = connector.connect(0).unwrap();
        let mut reader = connector.connect(1).unwrap();
        writer.set("k", b"shared").unwrap();
        assert_eq!(reader.get("k").unwrap(), Some(b"shared".to_vec()));
        assert_eq!(connector.sessions(), 2);
    }

    #[test]
    fn test_unseeded_key_is_absent() {
        let connector = MockConnector::new();
        let mut client = connector.connect(0).unwrap();
        assert_eq!(client.get("nothing").unwrap(), None);
    }

    #[test]
    fn test_refuse_connect_targets_one_worker() {
        let connector = MockConnector::new().refuse_connect(1);
        assert!(connector.connect(0).is_ok());
        assert!(matches!(
            connector.connect(1),
            Err(ConnectionError::Refused(_))
        ));
    }

    #[test]
    fn test_absent_at_hits_the_scheduled_request_only() {
        let connector = MockConnector::new().absent_at(0, 1);
        connector.seed("k", b"v");
        let mut client = connector.connect(0).unwrap();
        assert!(client.get("k").unwrap().is_some());
        assert!(client.get("k").unwrap().is_none());
        assert!(client.get("k").unwrap().is_some());
    }

    #[test]
    fn test_error_at_hits_the_scheduled_request_only() {
        let connector = MockConnector::new().error_at(0, 0);
        connector.seed("k", b"v");
        let mut client = connector.connect(0).unwrap();
        assert!(client.get("k").is_err());
        assert!(client.get("k").unwrap().is_some());
    }

    #[test]
    fn test_schedules_do_not_leak_across_workers() {
        let connector = MockConnector::new().absent_at(1, 0).error_at(2, 0);
        connector.seed("k", b"v");
        let mut untouched = connector.connect(0).unwrap();
        assert!(untouched.get("k").unwrap().is_some());
    }
}
