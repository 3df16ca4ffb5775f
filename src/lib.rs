//! cache-latency-benchmark library
//!
//! Concurrent GET-latency benchmark for key-value cache servers. One
//! worker thread per requested client opens its own session, all
//! workers rendezvous at a start barrier, and each then issues a
//! bounded series of synchronous GETs against one shared key, timing
//! every request in nanoseconds.

pub mod benchmark;
pub mod client;
pub mod config;
pub mod utils;
