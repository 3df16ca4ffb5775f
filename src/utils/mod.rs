//! Utility modules

pub mod error;
pub mod resp;

pub use error::{BenchError, ConnectionError, RequestError, Result};
pub use resp::{RespDecoder, RespEncoder, RespValue};
