//! Client connection layer

pub mod cache_client;
pub mod connection;
pub mod mock;
pub mod resp_client;

pub use cache_client::{CacheClient, Connector};
pub use connection::Connection;
pub use mock::{MockClient, MockConnector};
pub use resp_client::{RespClient, RespConnector};
