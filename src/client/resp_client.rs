//! Cache client for RESP servers (Valkey, Redis, and compatibles).

use std::time::Duration;

use super::cache_client::{CacheClient, Connector};
use super::connection::Connection;
use crate::utils::{ConnectionError, RequestError, RespEncoder, RespValue};

/// Synchronous RESP client over one TCP session.
#[derive(Debug)]
pub struct RespClient {
    conn: Connection,
    encoder: RespEncoder,
}

impl RespClient {
    fn request(&mut self, args: &[&[u8]]) -> Result<RespValue, RequestError> {
        self.encoder.clear();
        self.encoder.command(args);
        let reply = self.conn.execute(&self.encoder)?;
        if let RespValue::Error(message) = reply {
            return Err(RequestError::Server(message));
        }
        Ok(reply)
    }
}

impl CacheClient for RespClient {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, RequestError> {
        match self.request(&[b"GET", key.as_bytes()])? {
            RespValue::Bulk(value) => Ok(Some(value)),
            RespValue::Null => Ok(None),
            other => Err(RequestError::UnexpectedReply {
                command: "GET",
                reply: other.kind().to_string(),
            }),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), RequestError> {
        match self.request(&[b"SET", key.as_bytes(), value])? {
            RespValue::Simple(status) if status == "OK" => Ok(()),
            other => Err(RequestError::UnexpectedReply {
                command: "SET",
                reply: other.kind().to_string(),
            }),
        }
    }
}

/// Opens one fresh TCP session per call.
#[derive(Debug, Clone)]
pub struct RespConnector {
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl RespConnector {
    pub fn new(host: String, port: u16, connect_timeout: Duration) -> Self {
        Self {
            host,
            port,
            connect_timeout,
        }
    }

    /// Open and validate a session. PING doubles as the handshake: a
    /// server that cannot answer it is not fit to benchmark.
    pub fn session(&self) -> Result<RespClient, ConnectionError> {
        let mut conn = Connection::open(&self.host, self.port, self.connect_timeout)?;
        match conn.ping() {
            Ok(RespValue::Simple(reply)) if reply == "PONG" => {}
            Ok(other) => {
                return Err(ConnectionError::Handshake(format!(
                    "unexpected PING reply: {}",
                    other.kind()
                )))
            }
            Err(e) => return Err(ConnectionError::Handshake(e.to_string())),
        }
        Ok(RespClient {
            conn,
            encoder: RespEncoder::with_capacity(64),
        })
    }
}

impl Connector for RespConnector {
    type Client = RespClient;

    fn connect(&self, _worker: usize) -> Result<RespClient, ConnectionError> {
        self.session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Accept one connection and serve scripted replies: PONG for the
    /// handshake, then one canned reply per subsequent request line.
    fn scripted_server(replies: Vec<&'static [u8]>) -> (RespConnector, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];

            // Handshake PING.
            let _ = stream.read(&mut buf).unwrap();
            stream.write_all(b"+PONG\r\n").unwrap();

            for reply in replies {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    return;
                }
                stream.write_all(reply).unwrap();
            }
        });
        let connector = RespConnector::new(
            addr.ip().to_string(),
            addr.port(),
            Duration::from_secs(1),
        );
        (connector, handle)
    }

    #[test]
    fn test_get_present_key() {
        let (connector, server) = scripted_server(vec![b"$5\r\nhello\r\n"]);
        let mut client = connector.connect(0).unwrap();
        let value = client.get("k").unwrap();
        assert_eq!(value, Some(b"hello".to_vec()));
        drop(client);
        server.join().unwrap();
    }

    #[test]
    fn test_get_absent_key_is_none() {
        let (connector, server) = scripted_server(vec![b"$-1\r\n"]);
        let mut client = connector.connect(0).unwrap();
        assert_eq!(client.get("missing").unwrap(), None);
        drop(client);
        server.join().unwrap();
    }

    #[test]
    fn test_server_error_reply_becomes_request_error() {
        let (connector, server) = scripted_server(vec![b"-ERR out of memory\r\n"]);
        let mut client = connector.connect(0).unwrap();
        let err = client.get("k").unwrap_err();
        assert!(matches!(err, RequestError::Server(ref m) if m.contains("out of memory")));
        drop(client);
        server.join().unwrap();
    }

    #[test]
    fn test_set_round_trip() {
        let (connector, server) = scripted_server(vec![b"+OK\r\n"]);
        let mut client = connector.connect(0).unwrap();
        client.set("k", b"v").unwrap();
        drop(client);
        server.join().unwrap();
    }

    #[test]
    fn test_unexpected_reply_kind() {
        let (connector, server) = scripted_server(vec![b":42\r\n"]);
        let mut client = connector.connect(0).unwrap();
        let err = client.get("k").unwrap_err();
        assert!(matches!(
            err,
            RequestError::UnexpectedReply { command: "GET", .. }
        ));
        drop(client);
        server.join().unwrap();
    }

    #[test]
    #[ignore = "requires a cache server on 127.0.0.1:6379"]
    fn test_live_server_round_trip() {
        let connector =
            RespConnector::new("127.0.0.1".to_string(), 6379, Duration::from_secs(1));
        let mut client = connector.session().unwrap();
        client.set("latbench:smoke", b"value").unwrap();
        assert_eq!(
            client.get("latbench:smoke").unwrap(),
            Some(b"value".to_vec())
        );
    }

    #[test]
    fn test_handshake_rejects_non_pong() {
        let (connector, server) = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            let handle = thread::spawn(move || {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 64];
                let _ = stream.read(&mut buf).unwrap();
                stream.write_all(b":0\r\n").unwrap();
            });
            (
                RespConnector::new(addr.ip().to_string(), addr.port(), Duration::from_secs(1)),
                handle,
            )
        };
        let err = connector.connect(0).unwrap_err();
        assert!(matches!(err, ConnectionError::Handshake(_)));
        server.join().unwrap();
    }
}
