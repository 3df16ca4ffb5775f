//! Buffered TCP connection speaking RESP.

use std::io::{self, BufReader, BufWriter, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::utils::{ConnectionError, RespDecoder, RespEncoder, RespValue};

const BUF_CAPACITY: usize = 16 * 1024;

/// One TCP session to a cache server.
///
/// Reader and writer wrap independent handles onto the same stream.
/// Only session establishment is bounded by a timeout; requests block
/// until the server answers, since the benchmark measures exactly that
/// wall-clock wait.
#[derive(Debug)]
pub struct Connection {
    writer: BufWriter<TcpStream>,
    reader: BufReader<TcpStream>,
}

impl Connection {
    /// Resolve `host`, connect within `connect_timeout`, and disable
    /// Nagle batching on the stream.
    pub fn open(host: &str, port: u16, connect_timeout: Duration) -> Result<Self, ConnectionError> {
        let connect_failed = |source: io::Error| ConnectionError::ConnectFailed {
            host: host.to_string(),
            port,
            source,
        };

        let addr = (host, port)
            .to_socket_addrs()
            .map_err(connect_failed)?
            .next()
            .ok_or_else(|| {
                connect_failed(io::Error::new(
                    io::ErrorKind::NotFound,
                    "hostname resolved to no addresses",
                ))
            })?;

        let stream = TcpStream::connect_timeout(&addr, connect_timeout).map_err(connect_failed)?;
        stream.set_nodelay(true).ok();

        let writer = BufWriter::with_capacity(
            BUF_CAPACITY,
            stream.try_clone().map_err(connect_failed)?,
        );
        let reader = BufReader::with_capacity(BUF_CAPACITY, stream);

        Ok(Self { writer, reader })
    }

    /// Send one encoded command and block for its reply.
    pub fn execute(&mut self, encoder: &RespEncoder) -> io::Result<RespValue> {
        self.writer.write_all(encoder.as_bytes())?;
        self.writer.flush()?;
        RespDecoder::new(&mut self.reader).decode()
    }

    /// Round-trip a PING to validate the session.
    pub fn ping(&mut self) -> io::Result<RespValue> {
        let mut encoder = RespEncoder::with_capacity(16);
        encoder.command(&[b"PING"]);
        self.execute(&encoder)
    }
}
