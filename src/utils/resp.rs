//! RESP wire codec for the cache protocol.
//!
//! Covers the subset a GET/SET workload needs: commands go out as
//! arrays of bulk strings, replies come back as any reply kind.

use std::io::{self, BufRead};

/// A single decoded reply.
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Simple string (+OK\r\n)
    Simple(String),
    /// Error (-ERR message\r\n)
    Error(String),
    /// Integer (:1000\r\n)
    Integer(i64),
    /// Bulk string ($6\r\nfoobar\r\n)
    Bulk(Vec<u8>),
    /// Null bulk string or array ($-1\r\n, *-1\r\n)
    Null,
    /// Array (*2\r\n...)
    Array(Vec<RespValue>),
}

impl RespValue {
    /// Reply kind tag for log and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RespValue::Simple(_) => "simple string",
            RespValue::Error(_) => "error",
            RespValue::Integer(_) => "integer",
            RespValue::Bulk(_) => "bulk string",
            RespValue::Null => "null",
            RespValue::Array(_) => "array",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RespValue::Error(_))
    }
}

/// Command encoder with a reusable buffer.
#[derive(Debug)]
pub struct RespEncoder {
    buf: Vec<u8>,
}

impl RespEncoder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Clear the buffer for the next command.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append one command encoded as an array of bulk strings.
    pub fn command(&mut self, args: &[&[u8]]) {
        self.buf.push(b'*');
        self.int(args.len() as i64);
        self.crlf();
        for arg in args {
            self.buf.push(b'$');
            self.int(arg.len() as i64);
            self.crlf();
            self.buf.extend_from_slice(arg);
            self.crlf();
        }
    }

    #[inline]
    fn int(&mut self, value: i64) {
        let mut buffer = itoa::Buffer::new();
        self.buf.extend_from_slice(buffer.format(value).as_bytes());
    }

    #[inline]
    fn crlf(&mut self) {
        self.buf.extend_from_slice(b"\r\n");
    }
}

/// Streaming reply decoder over a buffered reader.
pub struct RespDecoder<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> RespDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::with_capacity(64),
        }
    }

    /// Decode the next reply from the stream. Blocks until the server
    /// has sent a full reply.
    pub fn decode(&mut self) -> io::Result<RespValue> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-reply",
            ));
        }

        let line = self
            .line
            .strip_suffix("\r\n")
            .or_else(|| self.line.strip_suffix('\n'))
            .unwrap_or(&self.line);

        let (kind, payload) = match line.as_bytes().first() {
            Some(&b) => (b, &line[1..]),
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "empty reply line",
                ))
            }
        };

        match kind {
            b'+' => Ok(RespValue::Simple(payload.to_string())),
            b'-' => Ok(RespValue::Error(payload.to_string())),
            b':' => {
                let value: i64 = payload.parse().map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidData, "malformed integer reply")
                })?;
                Ok(RespValue::Integer(value))
            }
            b'$' => {
                let len: i64 = payload.parse().map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidData, "malformed bulk length")
                })?;
                if len < 0 {
                    return Ok(RespValue::Null);
                }

                let mut data = vec![0u8; len as usize];
                self.reader.read_exact(&mut data)?;
                let mut crlf = [0u8; 2];
                self.reader.read_exact(&mut crlf)?;
                Ok(RespValue::Bulk(data))
            }
            b'*' => {
                let count: i64 = payload.parse().map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidData, "malformed array length")
                })?;
                if count < 0 {
                    return Ok(RespValue::Null);
                }

                let mut items = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    items.push(self.decode()?);
                }
                Ok(RespValue::Array(items))
            }
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown reply type byte: {}", other as char),
            )),
        }
    }
}
