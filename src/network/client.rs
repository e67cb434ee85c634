//! Blocking client
//!
//! One request in flight at a time over a single TCP stream.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, WireError};
use crate::pool::BufferPool;
use crate::protocol::{Codec, Message};

/// Request/response client
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    codec: Codec,
}

impl Client {
    /// Connect to a node, applying the config's timeouts and value ceiling
    pub fn connect(addr: impl ToSocketAddrs, config: &Config) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        let pool = Arc::new(BufferPool::from_config(config));
        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
            codec: Codec::new(config, pool),
        })
    }

    /// Send a request and wait for its response
    pub fn call(&mut self, request: &Message) -> Result<Message> {
        if !request.is_request() {
            return Err(WireError::InvalidMessage(
                "client can only send request frames".to_string(),
            ));
        }

        self.codec.write_message(&mut self.writer, request)?;
        let response = self.codec.read_message(&mut self.reader)?;

        if response.is_request() {
            return Err(WireError::InvalidMessage(
                "expected a response frame, got a request".to_string(),
            ));
        }
        if response.op != request.op {
            return Err(WireError::Network(format!(
                "response op {} does not match request op {}",
                response.op, request.op
            )));
        }
        Ok(response)
    }
}
