//! Protocol codec
//!
//! Stream-based reading and writing of framed messages.
//!
//! ## Frame Layout
//! ```text
//! ┌────────────┬─────────┬────────┬───────┬─────────┐
//! │ Header (12)│ Extra   │ DMap   │ Key   │ Value   │
//! └────────────┴─────────┴────────┴───────┴─────────┘
//!               ExtraLen  DMapLen  KeyLen  BodyLen - (ExtraLen + DMapLen + KeyLen)
//! ```
//!
//! The codec never logs and never retries. Every failure is returned to
//! the caller; a partially read frame never becomes a `Message`.

use std::io::{Read, Write};
use std::sync::Arc;

use bytes::{Bytes, BytesMut};

use crate::config::Config;
use crate::error::{Result, WireError};
use crate::pool::BufferPool;
use super::{Header, Message, HEADER_SIZE};

/// Encoder/decoder bound to a value size ceiling and a shared buffer pool
///
/// Cheap to clone; clones share the pool. Safe to use from many threads,
/// each call works on its own pooled scratch buffer.
#[derive(Debug, Clone)]
pub struct Codec {
    /// Largest value accepted or produced
    max_value_size: usize,

    /// Scratch space for both directions
    pool: Arc<BufferPool>,
}

impl Codec {
    /// Create a codec using `config.max_value_size` and the given pool
    pub fn new(config: &Config, pool: Arc<BufferPool>) -> Self {
        Self {
            max_value_size: config.max_value_size,
            pool,
        }
    }

    pub fn max_value_size(&self) -> usize {
        self.max_value_size
    }

    pub fn pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Read one complete message from a stream
    ///
    /// Blocks until the whole frame is received or an error occurs. The
    /// body is not read when the header already declares an oversized or
    /// inconsistent value length.
    pub fn read_message<R: Read>(&self, reader: &mut R) -> Result<Message> {
        let mut buf = self.pool.acquire();

        buf.resize(HEADER_SIZE, 0);
        reader
            .read_exact(&mut buf[..])
            .map_err(WireError::from_transport)?;
        let header = Header::decode(&buf)?;

        let value_len = header.value_len()?;
        if value_len > self.max_value_size {
            return Err(WireError::ValueTooBig {
                size: value_len,
                max: self.max_value_size,
            });
        }

        buf.clear();
        buf.resize(header.body_len as usize, 0);
        reader
            .read_exact(&mut buf[..])
            .map_err(WireError::from_transport)?;

        decode_body(&header, &buf)
    }

    // =========================================================================
    // Write Path
    // =========================================================================

    /// Write a message to a stream in a single write, then flush
    pub fn write_message<W: Write>(&self, writer: &mut W, message: &Message) -> Result<()> {
        let mut buf = self.pool.acquire();
        self.encode_into(message, &mut buf)?;

        writer.write_all(&buf).map_err(WireError::from_transport)?;
        writer.flush().map_err(WireError::from_transport)?;
        Ok(())
    }

    /// Encode a message into a fresh `Vec`
    pub fn encode_to_vec(&self, message: &Message) -> Result<Vec<u8>> {
        let mut buf = self.pool.acquire();
        self.encode_into(message, &mut buf)?;
        Ok(buf.to_vec())
    }

    fn encode_into(&self, message: &Message, buf: &mut BytesMut) -> Result<()> {
        if message.value.len() > self.max_value_size {
            return Err(WireError::ValueTooBig {
                size: message.value.len(),
                max: self.max_value_size,
            });
        }
        let header = message.header()?;

        buf.reserve(HEADER_SIZE + header.body_len as usize);
        header.encode(buf);
        if let Some(extra) = &message.extra {
            extra.encode(buf);
        }
        buf.extend_from_slice(message.dmap.as_bytes());
        buf.extend_from_slice(&message.key);
        buf.extend_from_slice(&message.value);
        Ok(())
    }
}

impl Default for Codec {
    fn default() -> Self {
        let config = Config::default();
        let pool = Arc::new(BufferPool::from_config(&config));
        Self::new(&config, pool)
    }
}

/// Split a fully read body into extra, dmap, key and value.
///
/// `body` is exactly `header.body_len` bytes and the header has already
/// passed the length check, so every split below is in bounds.
fn decode_body(header: &Header, body: &[u8]) -> Result<Message> {
    let mut rest = body;

    let extra = if header.extra_len > 0 {
        if !header.is_request() {
            return Err(WireError::MalformedExtra(format!(
                "{} response carries {} extra bytes",
                header.op, header.extra_len
            )));
        }
        let kind = header.op.extra_kind().ok_or_else(|| {
            WireError::MalformedExtra(format!(
                "{} takes no extra, got {} bytes",
                header.op, header.extra_len
            ))
        })?;
        let (raw, tail) = rest.split_at(header.extra_len as usize);
        rest = tail;
        Some(kind.decode(raw)?)
    } else {
        None
    };

    let (dmap_raw, tail) = rest.split_at(header.dmap_len as usize);
    let dmap = std::str::from_utf8(dmap_raw)
        .map_err(|e| WireError::MalformedField(format!("dmap is not valid UTF-8: {}", e)))?
        .to_owned();

    let (key_raw, value_raw) = tail.split_at(header.key_len as usize);

    // Copy out: the scratch buffer goes back to the pool after this call.
    let value = if value_raw.is_empty() {
        Bytes::new()
    } else {
        Bytes::copy_from_slice(value_raw)
    };

    Ok(Message {
        magic: header.magic,
        op: header.op,
        status: header.status,
        extra,
        dmap,
        key: Bytes::copy_from_slice(key_raw),
        value,
    })
}
