//! Message definitions
//!
//! A decoded frame, or one about to be encoded.

use std::fmt;

use bytes::Bytes;

use crate::error::{Result, WireError};
use super::{Extra, Header, Magic, OpCode, StatusCode};

/// A protocol message
///
/// Length fields are not stored; [`Message::header`] derives them from the
/// contents, so they cannot drift from what is actually sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Request or response
    pub magic: Magic,

    /// Operation this message belongs to
    pub op: OpCode,

    /// Response status (always OK on requests)
    pub status: StatusCode,

    /// Opcode-specific extra, requests only
    pub extra: Option<Extra>,

    /// DMap (namespace) name
    pub dmap: String,

    /// Raw key bytes
    pub key: Bytes,

    /// Raw value bytes, owned by the message
    pub value: Bytes,
}

impl Message {
    /// Create a request with no extra and an empty value
    pub fn request(op: OpCode, dmap: impl Into<String>, key: impl Into<Bytes>) -> Self {
        Self {
            magic: Magic::Request,
            op,
            status: StatusCode::Ok,
            extra: None,
            dmap: dmap.into(),
            key: key.into(),
            value: Bytes::new(),
        }
    }

    /// Attach an extra record
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Attach a value
    pub fn with_value(mut self, value: impl Into<Bytes>) -> Self {
        self.value = value.into();
        self
    }

    pub fn is_request(&self) -> bool {
        self.magic == Magic::Request
    }

    /// Compute the wire header for this message.
    ///
    /// Fails if a field does not fit its length slot, or if the extra does
    /// not match what the opcode expects.
    pub fn header(&self) -> Result<Header> {
        let dmap_len = u16::try_from(self.dmap.len()).map_err(|_| WireError::FieldTooLong {
            field: "dmap",
            len: self.dmap.len(),
            max: u16::MAX as usize,
        })?;
        let key_len = u16::try_from(self.key.len()).map_err(|_| WireError::FieldTooLong {
            field: "key",
            len: self.key.len(),
            max: u16::MAX as usize,
        })?;

        let extra_len = match &self.extra {
            None => 0,
            Some(extra) => {
                if !self.is_request() {
                    return Err(WireError::MalformedExtra(format!(
                        "{} response cannot carry an extra",
                        self.op
                    )));
                }
                if self.op.extra_kind() != Some(extra.kind()) {
                    return Err(WireError::MalformedExtra(format!(
                        "{} does not take a {:?} extra",
                        self.op,
                        extra.kind()
                    )));
                }
                extra.encoded_len() as u8
            }
        };

        let body_len =
            extra_len as usize + dmap_len as usize + key_len as usize + self.value.len();
        let body_len = u32::try_from(body_len).map_err(|_| WireError::FieldTooLong {
            field: "body",
            len: body_len,
            max: u32::MAX as usize,
        })?;

        Ok(Header {
            magic: self.magic,
            op: self.op,
            dmap_len,
            key_len,
            extra_len,
            status: self.status,
            body_len,
        })
    }

    // =========================================================================
    // Response Builders
    // =========================================================================

    /// Build an error response to this request.
    ///
    /// `cause` may be a plain string or any error; its display text becomes
    /// the response value.
    pub fn error_response(&self, status: StatusCode, cause: impl fmt::Display) -> Message {
        Message {
            magic: Magic::Response,
            op: self.op,
            status,
            extra: None,
            dmap: String::new(),
            key: Bytes::new(),
            value: Bytes::from(cause.to_string()),
        }
    }

    /// Build an empty OK response to this request
    pub fn success_response(&self) -> Message {
        Message {
            magic: Magic::Response,
            op: self.op,
            status: StatusCode::Ok,
            extra: None,
            dmap: String::new(),
            key: Bytes::new(),
            value: Bytes::new(),
        }
    }
}
