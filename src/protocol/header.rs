//! Frame header
//!
//! ```text
//! ┌───────┬──────┬───────────┬──────────┬────────────┬──────────┬────────────┐
//! │Magic 1│ Op 1 │ DMapLen 2 │ KeyLen 2 │ ExtraLen 1 │ Status 1 │ BodyLen 4  │
//! └───────┴──────┴───────────┴──────────┴────────────┴──────────┴────────────┘
//! ```
//! All multi-byte fields are big-endian.

use bytes::{Buf, BufMut};

use crate::error::{Result, WireError};
use super::{Magic, OpCode, StatusCode};

/// Header size in bytes
pub const HEADER_SIZE: usize = 12;

/// Largest combined size of Extra + DMap + Key a header can declare
pub const MAX_FIELDS_LEN: usize = u8::MAX as usize + 2 * u16::MAX as usize;

/// Fixed-size header shared by requests and responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: Magic,
    pub op: OpCode,
    pub dmap_len: u16,
    pub key_len: u16,
    pub extra_len: u8,
    pub status: StatusCode,
    /// Everything after the header: extra + dmap + key + value
    pub body_len: u32,
}

impl Header {
    /// Parse a header from the first [`HEADER_SIZE`] bytes of `bytes`.
    ///
    /// The magic byte is validated before anything else is looked at.
    /// Status only carries meaning on responses; on requests the byte is
    /// ignored and decoded as [`StatusCode::Ok`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(WireError::InvalidMessage(format!(
                "incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let mut buf = &bytes[..HEADER_SIZE];
        let magic = Magic::try_from(buf.get_u8())?;
        let op = OpCode::try_from(buf.get_u8())?;
        let dmap_len = buf.get_u16();
        let key_len = buf.get_u16();
        let extra_len = buf.get_u8();
        let status_raw = buf.get_u8();
        let status = match magic {
            Magic::Request => StatusCode::Ok,
            Magic::Response => StatusCode::try_from(status_raw)?,
        };
        let body_len = buf.get_u32();

        Ok(Self {
            magic,
            op,
            dmap_len,
            key_len,
            extra_len,
            status,
            body_len,
        })
    }

    /// Append the 12-byte encoding to `buf`
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.magic as u8);
        buf.put_u8(self.op as u8);
        buf.put_u16(self.dmap_len);
        buf.put_u16(self.key_len);
        buf.put_u8(self.extra_len);
        buf.put_u8(self.status as u8);
        buf.put_u32(self.body_len);
    }

    /// Bytes taken by extra, dmap and key
    pub fn fields_len(&self) -> usize {
        self.extra_len as usize + self.dmap_len as usize + self.key_len as usize
    }

    /// Value length implied by the header.
    ///
    /// Fails when the fixed fields alone are longer than the body.
    pub fn value_len(&self) -> Result<usize> {
        (self.body_len as usize)
            .checked_sub(self.fields_len())
            .ok_or(WireError::InvalidLength {
                body_len: self.body_len,
                fields_len: self.fields_len(),
            })
    }

    pub fn is_request(&self) -> bool {
        self.magic == Magic::Request
    }
}
