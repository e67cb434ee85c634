//! Error types for cachewire
//!
//! Provides a unified error type for the codec and the connection layer.

use std::io;

use thiserror::Error;

/// Result type alias using WireError
pub type Result<T> = std::result::Result<T, WireError>;

/// Description fragments that identify a transport which is already closed.
const CLOSED_MARKERS: [&str; 2] = ["use of closed network connection", "connection closed"];

/// Unified error type for cachewire operations
#[derive(Debug, Error)]
pub enum WireError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("connection closed")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("value too big: {size} bytes (max {max})")]
    ValueTooBig { size: usize, max: usize },

    #[error("invalid length: body is {body_len} bytes but fixed fields need {fields_len}")]
    InvalidLength { body_len: u32, fields_len: usize },

    #[error("unknown opcode: 0x{0:02x}")]
    UnknownOpCode(u8),

    #[error("unknown status code: 0x{0:02x}")]
    UnknownStatus(u8),

    // -------------------------------------------------------------------------
    // Field Errors
    // -------------------------------------------------------------------------
    #[error("malformed extra: {0}")]
    MalformedExtra(String),

    #[error("malformed field: {0}")]
    MalformedField(String),

    #[error("{field} too long: {len} bytes (max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),
}

impl WireError {
    /// Normalize a transport failure.
    ///
    /// Every flavour of "the other side hung up" collapses into
    /// [`WireError::ConnectionClosed`]; anything else is kept as [`WireError::Io`].
    pub fn from_transport(err: io::Error) -> Self {
        if is_closed(&err) {
            WireError::ConnectionClosed
        } else {
            WireError::Io(err)
        }
    }

    /// True if this error means the peer is gone and the stream is unusable
    pub fn is_disconnect(&self) -> bool {
        match self {
            WireError::ConnectionClosed => true,
            WireError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}

fn is_closed(err: &io::Error) -> bool {
    match err.kind() {
        io::ErrorKind::BrokenPipe
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected => true,
        _ => {
            let text = err.to_string();
            CLOSED_MARKERS.iter().any(|marker| text.contains(marker))
        }
    }
}
