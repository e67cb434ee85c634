//! # cachewire
//!
//! Binary wire protocol for a distributed key-value cache:
//! - Fixed 12-byte big-endian header with magic, opcode and length fields
//! - Opcode-selected extra records (TTLs, partition IDs)
//! - Bounds-checked stream decoding with a configurable value ceiling
//! - Pooled scratch buffers shared by the read and write paths
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 TCP Server / Client                          │
//! │               (thread per connection)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ byte stream
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Codec                                  │
//! │        read_message  ◄──────────►  write_message             │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │   BufferPool    │                │     Router      │
//!   │ (lock-free, RAII│                │  (Op → handler) │
//!   │     guards)     │                └─────────────────┘
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod pool;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{WireError, Result};
pub use config::Config;
pub use pool::BufferPool;
pub use protocol::{Codec, Extra, Message, OpCode, StatusCode};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cachewire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
