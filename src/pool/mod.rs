//! Buffer Pool Module
//!
//! Reusable scratch buffers for the encode/decode paths.
//!
//! ## Responsibilities
//! - Hand out exclusively owned `BytesMut` scratch space
//! - Take buffers back automatically when the guard drops (including unwinding)
//! - Stay bounded: idle buffer count and per-buffer size are both capped
//!
//! ## Concurrency
//! Idle buffers live in a lock-free `ArrayQueue`, so concurrent callers
//! never wait on each other. A full queue or an oversized buffer simply
//! means the buffer is freed on release.

mod buffer;

pub use buffer::{BufferPool, PoolStats, PooledBuffer};
