//! Buffer pool implementation
//!
//! `ArrayQueue`-backed pool with RAII guards.

use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::BytesMut;
use crossbeam::queue::ArrayQueue;

use crate::config::Config;

/// Initial capacity of freshly allocated buffers (header + small body)
const INITIAL_BUFFER_SIZE: usize = 512;

/// Thread-safe pool of reusable scratch buffers
pub struct BufferPool {
    /// Idle buffers ready for reuse
    idle: ArrayQueue<BytesMut>,

    /// Buffers with a larger capacity are dropped on release
    max_buffer_size: usize,

    /// Acquires served from the idle queue
    hits: AtomicU64,

    /// Acquires that had to allocate
    misses: AtomicU64,
}

/// Snapshot of pool counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub hits: u64,
    pub misses: u64,
    pub idle: usize,
}

impl BufferPool {
    /// Create a pool retaining at most `capacity` idle buffers
    pub fn new(capacity: usize, max_buffer_size: usize) -> Self {
        Self {
            idle: ArrayQueue::new(capacity.max(1)),
            max_buffer_size,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Create a pool sized from the config
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.pool_capacity, config.pool_max_buffer_size)
    }

    /// Take a buffer out of the pool, allocating if none is idle.
    ///
    /// The returned buffer is empty and is handed back when the guard drops.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = match self.idle.pop() {
            Some(buf) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                BytesMut::with_capacity(INITIAL_BUFFER_SIZE)
            }
        };
        PooledBuffer { buf, pool: self }
    }

    /// Number of buffers currently idle
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Current hit/miss counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            idle: self.idle.len(),
        }
    }

    fn release(&self, mut buf: BytesMut) {
        if buf.capacity() > self.max_buffer_size {
            return;
        }
        buf.clear();
        // Queue full: let the buffer go.
        let _ = self.idle.push(buf);
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("idle", &self.idle.len())
            .field("capacity", &self.idle.capacity())
            .field("max_buffer_size", &self.max_buffer_size)
            .finish()
    }
}

/// Scoped scratch buffer borrowed from a [`BufferPool`]
pub struct PooledBuffer<'a> {
    buf: BytesMut,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = BytesMut;

    fn deref(&self) -> &BytesMut {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(mem::take(&mut self.buf));
    }
}
