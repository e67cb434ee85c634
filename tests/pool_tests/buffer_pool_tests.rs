//! Buffer Pool Tests
//!
//! Tests verify:
//! - Buffers are reused after release
//! - Released buffers come back empty
//! - Idle count and buffer size stay bounded
//! - Concurrent acquire/release from many threads

use std::sync::Arc;
use std::thread;

use bytes::BufMut;
use cachewire::pool::{BufferPool, PoolStats};
use cachewire::Config;

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_pool_is_empty() {
    let pool = BufferPool::new(4, 1024);
    assert_eq!(pool.idle_count(), 0);
    assert_eq!(
        pool.stats(),
        PoolStats {
            hits: 0,
            misses: 0,
            idle: 0
        }
    );
}

#[test]
fn test_acquire_release_reuses_buffer() {
    let pool = BufferPool::new(4, 1024);

    {
        let mut buf = pool.acquire();
        buf.put_slice(b"hello");
    }
    assert_eq!(pool.idle_count(), 1);

    let buf = pool.acquire();
    assert!(buf.is_empty());
    assert_eq!(pool.stats().hits, 1);
    assert_eq!(pool.stats().misses, 1);
}

#[test]
fn test_released_buffer_keeps_capacity() {
    let pool = BufferPool::new(4, 1 << 20);

    {
        let mut buf = pool.acquire();
        buf.resize(8192, 0);
    }

    let buf = pool.acquire();
    assert!(buf.is_empty());
    assert!(buf.capacity() >= 8192);
}

#[test]
fn test_oversized_buffer_not_retained() {
    let pool = BufferPool::new(4, 1024);

    {
        let mut buf = pool.acquire();
        buf.resize(4096, 0);
    }

    assert_eq!(pool.idle_count(), 0);
}

#[test]
fn test_idle_count_bounded_by_capacity() {
    let pool = BufferPool::new(2, 1024);

    let held: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
    assert_eq!(pool.stats().misses, 5);
    drop(held);

    assert_eq!(pool.idle_count(), 2);
}

#[test]
fn test_from_config() {
    let config = Config::builder()
        .pool_capacity(3)
        .pool_max_buffer_size(4096)
        .build();
    let pool = BufferPool::from_config(&config);

    let held: Vec<_> = (0..4).map(|_| pool.acquire()).collect();
    drop(held);
    assert_eq!(pool.idle_count(), 3);
}

#[test]
fn test_buffer_returned_on_panic() {
    let pool = BufferPool::new(4, 1024);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut buf = pool.acquire();
        buf.put_u8(1);
        panic!("handler blew up");
    }));

    assert!(result.is_err());
    assert_eq!(pool.idle_count(), 1);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_acquire_release() {
    let pool = Arc::new(BufferPool::new(8, 1 << 16));
    let mut handles = Vec::new();

    for t in 0..8u8 {
        let pool = Arc::clone(&pool);
        handles.push(thread::spawn(move || {
            for i in 0..500u32 {
                let mut buf = pool.acquire();
                assert!(buf.is_empty());
                buf.put_u8(t);
                buf.put_u32(i);
                // Exclusive ownership: nobody else wrote into this buffer
                assert_eq!(buf[0], t);
                assert_eq!(&buf[1..5], &i.to_be_bytes());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = pool.stats();
    assert_eq!(stats.hits + stats.misses, 8 * 500);
    assert!(stats.idle <= 8);
}
