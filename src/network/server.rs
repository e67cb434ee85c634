//! TCP Server
//!
//! Accepts connections and runs each one on its own thread.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, WireError};
use crate::pool::BufferPool;
use crate::protocol::Codec;
use super::{Connection, Router};

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// TCP server for cachewire
pub struct Server {
    config: Config,
    listener: TcpListener,
    codec: Codec,
    router: Arc<Router>,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

/// Releases one connection slot when dropped, including during unwinding
struct SlotGuard(Arc<AtomicUsize>);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Cloneable handle that stops a running [`Server`]
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Signal the accept loop to exit.
    ///
    /// Connections already being served run until their peer disconnects.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl Server {
    /// Bind the listen address and prepare the shared codec
    pub fn bind(config: Config, router: Router) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;

        let pool = Arc::new(BufferPool::from_config(&config));
        let codec = Codec::new(&config, pool);

        Ok(Self {
            config,
            listener,
            codec,
            router: Arc::new(router),
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Start the server (blocking until shutdown is signalled)
    pub fn run(&self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr()?);

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    if let Err(e) = self.spawn_connection(stream, addr) {
                        tracing::warn!("Dropping connection from {}: {}", addr, e);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!("Server shutting down");
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream, addr: SocketAddr) -> Result<()> {
        let previous = self.active.fetch_add(1, Ordering::AcqRel);
        let slot = SlotGuard(Arc::clone(&self.active));
        if previous >= self.config.max_connections {
            return Err(WireError::Network(format!(
                "connection limit {} reached",
                self.config.max_connections
            )));
        }

        // Accepted sockets may inherit the listener's non-blocking mode.
        stream.set_nonblocking(false)?;

        let codec = self.codec.clone();
        let router = Arc::clone(&self.router);
        let (read_ms, write_ms) = (self.config.read_timeout_ms, self.config.write_timeout_ms);

        // On spawn failure the closure, and the guard with it, is dropped.
        thread::Builder::new()
            .name(format!("conn-{}", addr))
            .spawn(move || {
                let _slot = slot;
                let result = Connection::new(stream, codec, router).and_then(|mut conn| {
                    conn.set_timeouts(read_ms, write_ms)?;
                    conn.handle()
                });
                if let Err(e) = result {
                    tracing::warn!("Connection {} closed with error: {}", addr, e);
                }
            })
            .map_err(|e| WireError::Network(format!("failed to spawn worker: {}", e)))?;
        Ok(())
    }
}
