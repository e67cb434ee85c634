//! cachewire Server Binary
//!
//! Serves a small in-memory DMap store over the binary protocol.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use cachewire::network::{Router, Server};
use cachewire::{Config, Extra, Message, OpCode, StatusCode};
use clap::Parser;
use parking_lot::RwLock;
use tracing_subscriber::{fmt, EnvFilter};

/// cachewire Server
#[derive(Parser, Debug)]
#[command(name = "cachewire-server")]
#[command(about = "Distributed key-value cache node speaking the cachewire protocol")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:3320")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Maximum value size in KB
    #[arg(short = 'v', long, default_value = "1024")]
    max_value_kb: usize,

    /// Connection read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,
}

/// A stored value and its optional expiry
struct Entry {
    value: Bytes,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

/// DMap name → key → entry
#[derive(Default)]
struct Store {
    dmaps: RwLock<HashMap<String, HashMap<Bytes, Entry>>>,
}

impl Store {
    fn put(&self, req: &Message, expires_at: Option<Instant>) -> Message {
        let mut dmaps = self.dmaps.write();
        dmaps.entry(req.dmap.clone()).or_default().insert(
            req.key.clone(),
            Entry {
                value: req.value.clone(),
                expires_at,
            },
        );
        req.success_response()
    }

    fn put_with_ttl(&self, req: &Message) -> Message {
        match req.extra {
            Some(Extra::PutWithTtl { ttl }) if ttl > 0 => {
                let expires_at = Instant::now() + Duration::from_millis(ttl as u64);
                self.put(req, Some(expires_at))
            }
            Some(Extra::PutWithTtl { ttl }) => req.error_response(
                StatusCode::InternalServerError,
                format!("ttl must be positive, got {}", ttl),
            ),
            _ => req.error_response(StatusCode::InternalServerError, "missing ttl extra"),
        }
    }

    fn get(&self, req: &Message) -> Message {
        let found = {
            let dmaps = self.dmaps.read();
            dmaps
                .get(&req.dmap)
                .and_then(|entries| entries.get(&req.key))
                .map(|entry| (entry.is_live(), entry.value.clone()))
        };

        match found {
            Some((true, value)) => {
                let mut res = req.success_response();
                res.value = value;
                res
            }
            Some((false, _)) => {
                self.evict_expired(&req.dmap, &req.key);
                req.error_response(StatusCode::KeyNotFound, "key not found")
            }
            None => req.error_response(StatusCode::KeyNotFound, "key not found"),
        }
    }

    /// Drop an expired entry; a concurrent put may have replaced it since
    fn evict_expired(&self, dmap: &str, key: &Bytes) {
        let mut dmaps = self.dmaps.write();
        if let Some(entries) = dmaps.get_mut(dmap) {
            if entries.get(key).map_or(false, |entry| !entry.is_live()) {
                entries.remove(key);
                tracing::trace!(dmap, "Evicted expired entry");
            }
            if entries.is_empty() {
                dmaps.remove(dmap);
            }
        }
    }

    fn delete(&self, req: &Message) -> Message {
        let mut dmaps = self.dmaps.write();
        let removed = dmaps
            .get_mut(&req.dmap)
            .and_then(|entries| entries.remove(&req.key))
            .filter(|entry| entry.is_live());

        match removed {
            Some(_) => req.success_response(),
            None => req.error_response(StatusCode::KeyNotFound, "key not found"),
        }
    }

    fn destroy(&self, req: &Message) -> Message {
        self.dmaps.write().remove(&req.dmap);
        req.success_response()
    }
}

fn build_router(store: Arc<Store>) -> Router {
    let mut router = Router::new();

    let s = Arc::clone(&store);
    router.register(OpCode::Put, move |req| s.put(req, None));
    let s = Arc::clone(&store);
    router.register(OpCode::PutWithTtl, move |req| s.put_with_ttl(req));
    let s = Arc::clone(&store);
    router.register(OpCode::Get, move |req| s.get(req));
    let s = Arc::clone(&store);
    router.register(OpCode::Delete, move |req| s.delete(req));
    let s = Arc::clone(&store);
    router.register(OpCode::Destroy, move |req| s.destroy(req));

    router
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cachewire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("cachewire Server v{}", cachewire::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .max_value_size(args.max_value_kb * 1024)
        .read_timeout_ms(args.read_timeout_ms)
        .build();

    let router = build_router(Arc::new(Store::default()));

    let server = match Server::bind(config, router) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
