//! Network Module
//!
//! TCP plumbing that drives the codec.
//!
//! ## Architecture
//! - Single acceptor thread, non-blocking accept poll
//! - One thread per connection, bounded by `max_connections`
//! - Requests routed through an opcode `Router`

mod router;
mod connection;
mod server;
mod client;

pub use router::{Operation, Router};
pub use connection::Connection;
pub use server::{Server, ShutdownHandle};
pub use client::Client;
