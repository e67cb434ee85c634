//! Opcode Router
//!
//! Maps each opcode to the handler that serves it.

use std::collections::HashMap;

use crate::protocol::{Message, OpCode, StatusCode};

/// A request handler: takes a decoded request, returns the response to send
pub type Operation = Box<dyn Fn(&Message) -> Message + Send + Sync>;

/// Opcode dispatch table
///
/// Built once before serving and shared read-only between connections.
#[derive(Default)]
pub struct Router {
    handlers: HashMap<OpCode, Operation>,
}

impl Router {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `op`, replacing any previous one
    pub fn register<F>(&mut self, op: OpCode, handler: F) -> &mut Self
    where
        F: Fn(&Message) -> Message + Send + Sync + 'static,
    {
        self.handlers.insert(op, Box::new(handler));
        self
    }

    /// Whether a handler is registered for `op`
    pub fn handles(&self, op: OpCode) -> bool {
        self.handlers.contains_key(&op)
    }

    /// Run the handler for `request.op`.
    ///
    /// Unknown opcodes and stray response frames get an
    /// INTERNAL_SERVER_ERROR response instead of a handler call.
    pub fn dispatch(&self, request: &Message) -> Message {
        if !request.is_request() {
            return request.error_response(
                StatusCode::InternalServerError,
                format!("expected a request frame for {}", request.op),
            );
        }

        match self.handlers.get(&request.op) {
            Some(handler) => handler(request),
            None => request.error_response(
                StatusCode::InternalServerError,
                format!("unknown operation: {}", request.op),
            ),
        }
    }
}
