//! Configuration for cachewire
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, WireError};
use crate::protocol::MAX_FIELDS_LEN;

/// Main configuration for a codec and its server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Codec Configuration
    // -------------------------------------------------------------------------
    /// Largest value payload (in bytes) accepted on decode or produced on encode
    pub max_value_size: usize,

    // -------------------------------------------------------------------------
    // Buffer Pool Configuration
    // -------------------------------------------------------------------------
    /// Max idle scratch buffers kept for reuse
    pub pool_capacity: usize,

    /// Scratch buffers that grew past this size are freed instead of pooled
    pub pool_max_buffer_size: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_value_size: 1 << 20, // 1 MB
            pool_capacity: 64,
            pool_max_buffer_size: 2 << 20,
            listen_addr: "127.0.0.1:3320".to_string(),
            max_connections: 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the settings describe a usable codec.
    ///
    /// `max_value_size` is capped so that a maximal frame still has a
    /// BodyLen that fits in the 4-byte header field.
    pub fn validate(&self) -> Result<()> {
        if self.max_value_size == 0 {
            return Err(WireError::Config("max_value_size must be non-zero".to_string()));
        }
        let ceiling = u32::MAX as usize - MAX_FIELDS_LEN;
        if self.max_value_size > ceiling {
            return Err(WireError::Config(format!(
                "max_value_size {} exceeds protocol ceiling {}",
                self.max_value_size, ceiling
            )));
        }
        if self.pool_capacity == 0 {
            return Err(WireError::Config("pool_capacity must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the maximum accepted value size (in bytes)
    pub fn max_value_size(mut self, size: usize) -> Self {
        self.config.max_value_size = size;
        self
    }

    /// Set how many idle buffers the pool retains
    pub fn pool_capacity(mut self, count: usize) -> Self {
        self.config.pool_capacity = count;
        self
    }

    /// Set the largest buffer the pool will take back (in bytes)
    pub fn pool_max_buffer_size(mut self, size: usize) -> Self {
        self.config.pool_max_buffer_size = size;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
