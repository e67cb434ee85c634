//! Opcode-specific extras
//!
//! Fixed-size, big-endian records that travel between the header and the
//! DMap name. Which record an opcode uses is decided by
//! [`OpCode::extra_kind`](super::OpCode::extra_kind).

use bytes::{Buf, BufMut};

use crate::error::{Result, WireError};

/// Layout selector for an extra record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtraKind {
    PutWithTtl,
    LockWithTimeout,
    PartitionQuery,
}

impl ExtraKind {
    /// Encoded size in bytes
    pub fn encoded_len(self) -> usize {
        match self {
            ExtraKind::PutWithTtl | ExtraKind::LockWithTimeout => 8, // i64
            ExtraKind::PartitionQuery => 8,                          // u64
        }
    }

    /// Decode `raw` using this layout. `raw` must be exactly `encoded_len` bytes.
    pub fn decode(self, mut raw: &[u8]) -> Result<Extra> {
        if raw.len() != self.encoded_len() {
            return Err(WireError::MalformedExtra(format!(
                "{:?} extra needs {} bytes, got {}",
                self,
                self.encoded_len(),
                raw.len()
            )));
        }

        let extra = match self {
            ExtraKind::PutWithTtl => Extra::PutWithTtl { ttl: raw.get_i64() },
            ExtraKind::LockWithTimeout => Extra::LockWithTimeout { ttl: raw.get_i64() },
            ExtraKind::PartitionQuery => Extra::PartitionQuery {
                partition_id: raw.get_u64(),
            },
        };
        Ok(extra)
    }
}

/// Extra metadata carried by a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extra {
    /// Expiry for put-with-ttl (milliseconds)
    PutWithTtl { ttl: i64 },

    /// Lock lease for lock-with-timeout and lock-prev (milliseconds)
    LockWithTimeout { ttl: i64 },

    /// Partition targeted by is-partition-empty / is-backup-partition-empty
    PartitionQuery { partition_id: u64 },
}

impl Extra {
    /// The layout this record is encoded with
    pub fn kind(&self) -> ExtraKind {
        match self {
            Extra::PutWithTtl { .. } => ExtraKind::PutWithTtl,
            Extra::LockWithTimeout { .. } => ExtraKind::LockWithTimeout,
            Extra::PartitionQuery { .. } => ExtraKind::PartitionQuery,
        }
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        self.kind().encoded_len()
    }

    /// Append the big-endian encoding to `buf`
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        match *self {
            Extra::PutWithTtl { ttl } | Extra::LockWithTimeout { ttl } => buf.put_i64(ttl),
            Extra::PartitionQuery { partition_id } => buf.put_u64(partition_id),
        }
    }
}
