//! Protocol Module
//!
//! Defines the binary wire protocol spoken between clients and nodes.
//!
//! ## Frame Format
//!
//! ```text
//! offset 0    : Magic     (1)  0xE2 request / 0xE3 response
//! offset 1    : Op        (1)
//! offset 2-3  : DMapLen   (2)
//! offset 4-5  : KeyLen    (2)
//! offset 6    : ExtraLen  (1)
//! offset 7    : Status    (1)
//! offset 8-11 : BodyLen   (4)  ExtraLen + DMapLen + KeyLen + value length
//! offset 12.. : Extra | DMap | Key | Value
//! ```
//!
//! ### Extras
//! - put-with-ttl: TTL (i64)
//! - lock-with-timeout, lock-prev: TTL (i64)
//! - is-partition-empty, is-backup-partition-empty: partition ID (u64)
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: INTERNAL_SERVER_ERROR
//! - 0x02: KEY_NOT_FOUND
//! - 0x03: NO_SUCH_LOCK
//! - 0x04: PARTITION_NOT_EMPTY
//! - 0x05: BACKUP_PARTITION_NOT_EMPTY

mod opcode;
mod extra;
mod header;
mod message;
mod codec;

pub use opcode::{Magic, OpCode, StatusCode};
pub use extra::{Extra, ExtraKind};
pub use header::{Header, HEADER_SIZE, MAX_FIELDS_LEN};
pub use message::Message;
pub use codec::Codec;
