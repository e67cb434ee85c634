//! Opcode, status and magic definitions
//!
//! Numeric values are wire-visible and must never be reordered.

use std::fmt;

use crate::error::WireError;
use super::extra::ExtraKind;

/// Frame direction marker, first byte of every header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Magic {
    Request = 0xE2,
    Response = 0xE3,
}

impl TryFrom<u8> for Magic {
    type Error = WireError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0xE2 => Ok(Magic::Request),
            0xE3 => Ok(Magic::Response),
            _ => Err(WireError::InvalidMessage(format!(
                "unknown magic code 0x{:02x}",
                byte
            ))),
        }
    }
}

/// Operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum OpCode {
    Put = 0x00,
    PutWithTtl = 0x01,
    Get = 0x02,
    Delete = 0x03,
    Destroy = 0x04,
    LockWithTimeout = 0x05,
    Unlock = 0x06,
    Incr = 0x07,
    Decr = 0x08,
    GetPut = 0x09,
    UpdateRouting = 0x0A,
    PutBackup = 0x0B,
    DeletePrev = 0x0C,
    GetPrev = 0x0D,
    GetBackup = 0x0E,
    FindLock = 0x0F,
    LockPrev = 0x10,
    UnlockPrev = 0x11,
    DeleteBackup = 0x12,
    DestroyDMap = 0x13,
    MoveDMap = 0x14,
    BackupMoveDMap = 0x15,
    IsPartitionEmpty = 0x16,
    IsBackupPartitionEmpty = 0x17,
}

impl OpCode {
    /// Every opcode, indexed by its wire value
    pub const ALL: [OpCode; 24] = [
        OpCode::Put,
        OpCode::PutWithTtl,
        OpCode::Get,
        OpCode::Delete,
        OpCode::Destroy,
        OpCode::LockWithTimeout,
        OpCode::Unlock,
        OpCode::Incr,
        OpCode::Decr,
        OpCode::GetPut,
        OpCode::UpdateRouting,
        OpCode::PutBackup,
        OpCode::DeletePrev,
        OpCode::GetPrev,
        OpCode::GetBackup,
        OpCode::FindLock,
        OpCode::LockPrev,
        OpCode::UnlockPrev,
        OpCode::DeleteBackup,
        OpCode::DestroyDMap,
        OpCode::MoveDMap,
        OpCode::BackupMoveDMap,
        OpCode::IsPartitionEmpty,
        OpCode::IsBackupPartitionEmpty,
    ];

    /// The extra variant a request with this opcode carries.
    ///
    /// This table is the only place an opcode is tied to its extra layout;
    /// both the encoder and the decoder go through it.
    pub fn extra_kind(self) -> Option<ExtraKind> {
        match self {
            OpCode::PutWithTtl => Some(ExtraKind::PutWithTtl),
            OpCode::LockWithTimeout | OpCode::LockPrev => Some(ExtraKind::LockWithTimeout),
            OpCode::IsPartitionEmpty | OpCode::IsBackupPartitionEmpty => {
                Some(ExtraKind::PartitionQuery)
            }
            _ => None,
        }
    }

    /// Human readable opcode name
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Put => "put",
            OpCode::PutWithTtl => "put-with-ttl",
            OpCode::Get => "get",
            OpCode::Delete => "delete",
            OpCode::Destroy => "destroy",
            OpCode::LockWithTimeout => "lock-with-timeout",
            OpCode::Unlock => "unlock",
            OpCode::Incr => "incr",
            OpCode::Decr => "decr",
            OpCode::GetPut => "get-put",
            OpCode::UpdateRouting => "update-routing",
            OpCode::PutBackup => "put-backup",
            OpCode::DeletePrev => "delete-prev",
            OpCode::GetPrev => "get-prev",
            OpCode::GetBackup => "get-backup",
            OpCode::FindLock => "find-lock",
            OpCode::LockPrev => "lock-prev",
            OpCode::UnlockPrev => "unlock-prev",
            OpCode::DeleteBackup => "delete-backup",
            OpCode::DestroyDMap => "destroy-dmap",
            OpCode::MoveDMap => "move-dmap",
            OpCode::BackupMoveDMap => "backup-move-dmap",
            OpCode::IsPartitionEmpty => "is-partition-empty",
            OpCode::IsBackupPartitionEmpty => "is-backup-partition-empty",
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = WireError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        OpCode::ALL
            .get(byte as usize)
            .copied()
            .ok_or(WireError::UnknownOpCode(byte))
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusCode {
    Ok = 0x00,
    InternalServerError = 0x01,
    KeyNotFound = 0x02,
    NoSuchLock = 0x03,
    PartitionNotEmpty = 0x04,
    BackupPartitionNotEmpty = 0x05,
}

impl TryFrom<u8> for StatusCode {
    type Error = WireError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x00 => Ok(StatusCode::Ok),
            0x01 => Ok(StatusCode::InternalServerError),
            0x02 => Ok(StatusCode::KeyNotFound),
            0x03 => Ok(StatusCode::NoSuchLock),
            0x04 => Ok(StatusCode::PartitionNotEmpty),
            0x05 => Ok(StatusCode::BackupPartitionNotEmpty),
            _ => Err(WireError::UnknownStatus(byte)),
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatusCode::Ok => "OK",
            StatusCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            StatusCode::KeyNotFound => "KEY_NOT_FOUND",
            StatusCode::NoSuchLock => "NO_SUCH_LOCK",
            StatusCode::PartitionNotEmpty => "PARTITION_NOT_EMPTY",
            StatusCode::BackupPartitionNotEmpty => "BACKUP_PARTITION_NOT_EMPTY",
        };
        f.write_str(name)
    }
}
