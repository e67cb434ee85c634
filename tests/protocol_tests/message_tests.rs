//! Message Tests
//!
//! Tests verify:
//! - Opcode, status and magic wire values
//! - The opcode → extra layout table
//! - Header derivation from message contents
//! - Response builders

use std::fmt;

use cachewire::protocol::{Extra, ExtraKind, Header, Magic, Message, OpCode, StatusCode};
use cachewire::WireError;

// =============================================================================
// Enumeration Tests
// =============================================================================

#[test]
fn test_opcode_wire_values() {
    for (index, op) in OpCode::ALL.iter().enumerate() {
        assert_eq!(*op as u8 as usize, index, "op {}", op);
        assert_eq!(OpCode::try_from(index as u8).unwrap(), *op);
    }

    assert_eq!(OpCode::Put as u8, 0x00);
    assert_eq!(OpCode::Get as u8, 0x02);
    assert_eq!(OpCode::Delete as u8, 0x03);
    assert_eq!(OpCode::IsBackupPartitionEmpty as u8, 0x17);
}

#[test]
fn test_opcode_out_of_range() {
    assert!(matches!(OpCode::try_from(24u8), Err(WireError::UnknownOpCode(24))));
    assert!(matches!(OpCode::try_from(0xFFu8), Err(WireError::UnknownOpCode(0xFF))));
}

#[test]
fn test_status_wire_values() {
    let expected: [(u8, StatusCode); 6] = [
        (0x00, StatusCode::Ok),
        (0x01, StatusCode::InternalServerError),
        (0x02, StatusCode::KeyNotFound),
        (0x03, StatusCode::NoSuchLock),
        (0x04, StatusCode::PartitionNotEmpty),
        (0x05, StatusCode::BackupPartitionNotEmpty),
    ];
    for (byte, status) in expected {
        assert_eq!(status as u8, byte);
        assert_eq!(StatusCode::try_from(byte).unwrap(), status);
    }
    assert!(StatusCode::try_from(0x06u8).is_err());
}

#[test]
fn test_magic_values() {
    assert_eq!(Magic::Request as u8, 0xE2);
    assert_eq!(Magic::Response as u8, 0xE3);
    assert_eq!(Magic::try_from(0xE2u8).unwrap(), Magic::Request);
    assert_eq!(Magic::try_from(0xE3u8).unwrap(), Magic::Response);

    let err = Magic::try_from(0x80u8).unwrap_err();
    assert!(err.to_string().contains("invalid message"));
}

#[test]
fn test_opcode_display() {
    assert_eq!(OpCode::PutWithTtl.to_string(), "put-with-ttl");
    assert_eq!(OpCode::IsPartitionEmpty.to_string(), "is-partition-empty");
    assert_eq!(StatusCode::KeyNotFound.to_string(), "KEY_NOT_FOUND");
}

// =============================================================================
// Extra Table Tests
// =============================================================================

#[test]
fn test_extra_kind_table() {
    let with_extra: Vec<(OpCode, ExtraKind)> = OpCode::ALL
        .iter()
        .filter_map(|op| op.extra_kind().map(|kind| (*op, kind)))
        .collect();

    assert_eq!(
        with_extra,
        vec![
            (OpCode::PutWithTtl, ExtraKind::PutWithTtl),
            (OpCode::LockWithTimeout, ExtraKind::LockWithTimeout),
            (OpCode::LockPrev, ExtraKind::LockWithTimeout),
            (OpCode::IsPartitionEmpty, ExtraKind::PartitionQuery),
            (OpCode::IsBackupPartitionEmpty, ExtraKind::PartitionQuery),
        ]
    );
}

#[test]
fn test_extra_encode_layout() {
    let mut buf = Vec::new();
    Extra::PartitionQuery { partition_id: 0x0102030405060708 }.encode(&mut buf);
    assert_eq!(buf, vec![1, 2, 3, 4, 5, 6, 7, 8]);

    let mut buf = Vec::new();
    Extra::LockWithTimeout { ttl: -1 }.encode(&mut buf);
    assert_eq!(buf, vec![0xFF; 8]);
}

#[test]
fn test_extra_decode_size_mismatch() {
    let err = ExtraKind::PutWithTtl.decode(&[0u8; 9]).unwrap_err();
    assert!(matches!(err, WireError::MalformedExtra(_)));

    let err = ExtraKind::PartitionQuery.decode(&[]).unwrap_err();
    assert!(matches!(err, WireError::MalformedExtra(_)));
}

#[test]
fn test_extra_decode() {
    let extra = ExtraKind::PutWithTtl.decode(&5000i64.to_be_bytes()).unwrap();
    assert_eq!(extra, Extra::PutWithTtl { ttl: 5000 });
    assert_eq!(extra.kind(), ExtraKind::PutWithTtl);
    assert_eq!(extra.encoded_len(), 8);
}

// =============================================================================
// Header Derivation Tests
// =============================================================================

#[test]
fn test_header_from_message() {
    let msg = Message::request(OpCode::PutWithTtl, "cache", "a")
        .with_extra(Extra::PutWithTtl { ttl: 5000 })
        .with_value("v");

    let header = msg.header().unwrap();
    assert_eq!(
        header,
        Header {
            magic: Magic::Request,
            op: OpCode::PutWithTtl,
            dmap_len: 5,
            key_len: 1,
            extra_len: 8,
            status: StatusCode::Ok,
            body_len: 15,
        }
    );
    assert_eq!(header.value_len().unwrap(), 1);
}

#[test]
fn test_header_encode_decode() {
    let header = Header {
        magic: Magic::Response,
        op: OpCode::MoveDMap,
        dmap_len: 0x0102,
        key_len: 0x0304,
        extra_len: 0,
        status: StatusCode::NoSuchLock,
        body_len: 0x0A0B0C0D,
    };

    let mut buf = Vec::new();
    header.encode(&mut buf);
    assert_eq!(
        buf,
        vec![0xE3, 0x14, 0x01, 0x02, 0x03, 0x04, 0x00, 0x03, 0x0A, 0x0B, 0x0C, 0x0D]
    );
    assert_eq!(Header::decode(&buf).unwrap(), header);
}

#[test]
fn test_header_decode_incomplete() {
    let err = Header::decode(&[0xE2, 0x00, 0x00]).unwrap_err();
    assert!(err.to_string().contains("incomplete header"));
}

#[test]
fn test_header_status_only_checked_on_responses() {
    let request = [0xE2, 0x02, 0x00, 0x01, 0x00, 0x01, 0x00, 0xFF, 0x00, 0x00, 0x00, 0x02];
    assert_eq!(Header::decode(&request).unwrap().status, StatusCode::Ok);

    let mut response = request;
    response[0] = 0xE3;
    assert!(matches!(
        Header::decode(&response),
        Err(WireError::UnknownStatus(0xFF))
    ));
}

#[test]
fn test_header_rejects_long_dmap() {
    let msg = Message::request(OpCode::Get, "d".repeat(u16::MAX as usize + 1), "k");
    let err = msg.header().unwrap_err();
    assert!(matches!(err, WireError::FieldTooLong { field: "dmap", .. }));
}

#[test]
fn test_header_accepts_max_length_fields() {
    let msg = Message::request(
        OpCode::Get,
        "d".repeat(u16::MAX as usize),
        vec![b'k'; u16::MAX as usize],
    );
    let header = msg.header().unwrap();
    assert_eq!(header.dmap_len, u16::MAX);
    assert_eq!(header.key_len, u16::MAX);
    assert_eq!(header.body_len, 2 * u16::MAX as u32);
}

#[test]
fn test_header_rejects_extra_on_response() {
    let mut resp = Message::request(OpCode::PutWithTtl, "m", "k").success_response();
    resp.extra = Some(Extra::PutWithTtl { ttl: 1 });

    assert!(matches!(resp.header(), Err(WireError::MalformedExtra(_))));
}

#[test]
fn test_header_rejects_wrong_extra_variant() {
    let msg = Message::request(OpCode::LockWithTimeout, "m", "k")
        .with_extra(Extra::PutWithTtl { ttl: 1 });

    assert!(matches!(msg.header(), Err(WireError::MalformedExtra(_))));
}

// =============================================================================
// Response Builder Tests
// =============================================================================

#[test]
fn test_error_response_from_str() {
    let req = Message::request(OpCode::Delete, "users", "42");
    let resp = req.error_response(StatusCode::KeyNotFound, "not found");

    assert_eq!(resp.magic, Magic::Response);
    assert_eq!(resp.op, OpCode::Delete);
    assert_eq!(resp.status, StatusCode::KeyNotFound);
    assert_eq!(&resp.value[..], b"not found");
    assert!(resp.dmap.is_empty());
    assert!(resp.key.is_empty());
    assert_eq!(resp.extra, None);
}

#[derive(Debug)]
struct LockTimeout {
    waited_ms: u64,
}

impl fmt::Display for LockTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lock not acquired after {}ms", self.waited_ms)
    }
}

impl std::error::Error for LockTimeout {}

#[test]
fn test_error_response_from_error() {
    let req = Message::request(OpCode::LockWithTimeout, "locks", "k")
        .with_extra(Extra::LockWithTimeout { ttl: 100 });

    let resp = req.error_response(StatusCode::NoSuchLock, LockTimeout { waited_ms: 100 });
    assert_eq!(&resp.value[..], b"lock not acquired after 100ms");

    let wire_err = WireError::ValueTooBig { size: 2, max: 1 };
    let resp = req.error_response(StatusCode::InternalServerError, &wire_err);
    assert_eq!(&resp.value[..], wire_err.to_string().as_bytes());
}

#[test]
fn test_success_response() {
    let req = Message::request(OpCode::Put, "users", "42").with_value("payload");
    let resp = req.success_response();

    assert_eq!(resp.magic, Magic::Response);
    assert_eq!(resp.op, OpCode::Put);
    assert_eq!(resp.status, StatusCode::Ok);
    assert!(resp.value.is_empty());
    assert!(resp.dmap.is_empty());
    assert!(resp.key.is_empty());
    assert!(!resp.is_request());
}
