//! Codec Tests
//!
//! Tests for the fixed-width big-endian reads and writes the packed
//! containers are built on.

use zipkv::codec;

// =============================================================================
// Byte Order Tests
// =============================================================================

#[test]
fn test_writes_are_big_endian() {
    let mut buf = [0u8; 8];

    codec::write_u32(&mut buf, 0, 0x12345678);
    assert_eq!(&buf[..4], &[0x12, 0x34, 0x56, 0x78]);

    codec::write_u16(&mut buf, 0, 0xABCD);
    assert_eq!(&buf[..2], &[0xAB, 0xCD]);

    codec::write_u64(&mut buf, 0, 0x0102030405060708);
    assert_eq!(&buf, &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
}

#[test]
fn test_reads_are_big_endian() {
    let buf = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];

    assert_eq!(codec::read_u8(&buf, 0), 0x12);
    assert_eq!(codec::read_u16(&buf, 0), 0x1234);
    assert_eq!(codec::read_u32(&buf, 0), 0x12345678);
    assert_eq!(codec::read_u64(&buf, 0), 0x123456789ABCDEF0);
}

// =============================================================================
// Offset Tests
// =============================================================================

#[test]
fn test_offset_addressing() {
    let mut buf = vec![0u8; 16];

    codec::write_u32(&mut buf, 3, 0xDEADBEEF);
    codec::write_u16(&mut buf, 9, 0x0102);

    assert_eq!(codec::read_u32(&buf, 3), 0xDEADBEEF);
    assert_eq!(codec::read_u16(&buf, 9), 0x0102);
    // neighbors stay untouched
    assert_eq!(buf[2], 0);
    assert_eq!(buf[7], 0);
    assert_eq!(buf[8], 0);
}

// =============================================================================
// Signed Round-trip Tests
// =============================================================================

#[test]
fn test_signed_round_trips() {
    let mut buf = vec![0u8; 8];

    for n in [i8::MIN, -1, 0, 1, i8::MAX] {
        codec::write_i8(&mut buf, 2, n);
        assert_eq!(codec::read_i8(&buf, 2), n);
    }
    for n in [i16::MIN, -1, 0, 1, i16::MAX] {
        codec::write_i16(&mut buf, 2, n);
        assert_eq!(codec::read_i16(&buf, 2), n);
    }
    for n in [i32::MIN, -1, 0, 1, i32::MAX] {
        codec::write_i32(&mut buf, 2, n);
        assert_eq!(codec::read_i32(&buf, 2), n);
    }
    for n in [i64::MIN, -1, 0, 1, i64::MAX] {
        codec::write_i64(&mut buf, 0, n);
        assert_eq!(codec::read_i64(&buf, 0), n);
    }
}

#[test]
fn test_negative_one_is_all_ones() {
    let mut buf = vec![0u8; 8];
    codec::write_i64(&mut buf, 0, -1);
    assert_eq!(buf, vec![0xFF; 8]);
}
