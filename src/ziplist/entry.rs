//! Entry encoding
//!
//! Byte-level layout of a single ziplist entry:
//!
//! ```text
//! ┌──────────────────┬────────────────┬─────────────┐
//! │ prev-len (1|5)   │ encoding (1-5) │   payload   │
//! └──────────────────┴────────────────┴─────────────┘
//! ```
//!
//! The encoding byte's top two bits split strings from integers. Strings
//! carry their length in 6, 14, or 32 bits; integers carry a width tag, with
//! the values 0..=13 folded into the encoding byte itself.

use crate::codec;

/// Terminator byte closing every ziplist
pub(crate) const ZL_END: u8 = 0xFF;

/// First byte of a 5-byte prev-len field
pub(crate) const ZL_BIG_PREVLEN: u8 = 0xFE;

/// Anything below this in the encoding byte is a string
pub(crate) const ZL_STR_MASK: u8 = 0xC0;
pub(crate) const ZL_STR_06B: u8 = 0 << 6;
pub(crate) const ZL_STR_14B: u8 = 1 << 6;
pub(crate) const ZL_STR_32B: u8 = 2 << 6;

pub(crate) const ZL_INT_16B: u8 = 0xC0;
pub(crate) const ZL_INT_32B: u8 = 0xD0;
pub(crate) const ZL_INT_64B: u8 = 0xE0;
pub(crate) const ZL_INT_8B: u8 = 0xFE;

/// Immediate integers: 0xF0..=0xFD encode the values 0..=13 with no payload
pub(crate) const ZL_INT_IMM_MIN: u8 = 0xF0;
pub(crate) const ZL_INT_IMM_MAX: u8 = 0xFD;

pub(crate) const ZL_STR_06B_MAX: usize = (1 << 6) - 1;
pub(crate) const ZL_STR_14B_MAX: usize = (1 << 14) - 1;

/// Decoded view of one entry
///
/// All sizes are in bytes; `len` is the payload length (0 for immediates).
pub(crate) struct EntryInfo {
    pub prev_len_size: usize,
    pub prev_len: usize,
    pub encoding: u8,
    pub len: usize,
    pub header_size: usize,
    pub offset: usize,
}

impl EntryInfo {
    /// Total bytes this entry occupies in the buffer
    pub fn total_size(&self) -> usize {
        self.header_size + self.len
    }
}

/// Decode the entry starting at offset `p`
pub(crate) fn decode_entry(buf: &[u8], p: usize) -> EntryInfo {
    let (prev_len_size, prev_len) = decode_prev_len(buf, p);
    let encoding = decode_encoding(buf, p + prev_len_size);
    let (len_size, len) = decode_len(buf, p + prev_len_size, encoding);
    EntryInfo {
        prev_len_size,
        prev_len,
        encoding,
        len,
        header_size: prev_len_size + len_size,
        offset: p,
    }
}

fn decode_prev_len(buf: &[u8], p: usize) -> (usize, usize) {
    if buf[p] < ZL_BIG_PREVLEN {
        (1, buf[p] as usize)
    } else {
        (5, codec::read_u32(buf, p + 1) as usize)
    }
}

fn decode_encoding(buf: &[u8], p: usize) -> u8 {
    let e = buf[p];
    if e < ZL_STR_MASK {
        e & ZL_STR_MASK
    } else {
        e
    }
}

fn decode_len(buf: &[u8], p: usize, encoding: u8) -> (usize, usize) {
    if encoding < ZL_STR_MASK {
        match encoding {
            ZL_STR_06B => (1, buf[p] as usize),
            ZL_STR_14B => (2, (((buf[p] & 0x3F) as usize) << 8) | buf[p + 1] as usize),
            ZL_STR_32B => (5, codec::read_u32(buf, p + 1) as usize),
            _ => panic!("corrupt ziplist: unknown string encoding {:#04x}", encoding),
        }
    } else {
        (1, int_size_by_encoding(encoding))
    }
}

/// Encoding byte for an integer value
pub(crate) fn int_encoding(n: i64) -> u8 {
    if (0..=i64::from(ZL_INT_IMM_MAX - ZL_INT_IMM_MIN)).contains(&n) {
        ZL_INT_IMM_MIN + n as u8
    } else if n >= i64::from(i8::MIN) && n <= i64::from(i8::MAX) {
        ZL_INT_8B
    } else if n >= i64::from(i16::MIN) && n <= i64::from(i16::MAX) {
        ZL_INT_16B
    } else if n >= i64::from(i32::MIN) && n <= i64::from(i32::MAX) {
        ZL_INT_32B
    } else {
        ZL_INT_64B
    }
}

/// Payload bytes for an integer encoding byte (0 for immediates)
pub(crate) fn int_size_by_encoding(encoding: u8) -> usize {
    match encoding {
        ZL_INT_8B => 1,
        ZL_INT_16B => 2,
        ZL_INT_32B => 4,
        ZL_INT_64B => 8,
        _ => 0,
    }
}

/// Bytes the encoding header takes for a string of `raw_len` bytes
pub(crate) fn str_encoding_size(raw_len: usize) -> usize {
    if raw_len <= ZL_STR_06B_MAX {
        1
    } else if raw_len <= ZL_STR_14B_MAX {
        2
    } else {
        5
    }
}

/// Bytes the prev-len field takes to encode `prev_len`
pub(crate) fn prev_len_field_size(prev_len: usize) -> usize {
    if prev_len < ZL_BIG_PREVLEN as usize {
        1
    } else {
        5
    }
}
