//! ZipList Module
//!
//! A packed append-only sequence of small strings and integers in one
//! contiguous byte buffer.
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────┬─────────────┬────────────┬─────────┬──────┐
//! │ zlbytes u32 │ zltail u32  │ zllen u16  │ entries │ 0xFF │
//! └─────────────┴─────────────┴────────────┴─────────┴──────┘
//! ```
//!
//! All multi-byte fields are big-endian; the in-memory bytes double as a
//! snapshot format. `zltail` holds the offset of the last entry (10, the
//! terminator, while empty), and each entry records the total size of its
//! predecessor, so the buffer is threaded tail-to-head.
//!
//! ## Supported operations
//! Append (`add_str`/`add_int`), indexed read, and value search. Deletion
//! and middle insertion would require cascading prev-len rewrites and are
//! not offered.

pub(crate) mod entry;

use crate::codec;
use crate::error::{Result, ZipKvError};
use crate::value::Value;
use entry::{
    decode_entry, int_encoding, int_size_by_encoding, prev_len_field_size, str_encoding_size,
    ZL_BIG_PREVLEN, ZL_END, ZL_INT_IMM_MAX, ZL_INT_IMM_MIN, ZL_STR_14B, ZL_STR_14B_MAX,
    ZL_STR_32B, ZL_STR_MASK,
};

const ZL_TAIL_OFFSET: usize = 4;
const ZL_LEN_OFFSET: usize = 8;

/// Header (10 bytes) plus terminator
const ZL_HEADER_SIZE: usize = 11;

/// zllen is 16 bits; adds past this fail rather than wrap
const ZL_MAX_LEN: usize = u16::MAX as usize;

/// An empty ziplist takes 11 bytes, so a single entry may occupy at most
/// `u32::MAX - 11` of the addressable total
const ZL_ENTRY_MAX_SIZE: usize = u32::MAX as usize - ZL_HEADER_SIZE;

/// What is being appended; resolved from the typed entry points
enum Elem<'a> {
    Str(&'a [u8]),
    Int(i64),
}

/// Packed append-only list of strings and integers
pub struct ZipList {
    buf: Vec<u8>,
}

impl ZipList {
    /// Create an empty ziplist (11 bytes: header + terminator)
    pub fn new() -> Self {
        let mut buf = vec![0u8; ZL_HEADER_SIZE];
        codec::write_u32(&mut buf, 0, ZL_HEADER_SIZE as u32);
        codec::write_u32(&mut buf, ZL_TAIL_OFFSET, (ZL_HEADER_SIZE - 1) as u32);
        codec::write_u16(&mut buf, ZL_LEN_OFFSET, 0);
        buf[ZL_HEADER_SIZE - 1] = ZL_END;
        ZipList { buf }
    }

    /// Number of entries (saturates at 65535)
    pub fn len(&self) -> usize {
        codec::read_u16(&self.buf, ZL_LEN_OFFSET) as usize
    }

    /// True if no entries are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes the ziplist occupies (the `zlbytes` header field)
    pub fn total_bytes(&self) -> usize {
        codec::read_u32(&self.buf, 0) as usize
    }

    /// Offset of the last entry, or of the terminator while empty
    pub fn tail_offset(&self) -> usize {
        codec::read_u32(&self.buf, ZL_TAIL_OFFSET) as usize
    }

    /// The raw buffer; bit-exact snapshot surface
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append string bytes at the tail
    pub fn add_str(&mut self, s: &[u8]) -> Result<()> {
        self.insert(Elem::Str(s))
    }

    /// Append an integer at the tail
    pub fn add_int(&mut self, n: i64) -> Result<()> {
        self.insert(Elem::Int(n))
    }

    /// Read the entry at `idx` (0-based from the head)
    ///
    /// The buffer is threaded tail-to-head, so this walks backward from
    /// `zltail` over `len - idx - 1` back-links.
    pub fn get(&self, idx: usize) -> Result<Value> {
        let l = self.len();
        if l == 0 {
            return Err(ZipKvError::Empty);
        }
        if idx >= l {
            return Err(ZipKvError::InvalidIdx);
        }

        let mut p = self.tail_offset();
        for _ in 0..(l - idx - 1) {
            let e = decode_entry(&self.buf, p);
            p -= e.prev_len;
        }
        let e = decode_entry(&self.buf, p);
        Ok(self.load_value(&e))
    }

    /// Head-relative index of the first entry holding string bytes equal to
    /// `target`, scanning tail-to-head
    pub fn find_str(&self, target: &[u8]) -> Option<usize> {
        let l = self.len();
        if l == 0 {
            return None;
        }
        let mut p = self.tail_offset();
        for i in 0..l {
            let e = decode_entry(&self.buf, p);
            if e.encoding < ZL_STR_MASK {
                let body = e.offset + e.header_size;
                if &self.buf[body..body + e.len] == target {
                    return Some(l - i - 1);
                }
            }
            p -= e.prev_len;
        }
        None
    }

    /// Head-relative index of the first integer entry decoding to `target`,
    /// scanning tail-to-head
    ///
    /// Matches immediates and wide encodings alike by decoded value.
    pub fn find_int(&self, target: i64) -> Option<usize> {
        let l = self.len();
        if l == 0 {
            return None;
        }
        let mut p = self.tail_offset();
        for i in 0..l {
            let e = decode_entry(&self.buf, p);
            if (ZL_INT_IMM_MIN..=ZL_INT_IMM_MAX).contains(&e.encoding) {
                if i64::from(e.encoding - ZL_INT_IMM_MIN) == target {
                    return Some(l - i - 1);
                }
            } else if e.encoding >= ZL_STR_MASK {
                let body = e.offset + e.header_size;
                if self.load_int(body, e.len) == target {
                    return Some(l - i - 1);
                }
            }
            p -= e.prev_len;
        }
        None
    }

    // -------------------------------------------------------------------------
    // Append path
    // -------------------------------------------------------------------------

    fn insert(&mut self, e: Elem<'_>) -> Result<()> {
        if self.len() == ZL_MAX_LEN {
            return Err(ZipKvError::ExceedLimit);
        }

        let cur_len = self.buf.len();
        // the new entry overwrites the old terminator
        let p = cur_len - 1;
        let tail = self.tail_offset();

        let prev_len = if self.buf[tail] != ZL_END {
            decode_entry(&self.buf, tail).total_size()
        } else {
            0
        };

        let (payload_len, encoding_size) = match e {
            Elem::Str(s) => (s.len(), str_encoding_size(s.len())),
            Elem::Int(n) => (int_size_by_encoding(int_encoding(n)), 1),
        };
        let prev_len_size = prev_len_field_size(prev_len);
        let req_len = prev_len_size + encoding_size + payload_len;

        if req_len > ZL_ENTRY_MAX_SIZE {
            return Err(ZipKvError::EntryExceedLimit);
        }
        if cur_len + req_len > u32::MAX as usize {
            return Err(ZipKvError::ExceedLimit);
        }

        // grow, re-terminate, and rewrite the header before filling the entry
        let new_len = cur_len + req_len;
        self.buf.resize(new_len, 0);
        self.buf[new_len - 1] = ZL_END;
        codec::write_u32(&mut self.buf, 0, new_len as u32);
        codec::write_u32(&mut self.buf, ZL_TAIL_OFFSET, p as u32);

        self.store_prev_len(p, prev_len);
        let body = p + prev_len_size;
        match e {
            Elem::Str(s) => {
                self.store_str_encoding(body, s.len());
                self.buf[body + encoding_size..body + encoding_size + s.len()]
                    .copy_from_slice(s);
            }
            Elem::Int(n) => {
                let enc = int_encoding(n);
                self.buf[body] = enc;
                self.store_int(body + 1, n, enc);
            }
        }

        let count = self.len() as u16;
        codec::write_u16(&mut self.buf, ZL_LEN_OFFSET, count + 1);
        Ok(())
    }

    fn store_prev_len(&mut self, p: usize, prev_len: usize) {
        if prev_len < ZL_BIG_PREVLEN as usize {
            self.buf[p] = prev_len as u8;
        } else {
            self.buf[p] = ZL_BIG_PREVLEN;
            codec::write_u32(&mut self.buf, p + 1, prev_len as u32);
        }
    }

    fn store_str_encoding(&mut self, p: usize, raw_len: usize) {
        if raw_len <= entry::ZL_STR_06B_MAX {
            self.buf[p] = raw_len as u8;
        } else if raw_len <= ZL_STR_14B_MAX {
            self.buf[p] = ZL_STR_14B | ((raw_len >> 8) as u8 & 0x3F);
            self.buf[p + 1] = raw_len as u8;
        } else {
            self.buf[p] = ZL_STR_32B;
            codec::write_u32(&mut self.buf, p + 1, raw_len as u32);
        }
    }

    fn store_int(&mut self, p: usize, n: i64, encoding: u8) {
        match encoding {
            entry::ZL_INT_8B => codec::write_i8(&mut self.buf, p, n as i8),
            entry::ZL_INT_16B => codec::write_i16(&mut self.buf, p, n as i16),
            entry::ZL_INT_32B => codec::write_i32(&mut self.buf, p, n as i32),
            entry::ZL_INT_64B => codec::write_i64(&mut self.buf, p, n),
            // immediate: the value lives in the encoding byte
            _ => {}
        }
    }

    // -------------------------------------------------------------------------
    // Decode path
    // -------------------------------------------------------------------------

    fn load_value(&self, e: &entry::EntryInfo) -> Value {
        let body = e.offset + e.header_size;
        if e.encoding < ZL_STR_MASK {
            Value::Str(self.buf[body..body + e.len].to_vec())
        } else if (ZL_INT_IMM_MIN..=ZL_INT_IMM_MAX).contains(&e.encoding) {
            Value::Int(i64::from(e.encoding - ZL_INT_IMM_MIN))
        } else {
            Value::Int(self.load_int(body, e.len))
        }
    }

    fn load_int(&self, p: usize, len: usize) -> i64 {
        match len {
            1 => i64::from(codec::read_i8(&self.buf, p)),
            2 => i64::from(codec::read_i16(&self.buf, p)),
            4 => i64::from(codec::read_i32(&self.buf, p)),
            8 => codec::read_i64(&self.buf, p),
            _ => 0,
        }
    }
}

impl Default for ZipList {
    fn default() -> Self {
        Self::new()
    }
}
