//! IntSet Module
//!
//! Sorted packed set of integers with an auto-widening element encoding.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────┬─────────┬──────────────────────────────┐
//! │ encoding u8  │ len u32 │ contents: len * encoding B   │
//! └──────────────┴─────────┴──────────────────────────────┘
//! ```
//!
//! Elements are stored strictly ascending as big-endian two's-complement at
//! the current width (2, 4, or 8 bytes). The width is the smallest that fits
//! every element and only ever grows: inserting a value outside the current
//! range rewrites the whole buffer at the wider width.

use crate::codec;
use crate::error::{Result, ZipKvError};

const ENC_INT16: u8 = 2;
const ENC_INT32: u8 = 4;
const ENC_INT64: u8 = 8;

/// Sorted packed integer set
pub struct IntSet {
    encoding: u8,
    len: u32,
    contents: Vec<u8>,
}

impl IntSet {
    /// Create an empty set at the narrowest width
    pub fn new() -> Self {
        IntSet {
            encoding: ENC_INT16,
            len: 0,
            contents: Vec::new(),
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True if no elements are stored
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current element width in bytes (2, 4, or 8)
    pub fn encoding(&self) -> u8 {
        self.encoding
    }

    /// Binary-search for `n`
    ///
    /// Returns `(idx, true)` when present; otherwise `(idx, false)` where
    /// `idx` is the position `n` would be inserted at.
    pub fn find(&self, n: i64) -> (usize, bool) {
        let length = self.len as isize;
        if length == 0 {
            return (0, false);
        }

        if n < self.value_at(0) {
            return (0, false);
        }
        if n > self.value_at(length as usize - 1) {
            return (length as usize, false);
        }

        let (mut l, mut r) = (0isize, length - 1);
        while l < r {
            let m = l + (r - l) / 2;
            let mm = self.value_at(m as usize);
            if mm == n {
                return (m as usize, true);
            } else if mm < n {
                l = m + 1;
            } else {
                r = m - 1;
            }
        }

        let ll = self.value_at(l as usize);
        if ll == n {
            (l as usize, true)
        } else if ll > n {
            (l as usize, false)
        } else {
            (l as usize + 1, false)
        }
    }

    /// Insert `n`, keeping the set sorted and minimally encoded
    pub fn add(&mut self, n: i64) -> Result<()> {
        if self.len == i32::MAX as u32 {
            return Err(ZipKvError::ExceedLimit);
        }

        let enc = value_encoding(n);
        if enc > self.encoding {
            // a value needing a wider slot cannot already be present
            self.upgrade_and_add(n);
            return Ok(());
        }

        let (idx, exists) = self.find(n);
        if exists {
            return Err(ZipKvError::DuplicateInput);
        }

        self.resize(self.len as usize + 1);
        self.move_tail(idx);
        self.set_at(n, idx);
        self.len += 1;
        Ok(())
    }

    /// Read the element at `idx` under the current encoding
    pub fn get(&self, idx: usize) -> Result<i64> {
        if self.len == 0 {
            return Err(ZipKvError::Empty);
        }
        if idx >= self.len as usize {
            return Err(ZipKvError::InvalidIdx);
        }
        Ok(self.value_at(idx))
    }

    // -------------------------------------------------------------------------
    // Width upgrade
    // -------------------------------------------------------------------------

    /// Widen the encoding to fit `n`, then insert it
    ///
    /// Existing elements are rewritten back-to-front so narrower slots are
    /// never clobbered. `n` is either the new minimum or the new maximum, so
    /// the vacant slot sits at index 0 or at the old length.
    fn upgrade_and_add(&mut self, n: i64) {
        let cur_enc = self.encoding;
        let new_enc = value_encoding(n);
        let length = self.len as usize;
        let prepend = if n < 0 { 1 } else { 0 };

        tracing::debug!("intset upgrade: {}-byte to {}-byte encoding", cur_enc, new_enc);

        self.encoding = new_enc;
        self.resize(length + 1);

        for i in (0..length).rev() {
            let v = self.value_at_enc(i, cur_enc);
            self.set_at(v, i + prepend);
        }

        if prepend == 1 {
            self.set_at(n, 0);
        } else {
            self.set_at(n, length);
        }
        self.len += 1;
    }

    /// Grow the buffer to hold `length` elements at the current encoding
    fn resize(&mut self, length: usize) {
        self.contents.resize(length * self.encoding as usize, 0);
    }

    /// Shift elements at `idx..len` right by one slot
    fn move_tail(&mut self, idx: usize) {
        let enc = self.encoding as usize;
        let begin = idx * enc;
        let end = self.len as usize * enc;
        self.contents.copy_within(begin..end, begin + enc);
    }

    fn set_at(&mut self, n: i64, idx: usize) {
        let offset = idx * self.encoding as usize;
        match self.encoding {
            ENC_INT16 => codec::write_i16(&mut self.contents, offset, n as i16),
            ENC_INT32 => codec::write_i32(&mut self.contents, offset, n as i32),
            _ => codec::write_i64(&mut self.contents, offset, n),
        }
    }

    fn value_at(&self, idx: usize) -> i64 {
        self.value_at_enc(idx, self.encoding)
    }

    fn value_at_enc(&self, idx: usize, enc: u8) -> i64 {
        let offset = idx * enc as usize;
        match enc {
            ENC_INT16 => i64::from(codec::read_i16(&self.contents, offset)),
            ENC_INT32 => i64::from(codec::read_i32(&self.contents, offset)),
            _ => codec::read_i64(&self.contents, offset),
        }
    }
}

impl Default for IntSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Narrowest width that represents `n`
fn value_encoding(n: i64) -> u8 {
    if n >= i64::from(i16::MIN) && n <= i64::from(i16::MAX) {
        ENC_INT16
    } else if n >= i64::from(i32::MIN) && n <= i64::from(i32::MAX) {
        ENC_INT32
    } else {
        ENC_INT64
    }
}
