//! Dict Module
//!
//! Incrementally-rehashed chained hash table.
//!
//! ## Responsibilities
//! - Byte-string keys mapped to an owned value type
//! - Amortized growth: one bucket migrated per operation while rehashing
//! - Chain splicing on migration (entries move, they are never copied)
//!
//! ## Rehashing
//! Growth is triggered inside `put` when the load factor reaches 1.0
//! (`used >= size`). From then until every bucket of the old table has been
//! migrated, both tables are live: reads and deletes consult the old table
//! first, inserts land in the new table, and every `put`/`get`/`delete`
//! performs exactly one migration step before its own work.

mod table;

use table::{byte_hash, next_power, Entry, Table, TABLE_INIT_SIZE};

/// Empty buckets a single rehash step may scan before yielding
const REHASH_EMPTY_VISITS: i64 = 10;

/// Chained hash table with incremental rehashing
///
/// Keys are byte strings; `V` is any owned value type. All operations take
/// `&mut self` because reads participate in rehash progress.
pub struct Dict<V> {
    tables: [Table<V>; 2],
    rehash_idx: i64,
}

impl<V> Dict<V> {
    /// Create an empty dict; the first table is allocated on first insert
    pub fn new() -> Self {
        Dict {
            tables: [Table::unallocated(), Table::unallocated()],
            rehash_idx: -1,
        }
    }

    /// Number of live entries across both tables
    pub fn len(&self) -> usize {
        (self.tables[0].used + self.tables[1].used) as usize
    }

    /// True if no entries are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while an incremental rehash is in progress
    pub fn is_rehashing(&self) -> bool {
        self.rehash_idx != -1
    }

    /// Insert or overwrite a key-value pair
    pub fn put(&mut self, key: impl Into<Vec<u8>>, val: V) {
        let key = key.into();
        let hash = byte_hash(&key);

        if self.is_rehashing() {
            self.rehash(1);
        }
        self.expand_if_needed();

        let live_tables = if self.is_rehashing() { 2 } else { 1 };
        for t in 0..live_tables {
            if let Some(slot) = self.tables[t].value_mut(hash, &key) {
                *slot = val;
                return;
            }
        }

        // new keys always land in the table inserts are directed at
        let target = if self.is_rehashing() { 1 } else { 0 };
        let entry = Box::new(Entry {
            key,
            val,
            next: None,
        });
        self.tables[target].prepend(hash, entry);
    }

    /// Look up the value for `key`
    pub fn get(&mut self, key: &[u8]) -> Option<&V> {
        if self.is_empty() {
            return None;
        }
        if self.is_rehashing() {
            self.rehash(1);
        }

        let hash = byte_hash(key);
        let live_tables = if self.is_rehashing() { 2 } else { 1 };
        for t in 0..live_tables {
            if let Some(v) = self.tables[t].value(hash, key) {
                return Some(v);
            }
        }
        None
    }

    /// Remove `key`, reporting whether it was present
    pub fn delete(&mut self, key: &[u8]) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.is_rehashing() {
            self.rehash(1);
        }

        let hash = byte_hash(key);
        let live_tables = if self.is_rehashing() { 2 } else { 1 };
        for t in 0..live_tables {
            if self.tables[t].remove(hash, key).is_some() {
                return true;
            }
        }
        false
    }

    // -------------------------------------------------------------------------
    // Incremental rehashing
    // -------------------------------------------------------------------------

    /// Migrate at most `n` non-empty buckets from the old table to the new
    /// one, scanning past at most `n * 10` empty buckets.
    ///
    /// Returns true once the rehash has completed.
    fn rehash(&mut self, n: i64) -> bool {
        let mut empty_visits = n * REHASH_EMPTY_VISITS;
        if !self.is_rehashing() {
            return true;
        }

        let mut n = n;
        while n > 0 && self.tables[0].used > 0 {
            n -= 1;

            while self.tables[0].buckets[self.rehash_idx as usize].is_none() {
                self.rehash_idx += 1;
                empty_visits -= 1;
                if empty_visits == 0 {
                    return false;
                }
            }

            // splice every entry of this bucket into the new table
            let mut entry = self.tables[0].buckets[self.rehash_idx as usize].take();
            while let Some(mut e) = entry {
                entry = e.next.take();
                let hash = byte_hash(&e.key);
                let idx = self.tables[1].bucket_of(hash);
                e.next = self.tables[1].buckets[idx].take();
                self.tables[1].buckets[idx] = Some(e);
                self.tables[1].used += 1;
                self.tables[0].used -= 1;
            }
            self.rehash_idx += 1;
        }

        if self.tables[0].used == 0 {
            self.transfer_table();
            self.rehash_idx = -1;
            tracing::debug!("incremental rehash complete, table size {}", self.tables[0].size);
            return true;
        }
        false
    }

    /// Promote the new table into slot 0 once migration has drained slot 0
    fn transfer_table(&mut self) {
        self.tables[0] = std::mem::replace(&mut self.tables[1], Table::unallocated());
    }

    /// Allocate a bigger table when the load factor reaches 1.0
    fn expand_if_needed(&mut self) {
        if self.is_rehashing() {
            return;
        }

        if self.tables[0].size == 0 {
            self.expand(TABLE_INIT_SIZE);
        } else if self.tables[0].used >= self.tables[0].size {
            self.expand(self.tables[0].used + 1);
        }
    }

    /// Allocate a table of the next power-of-two size >= `size`
    ///
    /// The first allocation fills slot 0 directly; later ones fill slot 1 and
    /// start a rehash.
    fn expand(&mut self, size: i64) {
        if self.is_rehashing() || self.tables[0].used > size {
            return;
        }

        let real_size = next_power(size);
        if real_size == self.tables[0].size {
            return;
        }

        let target = if self.tables[0].size == 0 { 0 } else { 1 };
        self.tables[target] = Table::with_size(real_size);
        if target == 1 {
            self.rehash_idx = 0;
            tracing::debug!("dict expansion started, new table size {}", real_size);
        }
    }
}

impl<V> Default for Dict<V> {
    fn default() -> Self {
        Self::new()
    }
}
