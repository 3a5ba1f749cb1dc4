//! QuickList Module
//!
//! A list of bounded ziplists: linked-list capacity at the ends, packed
//! storage inside each node.
//!
//! ## Responsibilities
//! - Push strings and integers at either end
//! - Keep every node's ziplist within the `fill` capacity rule
//! - Indexed reads, negative indices addressing from the tail
//!
//! ## The fill parameter
//! `fill >= 0` caps a node at `fill` entries, but never past 8192 bytes.
//! `fill` in `-1..=-5` selects a byte budget per node from
//! `[4096, 8192, 16384, 32768, 65536]`. Any other negative value makes
//! every node reject growth, so each element gets its own node.

use std::collections::VecDeque;

use crate::error::{Result, ZipKvError};
use crate::value::Value;
use crate::ziplist::entry::{int_encoding, int_size_by_encoding, str_encoding_size};
use crate::ziplist::ZipList;

/// Default per-node capacity rule
pub const DEFAULT_FILL: i16 = 3;

/// Node-count cap (the source reserved two slots for its sentinels)
const MAX_NODES: usize = u32::MAX as usize - 2;

/// Element-count cap
const MAX_COUNT: usize = i64::MAX as usize;

/// Hard per-node byte cap under a non-negative fill
const SIZE_SAFETY_LIMIT: usize = 1 << 13;

/// Byte budgets selected by fill values -1..=-5
const OPTIMIZATION_LEVELS: [usize; 5] = [4096, 8192, 16384, 32768, 65536];

enum End {
    Head,
    Tail,
}

enum Elem<'a> {
    Str(&'a [u8]),
    Int(i64),
}

/// One interior node: a ziplist plus cached size and entry count
struct QlNode {
    zl: ZipList,
    bytes: u32,
    count: i16,
}

impl QlNode {
    fn new() -> Self {
        let zl = ZipList::new();
        let bytes = zl.total_bytes() as u32;
        QlNode {
            zl,
            bytes,
            count: 0,
        }
    }

    /// Would a string of `size` bytes keep this node within its budget?
    ///
    /// The projection estimates the new entry's prev-len field from the
    /// entry's own size, not from the actual predecessor.
    fn allows_str(&self, size: usize, fill: i16) -> bool {
        let mut overhead = if size < 254 { 1 } else { 5 };
        overhead += str_encoding_size(size);
        self.allows(self.bytes as usize + size + overhead, fill)
    }

    /// Would integer `n` keep this node within its budget?
    fn allows_int(&self, n: i64, fill: i16) -> bool {
        let overhead = 2 + int_size_by_encoding(int_encoding(n));
        self.allows(self.bytes as usize + overhead, fill)
    }

    fn allows(&self, new_size: usize, fill: i16) -> bool {
        if meets_optimization_requirement(new_size, fill) {
            true
        } else if new_size > SIZE_SAFETY_LIMIT {
            // a non-negative fill is bounded by bytes first, entries second
            false
        } else {
            self.count < fill
        }
    }
}

/// True if `size` fits the byte budget a negative fill selects
fn meets_optimization_requirement(size: usize, fill: i16) -> bool {
    if fill >= 0 {
        return false;
    }
    let offset = (-i32::from(fill) - 1) as usize;
    match OPTIMIZATION_LEVELS.get(offset) {
        Some(&budget) => size <= budget,
        None => false,
    }
}

/// Doubly-ended list of bounded ziplists
pub struct QuickList {
    nodes: VecDeque<QlNode>,
    count: usize,
    fill: i16,
}

impl QuickList {
    /// Create an empty quicklist with the default fill
    pub fn new() -> Self {
        Self::with_fill(DEFAULT_FILL)
    }

    /// Create an empty quicklist with a specific fill
    pub fn with_fill(fill: i16) -> Self {
        QuickList {
            nodes: VecDeque::new(),
            count: 0,
            fill,
        }
    }

    /// Number of elements across all nodes
    pub fn len(&self) -> usize {
        self.count
    }

    /// True if no elements are stored
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of interior nodes
    pub fn node_len(&self) -> usize {
        self.nodes.len()
    }

    /// The capacity rule this list was created with
    pub fn fill(&self) -> i16 {
        self.fill
    }

    /// Cached ziplist byte size of each node, head to tail
    pub fn node_sizes(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.bytes as usize).collect()
    }

    /// Push string bytes at the head; true if a node was allocated
    pub fn push_head_str(&mut self, s: &[u8]) -> Result<bool> {
        self.push(End::Head, Elem::Str(s))
    }

    /// Push an integer at the head; true if a node was allocated
    pub fn push_head_int(&mut self, n: i64) -> Result<bool> {
        self.push(End::Head, Elem::Int(n))
    }

    /// Push string bytes at the tail; true if a node was allocated
    pub fn push_tail_str(&mut self, s: &[u8]) -> Result<bool> {
        self.push(End::Tail, Elem::Str(s))
    }

    /// Push an integer at the tail; true if a node was allocated
    pub fn push_tail_int(&mut self, n: i64) -> Result<bool> {
        self.push(End::Tail, Elem::Int(n))
    }

    /// Read the element at `idx`; negative indices address from the tail
    pub fn get(&self, idx: i64) -> Result<Value> {
        let count = self.count as i64;
        let idx = if idx < 0 { idx + count } else { idx };
        if idx < 0 || idx >= count {
            return Err(ZipKvError::InvalidIdx);
        }

        let mut remaining = idx as usize;
        for node in &self.nodes {
            let c = node.count as usize;
            if remaining < c {
                return node.zl.get(remaining);
            }
            remaining -= c;
        }
        panic!("quicklist node counts diverged from element count");
    }

    // -------------------------------------------------------------------------
    // Push path
    // -------------------------------------------------------------------------

    fn push(&mut self, end: End, e: Elem<'_>) -> Result<bool> {
        if self.count == MAX_COUNT {
            return Err(ZipKvError::ExceedLimit);
        }

        let fill = self.fill;
        let target = match end {
            End::Head => self.nodes.front(),
            End::Tail => self.nodes.back(),
        };
        let needs_node = match target {
            None => true,
            Some(node) => match e {
                Elem::Str(s) => !node.allows_str(s.len(), fill),
                Elem::Int(n) => !node.allows_int(n, fill),
            },
        };

        if needs_node {
            if self.nodes.len() == MAX_NODES {
                return Err(ZipKvError::ExceedLimit);
            }
            match end {
                End::Head => self.nodes.push_front(QlNode::new()),
                End::Tail => self.nodes.push_back(QlNode::new()),
            }
            tracing::trace!("quicklist node allocated, total {}", self.nodes.len());
        }

        let appended = {
            let node = match end {
                End::Head => self.nodes.front_mut(),
                End::Tail => self.nodes.back_mut(),
            }
            .expect("target node present after allocation");
            match e {
                Elem::Str(s) => node.zl.add_str(s),
                Elem::Int(n) => node.zl.add_int(n),
            }
        };
        if let Err(err) = appended {
            // roll a just-created node back so the list is unchanged
            if needs_node {
                match end {
                    End::Head => self.nodes.pop_front(),
                    End::Tail => self.nodes.pop_back(),
                };
            }
            return Err(err);
        }

        let node = match end {
            End::Head => self.nodes.front_mut(),
            End::Tail => self.nodes.back_mut(),
        }
        .expect("target node present after append");
        node.bytes = node.zl.total_bytes() as u32;
        node.count += 1;
        self.count += 1;
        Ok(needs_node)
    }
}

impl Default for QuickList {
    fn default() -> Self {
        Self::new()
    }
}
