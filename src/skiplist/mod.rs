//! SkipList Module
//!
//! Indexable probabilistic list ordered by (score ascending, key ascending).
//!
//! ## Responsibilities
//! - O(log n) insert, delete, membership, and rank queries
//! - Per-level spans so a node's 0-based position falls out of the search
//! - Injected randomness so tests can pin the level draws
//!
//! ## Structure
//! Nodes live in an index arena with a free list; node 0 is a head sentinel
//! carrying the full 32-level array. Each level stores a forward index and a
//! span: the number of bottom-level hops to that forward node. One score may
//! be held by at most one key.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, ZipKvError};

/// Levels 1..=32; the head sentinel always carries all of them
const MAX_LEVEL: usize = 32;

/// Probability of promoting a node one more level
const PROBABILITY: f64 = 0.25;

/// Arena index of the head sentinel
const HEAD: usize = 0;

struct Level {
    forward: Option<usize>,
    span: usize,
}

struct Node {
    key: Vec<u8>,
    score: f64,
    backward: Option<usize>,
    levels: Vec<Level>,
}

impl Node {
    fn with_levels(key: Vec<u8>, score: f64, level: usize) -> Self {
        Node {
            key,
            score,
            backward: None,
            levels: (0..level)
                .map(|_| Level {
                    forward: None,
                    span: 0,
                })
                .collect(),
        }
    }
}

/// Ordered-by-(score, key) indexable list
///
/// `R` is the level-draw randomness source; the default is a per-process
/// seeded PRNG, and `with_seed`/`with_rng` pin it for deterministic tests.
pub struct SkipList<R: Rng = SmallRng> {
    nodes: Vec<Node>,
    free: Vec<usize>,
    tail: Option<usize>,
    len: usize,
    level: usize,
    rng: R,
}

impl SkipList<SmallRng> {
    /// Create an empty skiplist with entropy-seeded level draws
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Create an empty skiplist with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for SkipList<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SkipList<R> {
    /// Create an empty skiplist drawing levels from `rng`
    pub fn with_rng(rng: R) -> Self {
        SkipList {
            nodes: vec![Node::with_levels(Vec::new(), 0.0, MAX_LEVEL)],
            free: Vec::new(),
            tail: None,
            len: 0,
            level: 1,
            rng,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no elements are stored
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert (key, score)
    ///
    /// Fails with `DuplicateInput` when the exact pair is already present,
    /// or when a different key already holds this score: one score belongs
    /// to at most one key.
    pub fn add(&mut self, key: impl Into<Vec<u8>>, score: f64) -> Result<()> {
        let key = key.into();
        let mut rank = [0usize; MAX_LEVEL];
        let mut update = [HEAD; MAX_LEVEL];

        let mut x = HEAD;
        for i in (0..self.level).rev() {
            rank[i] = if i == self.level - 1 { 0 } else { rank[i + 1] };

            while let Some(fwd) = self.nodes[x].levels[i].forward {
                // one score belongs to at most one key; every forward the
                // walk examines is a chance to catch a violation
                if self.nodes[fwd].score == score && self.nodes[fwd].key != key {
                    return Err(ZipKvError::DuplicateInput);
                }
                if !self.precedes(fwd, &key, score) {
                    break;
                }
                rank[i] += self.nodes[x].levels[i].span;
                x = fwd;
            }
            update[i] = x;
        }

        // the exact pair would sit immediately after its predecessor
        if let Some(fwd) = self.nodes[update[0]].levels[0].forward {
            let f = &self.nodes[fwd];
            if f.score == score && f.key == key {
                return Err(ZipKvError::DuplicateInput);
            }
        }

        let new_level = self.random_level();
        if new_level > self.level {
            for i in self.level..new_level {
                rank[i] = 0;
                update[i] = HEAD;
                self.nodes[HEAD].levels[i].span = self.len;
            }
            tracing::trace!("skiplist level raised to {}", new_level);
        }

        let x = self.alloc(Node::with_levels(key, score, new_level));

        for i in 0..new_level {
            let pred = update[i];
            self.nodes[x].levels[i].forward = self.nodes[pred].levels[i].forward;
            self.nodes[pred].levels[i].forward = Some(x);

            let pred_span = self.nodes[pred].levels[i].span;
            self.nodes[x].levels[i].span = pred_span - (rank[0] - rank[i]);
            self.nodes[pred].levels[i].span = rank[0] - rank[i] + 1;
        }

        // levels the new node does not reach span over one more element now
        for i in new_level..self.level {
            self.nodes[update[i]].levels[i].span += 1;
        }

        if new_level > self.level {
            self.level = new_level;
        }

        self.nodes[x].backward = if update[0] == HEAD {
            None
        } else {
            Some(update[0])
        };
        match self.nodes[x].levels[0].forward {
            Some(fwd) => self.nodes[fwd].backward = Some(x),
            None => self.tail = Some(x),
        }

        self.len += 1;
        Ok(())
    }

    /// Remove the exact (key, score) pair
    pub fn delete(&mut self, key: &[u8], score: f64) -> Result<()> {
        let mut update = [HEAD; MAX_LEVEL];

        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(fwd) = self.nodes[x].levels[i].forward {
                if self.precedes(fwd, key, score) {
                    x = fwd;
                } else {
                    break;
                }
            }
            update[i] = x;
        }

        match self.nodes[x].levels[0].forward {
            Some(t) if self.nodes[t].key == key && self.nodes[t].score == score => {
                self.unlink(t, &update);
                Ok(())
            }
            _ => Err(ZipKvError::InputNotFound),
        }
    }

    /// True if the exact (key, score) pair is present
    pub fn contains(&self, key: &[u8], score: f64) -> bool {
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(fwd) = self.nodes[x].levels[i].forward {
                if self.precedes(fwd, key, score) {
                    x = fwd;
                } else {
                    break;
                }
            }
        }
        match self.nodes[x].levels[0].forward {
            Some(f) => self.nodes[f].key == key && self.nodes[f].score == score,
            None => false,
        }
    }

    /// 0-based position of (key, score) in ascending (score, key) order
    pub fn rank(&self, key: &[u8], score: f64) -> Option<usize> {
        let mut rank = 0usize;
        let mut x = HEAD;
        for i in (0..self.level).rev() {
            while let Some(fwd) = self.nodes[x].levels[i].forward {
                let f = &self.nodes[fwd];
                if f.score < score || (f.score == score && f.key.as_slice() <= key) {
                    rank += self.nodes[x].levels[i].span;
                    x = fwd;
                } else {
                    break;
                }
            }
            if x != HEAD && self.nodes[x].key == key && self.nodes[x].score == score {
                // rank counted hops from the head, including the node itself
                return Some(rank - 1);
            }
        }
        None
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// True if the node at `idx` sorts before (score, key)
    fn precedes(&self, idx: usize, key: &[u8], score: f64) -> bool {
        let n = &self.nodes[idx];
        n.score < score || (n.score == score && n.key.as_slice() < key)
    }

    /// Geometric level draw: P(level >= k+1 | level >= k) = 0.25, capped
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while self.rng.gen::<f64>() < PROBABILITY && level < MAX_LEVEL {
            level += 1;
        }
        level
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Splice node `x` out given its per-level predecessors
    fn unlink(&mut self, x: usize, update: &[usize; MAX_LEVEL]) {
        for i in 0..self.level {
            let pred = update[i];
            if self.nodes[pred].levels[i].forward == Some(x) {
                let x_span = self.nodes[x].levels[i].span;
                let x_fwd = self.nodes[x].levels[i].forward;
                let pl = &mut self.nodes[pred].levels[i];
                // x_span may be 0 at a trailing level; sum before subtracting
                pl.span = pl.span + x_span - 1;
                pl.forward = x_fwd;
            } else {
                self.nodes[pred].levels[i].span -= 1;
            }
        }

        match self.nodes[x].levels[0].forward {
            Some(fwd) => {
                let back = self.nodes[x].backward;
                self.nodes[fwd].backward = back;
            }
            None => {
                self.tail = self.nodes[x].backward;
            }
        }

        while self.level > 1 && self.nodes[HEAD].levels[self.level - 1].forward.is_none() {
            self.nodes[HEAD].levels[self.level - 1].span = 0;
            self.level -= 1;
        }

        self.len -= 1;
        // scrub the freed slot so stale links cannot be followed
        self.nodes[x] = Node::with_levels(Vec::new(), 0.0, 0);
        self.free.push(x);
    }
}
