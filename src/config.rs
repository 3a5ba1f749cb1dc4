//! Configuration for zipkv containers
//!
//! Centralized tunables with sensible defaults.

use crate::quicklist::{QuickList, DEFAULT_FILL};
use crate::skiplist::SkipList;

/// Tunables an embedder sets once and constructs containers from
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // QuickList Configuration
    // -------------------------------------------------------------------------
    /// Per-node capacity rule for new quicklists
    pub quicklist_fill: i16,

    // -------------------------------------------------------------------------
    // SkipList Configuration
    // -------------------------------------------------------------------------
    /// Seed for level draws in new skiplists; None uses process entropy
    pub skiplist_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quicklist_fill: DEFAULT_FILL,
            skiplist_seed: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// A quicklist tuned by this config
    pub fn new_list(&self) -> QuickList {
        QuickList::with_fill(self.quicklist_fill)
    }

    /// A skiplist tuned by this config
    pub fn new_sorted(&self) -> SkipList {
        match self.skiplist_seed {
            Some(seed) => SkipList::with_seed(seed),
            None => SkipList::new(),
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn quicklist_fill(mut self, fill: i16) -> Self {
        self.config.quicklist_fill = fill;
        self
    }

    pub fn skiplist_seed(mut self, seed: u64) -> Self {
        self.config.skiplist_seed = Some(seed);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
