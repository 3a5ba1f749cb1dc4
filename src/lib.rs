//! # zipkv
//!
//! Space-efficient in-memory containers backing the value types of a
//! key-value datastore: strings, lists, sets, sorted sets, and hashes.
//!
//! ## Architecture Overview
//!
//! ```text
//!   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐
//!   │   Dict    │  │ SkipList  │  │ QuickList │  │  IntSet   │
//!   │ (chained, │  │ (ordered, │  │ (list of  │  │ (sorted,  │
//!   │ 2 tables) │  │  ranked)  │  │ ziplists) │  │  packed)  │
//!   └───────────┘  └───────────┘  └─────┬─────┘  └─────┬─────┘
//!                                       │              │
//!                                 ┌─────▼─────┐        │
//!                                 │  ZipList  │        │
//!                                 │ (packed)  │        │
//!                                 └─────┬─────┘        │
//!                                       │              │
//!                                 ┌─────▼──────────────▼─────┐
//!                                 │     byte codec (BE)      │
//!                                 └──────────────────────────┘
//! ```
//!
//! Each container is independent; QuickList embeds ZipList, and the packed
//! containers share the big-endian byte codec. Containers are
//! single-threaded: mutating operations take `&mut self` and the embedder
//! serializes access.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod value;

pub mod dict;
pub mod intset;
pub mod quicklist;
pub mod skiplist;
pub mod ziplist;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use dict::Dict;
pub use error::{Result, ZipKvError};
pub use intset::IntSet;
pub use quicklist::QuickList;
pub use skiplist::SkipList;
pub use value::Value;
pub use ziplist::ZipList;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of zipkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
