//! Error types for zipkv
//!
//! Provides a unified error type for all container operations.

use thiserror::Error;

/// Result type alias using ZipKvError
pub type Result<T> = std::result::Result<T, ZipKvError>;

/// Unified error type for zipkv container operations
///
/// Every fallible operation returns one of these kinds and leaves the
/// container unchanged when it does.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ZipKvError {
    // -------------------------------------------------------------------------
    // Capacity Errors
    // -------------------------------------------------------------------------
    #[error("container reached its maximum size")]
    ExceedLimit,

    #[error("entry exceeds the ziplist per-entry size limit")]
    EntryExceedLimit,

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("container is empty")]
    Empty,

    #[error("index is out of range")]
    InvalidIdx,

    #[error("no matching element was found")]
    InputNotFound,

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("the input already exists")]
    DuplicateInput,

    #[error("input is neither a string nor an integer")]
    InvalidInput,
}
