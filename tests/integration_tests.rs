//! Integration tests for zipkv
//!
//! Note: Most tests live in dedicated test modules:
//! - Dict tests: tests/dict_tests.rs
//! - ZipList tests: tests/ziplist_tests.rs
//! - IntSet tests: tests/intset_tests.rs
//! - SkipList tests: tests/skiplist_tests.rs
//! - QuickList tests: tests/quicklist_tests.rs
//!
//! This file covers configuration and behavior that spans containers.

use zipkv::{Config, Dict, Value, ZipKvError};

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.quicklist_fill, 3);
    assert_eq!(config.skiplist_seed, None);
}

#[test]
fn test_config_builder() {
    let config = Config::builder()
        .quicklist_fill(-2)
        .skiplist_seed(99)
        .build();

    assert_eq!(config.quicklist_fill, -2);
    assert_eq!(config.skiplist_seed, Some(99));
}

#[test]
fn test_config_constructs_tuned_containers() {
    let config = Config::builder().quicklist_fill(2).skiplist_seed(7).build();

    let mut list = config.new_list();
    assert_eq!(list.fill(), 2);
    for i in 0..3 {
        list.push_tail_int(i).unwrap();
    }
    assert_eq!(list.node_len(), 2);

    let mut sorted = config.new_sorted();
    sorted.add("a", 1.0).unwrap();
    sorted.add("b", 2.0).unwrap();
    assert_eq!(sorted.rank(b"b", 2.0), Some(1));
}

// =============================================================================
// Cross-container Tests
// =============================================================================

#[test]
fn test_dict_of_packed_lists() {
    // the registry shape an embedder builds: keys resolving to containers
    let config = Config::default();
    let mut dict: Dict<zipkv::QuickList> = Dict::new();

    let mut inbox = config.new_list();
    inbox.push_tail_str(b"msg-1").unwrap();
    dict.put("inbox", inbox);
    dict.put("outbox", config.new_list());

    let stored = dict.get(b"inbox").expect("inbox list missing");
    assert_eq!(stored.get(0).unwrap(), Value::Str(b"msg-1".to_vec()));
    assert_eq!(dict.len(), 2);
}

#[test]
fn test_error_kinds_are_distinct() {
    let kinds = [
        ZipKvError::ExceedLimit,
        ZipKvError::EntryExceedLimit,
        ZipKvError::Empty,
        ZipKvError::InvalidIdx,
        ZipKvError::InputNotFound,
        ZipKvError::DuplicateInput,
        ZipKvError::InvalidInput,
    ];
    for (i, a) in kinds.iter().enumerate() {
        for (j, b) in kinds.iter().enumerate() {
            assert_eq!(i == j, a == b);
        }
    }
}

#[test]
fn test_value_conversions() {
    assert_eq!(Value::from("hi"), Value::Str(b"hi".to_vec()));
    assert_eq!(Value::from(5i64), Value::Int(5));
    assert_eq!(Value::from(b"raw".as_slice()), Value::Str(b"raw".to_vec()));

    assert_eq!(Value::Int(5).as_int(), Some(5));
    assert_eq!(Value::Int(5).as_str(), None);
    assert!(Value::from("hi").is_str());
}

#[test]
fn test_version_is_set() {
    assert!(!zipkv::VERSION.is_empty());
}
