//! IntSet Tests
//!
//! Tests verify:
//! - Sorted insertion and lookup
//! - Encoding upgrades across the 16/32/64-bit boundaries
//! - Duplicate rejection
//! - Error kinds for empty and out-of-range reads

use zipkv::{IntSet, ZipKvError};

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_intset_is_empty() {
    let set = IntSet::new();
    assert_eq!(set.len(), 0);
    assert!(set.is_empty());
    assert_eq!(set.encoding(), 2);
}

#[test]
fn test_add_and_get_sorted() {
    let mut set = IntSet::new();

    for n in [5, 1, 9, 3, 7] {
        set.add(n).unwrap();
    }

    assert_eq!(set.len(), 5);
    for (i, expected) in [1, 3, 5, 7, 9].iter().enumerate() {
        assert_eq!(set.get(i).unwrap(), *expected);
    }
}

#[test]
fn test_find_present_and_absent() {
    let mut set = IntSet::new();
    for n in [10, 20, 30] {
        set.add(n).unwrap();
    }

    assert_eq!(set.find(10), (0, true));
    assert_eq!(set.find(20), (1, true));
    assert_eq!(set.find(30), (2, true));

    // absent values report their insertion position
    assert_eq!(set.find(5), (0, false));
    assert_eq!(set.find(15), (1, false));
    assert_eq!(set.find(25), (2, false));
    assert_eq!(set.find(35), (3, false));
}

#[test]
fn test_duplicate_add_rejected() {
    let mut set = IntSet::new();
    set.add(42).unwrap();

    assert_eq!(set.add(42), Err(ZipKvError::DuplicateInput));
    assert_eq!(set.len(), 1);
}

#[test]
fn test_negative_values_sort_before_positive() {
    let mut set = IntSet::new();
    for n in [100, -100, 0, -1, 1] {
        set.add(n).unwrap();
    }

    for (i, expected) in [-100, -1, 0, 1, 100].iter().enumerate() {
        assert_eq!(set.get(i).unwrap(), *expected);
    }
}

// =============================================================================
// Encoding Upgrade Tests
// =============================================================================

#[test]
fn test_upgrade_chain_through_all_widths() {
    let mut set = IntSet::new();
    let inputs = [
        i64::from(i16::MIN),
        i64::from(i16::MAX),
        i64::from(i32::MIN),
        i64::from(i32::MAX),
        i64::MIN,
        i64::MAX,
    ];
    let expected_encodings = [2, 2, 4, 4, 8, 8];

    for (n, enc) in inputs.iter().zip(expected_encodings) {
        set.add(*n).unwrap();
        assert_eq!(set.encoding(), enc);
    }

    let sorted = [
        i64::MIN,
        i64::from(i32::MIN),
        i64::from(i16::MIN),
        i64::from(i16::MAX),
        i64::from(i32::MAX),
        i64::MAX,
    ];
    assert_eq!(set.len(), 6);
    for (i, expected) in sorted.iter().enumerate() {
        assert_eq!(set.get(i).unwrap(), *expected);
    }
}

#[test]
fn test_upgrade_preserves_existing_values() {
    let mut set = IntSet::new();
    for n in [-3, 0, 3] {
        set.add(n).unwrap();
    }

    // positive out-of-range value appends after the rewrite
    set.add(1_000_000).unwrap();
    assert_eq!(set.encoding(), 4);
    for (i, expected) in [-3, 0, 3, 1_000_000].iter().enumerate() {
        assert_eq!(set.get(i).unwrap(), *expected);
    }

    // negative out-of-range value prepends
    set.add(-5_000_000_000).unwrap();
    assert_eq!(set.encoding(), 8);
    for (i, expected) in [-5_000_000_000, -3, 0, 3, 1_000_000].iter().enumerate() {
        assert_eq!(set.get(i).unwrap(), *expected);
    }
}

#[test]
fn test_encoding_never_narrows() {
    let mut set = IntSet::new();
    set.add(i64::MAX).unwrap();
    assert_eq!(set.encoding(), 8);

    set.add(1).unwrap();
    assert_eq!(set.encoding(), 8);
    assert_eq!(set.get(0).unwrap(), 1);
    assert_eq!(set.get(1).unwrap(), i64::MAX);
}

#[test]
fn test_duplicate_after_upgrade_rejected() {
    let mut set = IntSet::new();
    set.add(7).unwrap();
    set.add(1_000_000).unwrap();

    assert_eq!(set.add(7), Err(ZipKvError::DuplicateInput));
    assert_eq!(set.add(1_000_000), Err(ZipKvError::DuplicateInput));
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_get_on_empty() {
    let set = IntSet::new();
    assert_eq!(set.get(0), Err(ZipKvError::Empty));
}

#[test]
fn test_get_out_of_range() {
    let mut set = IntSet::new();
    set.add(1).unwrap();

    assert_eq!(set.get(1), Err(ZipKvError::InvalidIdx));
    assert_eq!(set.get(99), Err(ZipKvError::InvalidIdx));
}
