// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tests for page search, codec, and split.

use super::*;

fn leaf_with(keys: &[&str]) -> Page {
    let mut page = Page::new(1);
    for (i, key) in keys.iter().enumerate() {
        page.insert_at(i, KeyValuePair::new(key.as_bytes().to_vec(), b"v".to_vec()));
    }
    page
}

#[test]
fn new_page_is_leaf() {
    let page = Page::new(7);
    assert!(page.is_leaf());
    assert_eq!(page.id(), 7);
}

#[test]
fn get_reports_exact_match_and_insertion_point() {
    let page = leaf_with(&["b", "d", "f"]);
    assert_eq!(page.get(b"d"), (1, true));
    assert_eq!(page.get(b"a"), (0, false));
    assert_eq!(page.get(b"c"), (1, false));
    assert_eq!(page.get(b"z"), (3, false));
}

#[test]
fn insert_at_shifts_right() {
    let mut page = leaf_with(&["a", "c"]);
    page.insert_at(1, KeyValuePair::new(b"b".to_vec(), b"v".to_vec()));
    let keys: Vec<_> = page.pairs().iter().map(|p| p.pretty_key()).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn update_at_replaces_in_place() {
    let mut page = leaf_with(&["a", "b"]);
    page.update_at(1, KeyValuePair::new(b"b".to_vec(), b"new".to_vec()));
    assert_eq!(page.pair_at(1).pretty_value(), "new");
}

#[test]
fn non_leaf_insert_discards_value() {
    let mut page = Page::new(1);
    page.insert_child_at(0, 10);
    page.insert_child_at(1, 11);
    assert!(!page.is_leaf());
    page.insert_at(0, KeyValuePair::new(b"m".to_vec(), b"ignored".to_vec()));
    assert!(page.pair_at(0).value.is_empty());
}

#[test]
fn encode_decode_round_trips_leaf() {
    let page = leaf_with(&["alpha", "beta", "gamma"]);
    let bytes = page.encode();
    let decoded = Page::decode(page.id(), &bytes).unwrap();
    assert!(decoded.is_leaf());
    assert_eq!(decoded.pairs().len(), 3);
    assert_eq!(decoded.pair_at(1).pretty_key(), "beta");
    assert_eq!(decoded.pair_at(1).pretty_value(), "v");
}

#[test]
fn encode_decode_round_trips_non_leaf() {
    let mut page = Page::new(5);
    page.insert_child_at(0, 100);
    page.insert_child_at(1, 101);
    page.insert_child_at(2, 102);
    page.insert_at(0, KeyValuePair::new(b"m".to_vec(), Vec::new()));
    page.insert_at(1, KeyValuePair::new(b"t".to_vec(), Vec::new()));

    let bytes = page.encode();
    let decoded = Page::decode(5, &bytes).unwrap();
    assert!(!decoded.is_leaf());
    assert_eq!(decoded.child_ids(), &[100, 101, 102]);
    assert_eq!(decoded.pairs().len(), 2);
}

#[test]
fn size_matches_encoded_length() {
    let page = leaf_with(&["k1", "k2", "k3longer"]);
    assert_eq!(page.size(), page.encode().len());
}

#[test]
fn decode_empty_bytes_is_error() {
    let result = Page::decode(1, &[]);
    assert!(result.is_err());
}

#[test]
fn decode_truncated_key_is_error() {
    // type byte (leaf) + pair_count=1 + key_len=10 but no key bytes follow.
    let bytes = vec![0x00, 0x01, 0x0a];
    let result = Page::decode(1, &bytes);
    assert!(result.is_err());
}

#[test]
fn leaf_split_puts_sibling_on_the_right_with_right_half() {
    let mut page = leaf_with(&["a", "b", "c", "d"]);
    let mut sibling = Page::new(2);
    let mut parent = Page::new(3);
    parent.insert_child_at(0, page.id());

    let dirty = page.split(&mut parent, &mut sibling, 0);
    assert_eq!(dirty, vec![page.id(), sibling.id(), parent.id()]);

    // Left half stays on the original page, right half moves to sibling.
    let left_keys: Vec<_> = page.pairs().iter().map(|p| p.pretty_key()).collect();
    let right_keys: Vec<_> = sibling.pairs().iter().map(|p| p.pretty_key()).collect();
    assert_eq!(left_keys, vec!["a", "b"]);
    assert_eq!(right_keys, vec!["c", "d"]);

    // Sibling inserted to the right of page in the parent's child array.
    assert_eq!(parent.child_ids(), &[page.id(), sibling.id()]);
    // Separator is the sibling's first key.
    assert_eq!(parent.pair_at(0).pretty_key(), "c");
}

#[test]
fn internal_split_puts_sibling_on_the_left_with_left_half() {
    // Five separator keys, six children (odd key count -> mid = 2).
    let mut page = Page::new(1);
    for i in 0..6u32 {
        page.insert_child_at(i as usize, 100 + i);
    }
    for key in ["b", "d", "f", "h", "j"] {
        let idx = page.pairs().len();
        page.insert_at(idx, KeyValuePair::new(key.as_bytes().to_vec(), Vec::new()));
    }

    let mut sibling = Page::new(2);
    let mut parent = Page::new(3);
    parent.insert_child_at(0, page.id());

    let dirty = page.split(&mut parent, &mut sibling, 0);
    assert_eq!(dirty, vec![page.id(), sibling.id(), parent.id()]);

    let left_keys: Vec<_> = sibling.pairs().iter().map(|p| p.pretty_key()).collect();
    let right_keys: Vec<_> = page.pairs().iter().map(|p| p.pretty_key()).collect();
    assert_eq!(left_keys, vec!["b", "d"]);
    assert_eq!(right_keys, vec!["f", "h", "j"]);

    // Promoted key is the middle separator, removed from both halves.
    assert_eq!(parent.pair_at(0).pretty_key(), "f");
    // Sibling inserted to the LEFT of page.
    assert_eq!(parent.child_ids(), &[sibling.id(), page.id()]);

    // Six children split 3/3 (even count: left_count = total/2).
    assert_eq!(sibling.child_ids(), &[100, 101, 102]);
    assert_eq!(page.child_ids(), &[103, 104, 105]);
}

#[test]
fn internal_split_with_odd_child_count_gives_sibling_the_extra_child() {
    // Four separator keys, five children (odd count -> left_count = 2/2+1 = 3).
    let mut page = Page::new(1);
    for i in 0..5u32 {
        page.insert_child_at(i as usize, 100 + i);
    }
    for key in ["b", "d", "f", "h"] {
        let idx = page.pairs().len();
        page.insert_at(idx, KeyValuePair::new(key.as_bytes().to_vec(), Vec::new()));
    }

    let mut sibling = Page::new(2);
    let mut parent = Page::new(3);
    parent.insert_child_at(0, page.id());

    page.split(&mut parent, &mut sibling, 0);

    assert_eq!(sibling.child_ids(), &[100, 101, 102]);
    assert_eq!(page.child_ids(), &[103, 104]);
}
