// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! A single B+-Tree page: its in-memory representation, binary codec,
//! search, insert/update, and split algorithms.
//!
//! ## Binary Format
//!
//! ```text
//! Leaf page:     type(1) | varint(pair_count) | pair*
//! Non-leaf page: type(1) | varint(pair_count) | pair* | varint(child_count) | child_id(4 LE)*
//! Pair:          varint(key_len) | key_bytes | varint(value_len) | value_bytes
//! ```
//!
//! `type` is `0x00` for a leaf, `0x01` for non-leaf; the decoding rule is
//! `(first_byte & 0x01) == 0` implies leaf. Separator keys on a non-leaf
//! page carry a zero-length value (enforced by `insert_at`, never written
//! directly). Trailing bytes of a page slot past the encoded end are
//! ignored on decode and not zeroed on encode.

use crate::error::{ReedError, ReedResult};
use crate::kv::KeyValuePair;
use crate::varint;

const PAGE_TYPE_LEAF: u8 = 0x00;
const PAGE_TYPE_NON_LEAF: u8 = 0x01;

/// In-memory representation of one page, leaf or internal depending on
/// whether `child_ids` is empty.
#[derive(Debug, Clone)]
pub struct Page {
    id: u32,
    pairs: Vec<KeyValuePair>,
    child_ids: Vec<u32>,
}

impl Page {
    /// A fresh, empty page with the given id. Empty `child_ids` makes it a
    /// leaf until `insert_child_at` is called.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            pairs: Vec::new(),
            child_ids: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// A page is a leaf iff it has no child ids.
    pub fn is_leaf(&self) -> bool {
        self.child_ids.is_empty()
    }

    pub fn pairs(&self) -> &[KeyValuePair] {
        &self.pairs
    }

    pub fn child_ids(&self) -> &[u32] {
        &self.child_ids
    }

    pub fn pair_at(&self, index: usize) -> &KeyValuePair {
        &self.pairs[index]
    }

    /// Lower-bound binary search on the key array.
    ///
    /// `found` is true iff `keys[index-1] == key` (tiebreak at the
    /// predecessor slot); otherwise `index` is the insertion position such
    /// that `keys[index-1] < key <= keys[index]`.
    pub fn get(&self, key: &[u8]) -> (usize, bool) {
        let index = self.pairs.partition_point(|pair| pair.key.as_slice() < key);
        if index > 0 && self.pairs[index - 1].key.as_slice() == key {
            return (index - 1, true);
        }
        (index, false)
    }

    /// Shift pairs right from `index`, place `pair` there. On a non-leaf
    /// page only the key is kept (value discarded).
    pub fn insert_at(&mut self, index: usize, pair: KeyValuePair) {
        if self.is_leaf() {
            self.pairs.insert(index, pair);
        } else {
            self.pairs.insert(index, KeyValuePair::key_only(pair.key));
        }
    }

    /// Overwrite the pair at `index` in place.
    pub fn update_at(&mut self, index: usize, pair: KeyValuePair) {
        self.pairs[index] = pair;
    }

    /// Shift child ids right from `index`, place `child_id` there.
    pub fn insert_child_at(&mut self, index: usize, child_id: u32) {
        self.child_ids.insert(index, child_id);
    }

    /// Exact encoded length in bytes, used by the split-eligibility
    /// predicate.
    pub fn size(&self) -> usize {
        let mut len = 1; // type byte
        len += varint::encoded_len(self.pairs.len() as u64);
        for pair in &self.pairs {
            len += varint::encoded_len(pair.key.len() as u64) + pair.key.len();
            len += varint::encoded_len(pair.value.len() as u64) + pair.value.len();
        }
        if !self.is_leaf() {
            len += varint::encoded_len(self.child_ids.len() as u64);
            len += self.child_ids.len() * 4;
        }
        len
    }

    /// Encode this page to its binary form.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.size());
        buf.push(if self.is_leaf() {
            PAGE_TYPE_LEAF
        } else {
            PAGE_TYPE_NON_LEAF
        });
        varint::encode(self.pairs.len() as u64, &mut buf);
        for pair in &self.pairs {
            varint::encode(pair.key.len() as u64, &mut buf);
            buf.extend_from_slice(&pair.key);
            varint::encode(pair.value.len() as u64, &mut buf);
            buf.extend_from_slice(&pair.value);
        }
        if !self.is_leaf() {
            varint::encode(self.child_ids.len() as u64, &mut buf);
            for child_id in &self.child_ids {
                buf.extend_from_slice(&child_id.to_le_bytes());
            }
        }
        buf
    }

    /// Decode a page from `bytes`, assigning it `id`.
    ///
    /// ## Error Conditions
    /// - `bytes` is empty or any length prefix runs past the end of
    ///   `bytes` (truncated/inconsistent encoding).
    pub fn decode(id: u32, bytes: &[u8]) -> ReedResult<Self> {
        if bytes.is_empty() {
            return Err(truncated("page is empty"));
        }
        let is_leaf = bytes[0] & 0x01 == 0;
        let mut offset = 1usize;

        let pair_count = read_varint(bytes, &mut offset)?;
        let mut pairs = Vec::with_capacity(pair_count as usize);
        for _ in 0..pair_count {
            let key_len = read_varint(bytes, &mut offset)? as usize;
            let key = take(bytes, &mut offset, key_len)?.to_vec();
            let value_len = read_varint(bytes, &mut offset)? as usize;
            let value = take(bytes, &mut offset, value_len)?.to_vec();
            pairs.push(KeyValuePair { key, value });
        }

        let mut child_ids = Vec::new();
        if !is_leaf {
            let child_count = read_varint(bytes, &mut offset)?;
            for _ in 0..child_count {
                let raw = take(bytes, &mut offset, 4)?;
                child_ids.push(u32::from_le_bytes(raw.try_into().unwrap()));
            }
        }

        Ok(Self {
            id,
            pairs,
            child_ids,
        })
    }

    /// Partition `self` into `self` (right half) and `sibling` (left half
    /// for internals, right half for leaves), inserting one separator into
    /// `parent`. Returns the ids of every page touched, for the caller's
    /// dirty-page bookkeeping.
    ///
    /// The asymmetry between the leaf and internal cases — a leaf's
    /// sibling lands to its right, an internal's sibling lands to its left
    /// — must be preserved exactly to keep child-id orientation consistent
    /// with the rest of the descent algorithm.
    pub fn split(&mut self, parent: &mut Page, sibling: &mut Page, index_in_parent: usize) -> Vec<u32> {
        if self.is_leaf() {
            let mid = self.pairs.len() / 2;
            sibling.pairs = self.pairs.split_off(mid);
            parent.insert_child_at(index_in_parent + 1, sibling.id);
            parent.insert_at(index_in_parent, sibling.pairs[0].clone());
        } else {
            let mid = self.pairs.len() / 2;
            let mut right_pairs = self.pairs.split_off(mid + 1);
            let promoted = self.pairs.pop().expect("internal split requires >= 2 keys");
            sibling.pairs.clear();
            sibling.pairs.append(&mut self.pairs);
            self.pairs.append(&mut right_pairs);

            let total_children = self.child_ids.len();
            let left_count = if total_children % 2 != 0 {
                total_children / 2 + 1
            } else {
                total_children / 2
            };
            let mut right_children = self.child_ids.split_off(left_count);
            sibling.child_ids = std::mem::take(&mut self.child_ids);
            self.child_ids = std::mem::take(&mut right_children);

            parent.insert_child_at(index_in_parent, sibling.id);
            parent.insert_at(index_in_parent, promoted);
        }

        log::trace!(
            "split page {} into {{{}, sibling {}}} under parent {}",
            self.id,
            self.id,
            sibling.id,
            parent.id
        );

        vec![self.id, sibling.id, parent.id]
    }
}

fn truncated(reason: impl Into<String>) -> ReedError {
    ReedError::SerializationError {
        reason: reason.into(),
    }
}

fn read_varint(bytes: &[u8], offset: &mut usize) -> ReedResult<u64> {
    let (value, consumed) = varint::decode(&bytes[*offset..])?;
    *offset += consumed;
    Ok(value)
}

fn take<'a>(bytes: &'a [u8], offset: &mut usize, len: usize) -> ReedResult<&'a [u8]> {
    let end = *offset + len;
    if end > bytes.len() {
        return Err(truncated(format!(
            "expected {} bytes at offset {}, only {} available",
            len,
            *offset,
            bytes.len() - *offset
        )));
    }
    let slice = &bytes[*offset..end];
    *offset = end;
    Ok(slice)
}

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;
