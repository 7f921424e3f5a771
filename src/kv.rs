// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The key-value pair stored by leaf pages (and, key-only, by non-leaf
//! separators).

use std::fmt;

/// An ordered pair of byte strings. Keys compare lexicographically as
/// unsigned bytes; equality is byte-equality of both fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValuePair {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl KeyValuePair {
    /// Construct a pair, copying `key` and `value`.
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A separator pair holding only `key`, used for non-leaf insertion
    /// where the value is discarded.
    pub fn key_only(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: Vec::new(),
        }
    }

    /// `true` iff both `key` and `value` are empty.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }

    /// Lossy UTF-8 render of the key, for debugging/display only.
    pub fn pretty_key(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }

    /// Lossy UTF-8 render of the value, for debugging/display only.
    pub fn pretty_value(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

impl fmt::Display for KeyValuePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " [{} - {}] ", self.pretty_key(), self.pretty_value())
    }
}
