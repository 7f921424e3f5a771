// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `reedindex` is a single-file, page-oriented B+-Tree key-value index
//! with memory-mapped persistence.
//!
//! It is a single-writer, embedded index: no concurrency control, no
//! transactions, no crash recovery, and no deletion. Pages split
//! preemptively on the way down an insertion's descent, so every write
//! touches at most one page per level plus whatever the split itself
//! produces.
//!
//! ```no_run
//! use reedindex::{Options, Tree};
//!
//! # fn main() -> reedindex::ReedResult<()> {
//! let mut tree = Tree::open(Options::default())?;
//! tree.put(b"key".to_vec(), b"value".to_vec())?;
//! assert_eq!(tree.get(b"key")?.unwrap().value, b"value");
//! # Ok(())
//! # }
//! ```

mod error;
mod file;
mod free_list;
mod hierarchy;
mod kv;
mod options;
mod page;
mod pool;
mod tree;
mod varint;

pub use error::{ReedError, ReedResult};
pub use kv::KeyValuePair;
pub use options::{os_page_size, Options};
pub use tree::Tree;
