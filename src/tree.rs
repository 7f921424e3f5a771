// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Top-level facade tying `Options`, `PagePool`, `FreePageList`, and
//! `PageHierarchy` together into a single open index.

use crate::error::ReedResult;
use crate::file::IndexFile;
use crate::free_list::FreePageList;
use crate::hierarchy::{GetResult, PageHierarchy};
use crate::kv::KeyValuePair;
use crate::options::Options;
use crate::page::Page;
use crate::pool::PagePool;

/// Fixed page ids reserved on first-time initialization: page 0 is an
/// unused meta slot (reserved for future use, never read), page 1 is the
/// always-present root.
const META_PAGE_ID: u32 = 0;
const INITIAL_ROOT_PAGE_ID: u32 = 1;

/// A single open B+-Tree index.
pub struct Tree {
    hierarchy: PageHierarchy,
}

impl Tree {
    /// Open the index file named by `options.file_name`, creating and
    /// initializing it if it does not already exist (or is empty).
    ///
    /// ## Error Conditions
    /// - `options` fails validation.
    /// - Any I/O error opening, growing, or mapping the file.
    ///
    /// ## Open Questions
    /// Reopening an existing, non-empty file does not reload the root
    /// page id or the free list: neither is persisted anywhere in the
    /// on-disk format. This mirrors a limitation of the design this index
    /// is based on. Rather than reproduce it unsafely, a reopened tree
    /// assumes the root still lives at `INITIAL_ROOT_PAGE_ID` (true for
    /// every tree this crate itself creates, since the root is never
    /// relocated after promotion changes its id... other than by that very
    /// promotion) and starts with an empty free list, so that allocation
    /// simply falls through to growing the file instead of reusing pages
    /// that may already be referenced elsewhere in the tree.
    pub fn open(options: Options) -> ReedResult<Self> {
        options.validate()?;

        let index_file = IndexFile::open(&options.file_name)?;
        let mut pool = PagePool::new(index_file, options.page_size);

        let (root_id, free_list) = if pool.contains_zero_pages() {
            let meta_id = pool.allocate(1)?;
            debug_assert_eq!(meta_id, META_PAGE_ID, "meta page must be the first page allocated");
            pool.write(&Page::new(meta_id))?;
            let root_id = pool.allocate(1)?;
            debug_assert_eq!(root_id, INITIAL_ROOT_PAGE_ID, "root page must be the second page allocated");
            pool.write(&Page::new(root_id))?;

            let free_list = if options.preallocated_page_pool_size > 0 {
                let first = pool.allocate(options.preallocated_page_pool_size as u32)?;
                FreePageList::initialize(first, options.preallocated_page_pool_size as u32)
            } else {
                FreePageList::new()
            };

            log::debug!(
                "initialized new index: meta={}, root={}, preallocated={}",
                meta_id,
                root_id,
                options.preallocated_page_pool_size
            );
            (root_id, free_list)
        } else {
            log::debug!("reopened existing index, free list not reloaded");
            (INITIAL_ROOT_PAGE_ID, FreePageList::new())
        };

        let hierarchy = PageHierarchy::new(pool, free_list, root_id, options.allowed_page_occupancy_percentage);
        Ok(Self { hierarchy })
    }

    /// Insert `key` with `value`, or overwrite the existing value if `key`
    /// is already present.
    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> ReedResult<()> {
        self.hierarchy.put(KeyValuePair::new(key, value))
    }

    /// Look up `key`. `Ok(None)` is a clean miss; `Err` is an I/O or codec
    /// failure encountered while descending.
    pub fn get(&mut self, key: &[u8]) -> ReedResult<Option<KeyValuePair>> {
        match self.hierarchy.get(key)? {
            GetResult::Found { pair, .. } => Ok(Some(pair)),
            GetResult::NotFound { .. } => Ok(None),
        }
    }

    pub fn root_page_id(&self) -> u32 {
        self.hierarchy.root_page_id()
    }

    pub fn close(self) -> ReedResult<()> {
        self.hierarchy.close()
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
