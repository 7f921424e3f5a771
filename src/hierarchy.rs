// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Drives descent through the B+-Tree: root tracking, preemptive splits on
//! the way down, and dirty-page write-back.

use std::collections::{HashMap, HashSet};

use crate::error::ReedResult;
use crate::free_list::FreePageList;
use crate::kv::KeyValuePair;
use crate::page::Page;
use crate::pool::PagePool;

/// Outcome of a `get`: either the stored pair, or a clean miss. Both cases
/// carry the leaf-page index the search landed on — the matched slot when
/// found, the insertion point when not — mirroring the `index`/`page`
/// fields `original_source/index/GetResult.go` attaches to its own
/// found/missing results. I/O and codec failures surface through the
/// enclosing `ReedResult`, not through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetResult {
    Found { pair: KeyValuePair, index: usize },
    NotFound { index: usize },
}

/// Owns the page pool and free list, and keeps an in-memory cache of every
/// page touched by the current operation. Pages are checked out of the
/// cache by removing them (yielding an owned, uniquely-held `Page`) and
/// checked back in by reinserting; this is how `put` obtains disjoint
/// mutable access to a page, its sibling, and its parent during a split
/// without unsafe code.
pub struct PageHierarchy {
    pool: PagePool,
    free_list: FreePageList,
    cache: HashMap<u32, Page>,
    root_id: u32,
    occupancy_percentage: u8,
}

impl PageHierarchy {
    pub fn new(pool: PagePool, free_list: FreePageList, root_id: u32, occupancy_percentage: u8) -> Self {
        Self {
            pool,
            free_list,
            cache: HashMap::new(),
            root_id,
            occupancy_percentage,
        }
    }

    pub fn root_page_id(&self) -> u32 {
        self.root_id
    }

    /// Fetch the page with `id`, reading it from disk on a cache miss.
    pub fn page_by_id(&mut self, id: u32) -> ReedResult<&Page> {
        self.fetch_or_cache(id)?;
        Ok(self.cache.get(&id).expect("just cached"))
    }

    /// Look up `key`, descending from the root.
    pub fn get(&mut self, key: &[u8]) -> ReedResult<GetResult> {
        self.get_from(self.root_id, key)
    }

    fn get_from(&mut self, page_id: u32, key: &[u8]) -> ReedResult<GetResult> {
        self.fetch_or_cache(page_id)?;
        let page = self.cache.get(&page_id).expect("just cached");
        let (index, found) = page.get(key);

        if page.is_leaf() {
            return Ok(if found {
                GetResult::Found {
                    pair: page.pair_at(index).clone(),
                    index,
                }
            } else {
                GetResult::NotFound { index }
            });
        }

        let child_index = if found { index + 1 } else { index };
        let child_id = page.child_ids()[child_index];
        self.get_from(child_id, key)
    }

    /// Insert or update `pair`, splitting eagerly on the way down so every
    /// page an insertion touches already has room.
    pub fn put(&mut self, pair: KeyValuePair) -> ReedResult<()> {
        let mut dirty_ids = Vec::new();
        let mut seen = HashSet::new();

        if self.is_eligible_for_split(self.root_id)? {
            self.split_root(&mut dirty_ids, &mut seen)?;
        }

        self.put_from(self.root_id, pair, &mut dirty_ids, &mut seen)?;

        for id in dirty_ids {
            let page = self.cache.get(&id).expect("dirty page stays cached");
            self.pool.write(page)?;
        }
        Ok(())
    }

    fn put_from(
        &mut self,
        page_id: u32,
        pair: KeyValuePair,
        dirty_ids: &mut Vec<u32>,
        seen: &mut HashSet<u32>,
    ) -> ReedResult<()> {
        let mut page = self.cache.remove(&page_id).expect("page already cached by caller");

        if page.is_leaf() {
            let (index, found) = page.get(&pair.key);
            if found {
                page.update_at(index, pair);
            } else {
                page.insert_at(index, pair);
            }
            mark_dirty(dirty_ids, seen, page_id);
            self.cache.insert(page_id, page);
            return Ok(());
        }

        let (mut index, found) = page.get(&pair.key);
        if found {
            index += 1;
        }
        let mut child_id = page.child_ids()[index];
        self.fetch_or_cache(child_id)?;

        if self.is_eligible_for_split(child_id)? {
            let sibling_id = self.allocate_one_page()?;
            let mut child = self.cache.remove(&child_id).expect("just fetched");
            let mut sibling = self.cache.remove(&sibling_id).expect("just allocated");

            let split_ids = child.split(&mut page, &mut sibling, index);
            for id in split_ids {
                mark_dirty(dirty_ids, seen, id);
            }

            // The separator just promoted into `page` sits at `index`; if
            // the incoming key is not smaller than it, the value belongs
            // in the page to its right. Re-read both candidate ids from
            // `page` rather than assuming `child_id` is still the left
            // one: a leaf split leaves the original id at `index` (sibling
            // goes to `index + 1`), but an internal split inserts the
            // sibling to the LEFT of the original id (spec.md's leaf/
            // internal split asymmetry), so the original id may now sit at
            // `index + 1` instead.
            let redirect = pair.key >= page.pair_at(index).key;
            self.cache.insert(child_id, child);
            self.cache.insert(sibling_id, sibling);
            child_id = if redirect {
                page.child_ids()[index + 1]
            } else {
                page.child_ids()[index]
            };
        }

        self.cache.insert(page_id, page);
        self.put_from(child_id, pair, dirty_ids, seen)
    }

    fn split_root(&mut self, dirty_ids: &mut Vec<u32>, seen: &mut HashSet<u32>) -> ReedResult<()> {
        let old_root_id = self.root_id;
        let new_root_id = self.allocate_one_page()?;
        let sibling_id = self.allocate_one_page()?;

        let mut old_root = self.cache.remove(&old_root_id).expect("root always cached");
        let mut new_root = self.cache.remove(&new_root_id).expect("just allocated");
        let mut sibling = self.cache.remove(&sibling_id).expect("just allocated");

        new_root.insert_child_at(0, old_root_id);
        let split_ids = old_root.split(&mut new_root, &mut sibling, 0);
        for id in split_ids {
            mark_dirty(dirty_ids, seen, id);
        }

        self.root_id = new_root_id;
        self.cache.insert(old_root_id, old_root);
        self.cache.insert(new_root_id, new_root);
        self.cache.insert(sibling_id, sibling);
        log::debug!("promoted new root {} (old root {})", new_root_id, old_root_id);
        Ok(())
    }

    /// A page becomes eligible for a preemptive split once its encoded
    /// size reaches the configured occupancy threshold of the page size.
    fn is_eligible_for_split(&mut self, page_id: u32) -> ReedResult<bool> {
        self.fetch_or_cache(page_id)?;
        let page = self.cache.get(&page_id).expect("just cached");
        let threshold = (self.occupancy_percentage as usize * self.pool.page_size()) / 100;
        Ok(page.size() >= threshold)
    }

    fn fetch_or_cache(&mut self, page_id: u32) -> ReedResult<()> {
        if self.cache.contains_key(&page_id) {
            return Ok(());
        }
        let page = self.pool.read(page_id)?;
        self.cache.insert(page_id, page);
        Ok(())
    }

    /// Release the underlying file. Does not flush the cache; callers must
    /// have already written back anything dirty (as `put` does after every
    /// call).
    pub fn close(self) -> ReedResult<()> {
        self.pool.close()
    }

    /// Allocate one fresh page id, preferring the free list before growing
    /// the file, and seed the cache with an empty page for it.
    fn allocate_one_page(&mut self) -> ReedResult<u32> {
        let id = match self.free_list.allocate(1) {
            Some(id) => id,
            None => self.pool.allocate(1)?,
        };
        self.cache.insert(id, Page::new(id));
        Ok(id)
    }
}

fn mark_dirty(dirty_ids: &mut Vec<u32>, seen: &mut HashSet<u32>, id: u32) {
    if seen.insert(id) {
        dirty_ids.push(id);
    }
}

#[cfg(test)]
#[path = "hierarchy_test.rs"]
mod hierarchy_test;
