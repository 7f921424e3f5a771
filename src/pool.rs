// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Translates page ids to file offsets and grows the backing file on
//! demand.

use crate::error::{ReedError, ReedResult};
use crate::file::IndexFile;
use crate::page::Page;

/// Fixed-size page slots laid out back-to-back starting at file offset 0.
/// Page id `n` lives at byte offset `n * page_size`.
pub struct PagePool {
    index_file: IndexFile,
    page_size: usize,
    page_count: u64,
}

impl PagePool {
    pub fn new(index_file: IndexFile, page_size: usize) -> Self {
        let page_count = index_file.size() / page_size as u64;
        Self {
            index_file,
            page_size,
            page_count,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// `true` iff the backing file holds no pages yet (first-time open).
    pub fn contains_zero_pages(&self) -> bool {
        self.page_count == 0
    }

    /// Grow the file by `n` pages, returning the id of the first new page;
    /// the rest follow contiguously.
    ///
    /// ## Error Conditions
    /// - The underlying file cannot be resized.
    pub fn allocate(&mut self, n: u32) -> ReedResult<u32> {
        if self.page_count + n as u64 > u32::MAX as u64 {
            return Err(ReedError::AllocationFailure {
                reason: format!("page count would exceed u32::MAX (requested {} more)", n),
            });
        }
        let first_id = self.page_count as u32;
        let target_size = self.index_file.size() + n as u64 * self.page_size as u64;
        self.index_file.resize_to(target_size)?;
        self.page_count = self.index_file.size() / self.page_size as u64;
        log::debug!("grew page pool by {} page(s), first new id {}", n, first_id);
        Ok(first_id)
    }

    /// Read and decode the page at `page_id`.
    pub fn read(&self, page_id: u32) -> ReedResult<Page> {
        let bytes = self.index_file.read_from(self.offset_of(page_id), self.page_size)?;
        Page::decode(page_id, &bytes)
    }

    /// Encode and write `page` to its slot.
    ///
    /// ## Error Conditions
    /// - `page` encodes to more bytes than fit in one slot.
    pub fn write(&mut self, page: &Page) -> ReedResult<()> {
        let encoded = page.encode();
        if encoded.len() > self.page_size {
            return Err(ReedError::SerializationError {
                reason: format!(
                    "page {} encodes to {} bytes, exceeds page size {}",
                    page.id(),
                    encoded.len(),
                    self.page_size
                ),
            });
        }
        self.index_file.write_at(self.offset_of(page.id()), &encoded)
    }

    pub fn close(self) -> ReedResult<()> {
        self.index_file.close()
    }

    fn offset_of(&self, page_id: u32) -> u64 {
        page_id as u64 * self.page_size as u64
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
