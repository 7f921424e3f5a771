// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The on-disk file and its memory-mapped view.
//!
//! `IndexFile` owns a file opened read/write (created if missing), tracks
//! its size, and offers raw byte read/write at offsets through a
//! memory-mapped region that is unmapped and remapped whenever the file is
//! resized.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use memmap2::MmapMut;

use crate::error::{ReedError, ReedResult};

pub struct IndexFile {
    file: File,
    size: u64,
    mmap: Option<MmapMut>,
}

impl IndexFile {
    /// Open or create the file at `path`. If the file is non-empty, map it
    /// read/write immediately.
    ///
    /// ## Error Conditions
    /// - Any OS error opening, stating, or mapping the file.
    pub fn open(path: impl AsRef<Path>) -> ReedResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| io_error("open", e))?;

        let size = file.metadata().map_err(|e| io_error("stat", e))?.len();

        let mut index_file = IndexFile {
            file,
            size,
            mmap: None,
        };
        if size > 0 {
            index_file.remap()?;
        }
        log::debug!("opened index file {} ({} bytes existing)", path.display(), size);
        Ok(index_file)
    }

    /// Current file size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Unmap (idempotent), truncate to `size_bytes`, remap. Post:
    /// `self.size() == size_bytes` and the map covers `[0, size_bytes)`.
    pub fn resize_to(&mut self, size_bytes: u64) -> ReedResult<()> {
        log::trace!("resizing index file from {} to {} bytes", self.size, size_bytes);
        self.unmap();
        self.file
            .set_len(size_bytes)
            .map_err(|e| io_error("truncate", e))?;
        self.size = size_bytes;
        if size_bytes > 0 {
            self.remap()?;
        }
        Ok(())
    }

    /// Copy `n` bytes starting at `offset` out of the map into a fresh
    /// buffer.
    ///
    /// ## Error Conditions
    /// - The map is shorter than `offset + n` (`UnexpectedEof`).
    pub fn read_from(&self, offset: u64, n: usize) -> ReedResult<Vec<u8>> {
        let mmap = self.mmap.as_ref().ok_or_else(|| {
            io_error(
                "read_from",
                io::Error::new(io::ErrorKind::UnexpectedEof, "index file is not mapped"),
            )
        })?;
        let start = offset as usize;
        let end = start + n;
        if end > mmap.len() {
            return Err(io_error(
                "read_from",
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "requested [{}, {}) but map is {} bytes",
                        start,
                        end,
                        mmap.len()
                    ),
                ),
            ));
        }
        Ok(mmap[start..end].to_vec())
    }

    /// Copy `buf` into the map at `offset`. Caller guarantees the range
    /// fits; out-of-range offsets panic rather than being silently
    /// truncated.
    pub fn write_at(&mut self, offset: u64, buf: &[u8]) -> ReedResult<()> {
        let mmap = self.mmap.as_mut().ok_or_else(|| {
            io_error(
                "write_at",
                io::Error::new(io::ErrorKind::UnexpectedEof, "index file is not mapped"),
            )
        })?;
        let start = offset as usize;
        mmap[start..start + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    /// Unmap then close the file.
    pub fn close(mut self) -> ReedResult<()> {
        self.unmap();
        Ok(())
    }

    fn unmap(&mut self) {
        self.mmap = None;
    }

    fn remap(&mut self) -> ReedResult<()> {
        self.unmap();
        // SAFETY: the file is exclusively owned by this IndexFile for its
        // lifetime; no other process is expected to touch it concurrently.
        let mmap = unsafe { MmapMut::map_mut(&self.file) }.map_err(|e| io_error("mmap", e))?;
        self.mmap = Some(mmap);
        Ok(())
    }
}

fn io_error(operation: &str, err: io::Error) -> ReedError {
    ReedError::IoError {
        operation: operation.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;
