// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Configuration for opening an index.

use crate::error::{ReedError, ReedResult};

/// Options required to open or create an index file.
///
/// ## Defaults
/// - `page_size`: `os_page_size()`
/// - `file_name`: `"index.db"`
/// - `preallocated_page_pool_size`: `10`
/// - `allowed_page_occupancy_percentage`: `80`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Page size in bytes. Must be a positive multiple of the OS page size.
    pub page_size: usize,

    /// Path to the index file.
    pub file_name: String,

    /// Number of pages eagerly allocated beyond meta+root on first open.
    pub preallocated_page_pool_size: usize,

    /// Split threshold as a percentage of `page_size`, in `[1, 100]`.
    pub allowed_page_occupancy_percentage: u8,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            page_size: os_page_size(),
            file_name: "index.db".to_string(),
            preallocated_page_pool_size: 10,
            allowed_page_occupancy_percentage: 80,
        }
    }
}

impl Options {
    /// Validate constraints spec'd in the external interface.
    ///
    /// ## Error Conditions
    /// - `page_size` is zero or not a multiple of `os_page_size()`.
    /// - `allowed_page_occupancy_percentage` is outside `[1, 100]`.
    pub fn validate(&self) -> ReedResult<()> {
        let os_size = os_page_size();
        if self.page_size == 0 || self.page_size % os_size != 0 {
            return Err(ReedError::InvalidOption {
                reason: format!(
                    "page_size {} must be a positive multiple of the OS page size {}",
                    self.page_size, os_size
                ),
            });
        }
        if self.allowed_page_occupancy_percentage == 0 || self.allowed_page_occupancy_percentage > 100 {
            return Err(ReedError::InvalidOption {
                reason: format!(
                    "allowed_page_occupancy_percentage {} must be in [1, 100]",
                    self.allowed_page_occupancy_percentage
                ),
            });
        }
        Ok(())
    }
}

/// Query the OS memory page size.
#[cfg(unix)]
pub fn os_page_size() -> usize {
    // SAFETY: sysconf with a valid name returns a plain integer, no pointers involved.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        4096
    }
}

/// Query the OS memory page size.
#[cfg(not(unix))]
pub fn os_page_size() -> usize {
    4096
}
