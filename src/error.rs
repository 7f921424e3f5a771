// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the B+-Tree index.

use std::fmt;

/// Standard Result type for all index operations.
pub type ReedResult<T> = Result<T, ReedError>;

/// Error types surfaced by the index.
#[derive(Debug, Clone)]
pub enum ReedError {
    /// I/O error during file open/stat/truncate/mmap/unmap/read/write.
    IoError { operation: String, reason: String },

    /// The page codec encountered truncated or inconsistent bytes.
    SerializationError { reason: String },

    /// `PagePool::allocate` could not grow the file.
    AllocationFailure { reason: String },

    /// An `Options` value failed validation at open.
    InvalidOption { reason: String },
}

impl fmt::Display for ReedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError { operation, reason } => {
                write!(f, "I/O error during '{}': {}", operation, reason)
            }
            Self::SerializationError { reason } => {
                write!(f, "Serialization error: {}", reason)
            }
            Self::AllocationFailure { reason } => {
                write!(f, "Allocation failure: {}", reason)
            }
            Self::InvalidOption { reason } => {
                write!(f, "Invalid option: {}", reason)
            }
        }
    }
}

impl std::error::Error for ReedError {}

impl From<std::io::Error> for ReedError {
    fn from(err: std::io::Error) -> Self {
        ReedError::IoError {
            operation: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}
