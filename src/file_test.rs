// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Tests for the memory-mapped index file.

use super::*;
use tempfile::tempdir;

#[test]
fn opens_empty_file_unmapped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.db");
    let file = IndexFile::open(&path).unwrap();
    assert_eq!(file.size(), 0);
}

#[test]
fn resize_then_read_write_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.db");
    let mut file = IndexFile::open(&path).unwrap();

    file.resize_to(4096).unwrap();
    assert_eq!(file.size(), 4096);

    file.write_at(10, b"hello").unwrap();
    let read = file.read_from(10, 5).unwrap();
    assert_eq!(read, b"hello");
}

#[test]
fn read_past_map_end_is_unexpected_eof() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.db");
    let mut file = IndexFile::open(&path).unwrap();
    file.resize_to(16).unwrap();

    let result = file.read_from(10, 100);
    assert!(result.is_err());
}

#[test]
fn resize_preserves_existing_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.db");
    let mut file = IndexFile::open(&path).unwrap();
    file.resize_to(4096).unwrap();
    file.write_at(0, b"preserved").unwrap();

    file.resize_to(8192).unwrap();
    assert_eq!(file.size(), 8192);
    assert_eq!(file.read_from(0, 9).unwrap(), b"preserved");
}

#[test]
fn reopening_existing_file_maps_it_immediately() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.db");
    {
        let mut file = IndexFile::open(&path).unwrap();
        file.resize_to(4096).unwrap();
        file.write_at(0, b"persisted").unwrap();
        file.close().unwrap();
    }

    let file = IndexFile::open(&path).unwrap();
    assert_eq!(file.size(), 4096);
    assert_eq!(file.read_from(0, 9).unwrap(), b"persisted");
}
