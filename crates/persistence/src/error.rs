// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Checksum mismatch in record at height {height}: expected {expected:#018x}, found {found:#018x}")]
    ChecksumMismatch {
        height: u32,
        expected: u64,
        found: u64,
    },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid record format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
