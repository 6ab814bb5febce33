// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Append-only log of connected stake index entries.

pub mod error;
pub mod record;
pub mod store;

pub use error::{PersistenceError, Result};
pub use record::StakeRecord;
pub use store::{append_record, read_all, RecordReader};
