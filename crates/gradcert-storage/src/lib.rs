//! # gradcert-storage
//!
//! Storage abstraction layer for gradcert using RocksDB.
//!
//! This crate provides the key-value storage interface the registry and
//! certificate services are written against, plus the RocksDB implementation
//! used in production and tests.

#![warn(clippy::all)]

pub mod column_families;
pub mod errors;
pub mod rocksdb_impl;
pub mod traits;

pub use column_families::*;
pub use errors::{Result, StorageError};
pub use rocksdb_impl::RocksDbStorage;
pub use traits::{Batch, BatchExt, Storage};
