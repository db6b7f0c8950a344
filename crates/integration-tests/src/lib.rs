//! Integration tests for Bookstall.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bookstall-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Guest and signed-in cart flows end to end
//! - `cart_persistence` - Snapshots on disk, corrupt data, storage failures
//!
//! This crate also provides shared fixtures: sample books and a
//! [`FailingStore`] whose writes can be made to fail on demand.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rust_decimal::Decimal;

use bookstall_core::Book;
use bookstall_storefront::storage::{KeyValueStore, MemoryStore, StorageError};

/// A book priced in whole rupees.
#[must_use]
pub fn book(id: &str, rupees: i64) -> Book {
    Book::new(id, format!("Book {id}"), Decimal::from(rupees))
}

/// Memory-backed store whose writes fail while switched off.
///
/// Reads always succeed, so a store can be loaded and then made to refuse
/// the write-through of later mutations. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_writes: Arc<AtomicBool>,
}

impl FailingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `set` and `remove` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The backing store, for inspecting what was actually written.
    #[must_use]
    pub const fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_owned()));
        }
        Ok(())
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.check()?;
        self.inner.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys()
    }
}
