//! Per-user cart snapshots in a [`KeyValueStore`].
//!
//! Every user's cart lives under its own key (`cart_<userId>`), anonymous
//! visitors share `cart_guest`. Values are the JSON array of line items.
//!
//! Nothing in here fails outward: storage and parse errors are logged and
//! reported to the caller as a plain `false` / empty cart.

use std::collections::HashSet;

use thiserror::Error;

use bookstall_core::{BookId, LineItem, UserId};

use crate::storage::{KeyValueStore, StorageError};

/// Key prefix for every cart snapshot.
pub const KEY_PREFIX: &str = "cart_";

/// Key used when no user is signed in.
pub const GUEST_KEY: &str = "cart_guest";

/// Why a stored snapshot could not be used.
#[derive(Debug, Error)]
enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("snapshot is not a valid cart: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot lists book {0} more than once")]
    DuplicateId(BookId),
}

/// Maps user identity to a storage key and reads/writes cart snapshots.
#[derive(Debug, Clone)]
pub struct CartPersistence<S> {
    store: S,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Wrap a key-value store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Storage key for `user`: `cart_<id>`, or `cart_guest` when the id is
    /// absent or blank.
    #[must_use]
    pub fn key_for(user: Option<&UserId>) -> String {
        match user {
            Some(id) if !id.is_blank() => format!("{KEY_PREFIX}{id}"),
            _ => GUEST_KEY.to_owned(),
        }
    }

    /// Write `items` as the snapshot for `user`. Returns `false` (after
    /// logging) if the snapshot could not be written.
    pub fn save(&self, items: &[LineItem], user: Option<&UserId>) -> bool {
        let key = Self::key_for(user);
        let result = serde_json::to_string(items)
            .map_err(|e| e.to_string())
            .and_then(|json| self.store.set(&key, &json).map_err(|e| e.to_string()));

        match result {
            Ok(()) => {
                tracing::debug!(key = %key, items = items.len(), "Saved cart snapshot");
                true
            }
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "Error saving cart to storage");
                false
            }
        }
    }

    /// Read the snapshot for `user`.
    ///
    /// A missing key is an empty cart. A snapshot that cannot be read or
    /// parsed, holds a zero quantity, or repeats a book id is logged and
    /// also treated as empty; no partial cart is ever returned.
    #[must_use]
    pub fn load(&self, user: Option<&UserId>) -> Vec<LineItem> {
        let key = Self::key_for(user);
        match self.try_load(&key) {
            Ok(items) => {
                tracing::debug!(key = %key, items = items.len(), "Loaded cart snapshot");
                items
            }
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "Error loading cart from storage");
                Vec::new()
            }
        }
    }

    /// Delete the snapshot for `user` entirely. Returns `false` (after
    /// logging) if the store refused.
    pub fn remove(&self, user: Option<&UserId>) -> bool {
        let key = Self::key_for(user);
        match self.store.remove(&key) {
            Ok(existed) => {
                tracing::debug!(key = %key, existed, "Removed cart snapshot");
                true
            }
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "Error clearing cart from storage");
                false
            }
        }
    }

    fn try_load(&self, key: &str) -> Result<Vec<LineItem>, LoadError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(Vec::new());
        };
        let items: Vec<LineItem> = serde_json::from_str(&raw)?;

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                return Err(LoadError::DuplicateId(item.id().clone()));
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use bookstall_core::{Book, Quantity};

    use super::*;
    use crate::storage::MemoryStore;

    type Persistence = CartPersistence<MemoryStore>;

    fn item(id: &str, quantity: u32) -> LineItem {
        LineItem {
            book: Book::new(id, format!("Book {id}"), Decimal::from(100)),
            quantity: Quantity::new(quantity).unwrap(),
        }
    }

    #[test]
    fn test_key_for() {
        assert_eq!(Persistence::key_for(None), "cart_guest");
        assert_eq!(Persistence::key_for(Some(&UserId::new("u42"))), "cart_u42");
        assert_eq!(Persistence::key_for(Some(&UserId::new(""))), "cart_guest");
    }

    #[test]
    fn test_save_then_load_preserves_order_and_quantities() {
        let persistence = CartPersistence::new(MemoryStore::new());
        let user = UserId::new("u1");
        let cart = vec![item("b3", 2), item("b1", 1), item("b2", 7)];

        assert!(persistence.save(&cart, Some(&user)));
        assert_eq!(persistence.load(Some(&user)), cart);
    }

    #[test]
    fn test_users_are_partitioned() {
        let persistence = CartPersistence::new(MemoryStore::new());
        persistence.save(&[item("b1", 1)], Some(&UserId::new("u1")));

        assert!(persistence.load(Some(&UserId::new("u2"))).is_empty());
        assert!(persistence.load(None).is_empty());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let persistence = CartPersistence::new(MemoryStore::new());
        assert!(persistence.load(None).is_empty());
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let store = MemoryStore::new();
        store.set(GUEST_KEY, "{not json").unwrap();
        let persistence = CartPersistence::new(store);
        assert!(persistence.load(None).is_empty());
    }

    #[test]
    fn test_load_duplicate_ids_is_empty() {
        let store = MemoryStore::new();
        store
            .set(
                GUEST_KEY,
                r#"[{"_id":"b1","quantity":1},{"_id":"b1","quantity":2}]"#,
            )
            .unwrap();
        let persistence = CartPersistence::new(store);
        assert!(persistence.load(None).is_empty());
    }

    #[test]
    fn test_remove_deletes_key() {
        let persistence = CartPersistence::new(MemoryStore::new());
        persistence.save(&[], None);
        assert!(persistence.store().get(GUEST_KEY).unwrap().is_some());

        assert!(persistence.remove(None));
        assert!(persistence.store().get(GUEST_KEY).unwrap().is_none());
    }
}
