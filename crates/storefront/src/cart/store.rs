//! The in-memory cart and its write-through to per-user snapshots.

use thiserror::Error;

use bookstall_core::{Book, BookId, LineItem, Quantity, QuantityError, UserId};

use super::persistence::CartPersistence;
use crate::storage::KeyValueStore;

/// What a successful mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line item was appended with quantity 1.
    Added,
    /// An existing line item's quantity changed.
    QuantityUpdated,
    /// A line item was deleted.
    Removed,
    /// The whole cart was emptied.
    Cleared,
}

/// Why a mutation was refused. Nothing is mutated when this is returned,
/// and nothing is written unless a rejected remove finds the cart diverged;
/// callers may ignore it or show it to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartRejection {
    /// No line item with that book id.
    #[error("book is not in the cart")]
    NotInCart,
    /// The requested quantity is zero, negative or not a number.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),
    /// Decreasing would take the quantity below one; remove the line instead.
    #[error("quantity is already at the minimum of one")]
    AtMinimum,
}

/// Outcome of a cart mutation.
pub type CartResult = Result<CartChange, CartRejection>;

/// Authoritative cart state for one session.
///
/// Holds the ordered line items (unique by book id, each with quantity of
/// at least one) and mirrors them to the snapshot of the user passed to
/// each mutation. Storage failures never surface as errors: they are logged
/// and the in-memory change is kept. [`CartStore::is_diverged`] reports
/// whether the last write-through failed.
#[derive(Debug)]
pub struct CartStore<S> {
    items: Vec<LineItem>,
    persistence: CartPersistence<S>,
    diverged: bool,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create an empty cart over `store`. Nothing is read until
    /// [`load_for_user`](Self::load_for_user) is called.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            items: Vec::new(),
            persistence: CartPersistence::new(store),
            diverged: false,
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The line item for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &BookId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Whether a line item for `id` exists.
    #[must_use]
    pub fn contains(&self, id: &BookId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `true` when the last write-through failed, so the in-memory cart
    /// may not match what is stored.
    #[must_use]
    pub const fn is_diverged(&self) -> bool {
        self.diverged
    }

    /// The persistence adapter, for callers that need the raw store.
    #[must_use]
    pub const fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    /// Replace the in-memory cart with `user`'s snapshot (empty if there is
    /// none or it cannot be read).
    pub fn load_for_user(&mut self, user: Option<&UserId>) {
        self.items = self.persistence.load(user);
        self.diverged = false;
        tracing::debug!(
            key = %CartPersistence::<S>::key_for(user),
            items = self.items.len(),
            "Loaded cart for user"
        );
    }

    /// Re-read `user`'s snapshot, discarding in-memory state. Same as
    /// [`load_for_user`](Self::load_for_user); used to pick up writes made
    /// by another store sharing the same storage.
    pub fn sync_for_user(&mut self, user: Option<&UserId>) {
        self.load_for_user(user);
    }

    /// Add one copy of `book`: a new line item if absent, otherwise one
    /// more of the existing line.
    pub fn add(&mut self, book: &Book, user: Option<&UserId>) -> CartChange {
        let change = if let Some(item) = self.find_mut(&book.id) {
            item.quantity = item.quantity.incremented();
            CartChange::QuantityUpdated
        } else {
            self.items.push(LineItem::new(book.clone()));
            CartChange::Added
        };
        tracing::debug!(book_id = %book.id, ?change, "Added book to cart");
        self.write_through(user);
        change
    }

    /// Delete the line item for `id`.
    ///
    /// A diverged cart is written through even when nothing was removed, so
    /// the stored snapshot catches up with memory.
    ///
    /// # Errors
    ///
    /// [`CartRejection::NotInCart`] if there is no such line item.
    pub fn remove(&mut self, id: &BookId, user: Option<&UserId>) -> CartResult {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() == before {
            if self.diverged {
                self.write_through(user);
            }
            return Err(CartRejection::NotInCart);
        }
        tracing::debug!(book_id = %id, "Removed book from cart");
        self.write_through(user);
        Ok(CartChange::Removed)
    }

    /// One more copy of an existing line item.
    ///
    /// # Errors
    ///
    /// [`CartRejection::NotInCart`] if there is no such line item.
    pub fn increase(&mut self, id: &BookId, user: Option<&UserId>) -> CartResult {
        let item = self.find_mut(id).ok_or(CartRejection::NotInCart)?;
        item.quantity = item.quantity.incremented();
        tracing::debug!(book_id = %id, quantity = %item.quantity, "Increased quantity");
        self.write_through(user);
        Ok(CartChange::QuantityUpdated)
    }

    /// One fewer copy of an existing line item; never goes below one.
    ///
    /// # Errors
    ///
    /// [`CartRejection::NotInCart`] if there is no such line item,
    /// [`CartRejection::AtMinimum`] if its quantity is already one.
    pub fn decrease(&mut self, id: &BookId, user: Option<&UserId>) -> CartResult {
        let item = self.find_mut(id).ok_or(CartRejection::NotInCart)?;
        item.quantity = item.quantity.decremented().ok_or(CartRejection::AtMinimum)?;
        tracing::debug!(book_id = %id, quantity = %item.quantity, "Decreased quantity");
        self.write_through(user);
        Ok(CartChange::QuantityUpdated)
    }

    /// Set an existing line item's quantity.
    ///
    /// Accepts anything convertible to a [`Quantity`]: a `Quantity`, an
    /// `i64`, or a `&str` from a form field.
    ///
    /// # Errors
    ///
    /// [`CartRejection::NotInCart`] if there is no such line item,
    /// [`CartRejection::InvalidQuantity`] if `quantity` is not a positive
    /// integer.
    pub fn set_quantity<Q>(&mut self, id: &BookId, quantity: Q, user: Option<&UserId>) -> CartResult
    where
        Q: TryInto<Quantity>,
        Q::Error: Into<QuantityError>,
    {
        let item = self.find_mut(id).ok_or(CartRejection::NotInCart)?;
        let quantity: Quantity = quantity
            .try_into()
            .map_err(|e| CartRejection::InvalidQuantity(e.into()))?;
        item.quantity = quantity;
        tracing::debug!(book_id = %id, %quantity, "Set quantity");
        self.write_through(user);
        Ok(CartChange::QuantityUpdated)
    }

    /// Empty the cart and delete `user`'s snapshot key.
    pub fn clear(&mut self, user: Option<&UserId>) -> CartChange {
        self.items.clear();
        self.diverged = !self.persistence.remove(user);
        tracing::debug!(key = %CartPersistence::<S>::key_for(user), "Cleared cart");
        CartChange::Cleared
    }

    /// Empty the in-memory cart only. Stored snapshots are untouched so the
    /// user's cart comes back on their next login.
    pub fn clear_on_logout(&mut self) {
        self.items.clear();
        self.diverged = false;
        tracing::debug!("Detached cart on logout");
    }

    fn find_mut(&mut self, id: &BookId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    fn write_through(&mut self, user: Option<&UserId>) {
        self.diverged = !self.persistence.save(&self.items, user);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::GUEST_KEY;
    use crate::storage::MemoryStore;

    fn book(id: &str) -> Book {
        Book::new(id, format!("Book {id}"), Decimal::from(100))
    }

    fn quantity_of(cart: &CartStore<MemoryStore>, id: &str) -> Option<u32> {
        cart.get(&BookId::new(id)).map(|item| item.quantity.get())
    }

    fn stored(store: &MemoryStore, key: &str) -> Option<Vec<LineItem>> {
        store
            .get(key)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn test_add_new_then_existing() {
        let mut cart = CartStore::new(MemoryStore::new());
        assert_eq!(cart.add(&book("b1"), None), CartChange::Added);
        assert_eq!(cart.add(&book("b1"), None), CartChange::QuantityUpdated);

        assert_eq!(cart.len(), 1);
        assert_eq!(quantity_of(&cart, "b1"), Some(2));
    }

    #[test]
    fn test_add_writes_through() {
        let store = MemoryStore::new();
        let mut cart = CartStore::new(store.clone());
        cart.add(&book("b1"), None);

        assert_eq!(stored(&store, GUEST_KEY).unwrap(), cart.items());
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = CartStore::new(MemoryStore::new());
        for id in ["b3", "b1", "b2", "b1"] {
            cart.add(&book(id), None);
        }
        let ids: Vec<&str> = cart.items().iter().map(|i| i.id().as_str()).collect();
        assert_eq!(ids, ["b3", "b1", "b2"]);
    }

    #[test]
    fn test_remove_missing_is_rejected_without_write() {
        let store = MemoryStore::new();
        let mut cart = CartStore::new(store.clone());
        assert_eq!(
            cart.remove(&BookId::new("nope"), None),
            Err(CartRejection::NotInCart)
        );
        assert!(store.get(GUEST_KEY).unwrap().is_none());
    }

    #[test]
    fn test_remove_last_item_keeps_empty_snapshot() {
        let store = MemoryStore::new();
        let mut cart = CartStore::new(store.clone());
        cart.add(&book("b1"), None);
        assert_eq!(cart.remove(&BookId::new("b1"), None), Ok(CartChange::Removed));

        assert!(cart.is_empty());
        assert_eq!(store.get(GUEST_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_increase() {
        let mut cart = CartStore::new(MemoryStore::new());
        cart.add(&book("b1"), None);
        cart.increase(&BookId::new("b1"), None).unwrap();
        assert_eq!(quantity_of(&cart, "b1"), Some(2));
        assert_eq!(
            cart.increase(&BookId::new("b2"), None),
            Err(CartRejection::NotInCart)
        );
    }

    #[test]
    fn test_decrease_never_below_one() {
        let mut cart = CartStore::new(MemoryStore::new());
        cart.add(&book("b1"), None);
        cart.add(&book("b1"), None);

        assert_eq!(
            cart.decrease(&BookId::new("b1"), None),
            Ok(CartChange::QuantityUpdated)
        );
        assert_eq!(
            cart.decrease(&BookId::new("b1"), None),
            Err(CartRejection::AtMinimum)
        );
        assert_eq!(quantity_of(&cart, "b1"), Some(1));
    }

    #[test]
    fn test_set_quantity_accepts_int_str_and_quantity() {
        let mut cart = CartStore::new(MemoryStore::new());
        let id = BookId::new("b1");
        cart.add(&book("b1"), None);

        cart.set_quantity(&id, 5_i64, None).unwrap();
        assert_eq!(quantity_of(&cart, "b1"), Some(5));
        cart.set_quantity(&id, "8", None).unwrap();
        assert_eq!(quantity_of(&cart, "b1"), Some(8));
        cart.set_quantity(&id, Quantity::ONE, None).unwrap();
        assert_eq!(quantity_of(&cart, "b1"), Some(1));
    }

    #[test]
    fn test_set_quantity_rejects_invalid_without_write() {
        let store = MemoryStore::new();
        let mut cart = CartStore::new(store.clone());
        let id = BookId::new("b1");
        cart.add(&book("b1"), None);
        cart.set_quantity(&id, 5_i64, None).unwrap();
        let snapshot = store.get(GUEST_KEY).unwrap();

        for bad in [0_i64, -1] {
            assert!(matches!(
                cart.set_quantity(&id, bad, None),
                Err(CartRejection::InvalidQuantity(_))
            ));
        }
        assert!(matches!(
            cart.set_quantity(&id, "abc", None),
            Err(CartRejection::InvalidQuantity(QuantityError::NotANumber(_)))
        ));

        assert_eq!(quantity_of(&cart, "b1"), Some(5));
        assert_eq!(store.get(GUEST_KEY).unwrap(), snapshot);
    }

    #[test]
    fn test_set_quantity_missing_item_checked_first() {
        let mut cart = CartStore::new(MemoryStore::new());
        assert_eq!(
            cart.set_quantity(&BookId::new("b1"), -4_i64, None),
            Err(CartRejection::NotInCart)
        );
    }

    #[test]
    fn test_clear_removes_key() {
        let store = MemoryStore::new();
        let mut cart = CartStore::new(store.clone());
        cart.add(&book("b1"), None);

        assert_eq!(cart.clear(None), CartChange::Cleared);
        assert!(cart.is_empty());
        assert!(store.get(GUEST_KEY).unwrap().is_none());
    }

    #[test]
    fn test_clear_on_logout_keeps_snapshot() {
        let store = MemoryStore::new();
        let user = UserId::new("u1");
        let mut cart = CartStore::new(store.clone());
        cart.add(&book("b1"), Some(&user));

        cart.clear_on_logout();
        assert!(cart.is_empty());
        assert_eq!(stored(&store, "cart_u1").unwrap().len(), 1);

        cart.load_for_user(Some(&user));
        assert_eq!(quantity_of(&cart, "b1"), Some(1));
    }

    #[test]
    fn test_load_for_user_replaces_state() {
        let store = MemoryStore::new();
        let mut cart = CartStore::new(store);
        cart.add(&book("guest-book"), None);

        cart.load_for_user(Some(&UserId::new("u9")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_sync_picks_up_other_writer() {
        let store = MemoryStore::new();
        let mut tab_a = CartStore::new(store.clone());
        let mut tab_b = CartStore::new(store);

        tab_a.add(&book("b1"), None);
        assert!(tab_b.is_empty());

        tab_b.sync_for_user(None);
        assert_eq!(quantity_of(&tab_b, "b1"), Some(1));
    }
}
