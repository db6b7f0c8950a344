//! Binding the cart to the signed-in user.
//!
//! The auth layer (token handling, login/registration requests) lives
//! outside this crate. It tells a [`CartSession`] when a session starts or
//! ends; the session loads or detaches the right cart and supplies the
//! current user id to every cart operation.

use serde::{Deserialize, Serialize};

use bookstall_core::{Book, BookId, Email, LineItem, Quantity, QuantityError, Role, UserId};

use crate::cart::{CartChange, CartResult, CartStore};
use crate::storage::KeyValueStore;

/// Identity of the signed-in user, as decoded from the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub role: Role,
}

impl SessionUser {
    /// A regular user with just an id.
    #[must_use]
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            username: String::new(),
            email: None,
            role: Role::User,
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// A cart bound to whoever is currently signed in.
#[derive(Debug)]
pub struct CartSession<S> {
    cart: CartStore<S>,
    user: Option<SessionUser>,
}

impl<S: KeyValueStore> CartSession<S> {
    /// Anonymous session with an empty, unloaded cart.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            cart: CartStore::new(store),
            user: None,
        }
    }

    /// App start. Loads the user's cart if a session was restored; an
    /// anonymous start leaves the cart empty.
    pub fn restore(&mut self, user: Option<SessionUser>) {
        self.user = user;
        if let Some(user) = &self.user {
            tracing::info!(user_id = %user.id, "Restored session");
            self.cart.load_for_user(Some(&user.id));
        }
    }

    /// Successful login: bind the user and load their cart.
    pub fn login(&mut self, user: SessionUser) {
        tracing::info!(user_id = %user.id, "User logged in");
        self.bind(user);
    }

    /// Successful registration: same as login.
    pub fn register(&mut self, user: SessionUser) {
        tracing::info!(user_id = %user.id, "User registered");
        self.bind(user);
    }

    /// End the session. The in-memory cart is emptied; the user's stored
    /// cart is kept for their next login.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "User logged out");
        }
        self.cart.clear_on_logout();
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.role.is_admin())
    }

    /// The underlying cart, for rendering.
    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// Line items of the current cart.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    pub fn add(&mut self, book: &Book) -> CartChange {
        self.cart.add(book, self.user.as_ref().map(|user| &user.id))
    }

    /// # Errors
    ///
    /// See [`CartStore::remove`].
    pub fn remove(&mut self, id: &BookId) -> CartResult {
        self.cart.remove(id, self.user.as_ref().map(|user| &user.id))
    }

    /// # Errors
    ///
    /// See [`CartStore::increase`].
    pub fn increase(&mut self, id: &BookId) -> CartResult {
        self.cart.increase(id, self.user.as_ref().map(|user| &user.id))
    }

    /// # Errors
    ///
    /// See [`CartStore::decrease`].
    pub fn decrease(&mut self, id: &BookId) -> CartResult {
        self.cart.decrease(id, self.user.as_ref().map(|user| &user.id))
    }

    /// # Errors
    ///
    /// See [`CartStore::set_quantity`].
    pub fn set_quantity<Q>(&mut self, id: &BookId, quantity: Q) -> CartResult
    where
        Q: TryInto<Quantity>,
        Q::Error: Into<QuantityError>,
    {
        self.cart.set_quantity(id, quantity, self.user.as_ref().map(|user| &user.id))
    }

    pub fn clear(&mut self) -> CartChange {
        self.cart.clear(self.user.as_ref().map(|user| &user.id))
    }

    /// Re-read the current user's snapshot (e.g. when the window regains
    /// focus and another tab may have written it).
    pub fn sync(&mut self) {
        self.cart.sync_for_user(self.user.as_ref().map(|user| &user.id));
    }

    fn bind(&mut self, user: SessionUser) {
        self.cart.load_for_user(Some(&user.id));
        self.user = Some(user);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::storage::MemoryStore;

    fn book(id: &str) -> Book {
        Book::new(id, id, Decimal::from(50))
    }

    #[test]
    fn test_anonymous_writes_guest_key() {
        let store = MemoryStore::new();
        let mut session = CartSession::new(store.clone());
        session.restore(None);
        session.add(&book("b1"));

        assert!(!session.is_authenticated());
        assert!(store.get("cart_guest").unwrap().is_some());
    }

    #[test]
    fn test_login_loads_and_writes_user_key() {
        let store = MemoryStore::new();
        let mut session = CartSession::new(store.clone());
        session.login(SessionUser::new("u1"));
        session.add(&book("b1"));

        assert!(store.get("cart_u1").unwrap().is_some());
        assert!(store.get("cart_guest").unwrap().is_none());
    }

    #[test]
    fn test_logout_detaches_but_keeps_snapshot() {
        let store = MemoryStore::new();
        let mut session = CartSession::new(store.clone());
        session.login(SessionUser::new("u1"));
        session.add(&book("b1"));

        session.logout();
        assert!(session.items().is_empty());
        assert!(session.user().is_none());
        assert!(store.get("cart_u1").unwrap().is_some());

        session.login(SessionUser::new("u1"));
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_guest_cart_is_not_merged_on_login() {
        let store = MemoryStore::new();
        let mut session = CartSession::new(store.clone());
        session.add(&book("guest-pick"));

        session.login(SessionUser::new("u1"));
        assert!(session.items().is_empty());
        assert!(store.get("cart_guest").unwrap().is_some());
    }

    #[test]
    fn test_roles() {
        let mut session = CartSession::new(MemoryStore::new());
        assert!(!session.is_admin());
        session.register(SessionUser::new("a1").with_role(Role::Admin));
        assert!(session.is_admin());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_session_user_from_token_payload() {
        let user: SessionUser = serde_json::from_str(
            r#"{"id":"u42","username":"reader","email":"reader@books.in","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(user.id.as_str(), "u42");
        assert_eq!(user.email.unwrap().as_str(), "reader@books.in");
        assert_eq!(user.role, Role::Admin);
    }
}
