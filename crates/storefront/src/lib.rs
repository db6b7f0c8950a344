//! Bookstall storefront library.
//!
//! The client-side shopping cart of the marketplace: an in-memory cart that
//! writes every change through to a per-user snapshot in a key-value store,
//! plus the session binding, totals and order shaping built on top of it.
//!
//! # Example
//!
//! ```
//! use bookstall_core::{Book, UserId};
//! use bookstall_storefront::cart::CartStore;
//! use bookstall_storefront::storage::MemoryStore;
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartStore::new(MemoryStore::new());
//! let user = UserId::new("u42");
//! cart.load_for_user(Some(&user));
//! cart.add(&Book::new("b1", "Dune", Decimal::new(24950, 2)), Some(&user));
//! assert_eq!(cart.len(), 1);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod session;
pub mod storage;
pub mod summary;
pub mod telemetry;
