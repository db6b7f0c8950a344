//! Bookstall Core - Shared types library.
//!
//! This crate provides common types used across all Bookstall components:
//! - `storefront` - Client-side cart store and checkout shaping
//! - `cli` - Command-line driver for the cart store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, quantities, emails, and the
//!   book/line-item records stored in a cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
