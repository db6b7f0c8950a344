//! Client-side cart with per-user persistent snapshots.
//!
//! [`CartStore`] owns the line items for the current session and writes
//! every change straight through to the snapshot of the user passed in.
//! [`CartPersistence`] turns a user id into a storage key and does the
//! JSON (de)serialization.
//!
//! # Lifecycle
//!
//! ```text
//! anonymous (cart_guest)
//!   -> load_for_user(uid)   authenticated (cart_<uid>)
//!   -> clear_on_logout()    anonymous, memory emptied, snapshots untouched
//! ```
//!
//! Switching directly between two users just loads the second user's
//! snapshot; nothing is merged and the first user's snapshot stays as it
//! was.
//!
//! # Known limitation
//!
//! Two stores over the same storage (two tabs, two CLI runs) do not see
//! each other's writes until [`CartStore::sync_for_user`] is called, and the
//! last write to a key wins.

mod persistence;
mod store;

pub use persistence::{CartPersistence, GUEST_KEY, KEY_PREFIX};
pub use store::{CartChange, CartRejection, CartResult, CartStore};
