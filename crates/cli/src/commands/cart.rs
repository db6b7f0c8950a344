//! Cart commands.
//!
//! # Environment Variables
//!
//! - `BOOKSTALL_CART_DIR` - Directory holding cart snapshots
//! - `BOOKSTALL_CART_QUOTA_BYTES` - Max bytes per snapshot (`0` disables)

use std::io::Write;

use clap::Subcommand;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use bookstall_core::{Book, BookId, LineItem, PriceError, UserId};
use bookstall_storefront::cart::{CartPersistence, CartRejection, CartStore, KEY_PREFIX};
use bookstall_storefront::storage::{KeyValueStore, StorageError};
use bookstall_storefront::summary::CartSummary;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The cart refused the change.
    #[error("{0}")]
    Rejected(#[from] CartRejection),

    /// The snapshot store could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart total cannot be computed.
    #[error("Invalid cart total: {0}")]
    Total(#[from] PriceError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Encoding JSON output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CartCommand {
    /// Print the cart and its totals
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add a book, or bump its quantity if already present
    Add {
        /// Book id
        id: String,

        /// Book title
        #[arg(short, long, default_value = "")]
        title: String,

        /// Current price
        #[arg(short, long)]
        price: Decimal,

        /// Listed price before discount
        #[arg(long)]
        old_price: Option<Decimal>,

        /// Category name
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Remove a book from the cart
    Remove {
        /// Book id
        id: String,
    },
    /// Increase a book's quantity by one
    Inc {
        /// Book id
        id: String,
    },
    /// Decrease a book's quantity by one (never below one)
    Dec {
        /// Book id
        id: String,
    },
    /// Set a book's quantity
    Set {
        /// Book id
        id: String,

        /// New quantity (a positive whole number)
        quantity: String,
    },
    /// Empty the cart and delete its snapshot
    Clear,
    /// List stored cart snapshots
    Keys,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CartView<'a> {
    key: String,
    items: &'a [LineItem],
    summary: CartSummary,
}

/// Run `command` against the cart of `user` in `store`.
///
/// # Errors
///
/// Returns `CartCommandError` if the cart rejects the change or output
/// cannot be written.
pub fn run<S, W>(
    command: CartCommand,
    user: Option<&str>,
    store: S,
    out: &mut W,
) -> Result<(), CartCommandError>
where
    S: KeyValueStore,
    W: Write,
{
    let user = user.map(UserId::new);
    let user = user.as_ref();
    let mut cart = CartStore::new(store);
    cart.load_for_user(user);

    let change = match command {
        CartCommand::Show { json } => return show(&cart, user, json, out),
        CartCommand::Keys => return keys(&cart, out),
        CartCommand::Add {
            id,
            title,
            price,
            old_price,
            category,
        } => {
            let mut book = Book::new(id, title, price);
            if let Some(old_price) = old_price {
                book = book.with_old_price(old_price);
            }
            if let Some(category) = category {
                book = book.with_category(category);
            }
            cart.add(&book, user)
        }
        CartCommand::Remove { id } => cart.remove(&BookId::new(id), user)?,
        CartCommand::Inc { id } => cart.increase(&BookId::new(id), user)?,
        CartCommand::Dec { id } => cart.decrease(&BookId::new(id), user)?,
        CartCommand::Set { id, quantity } => {
            cart.set_quantity(&BookId::new(id), quantity.as_str(), user)?
        }
        CartCommand::Clear => cart.clear(user),
    };

    if cart.is_diverged() {
        tracing::warn!("Change kept in memory only; the stored cart was not updated");
    }
    tracing::info!(?change, lines = cart.len(), "Cart updated");
    Ok(())
}

fn show<S: KeyValueStore, W: Write>(
    cart: &CartStore<S>,
    user: Option<&UserId>,
    json: bool,
    out: &mut W,
) -> Result<(), CartCommandError> {
    let summary = CartSummary::of(cart.items())?;

    if json {
        let view = CartView {
            key: CartPersistence::<S>::key_for(user),
            items: cart.items(),
            summary,
        };
        serde_json::to_writer_pretty(&mut *out, &view)?;
        writeln!(out)?;
        return Ok(());
    }

    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }

    for item in cart.items() {
        writeln!(
            out,
            "{:<24} {:>3} x {:<12} {}",
            item.id(),
            item.quantity,
            item.book.price().to_string(),
            item.book.title
        )?;
    }
    writeln!(
        out,
        "{} item(s), subtotal {}",
        summary.item_count, summary.subtotal
    )?;
    Ok(())
}

fn keys<S: KeyValueStore, W: Write>(
    cart: &CartStore<S>,
    out: &mut W,
) -> Result<(), CartCommandError> {
    let keys = cart.persistence().store().keys()?;
    for key in keys.iter().filter(|key| key.starts_with(KEY_PREFIX)) {
        writeln!(out, "{key}")?;
    }
    Ok(())
}
