//! Book records and cart line items.
//!
//! Field names on the wire follow the book API (`_id`, `coverImage`,
//! `newPrice`, ...), so a serialized cart is the same JSON array the
//! storefront has always kept in local storage. Fields this crate does not
//! model are carried in [`Book::extra`] and written back unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{BookId, CurrencyCode, Price, PriceError, Quantity};

/// A book as returned by the catalogue API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Catalogue identifier; the only field that decides cart identity.
    #[serde(rename = "_id")]
    pub id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// List price before the secondhand discount.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub old_price: Option<Decimal>,
    /// Selling price; what the cart subtotal is computed from.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub new_price: Decimal,
    /// Any other catalogue fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Book {
    /// Create a book with the fields the cart needs.
    #[must_use]
    pub fn new(id: impl Into<BookId>, title: impl Into<String>, new_price: Decimal) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: None,
            cover_image: None,
            old_price: None,
            new_price,
            extra: Map::new(),
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the list price shown struck through next to the selling price.
    #[must_use]
    pub fn with_old_price(mut self, old_price: Decimal) -> Self {
        self.old_price = Some(old_price);
        self
    }

    /// Selling price in the store currency.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::new(self.new_price, CurrencyCode::INR)
    }
}

/// A book in a cart together with how many copies are wanted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub book: Book,
    pub quantity: Quantity,
}

impl LineItem {
    /// A new line item holding a single copy.
    #[must_use]
    pub const fn new(book: Book) -> Self {
        Self {
            book,
            quantity: Quantity::ONE,
        }
    }

    /// The product id this line item is keyed by.
    #[must_use]
    pub const fn id(&self) -> &BookId {
        &self.book.id
    }

    /// `new_price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if the product does not fit in a
    /// `Decimal`.
    pub fn line_total(&self) -> Result<Decimal, PriceError> {
        self.book
            .new_price
            .checked_mul(Decimal::from(self.quantity.get()))
            .ok_or(PriceError::Overflow)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STORED: &str = r#"{
        "_id": "64f1c2",
        "title": "The Hobbit",
        "category": "fiction",
        "coverImage": "hobbit.png",
        "oldPrice": 499,
        "newPrice": 249.5,
        "trending": true,
        "quantity": 3
    }"#;

    #[test]
    fn test_reads_storefront_layout() {
        let item: LineItem = serde_json::from_str(STORED).unwrap();
        assert_eq!(item.id().as_str(), "64f1c2");
        assert_eq!(item.quantity.get(), 3);
        assert_eq!(item.book.new_price, Decimal::new(2495, 1));
        assert_eq!(item.book.old_price, Some(Decimal::from(499)));
        assert_eq!(item.book.extra.get("trending"), Some(&Value::Bool(true)));
        assert!(!item.book.extra.contains_key("quantity"));
    }

    #[test]
    fn test_writes_flat_object() {
        let item = LineItem::new(Book::new("b1", "Dune", Decimal::from(100)));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["_id"], "b1");
        assert_eq!(value["quantity"], 1);
        assert_eq!(value["newPrice"], 100.0);
        assert!(value.get("book").is_none());
        assert!(value.get("oldPrice").is_none());
    }

    #[test]
    fn test_unknown_fields_survive_rewrite() {
        let item: LineItem = serde_json::from_str(STORED).unwrap();
        let json = serde_json::to_string(&item).unwrap();
        let again: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(again, item);
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let raw = r#"{"_id": "b1", "newPrice": 10, "quantity": 0}"#;
        assert!(serde_json::from_str::<LineItem>(raw).is_err());
    }

    #[test]
    fn test_line_total() {
        let mut item = LineItem::new(Book::new("b1", "Dune", Decimal::new(1250, 2)));
        item.quantity = Quantity::new(4).unwrap();
        assert_eq!(item.line_total(), Ok(Decimal::from(50)));
    }

    #[test]
    fn test_line_total_overflow() {
        let raw = r#"{"_id": "b1", "newPrice": 5e28, "quantity": 2}"#;
        let item: LineItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.line_total(), Err(PriceError::Overflow));
    }
}
