//! Cart totals for display and checkout.
//!
//! The cart store does not keep totals; views compute them from the line
//! items whenever they render.

use rust_decimal::Decimal;
use serde::Serialize;

use bookstall_core::{CurrencyCode, LineItem, Price, PriceError};

/// Derived totals of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    /// Sum of all quantities (the badge count).
    pub item_count: u64,
    /// Sum of `newPrice × quantity`, rounded to the minor unit.
    pub subtotal: Price,
}

impl CartSummary {
    /// Summarize `items`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if a line total or the subtotal
    /// does not fit in a `Decimal`.
    pub fn of(items: &[LineItem]) -> Result<Self, PriceError> {
        let item_count = items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum();
        let amount = items.iter().try_fold(Decimal::ZERO, |total, item| {
            total
                .checked_add(item.line_total()?)
                .ok_or(PriceError::Overflow)
        })?;

        Ok(Self {
            item_count,
            subtotal: Price::new(amount, CurrencyCode::INR).rounded(),
        })
    }

    /// An empty cart's totals.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            item_count: 0,
            subtotal: Price::zero(CurrencyCode::INR),
        }
    }

    /// Subtotal in minor units (paise), as hosted payment pages expect.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the subtotal is negative or too large.
    pub fn minor_units(&self) -> Result<u64, PriceError> {
        self.subtotal.minor_units()
    }
}

impl Default for CartSummary {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bookstall_core::{Book, Quantity};

    use super::*;

    fn item(id: &str, price: Decimal, quantity: u32) -> LineItem {
        LineItem {
            book: Book::new(id, id, price),
            quantity: Quantity::new(quantity).unwrap(),
        }
    }

    #[test]
    fn test_empty() {
        let summary = CartSummary::of(&[]).unwrap();
        assert_eq!(summary, CartSummary::empty());
        assert_eq!(summary.subtotal.to_string(), "₹0.00");
    }

    #[test]
    fn test_totals() {
        let items = [
            item("b1", Decimal::new(1999, 2), 2),
            item("b2", Decimal::from(250), 1),
        ];
        let summary = CartSummary::of(&items).unwrap();
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.subtotal.amount_string(), "289.98");
        assert_eq!(summary.minor_units().unwrap(), 28_998);
    }

    #[test]
    fn test_subtotal_rounds_to_paise() {
        let items = [item("b1", Decimal::new(3333, 3), 3)];
        assert_eq!(
            CartSummary::of(&items).unwrap().subtotal.amount_string(),
            "10.00"
        );
    }

    #[test]
    fn test_overflowing_line_is_an_error() {
        let items = [item("b1", Decimal::MAX, 2)];
        assert_eq!(CartSummary::of(&items), Err(PriceError::Overflow));
    }

    #[test]
    fn test_overflowing_subtotal_is_an_error() {
        let items = [item("b1", Decimal::MAX, 1), item("b2", Decimal::MAX, 1)];
        assert_eq!(CartSummary::of(&items), Err(PriceError::Overflow));
    }
}
