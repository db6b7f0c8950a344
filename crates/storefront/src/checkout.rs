//! Order payloads built from the cart at checkout.
//!
//! Both payment paths (cash on delivery and the hosted online payment page)
//! submit the same order body to the orders API; the online path also needs
//! the total in minor units. Submitting, redirecting and verifying payments
//! are the caller's business.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use bookstall_core::{Email, LineItem, PriceError};

use crate::summary::CartSummary;

/// Why an order could not be drafted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,
    /// The signed-in user has no email on file.
    #[error("an email address is required to place an order")]
    MissingEmail,
    /// A required shipping field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The total cannot be expressed for the payment page.
    #[error("invalid order total: {0}")]
    Total(#[from] PriceError),
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "cod")]
    CashOnDelivery,
    #[serde(rename = "online")]
    Online,
}

/// Shipping form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub name: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
}

impl ShippingDetails {
    fn validated(&self) -> Result<Self, CheckoutError> {
        Ok(Self {
            name: required("name", &self.name)?,
            phone: required("phone", &self.phone)?,
            city: required("city", &self.city)?,
            state: required("state", &self.state)?,
            country: required("country", &self.country)?,
            zipcode: required("zipcode", &self.zipcode)?,
        })
    }
}

fn required(label: &'static str, value: &str) -> Result<String, CheckoutError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CheckoutError::MissingField(label));
    }
    Ok(value.to_owned())
}

/// Postal address portion of the order body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub country: String,
    pub state: String,
    pub zipcode: String,
}

/// The order body sent to the orders API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub name: String,
    pub email: Email,
    pub address: Address,
    pub phone: String,
    pub cart_items: Vec<LineItem>,
    /// Subtotal with two decimals, e.g. `"289.98"`.
    pub total_price: String,
    pub payment_method: PaymentMethod,
}

impl OrderDraft {
    /// Draft an order for `items`.
    ///
    /// The cart itself is left alone; clearing it once the order is
    /// confirmed is up to the caller.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::EmptyCart`] for an empty cart,
    /// [`CheckoutError::MissingEmail`] without an email, and
    /// [`CheckoutError::MissingField`] for the first blank shipping field,
    /// and [`CheckoutError::Total`] if the total overflows.
    pub fn build(
        items: &[LineItem],
        email: Option<&Email>,
        shipping: &ShippingDetails,
        payment_method: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let email = email.ok_or(CheckoutError::MissingEmail)?.clone();
        let shipping = shipping.validated()?;
        let summary = CartSummary::of(items)?;

        tracing::debug!(
            lines = items.len(),
            total = %summary.subtotal,
            ?payment_method,
            "Drafted order"
        );

        Ok(Self {
            name: shipping.name,
            email,
            address: Address {
                city: shipping.city,
                country: shipping.country,
                state: shipping.state,
                zipcode: shipping.zipcode,
            },
            phone: shipping.phone,
            cart_items: items.to_vec(),
            total_price: summary.subtotal.amount_string(),
            payment_method,
        })
    }

    /// Totals of the drafted items.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Total`] if the total cannot be computed.
    pub fn summary(&self) -> Result<CartSummary, CheckoutError> {
        Ok(CartSummary::of(&self.cart_items)?)
    }

    /// Order total in minor units for the online payment page.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Total`] if the total cannot be expressed.
    pub fn amount_minor_units(&self) -> Result<u64, CheckoutError> {
        Ok(self.summary()?.minor_units()?)
    }
}
