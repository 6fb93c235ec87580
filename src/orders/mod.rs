//! Orders

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::{
    cart::{Cart, OrderItem},
    products::ProductId,
};

pub mod checkout;
pub mod submission;

pub use checkout::{CheckoutError, checkout};
pub use submission::{HttpOrderSubmitter, MockOrderSubmitter, OrderSubmitter, SubmissionError};

/// Problems with the customer-supplied order fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderDetailsError {
    /// No email address was given.
    #[error("email address is required")]
    MissingEmail,

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// No shipping address was given.
    #[error("shipping address is required")]
    MissingAddress,
}

/// Contact and delivery fields entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDetails {
    /// Customer email address
    pub email: String,

    /// Shipping address
    pub address: String,

    /// Free-text note for the order
    pub note: String,
}

impl OrderDetails {
    /// Check the fields required to place an order.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderDetailsError`] naming the first field that is missing or malformed.
    pub fn validate(&self) -> Result<(), OrderDetailsError> {
        let email = self.email.trim();

        if email.is_empty() {
            return Err(OrderDetailsError::MissingEmail);
        }

        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {}
            _ => return Err(OrderDetailsError::InvalidEmail(email.to_string())),
        }

        if self.address.trim().is_empty() {
            return Err(OrderDetailsError::MissingAddress);
        }

        Ok(())
    }

    /// The same details with surrounding whitespace stripped from the email and address.
    #[must_use]
    pub fn trimmed(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
            note: self.note,
        }
    }
}

/// A submitted order: contact fields plus the cart lines at the time of checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    details: OrderDetails,
    items: Vec<OrderItem>,
}

impl Order {
    /// Create an order from details and cart lines. Email and address are stored trimmed.
    #[must_use]
    pub fn new(details: OrderDetails, items: Vec<OrderItem>) -> Self {
        Self {
            details: details.trimmed(),
            items,
        }
    }

    /// Create an order from a snapshot of `cart`.
    #[must_use]
    pub fn from_cart(details: OrderDetails, cart: &Cart) -> Self {
        Self::new(details, cart.snapshot())
    }

    /// Returns the customer email address.
    pub fn email(&self) -> &str {
        &self.details.email
    }

    /// Returns the shipping address.
    pub fn address(&self) -> &str {
        &self.details.address
    }

    /// Returns the order note.
    pub fn note(&self) -> &str {
        &self.details.note
    }

    /// Returns the ordered lines.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Build the JSON body sent to the order endpoint.
    #[must_use]
    pub fn payload(&self) -> OrderPayload<'_> {
        OrderPayload {
            email: &self.details.email,
            address: &self.details.address,
            note: &self.details.note,
            orders: self.items.iter().map(OrderItemPayload::from).collect(),
        }
    }
}

/// Wire form of an [`Order`].
#[derive(Debug, Serialize)]
pub struct OrderPayload<'a> {
    email: &'a str,
    address: &'a str,
    note: &'a str,
    orders: Vec<OrderItemPayload<'a>>,
}

/// Wire form of an [`OrderItem`]; prices are decimal major units.
#[derive(Debug, Serialize)]
pub struct OrderItemPayload<'a> {
    product_id: ProductId,
    product_name: &'a str,
    product_description: Option<&'a str>,
    #[serde(with = "rust_decimal::serde::float")]
    product_price: Decimal,
    quantity: u32,
}

impl<'a> From<&'a OrderItem> for OrderItemPayload<'a> {
    fn from(item: &'a OrderItem) -> Self {
        Self {
            product_id: item.product_id(),
            product_name: item.product_name(),
            product_description: item.product_description(),
            product_price: *item.product_price().amount(),
            quantity: item.quantity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use serde_json::json;
    use testresult::TestResult;

    use crate::products::Product;

    use super::*;

    fn details() -> OrderDetails {
        OrderDetails {
            email: "ada@example.com".to_string(),
            address: "1 Analytical Row".to_string(),
            note: "Leave by the door".to_string(),
        }
    }

    #[test]
    fn validate_accepts_complete_details() {
        assert_eq!(details().validate(), Ok(()));
    }

    #[test]
    fn validate_requires_email() {
        let details = OrderDetails {
            email: "   ".to_string(),
            ..details()
        };

        assert_eq!(details.validate(), Err(OrderDetailsError::MissingEmail));
    }

    #[test]
    fn validate_rejects_malformed_email() {
        for email in ["ada", "@example.com", "ada@", "a@b@c"] {
            let details = OrderDetails {
                email: email.to_string(),
                ..details()
            };

            assert_eq!(
                details.validate(),
                Err(OrderDetailsError::InvalidEmail(email.to_string())),
                "expected {email} to be rejected"
            );
        }
    }

    #[test]
    fn validate_requires_address() {
        let details = OrderDetails {
            address: String::new(),
            ..details()
        };

        assert_eq!(details.validate(), Err(OrderDetailsError::MissingAddress));
    }

    #[test]
    fn note_is_optional() {
        let details = OrderDetails {
            note: String::new(),
            ..details()
        };

        assert_eq!(details.validate(), Ok(()));
    }

    #[test]
    fn payload_sends_trimmed_contact_fields() -> TestResult {
        let details = OrderDetails {
            email: "  ada@example.com  ".to_string(),
            address: "\t1 Analytical Row\n".to_string(),
            ..details()
        };

        assert_eq!(details.validate(), Ok(()));

        let order = Order::new(details, Vec::new());
        let body = serde_json::to_value(order.payload())?;

        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["address"], "1 Analytical Row");
        assert_eq!(order.email(), "ada@example.com");

        Ok(())
    }

    #[test]
    fn payload_matches_wire_format() -> TestResult {
        let mut cart = Cart::new(GBP);
        cart.add_item(
            &Product {
                id: ProductId::new(1),
                name: "Lamp".to_string(),
                description: Some("Brass".to_string()),
                stock: 3,
                price: Money::from_minor(1999, GBP),
                featured_image: None,
            },
            2,
        )?;

        let order = Order::from_cart(details(), &cart);
        let body = serde_json::to_value(order.payload())?;

        assert_eq!(
            body,
            json!({
                "email": "ada@example.com",
                "address": "1 Analytical Row",
                "note": "Leave by the door",
                "orders": [{
                    "product_id": 1,
                    "product_name": "Lamp",
                    "product_description": "Brass",
                    "product_price": 19.99,
                    "quantity": 2
                }]
            })
        );

        Ok(())
    }

    #[test]
    fn order_is_a_snapshot_of_the_cart() -> TestResult {
        let mut cart = Cart::new(GBP);
        let lamp = Product {
            id: ProductId::new(1),
            name: "Lamp".to_string(),
            description: None,
            stock: 3,
            price: Money::from_minor(1000, GBP),
            featured_image: None,
        };
        cart.add_item(&lamp, 1)?;

        let order = Order::from_cart(details(), &cart);
        cart.update_quantity(lamp.id, 5);

        assert_eq!(order.items().first().map(OrderItem::quantity), Some(1));
        assert_eq!(order.email(), "ada@example.com");

        Ok(())
    }
}
