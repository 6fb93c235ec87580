//! Cart
//!
//! The session cart: one line per product, kept in the order products were first added.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    products::{Product, ProductId},
    tax::TaxRate,
};

pub mod items;

pub use items::OrderItem;

/// Errors related to cart mutation or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A product's currency differs from the cart currency (product, product currency, cart currency).
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// A total could not be represented.
    #[error("Cart total overflowed")]
    Overflow,
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<OrderItem>,
    index: FxHashMap<ProductId, usize>,
    currency: &'static Currency,
    tax_rate: TaxRate,
}

impl Cart {
    /// Create an empty cart at the standard tax rate.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_tax_rate(currency, TaxRate::standard())
    }

    /// Create an empty cart with the given tax rate.
    #[must_use]
    pub fn with_tax_rate(currency: &'static Currency, tax_rate: TaxRate) -> Self {
        Cart {
            items: Vec::new(),
            index: FxHashMap::default(),
            currency,
            tax_rate,
        }
    }

    /// Set the quantity of `product` in the cart, adding a line for it if needed.
    ///
    /// Adding a product that is already in the cart replaces its quantity rather than
    /// accumulating, and keeps the original snapshot. A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the product is priced in another currency.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if self.index.contains_key(&product.id) {
            self.update_quantity(product.id, quantity);

            return Ok(());
        }

        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if quantity == 0 {
            return Ok(());
        }

        debug!(product = %product.id, quantity, "adding item to cart");

        self.index.insert(product.id, self.items.len());
        self.items.push(OrderItem::new(product, quantity));

        Ok(())
    }

    /// Remove the line for `product_id`, returning it. Does nothing if absent.
    pub fn remove_item(&mut self, product_id: ProductId) -> Option<OrderItem> {
        let idx = self.index.remove(&product_id)?;

        debug!(product = %product_id, "removing item from cart");

        let removed = self.items.remove(idx);

        for (position, item) in self.items.iter().enumerate().skip(idx) {
            self.index.insert(item.product_id(), position);
        }

        Some(removed)
    }

    /// Overwrite the quantity of the line for `product_id`.
    ///
    /// Returns `false` without changing anything if the product is not in the cart.
    /// A quantity of zero removes the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(product_id).is_some();
        }

        let Some(item) = self
            .index
            .get(&product_id)
            .and_then(|&idx| self.items.get_mut(idx))
        else {
            return false;
        };

        debug!(product = %product_id, quantity, "updating item quantity");

        item.set_quantity(quantity);

        true
    }

    /// Sum of unit price times quantity over every line, unrounded.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the total cannot be represented.
    pub fn total_price(&self) -> Result<Money<'static, Currency>, CartError> {
        let total = self.items.iter().try_fold(Decimal::ZERO, |acc, item| {
            item.product_price()
                .amount()
                .checked_mul(Decimal::from(item.quantity()))
                .and_then(|line| acc.checked_add(line))
                .ok_or(CartError::Overflow)
        })?;

        Ok(Money::from_decimal(total, self.currency))
    }

    /// Tax owed on [`Cart::total_price`] at the cart's tax rate, unrounded.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the subtotal cannot be represented.
    pub fn total_price_tax(&self) -> Result<Money<'static, Currency>, CartError> {
        let subtotal = self.total_price()?;

        Ok(Money::from_decimal(
            self.tax_rate.apply(*subtotal.amount()),
            self.currency,
        ))
    }

    /// Subtotal plus tax.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the total cannot be represented.
    pub fn total_price_with_tax(&self) -> Result<Money<'static, Currency>, CartError> {
        let subtotal = self.total_price()?;
        let tax = self.tax_rate.apply(*subtotal.amount());

        let total = subtotal
            .amount()
            .checked_add(tax)
            .ok_or(CartError::Overflow)?;

        Ok(Money::from_decimal(total, self.currency))
    }

    /// Get the line for `product`, if it is in the cart.
    #[must_use]
    pub fn get_order_item(&self, product: &Product) -> Option<&OrderItem> {
        self.get(product.id)
    }

    /// Get the line for `product_id`, if it is in the cart.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&OrderItem> {
        let idx = *self.index.get(&product_id)?;

        self.items.get(idx)
    }

    /// Empty the cart.
    pub fn discard(&mut self) {
        debug!(items = self.items.len(), "discarding cart");

        self.items.clear();
        self.index.clear();
    }

    /// The lines in the cart, in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Copy of the current lines, for building an order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<OrderItem> {
        self.items.clone()
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &OrderItem> {
        self.items.iter()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Get the tax rate of the cart.
    #[must_use]
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a OrderItem;
    type IntoIter = std::slice::Iter<'a, OrderItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
