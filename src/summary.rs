//! Summary
//!
//! Terminal tables for the catalog and the cart.

use std::io;

use rusty_money::Money;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    products::Product,
};

/// Errors that can occur when writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Error calculating cart totals.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// IO error
    #[error("IO error")]
    IO(#[source] io::Error),
}

/// Write the product list as a table.
///
/// # Errors
///
/// Returns a [`SummaryError`] if the output cannot be written.
pub fn write_catalog(mut out: impl io::Write, products: &[Product]) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Stock", "Price"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.stock.to_string(),
            format!("{}", product.price),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..4), Alignment::right());

    writeln!(out, "{table}").map_err(SummaryError::IO)
}

/// Write the cart lines and totals as a table.
///
/// # Errors
///
/// Returns a [`SummaryError`] if the totals cannot be calculated or the output cannot be written.
pub fn write_cart_summary(mut out: impl io::Write, cart: &Cart) -> Result<(), SummaryError> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.").map_err(SummaryError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["Item", "Unit Price", "Qty", "Line Total"]);

    for item in cart {
        let line_total = item
            .product_price()
            .amount()
            .checked_mul(item.quantity().into())
            .ok_or(CartError::Overflow)?;

        builder.push_record([
            item.product_name().to_string(),
            format!("{}", item.product_price()),
            item.quantity().to_string(),
            format!("{}", Money::from_decimal(line_total, cart.currency())),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..4), Alignment::right());

    writeln!(out, "{table}").map_err(SummaryError::IO)?;

    let subtotal = format!("{}", cart.total_price()?);
    let tax = format!("{}", cart.total_price_tax()?);
    let total = format!("{}", cart.total_price_with_tax()?);
    let tax_label = format!("Tax ({}):", cart.tax_rate());

    let label_width = tax_label.len().max("Subtotal:".len());
    let value_width = subtotal.len().max(tax.len()).max(total.len());

    for (label, value) in [
        ("Subtotal:", subtotal.as_str()),
        (tax_label.as_str(), tax.as_str()),
        ("Total:", total.as_str()),
    ] {
        writeln!(out, " {label:<label_width$} {value:>value_width$}").map_err(SummaryError::IO)?;
    }

    Ok(())
}
