//! Products

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod http;

/// Catalog identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw catalog identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product description
    pub description: Option<String>,

    /// Units in stock
    pub stock: u32,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Featured image reference
    pub featured_image: Option<String>,
}

impl Product {
    /// Whether `query` appears in the name or description, ignoring case.
    ///
    /// A blank query matches every product.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();

        if query.is_empty() {
            return true;
        }

        self.name.to_lowercase().contains(&query)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(&query))
    }
}

/// Keep the products matching `query`, in their original order.
pub fn search(products: Vec<Product>, query: &str) -> Vec<Product> {
    products
        .into_iter()
        .filter(|product| product.matches(query))
        .collect()
}

/// Errors raised while turning raw product data into a [`Product`].
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// The unit price was below zero.
    #[error("product {0} has a negative price: {1}")]
    NegativePrice(ProductId, Decimal),

    /// The stock count was below zero or too large.
    #[error("product {0} has an invalid stock count: {1}")]
    InvalidStock(ProductId, i64),
}

/// Product as served by the catalog service.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecord {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product description
    #[serde(default)]
    pub description: Option<String>,

    /// Units in stock
    #[serde(default)]
    pub stock: i64,

    /// Unit price in major units (e.g. `19.99`)
    pub price: Decimal,

    /// Featured image reference
    #[serde(default)]
    pub featured_image: Option<String>,
}

impl ProductRecord {
    /// Convert the record into a [`Product`] priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProductError`] if the price is negative or the stock count is out of range.
    pub fn into_product(self, currency: &'static Currency) -> Result<Product, ProductError> {
        if self.price < Decimal::ZERO {
            return Err(ProductError::NegativePrice(self.id, self.price));
        }

        let stock = u32::try_from(self.stock)
            .map_err(|_err| ProductError::InvalidStock(self.id, self.stock))?;

        Ok(Product {
            id: self.id,
            name: self.name,
            description: self.description,
            stock,
            price: Money::from_decimal(self.price, currency),
            featured_image: self.featured_image,
        })
    }
}

/// Errors returned by a [`ProductSource`].
#[derive(Debug, Error)]
pub enum ProductSourceError {
    /// No product exists with the requested identifier.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Transport or body decoding failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The service answered with something other than a product payload.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A product in the response failed validation.
    #[error(transparent)]
    InvalidProduct(#[from] ProductError),
}

/// Read-only access to the product catalog.
#[automock]
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// List every product in the catalog.
    async fn list_products(&self) -> Result<Vec<Product>, ProductSourceError>;

    /// Fetch a single product by identifier.
    async fn get_product(&self, id: ProductId) -> Result<Product, ProductSourceError>;
}
