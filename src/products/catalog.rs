//! In-memory catalog loaded from YAML fixtures.

use std::{fs, path::Path};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{
    Findable, Money,
    iso::{self, Currency},
};
use serde::Deserialize;
use thiserror::Error;

use crate::products::{Product, ProductId, ProductSource, ProductSourceError};

/// Catalog Loading Errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two products share an identifier
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: ProductId,

    name: String,

    #[serde(default)]
    description: Option<String>,

    #[serde(default)]
    stock: u32,

    /// Product price (e.g., "2.99 GBP")
    price: String,

    #[serde(default)]
    featured_image: Option<String>,
}

/// Product catalog held in memory, in file order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
    currency: Option<&'static Currency>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its products are inconsistent.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Load a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML or prices, mixed currencies, or duplicate ids.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;
        let mut catalog = Self::new();

        for product_fixture in fixture.products {
            let (amount, currency) = parse_price(&product_fixture.price)?;

            let product = Product {
                id: product_fixture.id,
                name: product_fixture.name,
                description: product_fixture.description,
                stock: product_fixture.stock,
                price: Money::from_decimal(amount, currency),
                featured_image: product_fixture.featured_image,
            };

            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already present or the currency differs from earlier products.
    pub fn insert(&mut self, product: Product) -> Result<&mut Self, CatalogError> {
        let currency = product.price.currency();

        if let Some(existing) = self.currency {
            if existing != currency {
                return Err(CatalogError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
        } else {
            self.currency = Some(currency);
        }

        if self.index.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        self.index.insert(product.id, self.products.len());
        self.products.push(product);

        Ok(self)
    }

    /// Currency shared by every product, if any were loaded.
    #[must_use]
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Look up a product by identifier.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        let idx = *self.index.get(&id)?;

        self.products.get(idx)
    }

    /// Products whose name or description contains `query`, ignoring case, in load order.
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.products.iter().filter(move |product| product.matches(query))
    }

    /// Iterate over the products in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl ProductSource for Catalog {
    async fn list_products(&self) -> Result<Vec<Product>, ProductSourceError> {
        Ok(self.products.clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ProductSourceError> {
        self.get(id)
            .cloned()
            .ok_or(ProductSourceError::NotFound(id))
    }
}

/// Parse price string (e.g., "2.99 GBP") into a decimal amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), CatalogError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(CatalogError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| CatalogError::InvalidPrice(s.to_string()))?;

    if amount < Decimal::ZERO {
        return Err(CatalogError::InvalidPrice(s.to_string()));
    }

    let currency = iso::Currency::find(currency_code)
        .ok_or_else(|| CatalogError::UnknownCurrency((*currency_code).to_string()))?;

    Ok((amount, currency))
}
