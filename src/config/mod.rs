//! Storefront configuration

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser};
use rusty_money::{Findable, iso::Currency};

use crate::{config::observability::LoggingConfig, tax::TaxRate};

pub mod observability;

/// Storefront configuration, read from CLI arguments with environment fallbacks.
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront client", long_about = None)]
pub struct StorefrontConfig {
    /// Catalog service settings.
    #[command(flatten)]
    pub catalog: CatalogConfig,

    /// Checkout settings.
    #[command(flatten)]
    pub checkout: CheckoutConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Where products come from and how they are priced.
#[derive(Debug, Args)]
pub struct CatalogConfig {
    /// Base URL of the product API (products at `{base}/products`, orders at `{base}/orders`)
    #[arg(
        long,
        env = "PRODUCT_API_BASE_URL",
        default_value = "http://localhost:8000/api",
        global = true
    )]
    pub product_api_base_url: String,

    /// ISO currency code for product prices
    #[arg(
        long,
        env = "STOREFRONT_CURRENCY",
        default_value = "GBP",
        value_parser = parse_currency,
        global = true
    )]
    pub currency: &'static Currency,

    /// YAML catalog file to use instead of the product API
    #[arg(long, env = "STOREFRONT_CATALOG", global = true)]
    pub catalog_file: Option<PathBuf>,
}

/// Cart and notification settings.
#[derive(Debug, Args)]
pub struct CheckoutConfig {
    /// Tax rate applied to the cart subtotal ("12%" or "0.12")
    #[arg(long, env = "STOREFRONT_TAX_RATE", default_value = "12%", global = true)]
    pub tax_rate: TaxRate,

    /// How long notifications stay up, in milliseconds
    #[arg(long, env = "TOAST_DURATION_MS", default_value_t = 3000, global = true)]
    pub toast_duration_ms: u64,
}

impl CheckoutConfig {
    /// Notification lifetime.
    #[must_use]
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

fn parse_currency(code: &str) -> Result<&'static Currency, String> {
    Currency::find(&code.trim().to_uppercase()).ok_or_else(|| format!("unknown currency: {code}"))
}
