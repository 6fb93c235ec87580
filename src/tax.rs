//! Tax

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised when parsing a tax rate.
#[derive(Debug, Error, PartialEq)]
pub enum TaxRateError {
    /// The value is not a number or percentage.
    #[error("Invalid tax rate: {0}")]
    Invalid(String),

    /// The rate is below 0% or above 100%.
    #[error("Tax rate out of range (0-100%): {0}")]
    OutOfRange(String),
}

/// Sales tax rate applied to a cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxRate(Percentage);

impl TaxRate {
    /// Standard storefront rate of 12%.
    #[must_use]
    pub fn standard() -> Self {
        Self(Percentage::from(Decimal::new(12, 2)))
    }

    /// Create a rate from a fractional percentage (0.12 for 12%).
    #[must_use]
    pub fn new(percentage: Percentage) -> Self {
        Self(percentage)
    }

    /// The rate as a fraction.
    #[must_use]
    pub fn fraction(self) -> Decimal {
        self.0 * Decimal::ONE
    }

    /// The rate in percent points (12 for 12%).
    #[must_use]
    pub fn percent_points(self) -> Decimal {
        (self.fraction() * Decimal::ONE_HUNDRED).normalize()
    }

    /// Tax owed on `amount`, unrounded.
    #[must_use]
    pub fn apply(self, amount: Decimal) -> Decimal {
        self.0 * amount
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent_points())
    }
}

/// Parse a rate from "12%" or "0.12".
impl FromStr for TaxRate {
    type Err = TaxRateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let fraction = if let Some(points) = trimmed.strip_suffix('%') {
            points
                .trim()
                .parse::<Decimal>()
                .map_err(|_err| TaxRateError::Invalid(s.to_string()))?
                / Decimal::ONE_HUNDRED
        } else {
            trimmed
                .parse::<Decimal>()
                .map_err(|_err| TaxRateError::Invalid(s.to_string()))?
        };

        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(TaxRateError::OutOfRange(s.to_string()));
        }

        Ok(Self(Percentage::from(fraction)))
    }
}
