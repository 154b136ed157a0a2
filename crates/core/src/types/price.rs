//! Unit price using decimal arithmetic.
//!
//! The cart never computes with prices; it carries them so the UI can render
//! them. Values are stored as `Decimal` to avoid float drift on display, and
//! persisted as plain JSON numbers to stay compatible with records written by
//! the mobile app.
//!
//! A JSON number only carries 15 significant digits reliably, so prices are
//! rounded to that precision when constructed. Any stored price then reads
//! back as exactly the value that was written.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Significant digits that survive a round trip through an `f64`.
const MAX_SIGNIFICANT_DIGITS: u32 = 15;

/// Price of a single unit of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
    /// Create a new price, rounded to 15 significant digits.
    ///
    /// ```rust
    /// # use gomarketplace_core::UnitPrice;
    /// let price: UnitPrice = "19.1234567890123456789".parse().unwrap();
    /// assert_eq!(price.to_string(), "19.1234567890123");
    /// ```
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let digits = amount
            .normalize()
            .mantissa()
            .unsigned_abs()
            .checked_ilog10()
            .map_or(1, |d| d + 1);
        if digits <= MAX_SIGNIFICANT_DIGITS {
            return Self(amount);
        }
        Self(
            amount
                .round_sf(MAX_SIGNIFICANT_DIGITS)
                .map_or(amount, |rounded| rounded.normalize()),
        )
    }

    /// Create a price from an integer number of cents.
    ///
    /// ```rust
    /// # use gomarketplace_core::UnitPrice;
    /// assert_eq!(UnitPrice::from_cents(1999).to_string(), "19.99");
    /// ```
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2))
    }
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for UnitPrice {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl FromStr for UnitPrice {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self::new)
    }
}

impl Serialize for UnitPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Whole amounts stay integers so `10` round-trips as `10`, not `10.0`.
        if self.0.fract().is_zero()
            && let Some(whole) = self.0.to_i64()
        {
            return serializer.serialize_i64(whole);
        }
        // Parsing the decimal text gives the nearest f64, which `to_f64` does not.
        let float: f64 = self
            .0
            .to_string()
            .parse()
            .map_err(|_| serde::ser::Error::custom(format!("price {} out of range", self.0)))?;
        serializer.serialize_f64(float)
    }
}

impl<'de> Deserialize<'de> for UnitPrice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Decimal accepts numbers as well as numeric strings. The inherent
        // `Decimal::deserialize` reads raw bytes, hence the qualified call.
        <Decimal as Deserialize>::deserialize(deserializer).map(Self::new)
    }
}
