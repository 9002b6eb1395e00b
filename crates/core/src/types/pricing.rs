//! Product pricing with centralized validation.
//!
//! Every entry point that accepts merchant prices (product submission,
//! inventory edits) goes through [`Pricing::new`], so the price rules live
//! in exactly one place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a [`Pricing`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// The original price is zero or negative.
    #[error("original price must be greater than zero")]
    NonPositiveOriginal,
    /// The discount price exceeds the original price.
    #[error("discount price must not exceed the original price")]
    DiscountExceedsOriginal,
}

impl PricingError {
    /// Name of the offending field, for field-level error reporting.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveOriginal => "original_price",
            Self::DiscountExceedsOriginal => "discount_price",
        }
    }
}

/// A validated original/discount price pair.
///
/// ## Invariants
///
/// - The original price is strictly positive.
/// - The discount price, if present, does not exceed the original price.
///
/// ## Examples
///
/// ```
/// use bodega_core::Pricing;
/// use rust_decimal::Decimal;
///
/// assert!(Pricing::new(Decimal::from(100), Some(Decimal::from(90))).is_ok());
/// assert!(Pricing::new(Decimal::from(100), Some(Decimal::from(150))).is_err());
/// assert!(Pricing::new(Decimal::ZERO, None).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    original: Decimal,
    discount: Option<Decimal>,
}

impl Pricing {
    /// Validate an original price and optional discount price.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::NonPositiveOriginal` if the original price is
    /// not strictly positive, or `PricingError::DiscountExceedsOriginal` if
    /// the discount exceeds the original.
    pub fn new(original: Decimal, discount: Option<Decimal>) -> Result<Self, PricingError> {
        if original <= Decimal::ZERO {
            return Err(PricingError::NonPositiveOriginal);
        }

        if let Some(discount) = discount
            && discount > original
        {
            return Err(PricingError::DiscountExceedsOriginal);
        }

        Ok(Self { original, discount })
    }

    /// The original price.
    #[must_use]
    pub const fn original(&self) -> Decimal {
        self.original
    }

    /// The discount price, if any.
    #[must_use]
    pub const fn discount(&self) -> Option<Decimal> {
        self.discount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_without_discount() {
        let pricing = Pricing::new(Decimal::from(100), None).unwrap();
        assert_eq!(pricing.original(), Decimal::from(100));
        assert_eq!(pricing.discount(), None);
    }

    #[test]
    fn test_valid_with_discount() {
        let pricing = Pricing::new(Decimal::from(100), Some(Decimal::from(90))).unwrap();
        assert_eq!(pricing.discount(), Some(Decimal::from(90)));
    }

    #[test]
    fn test_discount_may_equal_original() {
        assert!(Pricing::new(Decimal::from(100), Some(Decimal::from(100))).is_ok());
    }

    #[test]
    fn test_discount_exceeding_original_rejected() {
        let err = Pricing::new(Decimal::from(100), Some(Decimal::from(150))).unwrap_err();
        assert_eq!(err, PricingError::DiscountExceedsOriginal);
        assert_eq!(err.field(), "discount_price");
    }

    #[test]
    fn test_zero_original_rejected() {
        let err = Pricing::new(Decimal::ZERO, None).unwrap_err();
        assert_eq!(err, PricingError::NonPositiveOriginal);
        assert_eq!(err.field(), "original_price");
    }

    #[test]
    fn test_negative_original_rejected() {
        assert!(Pricing::new(Decimal::from(-5), None).is_err());
    }

    #[test]
    fn test_fractional_prices() {
        let original = Decimal::new(1999, 2); // 19.99
        let discount = Decimal::new(1499, 2); // 14.99
        assert!(Pricing::new(original, Some(discount)).is_ok());
    }
}
