//! Credits - Decimal wrapper for per-course credit values
//!
//! Every course carries between 0.5 and 6 credits.
//! This is enforced at the type level.

use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Credit weight of a single course.
///
/// # Invariant
/// The inner value lies in `[0.5, 6]`. This is enforced by the constructor
/// and on deserialization.
///
/// # Example
/// ```
/// use acad_core::Credits;
/// use rust_decimal::Decimal;
///
/// let credits = Credits::new(Decimal::new(4, 0)).unwrap();
/// assert_eq!(credits.value(), Decimal::new(4, 0));
///
/// assert!(Credits::new(Decimal::new(7, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Credits(Decimal);

impl Credits {
    /// Smallest credit value a course may carry
    pub const MIN: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

    /// Largest credit value a course may carry
    pub const MAX: Decimal = Decimal::from_parts(6, 0, 0, false, 0);

    /// Create validated credits.
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value < Self::MIN || value > Self::MAX {
            Err(ValidationError::CreditsOutOfRange(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Get the inner Decimal value
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Credits {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Credits> for Decimal {
    fn from(credits: Credits) -> Self {
        credits.0
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(Credits::new(dec!(0.5)).is_ok());
        assert!(Credits::new(dec!(6)).is_ok());
        assert!(Credits::new(dec!(0.4)).is_err());
        assert!(Credits::new(dec!(6.5)).is_err());
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let ok: Credits = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(ok.value(), dec!(3));

        let bad: Result<Credits, _> = serde_json::from_str("\"0\"");
        assert!(bad.is_err());
    }
}
