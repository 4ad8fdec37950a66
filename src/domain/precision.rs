// ============================================================================
// Precision
// Requested output digits, working precision and the convergence limit
// ============================================================================

use super::error::{CalculationError, CalculationResult};
use crate::numeric::ScaledDecimal;
use std::fmt;

/// Extra fraction digits carried through every term to absorb rounding error
/// before the final rounding.
pub const GUARD_DIGITS: u32 = 5;

/// Largest accepted digit count; the guard digits must still fit in `u32`.
pub const MAX_DIGITS: u32 = u32::MAX - GUARD_DIGITS;

/// Number of digits after the decimal point the caller asked for. Always in
/// `1..=MAX_DIGITS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestedDigits(u32);

impl RequestedDigits {
    /// Validate a raw digit count.
    ///
    /// # Errors
    /// `InvalidPrecision` for zero, negative values, or values above
    /// [`MAX_DIGITS`].
    pub fn new(digits: i64) -> CalculationResult<Self> {
        match u32::try_from(digits) {
            Ok(d) if (1..=MAX_DIGITS).contains(&d) => Ok(Self(d)),
            _ => Err(CalculationError::InvalidPrecision { requested: digits }),
        }
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Requested digits plus [`GUARD_DIGITS`].
    pub fn working_precision(self) -> WorkingPrecision {
        WorkingPrecision(self.0 + GUARD_DIGITS)
    }

    /// `10^-digits`: a term smaller than this no longer moves the result.
    pub fn convergence_limit(self) -> ScaledDecimal {
        ScaledDecimal::ten_to_minus(self.0)
    }
}

impl fmt::Display for RequestedDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fraction digits carried during intermediate arithmetic for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkingPrecision(u32);

impl WorkingPrecision {
    /// Explicit working precision, mainly for evaluating terms directly.
    #[inline]
    pub const fn new(digits: u32) -> Self {
        Self(digits)
    }

    #[inline]
    pub const fn digits(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive() {
        for bad in [0, -1, i64::MIN, i64::from(u32::MAX) + 1] {
            assert_eq!(
                RequestedDigits::new(bad),
                Err(CalculationError::InvalidPrecision { requested: bad })
            );
        }
    }

    #[test]
    fn test_working_precision_adds_guard_digits() {
        let digits = RequestedDigits::new(10).unwrap();
        assert_eq!(digits.get(), 10);
        assert_eq!(digits.working_precision().digits(), 10 + GUARD_DIGITS);
    }

    #[test]
    fn test_digit_cap_leaves_room_for_guard_digits() {
        let largest = RequestedDigits::new(i64::from(MAX_DIGITS)).unwrap();
        assert_eq!(largest.working_precision().digits(), u32::MAX);

        for bad in [i64::from(MAX_DIGITS) + 1, i64::from(u32::MAX)] {
            assert_eq!(
                RequestedDigits::new(bad),
                Err(CalculationError::InvalidPrecision { requested: bad })
            );
        }
    }

    #[test]
    fn test_convergence_limit() {
        let digits = RequestedDigits::new(4).unwrap();
        assert_eq!(digits.convergence_limit().to_string(), "0.0001");
    }
}
