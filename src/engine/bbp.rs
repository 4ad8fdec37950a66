// ============================================================================
// Bailey-Borwein-Plouffe Series
// term(k) = [4/(8k+1) - 2/(8k+4) - 1/(8k+5) - 1/(8k+6)] / 16^k
// ============================================================================

use crate::domain::WorkingPrecision;
use crate::interfaces::Series;
use crate::numeric::{NumericResult, RoundingMode, ScaledDecimal};

/// Rounding for the four bracket divisions.
const BRACKET_ROUNDING: RoundingMode = RoundingMode::HalfDown;

/// Rounding for the division by `16^k`. Differs from the bracket on purpose;
/// reference digit strings depend on this exact pairing.
const SCALE_ROUNDING: RoundingMode = RoundingMode::HalfEven;

/// BBP series for π. Terms are positive and shrink by roughly 16× per index.
#[derive(Debug, Clone, Copy, Default)]
pub struct BbpSeries;

impl BbpSeries {
    pub fn new() -> Self {
        Self
    }

    /// `numerator / (8k + offset)` at scale `p`.
    #[inline]
    fn fraction(numerator: i64, k: u64, offset: u64, p: u32) -> NumericResult<ScaledDecimal> {
        let denominator = ScaledDecimal::new(8 * u128::from(k) + u128::from(offset), 0);
        ScaledDecimal::from_integer(numerator).div_rounded(&denominator, p, BRACKET_ROUNDING)
    }
}

impl Series for BbpSeries {
    fn term(&self, k: u64, precision: WorkingPrecision) -> NumericResult<ScaledDecimal> {
        let p = precision.digits();

        let bracket = &(&(&Self::fraction(4, k, 1, p)? - &Self::fraction(2, k, 4, p)?)
            - &Self::fraction(1, k, 5, p)?)
            - &Self::fraction(1, k, 6, p)?;

        let power = ScaledDecimal::integer_power(16, k);
        bracket.div_rounded(&power, p, SCALE_ROUNDING)
    }

    fn name(&self) -> &str {
        "bbp"
    }
}
