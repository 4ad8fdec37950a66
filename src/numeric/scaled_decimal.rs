// ============================================================================
// Scaled Decimal
// Exact arbitrary-precision fixed-point decimal with explicit rounding
// ============================================================================

use super::errors::{NumericError, NumericResult};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{Pow, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Rounding applied when a quotient or rescale discards digits.
///
/// "Half" modes only differ when the discarded part is exactly one half of
/// the last kept unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundingMode {
    /// Away from zero whenever anything is discarded
    Up,
    /// Toward zero (truncation)
    Down,
    /// Nearest neighbour, ties away from zero
    HalfUp,
    /// Nearest neighbour, ties toward zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour
    HalfEven,
}

impl RoundingMode {
    /// Whether a truncated quotient moves one unit away from zero.
    ///
    /// `remainder_vs_half` compares twice the discarded remainder against the
    /// divisor; it is only consulted for a non-zero remainder.
    #[inline]
    fn rounds_away(self, quotient_is_odd: bool, remainder_vs_half: Ordering) -> bool {
        match self {
            RoundingMode::Up => true,
            RoundingMode::Down => false,
            RoundingMode::HalfUp => remainder_vs_half != Ordering::Less,
            RoundingMode::HalfDown => remainder_vs_half == Ordering::Greater,
            RoundingMode::HalfEven => match remainder_vs_half {
                Ordering::Greater => true,
                Ordering::Equal => quotient_is_odd,
                Ordering::Less => false,
            },
        }
    }
}

/// Exact decimal number `unscaled × 10^-scale`.
///
/// Addition and subtraction never round: the result carries the larger of
/// the two scales. Only division and [`ScaledDecimal::with_scale`] discard
/// digits, and both take an explicit [`RoundingMode`].
///
/// # Example
/// ```
/// use bbp_pi::numeric::{RoundingMode, ScaledDecimal};
///
/// let four = ScaledDecimal::from_integer(4);
/// let nine = ScaledDecimal::from_integer(9);
/// let q = four.div_rounded(&nine, 6, RoundingMode::HalfDown)?;
/// assert_eq!(q.to_string(), "0.444444");
/// # Ok::<(), bbp_pi::numeric::NumericError>(())
/// ```
#[derive(Clone)]
pub struct ScaledDecimal {
    unscaled: BigInt,
    scale: u32,
}

// ============================================================================
// Helpers
// ============================================================================

#[inline]
fn pow10(exponent: u32) -> BigInt {
    BigInt::from(10u32).pow(exponent)
}

/// Integer quotient `num / den` rounded with `mode`. `den` must be non-zero.
fn round_quotient(num: &BigInt, den: &BigInt, mode: RoundingMode) -> BigInt {
    let (quotient, remainder) = num.div_rem(den);
    if remainder.is_zero() {
        return quotient;
    }

    let twice_remainder = remainder.magnitude() * 2u32;
    let remainder_vs_half = twice_remainder.cmp(den.magnitude());

    if mode.rounds_away(quotient.is_odd(), remainder_vs_half) {
        let negative = (num.sign() == Sign::Minus) != (den.sign() == Sign::Minus);
        if negative {
            quotient - 1u32
        } else {
            quotient + 1u32
        }
    } else {
        quotient
    }
}

impl ScaledDecimal {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Zero at scale 0.
    pub fn zero() -> Self {
        Self {
            unscaled: BigInt::zero(),
            scale: 0,
        }
    }

    /// Create from an unscaled integer and a scale.
    pub fn new(unscaled: impl Into<BigInt>, scale: u32) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }

    /// Create an integer value at scale 0.
    #[inline]
    pub fn from_integer(value: i64) -> Self {
        Self::new(value, 0)
    }

    /// Exact `base^exponent` at scale 0.
    pub fn integer_power(base: u32, exponent: u64) -> Self {
        let base = BigInt::from(base);
        Self::new(Pow::pow(&base, exponent), 0)
    }

    /// `10^-exponent`, i.e. one unit in the last place at scale `exponent`.
    #[inline]
    pub fn ten_to_minus(exponent: u32) -> Self {
        Self::new(1, exponent)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The unscaled integer.
    #[inline]
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// Number of digits after the decimal point.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.unscaled.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.unscaled.is_negative()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.unscaled.is_positive()
    }

    /// Absolute value, same scale.
    pub fn abs(&self) -> Self {
        Self {
            unscaled: self.unscaled.abs(),
            scale: self.scale,
        }
    }

    /// Unscaled value expressed at a scale no smaller than the current one.
    fn unscaled_at(&self, scale: u32) -> BigInt {
        debug_assert!(scale >= self.scale);
        if scale == self.scale {
            self.unscaled.clone()
        } else {
            &self.unscaled * pow10(scale - self.scale)
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    fn add_exact(&self, rhs: &Self) -> Self {
        let scale = self.scale.max(rhs.scale);
        Self {
            unscaled: self.unscaled_at(scale) + rhs.unscaled_at(scale),
            scale,
        }
    }

    fn sub_exact(&self, rhs: &Self) -> Self {
        let scale = self.scale.max(rhs.scale);
        Self {
            unscaled: self.unscaled_at(scale) - rhs.unscaled_at(scale),
            scale,
        }
    }

    /// Divide, producing exactly `scale` fraction digits rounded with `mode`.
    ///
    /// # Errors
    /// - `DivisionByZero` if `divisor` is zero
    /// - `Overflow` if `scale + divisor.scale()` does not fit in `u32`
    pub fn div_rounded(
        &self,
        divisor: &Self,
        scale: u32,
        mode: RoundingMode,
    ) -> NumericResult<Self> {
        if divisor.is_zero() {
            return Err(NumericError::DivisionByZero);
        }

        // self / divisor × 10^scale = a·10^(sb + scale) / (b·10^sa)
        let shift = divisor
            .scale
            .checked_add(scale)
            .ok_or(NumericError::Overflow)?;
        let num = &self.unscaled * pow10(shift);
        let den = &divisor.unscaled * pow10(self.scale);

        Ok(Self {
            unscaled: round_quotient(&num, &den, mode),
            scale,
        })
    }

    /// Rescale to `scale` fraction digits. Widening is exact; narrowing
    /// rounds with `mode`.
    pub fn with_scale(&self, scale: u32, mode: RoundingMode) -> Self {
        if scale >= self.scale {
            return Self {
                unscaled: self.unscaled_at(scale),
                scale,
            };
        }

        let divisor = pow10(self.scale - scale);
        Self {
            unscaled: round_quotient(&self.unscaled, &divisor, mode),
            scale,
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for ScaledDecimal {
    fn default() -> Self {
        Self::zero()
    }
}

/// Equality is by numeric value: `1.0 == 1.00`.
impl PartialEq for ScaledDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScaledDecimal {}

impl PartialOrd for ScaledDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScaledDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.scale == other.scale {
            return self.unscaled.cmp(&other.unscaled);
        }
        let scale = self.scale.max(other.scale);
        self.unscaled_at(scale).cmp(&other.unscaled_at(scale))
    }
}

impl Add<&ScaledDecimal> for &ScaledDecimal {
    type Output = ScaledDecimal;

    fn add(self, rhs: &ScaledDecimal) -> ScaledDecimal {
        self.add_exact(rhs)
    }
}

impl Add for ScaledDecimal {
    type Output = ScaledDecimal;

    fn add(self, rhs: ScaledDecimal) -> ScaledDecimal {
        self.add_exact(&rhs)
    }
}

impl AddAssign<&ScaledDecimal> for ScaledDecimal {
    fn add_assign(&mut self, rhs: &ScaledDecimal) {
        if self.scale == rhs.scale {
            self.unscaled += &rhs.unscaled;
        } else {
            *self = self.add_exact(rhs);
        }
    }
}

impl Sub<&ScaledDecimal> for &ScaledDecimal {
    type Output = ScaledDecimal;

    fn sub(self, rhs: &ScaledDecimal) -> ScaledDecimal {
        self.sub_exact(rhs)
    }
}

impl Sub for ScaledDecimal {
    type Output = ScaledDecimal;

    fn sub(self, rhs: ScaledDecimal) -> ScaledDecimal {
        self.sub_exact(&rhs)
    }
}

impl Neg for ScaledDecimal {
    type Output = ScaledDecimal;

    fn neg(self) -> ScaledDecimal {
        Self {
            unscaled: -self.unscaled,
            scale: self.scale,
        }
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Debug for ScaledDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScaledDecimal({}, scale={})", self, self.scale)
    }
}

impl fmt::Display for ScaledDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.unscaled);
        }

        let scale = self.scale as usize;
        let magnitude = self.unscaled.magnitude().to_string();
        let digits = format!("{:0>width$}", magnitude, width = scale + 1);
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl std::str::FromStr for ScaledDecimal {
    type Err = NumericError;

    /// Parse a plain decimal string. The scale is the number of digits after
    /// the point, so `"3.140"` has scale 3.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (int_str, frac_str) = match body.find('.') {
            Some(pos) => (&body[..pos], &body[pos + 1..]),
            None => (body, ""),
        };

        if int_str.is_empty() && frac_str.is_empty() {
            return Err(NumericError::InvalidInput);
        }
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_str) || !all_digits(frac_str) {
            return Err(NumericError::InvalidInput);
        }

        let scale = u32::try_from(frac_str.len()).map_err(|_| NumericError::Overflow)?;
        let joined = format!("{}{}", int_str, frac_str);
        let magnitude: BigInt = joined.parse().map_err(|_| NumericError::InvalidInput)?;

        Ok(Self {
            unscaled: if negative { -magnitude } else { magnitude },
            scale,
        })
    }
}

// ============================================================================
// Serialization (as decimal strings)
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for ScaledDecimal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ScaledDecimal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> ScaledDecimal {
        s.parse().unwrap()
    }

    fn int(v: i64) -> ScaledDecimal {
        ScaledDecimal::from_integer(v)
    }

    #[test]
    fn test_constants() {
        assert!(ScaledDecimal::zero().is_zero());
        assert_eq!(ScaledDecimal::ten_to_minus(3).to_string(), "0.001");
        assert_eq!(ScaledDecimal::integer_power(16, 0), int(1));
        assert_eq!(ScaledDecimal::integer_power(16, 3), int(4096));
    }

    #[test]
    fn test_display() {
        assert_eq!(ScaledDecimal::new(314159, 5).to_string(), "3.14159");
        assert_eq!(ScaledDecimal::new(5, 3).to_string(), "0.005");
        assert_eq!(ScaledDecimal::new(-5, 3).to_string(), "-0.005");
        assert_eq!(ScaledDecimal::new(0, 4).to_string(), "0.0000");
        assert_eq!(ScaledDecimal::new(-42, 0).to_string(), "-42");
    }

    #[test]
    fn test_from_str() {
        let x = dec("123.456");
        assert_eq!(x.scale(), 3);
        assert_eq!(x.unscaled(), &BigInt::from(123456));

        let y = dec("-0.001");
        assert!(y.is_negative());
        assert_eq!(y.scale(), 3);

        assert_eq!(dec(".5"), dec("0.5"));
        assert_eq!(dec("42").scale(), 0);
    }

    #[test]
    fn test_from_str_invalid() {
        for bad in ["", "-", ".", "abc", "1.2.3", "1e5", "--1"] {
            let result: Result<ScaledDecimal, _> = bad.parse();
            assert_eq!(result, Err(NumericError::InvalidInput), "input {:?}", bad);
        }
    }

    #[test]
    fn test_value_equality_ignores_scale() {
        assert_eq!(dec("1.0"), dec("1.000"));
        assert!(dec("0.0009") < dec("0.001"));
        assert!(dec("-0.5") < dec("0.25"));
    }

    #[test]
    fn test_add_sub_exact() {
        let a = dec("1.25");
        let b = dec("0.0001");

        let sum = &a + &b;
        assert_eq!(sum.to_string(), "1.2501");
        assert_eq!(sum.scale(), 4);

        let diff = &b - &a;
        assert_eq!(diff.to_string(), "-1.2499");

        let mut acc = ScaledDecimal::zero();
        acc += &a;
        acc += &b;
        assert_eq!(acc, sum);
    }

    #[test]
    fn test_div_rounding_table() {
        // (dividend, divisor, mode, expected at scale 0)
        let cases = [
            (5, 2, RoundingMode::HalfUp, "3"),
            (5, 2, RoundingMode::HalfDown, "2"),
            (5, 2, RoundingMode::HalfEven, "2"),
            (7, 2, RoundingMode::HalfEven, "4"),
            (7, 2, RoundingMode::HalfDown, "3"),
            (-5, 2, RoundingMode::HalfDown, "-2"),
            (-5, 2, RoundingMode::HalfUp, "-3"),
            (-7, 2, RoundingMode::HalfEven, "-4"),
            (7, 3, RoundingMode::Up, "3"),
            (7, 3, RoundingMode::Down, "2"),
            (-7, 3, RoundingMode::Up, "-3"),
            (8, 3, RoundingMode::HalfDown, "3"),
        ];

        for (a, b, mode, expected) in cases {
            let q = int(a).div_rounded(&int(b), 0, mode).unwrap();
            assert_eq!(q.to_string(), expected, "{} / {} with {:?}", a, b, mode);
        }
    }

    #[test]
    fn test_div_at_scale() {
        let third = int(1).div_rounded(&int(3), 5, RoundingMode::HalfDown).unwrap();
        assert_eq!(third.to_string(), "0.33333");

        let two_thirds = int(2).div_rounded(&int(3), 5, RoundingMode::HalfDown).unwrap();
        assert_eq!(two_thirds.to_string(), "0.66667");

        // Mixed input scales
        let q = dec("0.5").div_rounded(&dec("0.25"), 2, RoundingMode::HalfEven).unwrap();
        assert_eq!(q.to_string(), "2.00");
    }

    #[test]
    fn test_div_by_zero() {
        let result = int(1).div_rounded(&dec("0.000"), 5, RoundingMode::HalfDown);
        assert_eq!(result.unwrap_err(), NumericError::DivisionByZero);
    }

    #[test]
    fn test_with_scale() {
        let pi = dec("3.14159265");
        assert_eq!(pi.with_scale(5, RoundingMode::HalfDown).to_string(), "3.14159");
        assert_eq!(pi.with_scale(2, RoundingMode::Up).to_string(), "3.15");
        assert_eq!(pi.with_scale(10, RoundingMode::Down).to_string(), "3.1415926500");

        assert_eq!(dec("2.5").with_scale(0, RoundingMode::HalfDown).to_string(), "2");
        assert_eq!(dec("2.51").with_scale(0, RoundingMode::HalfDown).to_string(), "3");
        assert_eq!(dec("2.5").with_scale(0, RoundingMode::HalfEven).to_string(), "2");
        assert_eq!(dec("3.5").with_scale(0, RoundingMode::HalfEven).to_string(), "4");
    }

    #[test]
    fn test_abs_and_neg() {
        let x = dec("-12.5");
        assert_eq!(x.abs(), dec("12.5"));
        assert_eq!(-x, dec("12.5"));
    }

    proptest! {
        #[test]
        fn prop_addition_commutes(a in any::<i64>(), sa in 0u32..20, b in any::<i64>(), sb in 0u32..20) {
            let x = ScaledDecimal::new(a, sa);
            let y = ScaledDecimal::new(b, sb);
            prop_assert_eq!(&x + &y, &y + &x);
            prop_assert_eq!(&(&x + &y) - &y, x);
        }

        #[test]
        fn prop_division_within_one_unit(a in any::<i64>(), b in 1i64..1_000_000, scale in 0u32..30) {
            let x = ScaledDecimal::from_integer(a);
            let y = ScaledDecimal::from_integer(b);
            let q = x.div_rounded(&y, scale, RoundingMode::HalfEven).unwrap();

            // |q·b - a| must stay within b × 10^-scale
            let back = ScaledDecimal::new(q.unscaled() * BigInt::from(b), scale);
            let err = (&back - &x).abs();
            let bound = ScaledDecimal::new(b, scale);
            prop_assert!(err <= bound);
        }

        #[test]
        fn prop_display_parse_preserves_scale(a in any::<i64>(), scale in 0u32..25) {
            let x = ScaledDecimal::new(a, scale);
            let parsed: ScaledDecimal = x.to_string().parse().unwrap();
            prop_assert_eq!(parsed.scale(), scale);
            prop_assert_eq!(parsed, x);
        }
    }

    quickcheck::quickcheck! {
        fn qc_half_modes_bracket(a: i32, b: u16) -> bool {
            if b == 0 {
                return true;
            }
            let x = ScaledDecimal::from_integer(a as i64);
            let y = ScaledDecimal::from_integer(b as i64);
            let down = x.div_rounded(&y, 3, RoundingMode::HalfDown).unwrap();
            let up = x.div_rounded(&y, 3, RoundingMode::HalfUp).unwrap();
            let even = x.div_rounded(&y, 3, RoundingMode::HalfEven).unwrap();

            let unit = ScaledDecimal::ten_to_minus(3);
            let gap = (&up - &down).abs();
            gap <= unit && (even == down || even == up)
        }
    }
}
