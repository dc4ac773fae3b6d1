// ============================================================================
// Fixed-Point Decimal
// Arbitrary-precision fixed-point arithmetic with compile-time scale
// ============================================================================

use super::errors::{NumericError, NumericResult};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Fixed-point decimal number with compile-time precision.
///
/// Internally stores `value × 10^DECIMALS` as a [`BigInt`], so the integer
/// part is unbounded and addition/subtraction are always exact. The only
/// operations that round are [`checked_div_round`](Self::checked_div_round)
/// and narrowing [`rescale`](Self::rescale), both round half up (ties away
/// from zero).
///
/// # Type Parameter
/// - `DECIMALS`: Number of fractional digits. Default is 30, the scale of
///   a `DECIMAL(65,30)` column.
///
/// # Example
/// ```
/// use fraction_drift::numeric::FixedDecimal;
///
/// let one = FixedDecimal::<50>::from_integer(1);
/// let forty_nine = FixedDecimal::<50>::from_integer(49);
/// let q = one.checked_div_round(&forty_nine).unwrap();
/// assert_eq!(q.to_string(), "0.02040816326530612244897959183673469387755102040816");
/// ```
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedDecimal<const DECIMALS: u32 = 30>(BigInt);

// ============================================================================
// Scale Helpers
// ============================================================================

/// Compute 10^n
fn pow10(n: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), n as usize)
}

/// Integer division rounding half away from zero.
fn div_round_half_up(numerator: &BigInt, denominator: &BigInt) -> BigInt {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;

    if remainder.is_zero() {
        return quotient;
    }

    if remainder.abs() * 2u8 >= denominator.abs() {
        if numerator.is_negative() == denominator.is_negative() {
            quotient + 1u8
        } else {
            quotient - 1u8
        }
    } else {
        quotient
    }
}

impl<const D: u32> FixedDecimal<D> {
    /// Number of fractional digits carried by this type
    pub const DECIMALS: u32 = D;

    /// The scale factor (10^DECIMALS)
    pub fn scale() -> BigInt {
        pow10(D)
    }

    /// Zero value
    pub fn zero() -> Self {
        Self(BigInt::zero())
    }

    /// One (1.0)
    pub fn one() -> Self {
        Self(Self::scale())
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create from raw internal representation (already scaled).
    #[inline]
    pub fn from_raw(raw: BigInt) -> Self {
        Self(raw)
    }

    /// Create from an integer value.
    pub fn from_integer(value: i64) -> Self {
        Self(BigInt::from(value) * Self::scale())
    }

    /// Create from integer and fractional parts.
    ///
    /// # Arguments
    /// - `integer`: The integer part (can be negative)
    /// - `fraction`: The fractional part in units of 10^-DECIMALS (must be < SCALE)
    ///
    /// # Errors
    /// Returns `InvalidInput` if `fraction` does not fit below the scale.
    pub fn from_parts(integer: i64, fraction: u64) -> NumericResult<Self> {
        let scale = Self::scale();
        let fraction = BigInt::from(fraction);
        if fraction >= scale {
            return Err(NumericError::InvalidInput);
        }

        let int_scaled = BigInt::from(integer) * scale;
        let raw = if integer < 0 {
            int_scaled - fraction
        } else {
            int_scaled + fraction
        };

        Ok(Self(raw))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get the raw internal value (scaled).
    #[inline]
    pub fn raw_value(&self) -> &BigInt {
        &self.0
    }

    /// Get the integer part (truncated toward zero).
    pub fn integer_part(&self) -> BigInt {
        &self.0 / Self::scale()
    }

    /// Get the fractional part as a non-negative value in units of 10^-DECIMALS.
    pub fn fractional_part(&self) -> BigInt {
        (&self.0 % Self::scale()).abs()
    }

    /// Check if value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if value is negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Get absolute value.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    /// Division rounded half up to DECIMALS fractional digits.
    ///
    /// The exact quotient `self / rhs` is computed on the scaled integers and
    /// rounded once; no intermediate rounding happens.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    pub fn checked_div_round(&self, rhs: &Self) -> NumericResult<Self> {
        if rhs.is_zero() {
            return Err(NumericError::DivisionByZero);
        }

        let numerator = &self.0 * Self::scale();
        Ok(Self(div_round_half_up(&numerator, &rhs.0)))
    }

    /// Convert to a different number of fractional digits.
    ///
    /// Widening is exact. Narrowing rounds half up, which matches how a
    /// `DECIMAL(p, s)` column stores a value with more than `s` digits.
    pub fn rescale<const E: u32>(&self) -> FixedDecimal<E> {
        if E >= D {
            FixedDecimal(&self.0 * pow10(E.abs_diff(D)))
        } else {
            FixedDecimal(div_round_half_up(&self.0, &pow10(D.abs_diff(E))))
        }
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Exact rational value of this decimal.
    pub fn to_rational(&self) -> BigRational {
        BigRational::new(self.0.clone(), Self::scale())
    }

    /// Nearest `f64` (lossy by construction).
    ///
    /// # Errors
    /// Returns `InvalidInput` if the value cannot be represented as a finite float.
    pub fn to_f64(&self) -> NumericResult<f64> {
        let value: f64 = self
            .to_string()
            .parse()
            .map_err(|_| NumericError::InvalidInput)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(NumericError::InvalidInput)
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl<const D: u32> Neg for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl<const D: u32> Add for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<'a, const D: u32> Add<&'a FixedDecimal<D>> for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: &'a FixedDecimal<D>) -> Self::Output {
        Self(self.0 + &rhs.0)
    }
}

impl<const D: u32> Sub for FixedDecimal<D> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl<'a, const D: u32> Sub<&'a FixedDecimal<D>> for &'a FixedDecimal<D> {
    type Output = FixedDecimal<D>;

    #[inline]
    fn sub(self, rhs: &'a FixedDecimal<D>) -> Self::Output {
        FixedDecimal(&self.0 - &rhs.0)
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl<const D: u32> fmt::Debug for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedDecimal<{}>({})", D, self)
    }
}

impl<const D: u32> fmt::Display for FixedDecimal<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int_part = self.integer_part();
        let frac_part = self.fractional_part();

        if D == 0 {
            write!(f, "{}", int_part)
        } else if self.is_negative() && int_part.is_zero() {
            // Handle -0.xxx case
            write!(f, "-0.{:0>width$}", frac_part, width = D as usize)
        } else {
            write!(f, "{}.{:0>width$}", int_part, frac_part, width = D as usize)
        }
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl<const D: u32> std::str::FromStr for FixedDecimal<D> {
    type Err = NumericError;

    /// Parse from a decimal string.
    ///
    /// # Examples
    /// - "123" -> 123.000…
    /// - "123.456" -> 123.456000…
    /// - "-0.001" -> -0.001000…
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (is_negative, s) = if let Some(rest) = s.strip_prefix('-') {
            (true, rest)
        } else {
            (false, s.strip_prefix('+').unwrap_or(s))
        };

        let (int_str, frac_str) = match s.split_once('.') {
            Some((int_str, frac_str)) => (int_str, frac_str),
            None => (s, ""),
        };

        if int_str.is_empty() && frac_str.is_empty() {
            return Err(NumericError::InvalidInput);
        }
        if !int_str.bytes().chain(frac_str.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(NumericError::InvalidInput);
        }
        if frac_str.len() > D as usize {
            return Err(NumericError::PrecisionLoss);
        }

        // Pad with zeros to reach DECIMALS length
        let digits = format!("{}{:0<width$}", int_str, frac_str, width = D as usize);
        let raw: BigInt = if digits.is_empty() {
            BigInt::zero()
        } else {
            digits.parse().map_err(|_| NumericError::InvalidInput)?
        };

        Ok(Self(if is_negative { -raw } else { raw }))
    }
}

#[cfg(feature = "serde")]
impl<const D: u32> serde::Serialize for FixedDecimal<D> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de, const D: u32> serde::Deserialize<'de> for FixedDecimal<D> {
    fn deserialize<De: serde::Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Type Aliases for Common Use Cases
// ============================================================================

/// Precision used for the rounded 1/n quotient
pub const QUOTIENT_DECIMALS: u32 = 50;

/// Precision of the persisted decimal column (DECIMAL(65,30))
pub const COLUMN_DECIMALS: u32 = 30;

/// Decimal carrying the quotient precision (50 fractional digits)
pub type WideDecimal = FixedDecimal<QUOTIENT_DECIMALS>;

/// Decimal carrying the column precision (30 fractional digits)
pub type ColumnDecimal = FixedDecimal<COLUMN_DECIMALS>;

// ============================================================================
// Tests
// ============================================================================
