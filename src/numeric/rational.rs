// ============================================================================
// Exact Rationals
// Arbitrary-precision numerator/denominator arithmetic
// ============================================================================

use super::errors::{NumericError, NumericResult};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;

/// Exact rational number. Always stored in lowest terms with a positive denominator.
pub type Rational = BigRational;

/// Build the reduced ratio `numerator / denominator`.
///
/// # Errors
/// Returns `DivisionByZero` if `denominator` is zero.
pub fn ratio(numerator: i64, denominator: i64) -> NumericResult<Rational> {
    if denominator == 0 {
        return Err(NumericError::DivisionByZero);
    }
    Ok(BigRational::new(
        BigInt::from(numerator),
        BigInt::from(denominator),
    ))
}

/// Nearest `f64` to an exact rational.
///
/// # Errors
/// Returns `InvalidInput` if the value is outside the finite `f64` range.
pub fn rational_to_f64(value: &Rational) -> NumericResult<f64> {
    value
        .to_f64()
        .filter(|f| f.is_finite())
        .ok_or(NumericError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;

    #[test]
    fn test_ratio_reduces() {
        let r = ratio(2, 98).unwrap();
        assert_eq!(r.numer(), &BigInt::from(1));
        assert_eq!(r.denom(), &BigInt::from(49));
        assert_eq!(r.to_string(), "1/49");
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(1, 0), Err(NumericError::DivisionByZero));
    }

    #[test]
    fn test_one_displays_as_integer() {
        assert_eq!(Rational::one().to_string(), "1");
        assert_eq!(rational_to_f64(&Rational::one()).unwrap(), 1.0);
    }
}
