// ============================================================================
// Rounded Fixed-Decimal Accumulation
// One rounded division, then exact fixed-point additions
// ============================================================================

use super::AccumulatorKind;
use crate::interfaces::{AccumulationOutcome, Accumulator, Verdict};
use crate::numeric::{NumericResult, WideDecimal};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `numerator / denominator` rounded half up to 50 fractional digits.
///
/// # Errors
/// Returns `DivisionByZero` if `denominator` is zero.
pub fn rounded_quotient(numerator: i64, denominator: i64) -> NumericResult<WideDecimal> {
    WideDecimal::from_integer(numerator).checked_div_round(&WideDecimal::from_integer(denominator))
}

/// Add `addend` to zero `repetitions` times. Fixed-point addition is exact.
pub fn sum_decimal(addend: &WideDecimal, repetitions: u32) -> WideDecimal {
    let mut sum = WideDecimal::zero();
    for _ in 0..repetitions {
        sum = sum + addend;
    }
    sum
}

/// Outcome of the rounded fixed-decimal strategy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecimalOutcome {
    /// The rounded `1/parts` that was added
    pub quotient: WideDecimal,
    pub repetitions: u32,
    /// Sum at full 50-digit precision
    pub sum: WideDecimal,
}

impl DecimalOutcome {
    /// `|sum - 1|`
    pub fn difference(&self) -> WideDecimal {
        (&self.sum - &WideDecimal::one()).abs()
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_exact(self.sum == WideDecimal::one())
    }
}

impl fmt::Display for DecimalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict() {
            Verdict::Correct => write!(f, "Correct! The result is exactly 1."),
            Verdict::Error => {
                writeln!(f, "Error! The result is not exactly 1 due to rounding.")?;
                writeln!(f, "Final Sum:  {}", self.sum)?;
                write!(f, "Difference: {}", self.difference())
            },
        }
    }
}

/// Rounds `1/parts` to 50 fractional digits once, then adds that quotient
/// `parts` times and compares the sum with 1.
///
/// Whether the sum equals 1 depends only on the single rounding step:
/// the sum is `1 + parts × (quotient − 1/parts)`, so any difference is at
/// most `parts × 0.5 × 10^-50`.
#[derive(Debug, Clone)]
pub struct RoundedDecimalAccumulator {
    parts: u32,
    name: String,
}

impl RoundedDecimalAccumulator {
    pub fn new(parts: u32) -> Self {
        Self {
            parts,
            name: format!("fixed decimal (1/{parts} x {parts}, 50 digits)"),
        }
    }
}

impl Default for RoundedDecimalAccumulator {
    fn default() -> Self {
        Self::new(49)
    }
}

impl Accumulator for RoundedDecimalAccumulator {
    fn accumulate(&self) -> NumericResult<AccumulationOutcome> {
        let quotient = rounded_quotient(1, i64::from(self.parts))?;
        let sum = sum_decimal(&quotient, self.parts);

        tracing::debug!(strategy = %self.name, sum = %sum, "decimal accumulation finished");

        Ok(AccumulationOutcome::Decimal(DecimalOutcome {
            quotient,
            repetitions: self.parts,
            sum,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AccumulatorKind {
        AccumulatorKind::RoundedDecimal { parts: self.parts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{NumericError, Rational};
    use num_bigint::BigInt;
    use num_traits::Signed;
    use proptest::prelude::*;

    fn decimal(acc: &RoundedDecimalAccumulator) -> DecimalOutcome {
        match acc.accumulate().unwrap() {
            AccumulationOutcome::Decimal(o) => o,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    /// Verdict computed independently with exact rationals at 50 digits
    fn direct_verdict(parts: u32) -> (bool, Rational) {
        let scale = WideDecimal::scale();
        let exact = Rational::new(scale.clone(), BigInt::from(parts));
        // round half up on a positive value
        let rounded = (exact + Rational::new(BigInt::from(1), BigInt::from(2))).floor();
        let quotient = Rational::new(rounded.to_integer(), scale);
        let sum = quotient * Rational::from_integer(BigInt::from(parts));
        let diff = (sum.clone() - Rational::from_integer(BigInt::from(1))).abs();
        (sum == Rational::from_integer(BigInt::from(1)), diff)
    }

    #[test]
    fn test_forty_ninths_miss_one_at_the_fiftieth_digit() {
        let outcome = decimal(&RoundedDecimalAccumulator::default());
        assert_eq!(
            outcome.quotient.to_string(),
            "0.02040816326530612244897959183673469387755102040816"
        );
        assert_eq!(
            outcome.sum.to_string(),
            "0.99999999999999999999999999999999999999999999999984"
        );
        assert_eq!(
            outcome.difference().to_string(),
            "0.00000000000000000000000000000000000000000000000016"
        );

        let (exact, diff) = direct_verdict(49);
        assert_eq!(outcome.verdict().is_correct(), exact);
        assert_eq!(outcome.difference().to_rational(), diff);
    }

    #[test]
    fn test_terminating_quotient_is_exact() {
        let outcome = decimal(&RoundedDecimalAccumulator::new(8));
        assert_eq!(outcome.verdict(), Verdict::Correct);
        assert_eq!(outcome.to_string(), "Correct! The result is exactly 1.");
    }

    #[test]
    fn test_display_error() {
        let outcome = decimal(&RoundedDecimalAccumulator::default());
        assert_eq!(
            outcome.to_string(),
            "Error! The result is not exactly 1 due to rounding.\n\
             Final Sum:  0.99999999999999999999999999999999999999999999999984\n\
             Difference: 0.00000000000000000000000000000000000000000000000016"
        );
    }

    #[test]
    fn test_zero_parts() {
        let result = RoundedDecimalAccumulator::new(0).accumulate();
        assert_eq!(result, Err(NumericError::DivisionByZero));
    }

    proptest! {
        #[test]
        fn verdict_matches_direct_computation(parts in 1u32..500) {
            let outcome = decimal(&RoundedDecimalAccumulator::new(parts));
            let (exact, diff) = direct_verdict(parts);
            prop_assert_eq!(outcome.verdict().is_correct(), exact);
            prop_assert_eq!(outcome.difference().to_rational(), diff.clone());

            let bound = Rational::new(BigInt::from(parts), WideDecimal::scale());
            prop_assert!(diff <= bound);
        }
    }
}
