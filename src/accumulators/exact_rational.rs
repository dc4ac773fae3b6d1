// ============================================================================
// Exact Rational Accumulation
// Arbitrary-precision numerator/denominator addition, no rounding at any step
// ============================================================================

use super::AccumulatorKind;
use crate::interfaces::{AccumulationOutcome, Accumulator, Verdict};
use crate::numeric::{ratio, rational_to_f64, NumericResult, Rational};
use num_traits::{One, Zero};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Add `addend` to 0/1 `repetitions` times with exact rational addition.
///
/// `BigRational` addition reduces after every step, so the denominator
/// never grows past the lcm of the operands.
pub fn sum_exact(addend: &Rational, repetitions: u32) -> Rational {
    let mut sum = Rational::zero();
    for _ in 0..repetitions {
        sum += addend;
    }
    sum
}

/// Outcome of the exact rational strategy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RationalOutcome {
    pub addend: Rational,
    /// Exact sum in lowest terms
    pub sum: Rational,
    /// Lossy conversion of `sum`, made only after the exact comparison
    pub as_f64: f64,
}

impl RationalOutcome {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_exact(self.sum == Rational::one())
    }

    /// Fraction string with an explicit denominator, e.g. `1/1`
    pub fn fraction(&self) -> String {
        format!("{}/{}", self.sum.numer(), self.sum.denom())
    }
}

impl fmt::Display for RationalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict() {
            Verdict::Correct => writeln!(f, "Correct! The result is exactly 1.")?,
            Verdict::Error => writeln!(f, "Error! The result is not 1. It is {}", self.fraction())?,
        }
        writeln!(f, "Result as a fraction: {}", self.fraction())?;
        write!(f, "Result as float64: {:.20}", self.as_f64)
    }
}

/// Adds the exact ratio `1/parts` to itself `parts` times.
#[derive(Debug, Clone)]
pub struct ExactRationalAccumulator {
    parts: u32,
    name: String,
}

impl ExactRationalAccumulator {
    pub fn new(parts: u32) -> Self {
        Self {
            parts,
            name: format!("big rational (1/{parts} x {parts})"),
        }
    }
}

impl Default for ExactRationalAccumulator {
    fn default() -> Self {
        Self::new(49)
    }
}

impl Accumulator for ExactRationalAccumulator {
    fn accumulate(&self) -> NumericResult<AccumulationOutcome> {
        let addend = ratio(1, i64::from(self.parts))?;
        let sum = sum_exact(&addend, self.parts);
        let as_f64 = rational_to_f64(&sum)?;

        tracing::debug!(strategy = %self.name, sum = %sum, "rational accumulation finished");

        Ok(AccumulationOutcome::Rational(RationalOutcome {
            addend,
            sum,
            as_f64,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AccumulatorKind {
        AccumulatorKind::ExactRational { parts: self.parts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::NumericError;
    use num_bigint::BigInt;
    use proptest::prelude::*;

    fn rational(acc: &ExactRationalAccumulator) -> RationalOutcome {
        match acc.accumulate().unwrap() {
            AccumulationOutcome::Rational(o) => o,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_forty_ninths_sum_to_exactly_one() {
        let outcome = rational(&ExactRationalAccumulator::default());
        assert_eq!(outcome.sum, Rational::one());
        assert_eq!(outcome.sum.numer(), outcome.sum.denom());
        assert_eq!(outcome.fraction(), "1/1");
        assert_eq!(outcome.as_f64, 1.0);
        assert_eq!(outcome.verdict(), Verdict::Correct);
    }

    #[test]
    fn test_display_correct() {
        let outcome = rational(&ExactRationalAccumulator::default());
        assert_eq!(
            outcome.to_string(),
            "Correct! The result is exactly 1.\n\
             Result as a fraction: 1/1\n\
             Result as float64: 1.00000000000000000000"
        );
    }

    #[test]
    fn test_display_error() {
        let sum = sum_exact(&ratio(1, 49).unwrap(), 48);
        let outcome = RationalOutcome {
            addend: ratio(1, 49).unwrap(),
            as_f64: rational_to_f64(&sum).unwrap(),
            sum,
        };
        assert_eq!(outcome.verdict(), Verdict::Error);
        assert!(outcome.to_string().starts_with("Error! The result is not 1. It is 48/49\n"));
    }

    #[test]
    fn test_partial_sums_stay_reduced() {
        let sum = sum_exact(&ratio(1, 49).unwrap(), 7);
        assert_eq!(sum.numer(), &BigInt::from(1));
        assert_eq!(sum.denom(), &BigInt::from(7));
    }

    #[test]
    fn test_zero_parts() {
        let result = ExactRationalAccumulator::new(0).accumulate();
        assert_eq!(result, Err(NumericError::DivisionByZero));
    }

    proptest! {
        #[test]
        fn n_copies_of_one_nth_sum_to_one(parts in 1u32..2_000) {
            let outcome = rational(&ExactRationalAccumulator::new(parts));
            prop_assert_eq!(&outcome.sum, &Rational::one());
            prop_assert_eq!(outcome.verdict(), Verdict::Correct);
        }
    }
}
