// ============================================================================
// Accumulator Interface
// Defines the contract for pluggable numeric accumulation strategies
// ============================================================================

use crate::accumulators::{
    AccumulatorKind, DecimalOutcome, FloatOutcome, RationalOutcome, ScaledOutcome,
};
use crate::numeric::{NumericResult, WideDecimal};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether an accumulated sum reproduced the exact target value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Verdict {
    /// The sum equals the target exactly
    Correct,
    /// Rounding error surfaced in the sum
    Error,
}

impl Verdict {
    /// Map an equality check onto a verdict
    pub fn from_exact(exact: bool) -> Self {
        if exact {
            Verdict::Correct
        } else {
            Verdict::Error
        }
    }

    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

/// Result of running one accumulation strategy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccumulationOutcome {
    Float(FloatOutcome),
    ScaledInteger(ScaledOutcome),
    Rational(RationalOutcome),
    Decimal(DecimalOutcome),
}

impl AccumulationOutcome {
    /// Did the strategy land exactly on 1?
    pub fn verdict(&self) -> Verdict {
        match self {
            AccumulationOutcome::Float(o) => o.verdict(),
            AccumulationOutcome::ScaledInteger(o) => o.verdict(),
            AccumulationOutcome::Rational(o) => o.verdict(),
            AccumulationOutcome::Decimal(o) => o.verdict(),
        }
    }

    /// Floating-point view of the result, for display and float columns.
    pub fn as_f64(&self) -> NumericResult<f64> {
        match self {
            AccumulationOutcome::Float(o) => Ok(o.sum),
            AccumulationOutcome::ScaledInteger(o) => Ok(o.descaled()),
            AccumulationOutcome::Rational(o) => Ok(o.as_f64),
            AccumulationOutcome::Decimal(o) => o.sum.to_f64(),
        }
    }

    /// Raw integer sum, only for the scaled-integer strategy
    pub fn scaled_sum(&self) -> Option<i64> {
        match self {
            AccumulationOutcome::ScaledInteger(o) => Some(o.sum),
            _ => None,
        }
    }

    /// Full-precision decimal sum, only for the fixed-decimal strategy
    pub fn decimal_sum(&self) -> Option<&WideDecimal> {
        match self {
            AccumulationOutcome::Decimal(o) => Some(&o.sum),
            _ => None,
        }
    }
}

impl fmt::Display for AccumulationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccumulationOutcome::Float(o) => fmt::Display::fmt(o, f),
            AccumulationOutcome::ScaledInteger(o) => fmt::Display::fmt(o, f),
            AccumulationOutcome::Rational(o) => fmt::Display::fmt(o, f),
            AccumulationOutcome::Decimal(o) => fmt::Display::fmt(o, f),
        }
    }
}

/// Strategy pattern interface for accumulation strategies.
/// Implementations: Float64, ScaledInteger, ExactRational, RoundedDecimal.
///
/// Every strategy adds the fraction `1/parts` to a zero accumulator `parts`
/// times and compares the result with 1. Implementations are pure: they
/// hold no sink and no shared state.
pub trait Accumulator: Send + Sync {
    /// Run the accumulation to completion
    fn accumulate(&self) -> NumericResult<AccumulationOutcome>;

    /// Strategy name for logging and record labels
    fn name(&self) -> &str;

    /// Configuration this accumulator was built from
    fn kind(&self) -> AccumulatorKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_exact() {
        assert_eq!(Verdict::from_exact(true), Verdict::Correct);
        assert_eq!(Verdict::from_exact(false), Verdict::Error);
        assert!(!Verdict::Error.is_correct());
    }
}
