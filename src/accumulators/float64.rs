// ============================================================================
// Float64 Accumulation
// Repeated addition in native IEEE-754 double precision
// ============================================================================

use super::AccumulatorKind;
use crate::interfaces::{AccumulationOutcome, Accumulator, Verdict};
use crate::numeric::NumericResult;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Add `addend` to 0.0 `repetitions` times with plain `f64` addition.
///
/// Each step rounds to the nearest double, so the result is the exact
/// bit pattern of `repetitions` sequential IEEE-754 additions.
pub fn sum_repeated(addend: f64, repetitions: u32) -> f64 {
    let mut sum = 0.0_f64;
    for _ in 0..repetitions {
        sum += addend;
    }
    sum
}

/// Outcome of the float strategy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloatOutcome {
    /// The nearest double to 1/parts (0.1 for ten parts)
    pub addend: f64,
    pub repetitions: u32,
    pub sum: f64,
}

impl FloatOutcome {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_exact(self.sum == 1.0)
    }
}

impl fmt::Display for FloatOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sum)
    }
}

/// Sums the nearest double to `1/parts`, `parts` times.
///
/// With ten parts the addend is bit-identical to the literal `0.1` and
/// the sum is `0.9999999999999999`.
#[derive(Debug, Clone)]
pub struct Float64Accumulator {
    parts: u32,
    name: String,
}

impl Float64Accumulator {
    pub fn new(parts: u32) -> Self {
        Self {
            parts,
            name: format!("float64 (1/{parts} x {parts})"),
        }
    }
}

impl Default for Float64Accumulator {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Accumulator for Float64Accumulator {
    fn accumulate(&self) -> NumericResult<AccumulationOutcome> {
        let addend = 1.0 / f64::from(self.parts);
        let sum = sum_repeated(addend, self.parts);

        tracing::debug!(strategy = %self.name, sum, "float accumulation finished");

        Ok(AccumulationOutcome::Float(FloatOutcome {
            addend,
            repetitions: self.parts,
            sum,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AccumulatorKind {
        AccumulatorKind::Float64 { parts: self.parts }
    }
}
