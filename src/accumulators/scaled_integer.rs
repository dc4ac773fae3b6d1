// ============================================================================
// Scaled-Integer Accumulation
// Fixed scale factor, truncated unit, integer addition
// ============================================================================

use super::AccumulatorKind;
use crate::interfaces::{AccumulationOutcome, Accumulator, Verdict};
use crate::numeric::{NumericError, NumericResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Integer approximation of `fraction × scale`, truncated toward zero.
///
/// The product is formed in `f64` first, so `(1.0 / 49.0) * 1e8` gives
/// `2040816.326…` and truncates to `2040816`.
///
/// # Errors
/// Returns `Overflow`/`Underflow` if the product does not fit in an `i64`,
/// `InvalidInput` if it is not finite.
pub fn truncated_unit(fraction: f64, scale: i64) -> NumericResult<i64> {
    let product = fraction * scale as f64;
    if !product.is_finite() {
        return Err(NumericError::InvalidInput);
    }

    let truncated = product.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if truncated >= i64::MAX as f64 {
        Err(NumericError::Overflow)
    } else if truncated < i64::MIN as f64 {
        Err(NumericError::Underflow)
    } else {
        Ok(truncated as i64)
    }
}

/// Add `unit` to 0 `repetitions` times with checked integer addition.
///
/// # Errors
/// Returns `Overflow`/`Underflow` instead of wrapping.
pub fn sum_scaled(unit: i64, repetitions: u32) -> NumericResult<i64> {
    let mut sum: i64 = 0;
    for _ in 0..repetitions {
        sum = sum.checked_add(unit).ok_or(if unit > 0 {
            NumericError::Overflow
        } else {
            NumericError::Underflow
        })?;
    }
    Ok(sum)
}

/// Outcome of the scaled-integer strategy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScaledOutcome {
    /// Truncated per-step unit (`trunc(scale / parts)`)
    pub unit: i64,
    pub scale: i64,
    pub repetitions: u32,
    /// Integer accumulator after all additions
    pub sum: i64,
}

impl ScaledOutcome {
    /// `sum / scale` as a float, for display
    pub fn descaled(&self) -> f64 {
        self.sum as f64 / self.scale as f64
    }

    /// How many scaled units the sum fell short of `scale`
    pub fn shortfall(&self) -> i64 {
        self.scale.saturating_sub(self.sum)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_exact(self.sum == self.scale)
    }
}

/// Plain form prints the raw sum and the descaled value on two lines.
/// The alternate form (`{:#}`) labels both and prints 20 decimals:
///
/// ```text
/// i = 99999984
/// Expected: 1.0, Actual: 0.99999983999999997319
/// ```
impl fmt::Display for ScaledOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "i = {}", self.sum)?;
            write!(f, "Expected: 1.0, Actual: {:.20}", self.descaled())
        } else {
            writeln!(f, "{}", self.sum)?;
            write!(f, "{}", self.descaled())
        }
    }
}

/// Scales `1/parts` by `scale`, truncates it to an integer and adds that
/// integer `parts` times.
///
/// The truncation happens before the additions, so any fractional part
/// lost in the unit is lost `parts` times over.
#[derive(Debug, Clone)]
pub struct ScaledIntegerAccumulator {
    parts: u32,
    scale: i64,
    name: String,
}

impl ScaledIntegerAccumulator {
    pub fn new(parts: u32, scale: i64) -> Self {
        Self {
            parts,
            scale,
            name: format!("scaled integer (1/{parts} x {parts}, scale {scale})"),
        }
    }

    /// 0.1 ten times at scale 10,000 (lands exactly on 10,000)
    pub fn tenths() -> Self {
        Self::new(10, 10_000)
    }

    /// 1/49 forty-nine times at scale 100,000,000 (falls short by 16)
    pub fn forty_ninths() -> Self {
        Self::new(49, 100_000_000)
    }
}

impl Accumulator for ScaledIntegerAccumulator {
    fn accumulate(&self) -> NumericResult<AccumulationOutcome> {
        if self.parts == 0 {
            return Err(NumericError::DivisionByZero);
        }

        let fraction = 1.0 / f64::from(self.parts);
        let unit = truncated_unit(fraction, self.scale)?;
        let sum = sum_scaled(unit, self.parts)?;

        tracing::debug!(strategy = %self.name, unit, sum, "scaled integer accumulation finished");

        Ok(AccumulationOutcome::ScaledInteger(ScaledOutcome {
            unit,
            scale: self.scale,
            repetitions: self.parts,
            sum,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> AccumulatorKind {
        AccumulatorKind::ScaledInteger {
            parts: self.parts,
            scale: self.scale,
        }
    }
}
