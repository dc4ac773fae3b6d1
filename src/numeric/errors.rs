// ============================================================================
// Numeric Errors
// Failures raised while accumulating or converting between representations
// ============================================================================

use thiserror::Error;

/// Why an accumulation or conversion could not produce a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum NumericError {
    /// Scaled-integer sum or unit above i64::MAX
    #[error("scaled integer overflow")]
    Overflow,
    /// Scaled-integer sum or unit below i64::MIN
    #[error("scaled integer underflow")]
    Underflow,
    /// `1/parts` with zero parts, or a zero denominator
    #[error("division by zero")]
    DivisionByZero,
    /// More fractional digits than the target scale holds
    #[error("value has more fractional digits than the scale allows")]
    PrecisionLoss,
    /// Malformed decimal text, non-finite float, or an outcome routed to the wrong slot
    #[error("invalid input")]
    InvalidInput,
}

pub type NumericResult<T> = Result<T, NumericError>;
