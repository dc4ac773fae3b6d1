// ============================================================================
// Accumulators Module
// The four numeric strategies and the factory that builds them
// ============================================================================

mod exact_rational;
mod float64;
mod rounded_decimal;
mod scaled_integer;

pub mod factory;

pub use exact_rational::{sum_exact, ExactRationalAccumulator, RationalOutcome};
pub use factory::{create_accumulator, standard_suite, AccumulatorKind, SuiteEntry};
pub use float64::{sum_repeated, Float64Accumulator, FloatOutcome};
pub use rounded_decimal::{
    rounded_quotient, sum_decimal, DecimalOutcome, RoundedDecimalAccumulator,
};
pub use scaled_integer::{
    sum_scaled, truncated_unit, ScaledIntegerAccumulator, ScaledOutcome,
};
