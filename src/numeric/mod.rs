// ============================================================================
// Numeric Module
// Exact arithmetic primitives for the accumulation strategies
// ============================================================================
//
// This module provides:
// - FixedDecimal<D>: Arbitrary-precision fixed-point decimal with compile-time scale
// - Rational: Reduced BigInt ratio
// - NumericError: Error types for arithmetic operations
//
// Design principles:
// - Addition never rounds; only division and narrowing rescale do
// - All fallible operations return Result (no panics)
// - Float conversion is explicit and only happens at reporting/storage boundaries

mod errors;
mod fixed_decimal;
mod rational;

pub use errors::{NumericError, NumericResult};
pub use fixed_decimal::{
    ColumnDecimal, FixedDecimal, WideDecimal, COLUMN_DECIMALS, QUOTIENT_DECIMALS,
};
pub use rational::{ratio, rational_to_f64, Rational};
