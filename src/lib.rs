// ============================================================================
// Fraction Drift Library
// Rounding-error accumulation across four numeric representations
// ============================================================================

//! # Fraction Drift
//!
//! Adds a fraction `1/n` to itself `n` times in four representations and
//! records how close each one lands to 1.
//!
//! ## Strategies
//!
//! - **Float64**: native IEEE-754 doubles; `0.1` ten times gives
//!   `0.9999999999999999`
//! - **Scaled integer**: a truncated integer unit at a fixed scale;
//!   `1/49` at scale 10^8 sums to `99,999,984`
//! - **Exact rational**: BigInt ratios; `1/49` forty-nine times is exactly `1/1`
//! - **Fixed decimal**: one division rounded to 50 digits, then exact additions;
//!   the sum misses 1 by `1.6 × 10^-49`
//!
//! Results are persisted through a [`ResultSink`](interfaces::ResultSink)
//! (in-memory, SQLite, or MySQL with the `mysql` feature).
//!
//! ## Example
//!
//! ```rust
//! use fraction_drift::prelude::*;
//!
//! let mut sink = MemorySink::default();
//! sink.ensure_schema().unwrap();
//!
//! let engine = CalculationEngine::standard(RecordLayout::Combined);
//! let summary = engine.run(&mut sink, &mut std::io::sink()).unwrap();
//!
//! let record = &summary.stored[0].data;
//! assert_eq!(record.float_value, 0.9999999999999999);
//! assert_eq!(record.int_error_value, 99_999_984);
//! assert_eq!(record.rational_value, 1.0);
//! ```

pub mod accumulators;
pub mod domain;
pub mod engine;
pub mod error;
pub mod interfaces;
pub mod numeric;
pub mod storage;

pub use error::{Error, Result};

// Re-exports for convenience
pub mod prelude {
    pub use crate::accumulators::{
        create_accumulator, standard_suite, AccumulatorKind, ExactRationalAccumulator,
        Float64Accumulator, RoundedDecimalAccumulator, ScaledIntegerAccumulator, SuiteEntry,
    };
    pub use crate::domain::{
        CalculationRecord, NewCalculationRecord, RecordLayout, RecordSlot, RecordTime, RunConfig,
        SinkConfig, SinkDriver,
    };
    pub use crate::engine::{connect_sink, report_all, CalculationEngine, RunSummary};
    pub use crate::interfaces::{
        AccumulationOutcome, Accumulator, MemorySink, ResultSink, SinkError, Verdict,
    };
    pub use crate::numeric::{ColumnDecimal, FixedDecimal, Rational, WideDecimal};
    pub use crate::storage::SqliteSink;
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;

    #[test]
    fn test_end_to_end_sqlite_round_trip() {
        let mut sink = SqliteSink::in_memory(chrono_tz::Tz::Asia__Tokyo).unwrap();
        sink.ensure_schema().unwrap();

        let engine = CalculationEngine::standard(RecordLayout::Combined);
        let summary = engine.run(&mut sink, &mut std::io::sink()).unwrap();

        let listed = sink.list_all().unwrap();
        assert_eq!(listed, summary.stored);

        let record = &listed[0].data;
        assert_eq!(record.name, "計算結果");
        assert_eq!(record.float_value, 0.9999999999999999);
        assert_eq!(record.int_value, 10_000);
        assert_eq!(record.int_error_value, 99_999_984);
        assert_eq!(record.rational_value, 1.0);
        assert_eq!(record.decimal_value, ColumnDecimal::one());
    }
}
