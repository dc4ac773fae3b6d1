// ============================================================================
// Accumulator Factory
// Creates accumulators from configuration and defines the standard suite
// ============================================================================

use super::{
    ExactRationalAccumulator, Float64Accumulator, RoundedDecimalAccumulator,
    ScaledIntegerAccumulator,
};
use crate::domain::RecordSlot;
use crate::interfaces::Accumulator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Defines which accumulation strategy to run and its parameters.
///
/// Every strategy adds `1/parts` to zero `parts` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AccumulatorKind {
    /// Native binary floating point
    Float64 { parts: u32 },

    /// Truncated integer unit at a fixed scale factor
    ScaledInteger {
        parts: u32,
        /// Multiplier applied before truncation (e.g. 10,000 or 100,000,000)
        scale: i64,
    },

    /// Exact BigInt ratio
    ExactRational { parts: u32 },

    /// 50-digit fixed-point decimal with one rounded division
    RoundedDecimal { parts: u32 },
}

/// Creates the accumulator for a configuration
///
/// # Example
/// ```
/// use fraction_drift::accumulators::{create_accumulator, AccumulatorKind};
///
/// let acc = create_accumulator(AccumulatorKind::ExactRational { parts: 49 });
/// assert!(acc.accumulate().unwrap().verdict().is_correct());
/// ```
pub fn create_accumulator(kind: AccumulatorKind) -> Box<dyn Accumulator> {
    match kind {
        AccumulatorKind::Float64 { parts } => Box::new(Float64Accumulator::new(parts)),
        AccumulatorKind::ScaledInteger { parts, scale } => {
            Box::new(ScaledIntegerAccumulator::new(parts, scale))
        },
        AccumulatorKind::ExactRational { parts } => Box::new(ExactRationalAccumulator::new(parts)),
        AccumulatorKind::RoundedDecimal { parts } => {
            Box::new(RoundedDecimalAccumulator::new(parts))
        },
    }
}

/// One strategy in a calculation run and the record field it fills
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteEntry {
    pub slot: RecordSlot,
    pub kind: AccumulatorKind,
    /// Line printed before the outcome, if any
    pub header: Option<&'static str>,
    /// Print the outcome in its labelled (`{:#}`) form
    pub detailed: bool,
}

impl SuiteEntry {
    pub fn new(slot: RecordSlot, kind: AccumulatorKind) -> Self {
        Self {
            slot,
            kind,
            header: None,
            detailed: false,
        }
    }

    /// Builder method: print `header` before the outcome
    pub fn with_header(mut self, header: &'static str) -> Self {
        self.header = Some(header);
        self
    }

    /// Builder method: use the labelled outcome form
    pub fn detailed(mut self) -> Self {
        self.detailed = true;
        self
    }
}

/// The five calculations, in the order they run:
///
/// 1. float64, 0.1 ten times
/// 2. scaled integer, 0.1 ten times at scale 10^4
/// 3. scaled integer, 1/49 forty-nine times at scale 10^8
/// 4. exact rational, 1/49 forty-nine times
/// 5. fixed decimal, 1/49 at 50 digits forty-nine times
pub fn standard_suite() -> Vec<SuiteEntry> {
    vec![
        SuiteEntry::new(RecordSlot::Float, AccumulatorKind::Float64 { parts: 10 }),
        SuiteEntry::new(
            RecordSlot::Int,
            AccumulatorKind::ScaledInteger {
                parts: 10,
                scale: 10_000,
            },
        ),
        SuiteEntry::new(
            RecordSlot::IntError,
            AccumulatorKind::ScaledInteger {
                parts: 49,
                scale: 100_000_000,
            },
        )
        .with_header("--Error case with 1.0/49.0 --")
        .detailed(),
        SuiteEntry::new(RecordSlot::Rational, AccumulatorKind::ExactRational { parts: 49 })
            .with_header("--- big.Rat case with 1/49 ---"),
        SuiteEntry::new(RecordSlot::Decimal, AccumulatorKind::RoundedDecimal { parts: 49 })
            .with_header("\n--- decimal.Decimal case with 1/49 ---"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::Verdict;

    #[test]
    fn test_factory_round_trips_kind() {
        for entry in standard_suite() {
            let acc = create_accumulator(entry.kind);
            assert_eq!(acc.kind(), entry.kind);
            assert!(!acc.name().is_empty());
        }
    }

    #[test]
    fn test_standard_suite_verdicts() {
        let verdicts: Vec<Verdict> = standard_suite()
            .into_iter()
            .map(|e| create_accumulator(e.kind).accumulate().unwrap().verdict())
            .collect();

        assert_eq!(
            verdicts,
            vec![
                Verdict::Error,   // float 0.1 x 10
                Verdict::Correct, // int 1000 x 10
                Verdict::Error,   // int 2040816 x 49
                Verdict::Correct, // rational
                Verdict::Error,   // decimal, off at the 50th digit
            ]
        );
    }

    #[test]
    fn test_suite_fills_every_slot_once() {
        let slots: Vec<RecordSlot> = standard_suite().iter().map(|e| e.slot).collect();
        assert_eq!(slots, RecordSlot::ALL.to_vec());
    }
}
