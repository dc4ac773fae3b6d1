// ============================================================================
// Calculation Record
// Append-only persisted result of one calculation run
// ============================================================================

use crate::interfaces::AccumulationOutcome;
use crate::numeric::{ColumnDecimal, NumericError, NumericResult};
use chrono::{DateTime, FixedOffset};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Label used when all five results share one record
pub const COMBINED_RECORD_NAME: &str = "計算結果";

/// Field of a calculation record that one strategy fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RecordSlot {
    /// `float_value` (f64 sum)
    Float,
    /// `int_value` (scaled integer, scale 10^4)
    Int,
    /// `int_error_value` (scaled integer, scale 10^8)
    IntError,
    /// `rational_value` (exact ratio converted to f64)
    Rational,
    /// `decimal_value` (fixed decimal, 30 fractional digits)
    Decimal,
}

impl RecordSlot {
    pub const ALL: [RecordSlot; 5] = [
        RecordSlot::Float,
        RecordSlot::Int,
        RecordSlot::IntError,
        RecordSlot::Rational,
        RecordSlot::Decimal,
    ];

    /// Record name used when each strategy gets its own row
    pub fn label(self) -> &'static str {
        match self {
            RecordSlot::Float => "float64",
            RecordSlot::Int => "int",
            RecordSlot::IntError => "int-error",
            RecordSlot::Rational => "big-rational",
            RecordSlot::Decimal => "decimal",
        }
    }
}

/// How results are grouped into records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RecordLayout {
    /// One record carrying every value
    #[default]
    Combined,
    /// One record per strategy; fields of other strategies stay zero
    PerStrategy,
}

/// Insert shape of a calculation record. Unset numeric fields are zero.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewCalculationRecord {
    pub name: String,
    pub float_value: f64,
    pub int_value: i64,
    pub int_error_value: i64,
    /// Exact rational result, converted to f64 after the exact comparison
    pub rational_value: f64,
    /// Fixed decimal result at column precision (65 digits, 30 fractional)
    pub decimal_value: ColumnDecimal,
}

impl NewCalculationRecord {
    /// Record with the given label and every value zero
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            float_value: 0.0,
            int_value: 0,
            int_error_value: 0,
            rational_value: 0.0,
            decimal_value: ColumnDecimal::zero(),
        }
    }

    /// Copy an outcome into the field named by `slot`.
    ///
    /// The decimal sum is narrowed from 50 to 30 fractional digits with
    /// half-up rounding, the same conversion a DECIMAL(65,30) column applies.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the outcome cannot fill that slot (an
    /// integer slot needs a scaled-integer outcome, the decimal slot a
    /// fixed-decimal outcome).
    pub fn fill(&mut self, slot: RecordSlot, outcome: &AccumulationOutcome) -> NumericResult<()> {
        match slot {
            RecordSlot::Float => self.float_value = outcome.as_f64()?,
            RecordSlot::Int => {
                self.int_value = outcome.scaled_sum().ok_or(NumericError::InvalidInput)?;
            },
            RecordSlot::IntError => {
                self.int_error_value = outcome.scaled_sum().ok_or(NumericError::InvalidInput)?;
            },
            RecordSlot::Rational => self.rational_value = outcome.as_f64()?,
            RecordSlot::Decimal => {
                let sum = outcome.decimal_sum().ok_or(NumericError::InvalidInput)?;
                self.decimal_value = sum.rescale();
            },
        }
        Ok(())
    }
}

/// Timestamp column value as handed back by a sink.
///
/// Sinks configured with `parse_timestamps = false` return the raw column text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RecordTime {
    Parsed(DateTime<FixedOffset>),
    Raw(String),
}

impl fmt::Display for RecordTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordTime::Parsed(ts) => write!(f, "{}", ts.to_rfc3339()),
            RecordTime::Raw(raw) => f.write_str(raw),
        }
    }
}

/// Stored calculation record with sink-assigned id and timestamps
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalculationRecord {
    pub id: i64,
    pub created_at: RecordTime,
    pub updated_at: RecordTime,
    /// Soft-delete marker; rows with a marker are never listed
    pub deleted_at: Option<RecordTime>,
    pub data: NewCalculationRecord,
}

impl fmt::Display for CalculationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, FloatValue: {:.20}, IntValue: {}, IntErrorValue: {}, \
             BigRatValue: {:.20}, DecimalValue: {}, CreatedAt: {}",
            self.id,
            self.data.name,
            self.data.float_value,
            self.data.int_value,
            self.data.int_error_value,
            self.data.rational_value,
            self.data.decimal_value,
            self.created_at,
        )
    }
}

#[cfg(feature = "serde")]
impl CalculationRecord {
    /// JSON form of the stored record; the decimal value is kept as a string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
