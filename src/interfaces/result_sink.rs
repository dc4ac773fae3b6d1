// ============================================================================
// Result Sink Interface
// Defines the contract for persisting and listing calculation records
// ============================================================================

use crate::domain::{CalculationRecord, NewCalculationRecord, RecordTime};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Failures reported by a result sink. All of them abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("failed to connect database: {0}")]
    Connection(String),

    #[error("failed to migrate database: {0}")]
    Schema(String),

    #[error("failed to insert calculation record: {0}")]
    Insert(String),

    #[error("failed to list calculation records: {0}")]
    Query(String),
}

/// Result type alias for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Persistence contract for calculation records.
///
/// Records are append-only: there is no update or delete. Connecting is
/// backend-specific and happens in each implementation's constructor.
pub trait ResultSink {
    /// Idempotently create (or extend) the `calculation_results` table
    fn ensure_schema(&mut self) -> SinkResult<()>;

    /// Append one record; the sink assigns the id and timestamps
    fn insert(&mut self, record: &NewCalculationRecord) -> SinkResult<CalculationRecord>;

    /// Every non-deleted record, ordered by id
    fn list_all(&mut self) -> SinkResult<Vec<CalculationRecord>>;

    /// Backend name for logging
    fn backend(&self) -> &str;
}

/// Current time in the sink's zone
pub fn sink_timestamp(time_zone: Tz) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&time_zone).fixed_offset()
}

/// In-memory result sink, used for tests and the `memory` driver
#[derive(Debug)]
pub struct MemorySink {
    records: Vec<CalculationRecord>,
    time_zone: Tz,
    schema_ready: bool,
}

impl MemorySink {
    pub fn new(time_zone: Tz) -> Self {
        Self {
            records: Vec::new(),
            time_zone,
            schema_ready: false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl ResultSink for MemorySink {
    fn ensure_schema(&mut self) -> SinkResult<()> {
        self.schema_ready = true;
        Ok(())
    }

    fn insert(&mut self, record: &NewCalculationRecord) -> SinkResult<CalculationRecord> {
        if !self.schema_ready {
            return Err(SinkError::Insert("calculation_results does not exist".to_string()));
        }

        let now = sink_timestamp(self.time_zone);
        let id = i64::try_from(self.records.len() + 1)
            .map_err(|err| SinkError::Insert(err.to_string()))?;
        let stored = CalculationRecord {
            id,
            created_at: RecordTime::Parsed(now),
            updated_at: RecordTime::Parsed(now),
            deleted_at: None,
            data: record.clone(),
        };
        self.records.push(stored.clone());
        Ok(stored)
    }

    fn list_all(&mut self) -> SinkResult<Vec<CalculationRecord>> {
        if !self.schema_ready {
            return Err(SinkError::Query("calculation_results does not exist".to_string()));
        }
        Ok(self
            .records
            .iter()
            .filter(|r| r.deleted_at.is_none())
            .cloned()
            .collect())
    }

    fn backend(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_requires_schema() {
        let mut sink = MemorySink::default();
        let result = sink.insert(&NewCalculationRecord::named("x"));
        assert!(matches!(result, Err(SinkError::Insert(_))));
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut sink = MemorySink::new(Tz::Asia__Tokyo);
        sink.ensure_schema().unwrap();
        let a = sink.insert(&NewCalculationRecord::named("a")).unwrap();
        let b = sink.insert(&NewCalculationRecord::named("b")).unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let RecordTime::Parsed(ts) = a.created_at else {
            panic!("memory sink always parses timestamps");
        };
        assert_eq!(ts.offset().local_minus_utc(), 9 * 3600);

        let listed = sink.list_all().unwrap();
        assert_eq!(listed, vec![a, b]);
        assert_eq!(sink.len(), 2);
    }
}
