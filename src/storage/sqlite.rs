//! SQLite result sink.
//!
//! SQLite has no DECIMAL(65,30) type, so `decimal_value` is stored as the
//! canonical 30-digit string and parsed back into a `ColumnDecimal`.

use crate::domain::{CalculationRecord, NewCalculationRecord, RecordTime};
use crate::interfaces::{sink_timestamp, ResultSink, SinkError, SinkResult};
use crate::numeric::ColumnDecimal;
use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const CREATE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS calculation_results (
  id INTEGER PRIMARY KEY AUTOINCREMENT
);
";

/// Every column but `id`, added one by one when missing so older tables
/// gain new fields without losing rows. Rows that predate a timestamp
/// column read back as the Unix epoch.
const COLUMNS: &[(&str, &str)] = &[
    ("created_at", "TEXT NOT NULL DEFAULT '1970-01-01T00:00:00+00:00'"),
    ("updated_at", "TEXT NOT NULL DEFAULT '1970-01-01T00:00:00+00:00'"),
    ("deleted_at", "TEXT"),
    ("name", "TEXT NOT NULL DEFAULT ''"),
    ("float_value", "REAL NOT NULL DEFAULT 0"),
    ("int_value", "INTEGER NOT NULL DEFAULT 0"),
    ("int_error_value", "INTEGER NOT NULL DEFAULT 0"),
    ("big_rat_value", "REAL NOT NULL DEFAULT 0"),
    ("decimal_value", "TEXT NOT NULL DEFAULT '0'"),
];

// Runs after column reconciliation; both statements reference deleted_at
// or the full row.
const INDEXES_AND_TRIGGERS: &str = r"
CREATE INDEX IF NOT EXISTS idx_calculation_results_deleted_at
  ON calculation_results(deleted_at);

CREATE TRIGGER IF NOT EXISTS trg_calculation_results_no_update
BEFORE UPDATE ON calculation_results
BEGIN
  SELECT RAISE(FAIL, 'calculation_results is append-only');
END;
";

pub struct SqliteSink {
    conn: Connection,
    time_zone: Tz,
    parse_timestamps: bool,
}

impl SqliteSink {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path, time_zone: Tz) -> SinkResult<Self> {
        let conn = Connection::open(path).map_err(|err| {
            SinkError::Connection(format!("sqlite database at {}: {err}", path.display()))
        })?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|err| SinkError::Connection(err.to_string()))?;
        Ok(Self::from_connection(conn, time_zone))
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory(time_zone: Tz) -> SinkResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|err| SinkError::Connection(err.to_string()))?;
        Ok(Self::from_connection(conn, time_zone))
    }

    fn from_connection(conn: Connection, time_zone: Tz) -> Self {
        Self {
            conn,
            time_zone,
            parse_timestamps: true,
        }
    }

    /// Builder method: return timestamps as raw column text
    pub fn with_parse_timestamps(mut self, parse: bool) -> Self {
        self.parse_timestamps = parse;
        self
    }

    fn existing_columns(&self) -> rusqlite::Result<Vec<String>> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(calculation_results)")?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    fn parse_row(&self, row: &Row<'_>) -> rusqlite::Result<CalculationRecord> {
        let decimal_raw: String = row.get(9)?;
        let decimal_value: ColumnDecimal = decimal_raw
            .parse()
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(err)))?;

        Ok(CalculationRecord {
            id: row.get(0)?,
            created_at: self.record_time(1, row.get(1)?)?,
            updated_at: self.record_time(2, row.get(2)?)?,
            deleted_at: row
                .get::<_, Option<String>>(3)?
                .map(|raw| self.record_time(3, raw))
                .transpose()?,
            data: NewCalculationRecord {
                name: row.get(4)?,
                float_value: row.get(5)?,
                int_value: row.get(6)?,
                int_error_value: row.get(7)?,
                rational_value: row.get(8)?,
                decimal_value,
            },
        })
    }

    fn record_time(&self, column: usize, raw: String) -> rusqlite::Result<RecordTime> {
        if !self.parse_timestamps {
            return Ok(RecordTime::Raw(raw));
        }
        DateTime::<FixedOffset>::parse_from_rfc3339(&raw)
            .map(RecordTime::Parsed)
            .map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
            })
    }
}

impl ResultSink for SqliteSink {
    fn ensure_schema(&mut self) -> SinkResult<()> {
        self.conn
            .execute_batch(CREATE_TABLE)
            .map_err(|err| SinkError::Schema(err.to_string()))?;

        let existing = self
            .existing_columns()
            .map_err(|err| SinkError::Schema(err.to_string()))?;

        for (column, definition) in COLUMNS {
            if existing.iter().any(|c| c == column) {
                continue;
            }
            self.conn
                .execute_batch(&format!(
                    "ALTER TABLE calculation_results ADD COLUMN {column} {definition};"
                ))
                .map_err(|err| SinkError::Schema(format!("adding column {column}: {err}")))?;
            tracing::debug!(column, "added column to calculation_results");
        }

        self.conn
            .execute_batch(INDEXES_AND_TRIGGERS)
            .map_err(|err| SinkError::Schema(err.to_string()))
    }

    fn insert(&mut self, record: &NewCalculationRecord) -> SinkResult<CalculationRecord> {
        let now = sink_timestamp(self.time_zone);
        let stamp = now.to_rfc3339();

        self.conn
            .execute(
                "INSERT INTO calculation_results
                   (created_at, updated_at, name, float_value, int_value,
                    int_error_value, big_rat_value, decimal_value)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    stamp,
                    stamp,
                    record.name,
                    record.float_value,
                    record.int_value,
                    record.int_error_value,
                    record.rational_value,
                    record.decimal_value.to_string(),
                ],
            )
            .map_err(|err| SinkError::Insert(err.to_string()))?;

        let stamp = if self.parse_timestamps {
            RecordTime::Parsed(now)
        } else {
            RecordTime::Raw(stamp)
        };

        Ok(CalculationRecord {
            id: self.conn.last_insert_rowid(),
            created_at: stamp.clone(),
            updated_at: stamp,
            deleted_at: None,
            data: record.clone(),
        })
    }

    fn list_all(&mut self) -> SinkResult<Vec<CalculationRecord>> {
        let query = |sink: &Self| -> rusqlite::Result<Vec<CalculationRecord>> {
            let mut stmt = sink.conn.prepare(
                "SELECT id, created_at, updated_at, deleted_at, name, float_value,
                        int_value, int_error_value, big_rat_value, decimal_value
                 FROM calculation_results
                 WHERE deleted_at IS NULL
                 ORDER BY id ASC",
            )?;
            let records = stmt
                .query_map([], |row| sink.parse_row(row))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        };

        query(&*self).map_err(|err| SinkError::Query(err.to_string()))
    }

    fn backend(&self) -> &str {
        "sqlite"
    }
}
