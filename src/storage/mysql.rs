//! MySQL result sink.
//!
//! Uses sqlx on a private current-thread tokio runtime so the sink keeps
//! the same blocking `ResultSink` contract as the SQLite backend.

use crate::domain::{CalculationRecord, NewCalculationRecord, RecordTime, SinkConfig};
use crate::interfaces::{sink_timestamp, ResultSink, SinkError, SinkResult};
use crate::numeric::ColumnDecimal;
use chrono::{NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{ConnectOptions, Row};
use tokio::runtime::Runtime;

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS calculation_results (
  id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
  created_at DATETIME(3) NULL,
  updated_at DATETIME(3) NULL,
  deleted_at DATETIME(3) NULL,
  INDEX idx_calculation_results_deleted_at (deleted_at)
)";

/// Every column but `id`; `decimal_value` keeps 65 digits with 30 after
/// the point.
const COLUMNS: &[(&str, &str)] = &[
    ("created_at", "DATETIME(3) NULL"),
    ("updated_at", "DATETIME(3) NULL"),
    ("deleted_at", "DATETIME(3) NULL"),
    ("name", "LONGTEXT"),
    ("float_value", "DOUBLE NOT NULL DEFAULT 0"),
    ("int_value", "BIGINT NOT NULL DEFAULT 0"),
    ("int_error_value", "BIGINT NOT NULL DEFAULT 0"),
    ("big_rat_value", "DOUBLE NOT NULL DEFAULT 0"),
    ("decimal_value", "DECIMAL(65,30) NOT NULL DEFAULT 0"),
];

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub struct MySqlSink {
    runtime: Runtime,
    conn: MySqlConnection,
    time_zone: Tz,
    parse_timestamps: bool,
}

impl MySqlSink {
    /// Connect to `config.host:config.port`. No retry.
    pub fn connect(config: &SinkConfig) -> SinkResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| SinkError::Connection(err.to_string()))?;

        // Session zone as a fixed offset so the server needs no zone tables
        let offset = Utc::now()
            .with_timezone(&config.time_zone)
            .offset()
            .fix()
            .to_string();

        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.database_name)
            .timezone(Some(offset));

        let conn = runtime
            .block_on(options.connect())
            .map_err(|err| SinkError::Connection(format!("{}: {err}", config.address())))?;

        Ok(Self {
            runtime,
            conn,
            time_zone: config.time_zone,
            parse_timestamps: config.parse_timestamps,
        })
    }

    fn record_time(&self, raw: String) -> SinkResult<RecordTime> {
        if !self.parse_timestamps {
            return Ok(RecordTime::Raw(raw));
        }
        let naive = NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT)
            .map_err(|err| SinkError::Query(format!("timestamp {raw:?}: {err}")))?;
        let local = self
            .time_zone
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| SinkError::Query(format!("timestamp {raw:?} does not exist in zone")))?;
        Ok(RecordTime::Parsed(local.fixed_offset()))
    }

    fn parse_row(&self, row: &MySqlRow) -> SinkResult<CalculationRecord> {
        let get_err = |err: sqlx::Error| SinkError::Query(err.to_string());

        let id: u64 = row.try_get("id").map_err(get_err)?;
        let created_at: String = row.try_get("created_at").map_err(get_err)?;
        let updated_at: String = row.try_get("updated_at").map_err(get_err)?;
        let deleted_at: Option<String> = row.try_get("deleted_at").map_err(get_err)?;
        let decimal_raw: String = row.try_get("decimal_value").map_err(get_err)?;
        let decimal_value: ColumnDecimal = decimal_raw
            .parse()
            .map_err(|err| SinkError::Query(format!("decimal_value {decimal_raw:?}: {err}")))?;

        Ok(CalculationRecord {
            id: i64::try_from(id).map_err(|err| SinkError::Query(err.to_string()))?,
            created_at: self.record_time(created_at)?,
            updated_at: self.record_time(updated_at)?,
            deleted_at: deleted_at.map(|raw| self.record_time(raw)).transpose()?,
            data: NewCalculationRecord {
                name: row
                    .try_get::<Option<String>, _>("name")
                    .map_err(get_err)?
                    .unwrap_or_default(),
                float_value: row.try_get("float_value").map_err(get_err)?,
                int_value: row.try_get("int_value").map_err(get_err)?,
                int_error_value: row.try_get("int_error_value").map_err(get_err)?,
                rational_value: row.try_get("big_rat_value").map_err(get_err)?,
                decimal_value,
            },
        })
    }
}

impl ResultSink for MySqlSink {
    fn ensure_schema(&mut self) -> SinkResult<()> {
        let conn = &mut self.conn;
        self.runtime.block_on(async move {
            sqlx::query(CREATE_TABLE)
                .execute(&mut *conn)
                .await
                .map_err(|err| SinkError::Schema(err.to_string()))?;

            let existing: Vec<String> = sqlx::query_scalar(
                "SELECT CAST(COLUMN_NAME AS CHAR) FROM information_schema.COLUMNS
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = 'calculation_results'",
            )
            .fetch_all(&mut *conn)
            .await
            .map_err(|err| SinkError::Schema(err.to_string()))?;

            for (column, definition) in COLUMNS {
                if existing.iter().any(|c| c == column) {
                    continue;
                }
                let ddl = format!("ALTER TABLE calculation_results ADD COLUMN {column} {definition}");
                sqlx::query(&ddl)
                    .execute(&mut *conn)
                    .await
                    .map_err(|err| SinkError::Schema(format!("adding column {column}: {err}")))?;
                tracing::debug!(column, "added column to calculation_results");
            }

            Ok(())
        })
    }

    fn insert(&mut self, record: &NewCalculationRecord) -> SinkResult<CalculationRecord> {
        let now = sink_timestamp(self.time_zone);
        let local = now.naive_local();
        let conn = &mut self.conn;

        let result = self
            .runtime
            .block_on(
                sqlx::query(
                    "INSERT INTO calculation_results
                       (created_at, updated_at, name, float_value, int_value,
                        int_error_value, big_rat_value, decimal_value)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(local)
                .bind(local)
                .bind(&record.name)
                .bind(record.float_value)
                .bind(record.int_value)
                .bind(record.int_error_value)
                .bind(record.rational_value)
                .bind(record.decimal_value.to_string())
                .execute(&mut *conn),
            )
            .map_err(|err| SinkError::Insert(err.to_string()))?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|err| SinkError::Insert(err.to_string()))?;
        let stamp = if self.parse_timestamps {
            RecordTime::Parsed(now)
        } else {
            RecordTime::Raw(local.format(DATETIME_FORMAT).to_string())
        };

        Ok(CalculationRecord {
            id,
            created_at: stamp.clone(),
            updated_at: stamp,
            deleted_at: None,
            data: record.clone(),
        })
    }

    fn list_all(&mut self) -> SinkResult<Vec<CalculationRecord>> {
        let conn = &mut self.conn;
        let rows = self
            .runtime
            .block_on(
                sqlx::query(
                    "SELECT id,
                            COALESCE(CAST(created_at AS CHAR), '1970-01-01 00:00:00.000')
                              AS created_at,
                            COALESCE(CAST(updated_at AS CHAR), '1970-01-01 00:00:00.000')
                              AS updated_at,
                            CAST(deleted_at AS CHAR) AS deleted_at,
                            name, float_value, int_value, int_error_value, big_rat_value,
                            CAST(decimal_value AS CHAR) AS decimal_value
                     FROM calculation_results
                     WHERE deleted_at IS NULL
                     ORDER BY id ASC",
                )
                .fetch_all(&mut *conn),
            )
            .map_err(|err| SinkError::Query(err.to_string()))?;

        rows.iter().map(|row| self.parse_row(row)).collect()
    }

    fn backend(&self) -> &str {
        "mysql"
    }
}
