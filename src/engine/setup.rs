// ============================================================================
// Sink Setup
// Connect to the configured backend and prepare its schema
// ============================================================================

use crate::domain::{SinkConfig, SinkDriver};
use crate::interfaces::{MemorySink, ResultSink};
use crate::storage::SqliteSink;
use crate::Result;

/// Connect to the configured sink and make sure its schema exists.
///
/// Connection and schema failures are returned, not retried; the caller
/// decides how to exit.
pub fn connect_sink(config: &SinkConfig) -> Result<Box<dyn ResultSink>> {
    let mut sink = open_sink(config)?;
    sink.ensure_schema()?;
    tracing::info!(backend = sink.backend(), time_zone = %config.time_zone, "result sink ready");
    Ok(sink)
}

fn open_sink(config: &SinkConfig) -> Result<Box<dyn ResultSink>> {
    match config.driver {
        SinkDriver::Memory => Ok(Box::new(MemorySink::new(config.time_zone))),
        SinkDriver::Sqlite => {
            let sink = SqliteSink::open(&config.sqlite_path(), config.time_zone)?
                .with_parse_timestamps(config.parse_timestamps);
            Ok(Box::new(sink))
        },
        #[cfg(feature = "mysql")]
        SinkDriver::MySql => Ok(Box::new(crate::storage::MySqlSink::connect(config)?)),
        #[cfg(not(feature = "mysql"))]
        SinkDriver::MySql => Err(crate::domain::ConfigError::DriverUnavailable("mysql").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_is_ready() {
        let config = SinkConfig::default().with_driver(SinkDriver::Memory);
        let mut sink = connect_sink(&config).unwrap();
        assert_eq!(sink.backend(), "memory");
        assert!(sink.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_in_memory_is_ready() {
        let config = SinkConfig::default()
            .with_driver(SinkDriver::Sqlite)
            .with_database_name(":memory:");
        let mut sink = connect_sink(&config).unwrap();
        assert_eq!(sink.backend(), "sqlite");
        assert!(sink.list_all().unwrap().is_empty());
    }

    #[cfg(not(feature = "mysql"))]
    #[test]
    fn test_mysql_requires_feature() {
        let config = SinkConfig::default().with_driver(SinkDriver::MySql);
        assert!(matches!(
            connect_sink(&config),
            Err(crate::Error::Config(crate::domain::ConfigError::DriverUnavailable("mysql")))
        ));
    }
}
