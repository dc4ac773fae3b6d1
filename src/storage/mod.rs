// ============================================================================
// Storage Module
// Database-backed result sinks
// ============================================================================

#[cfg(feature = "mysql")]
mod mysql;
mod sqlite;

#[cfg(feature = "mysql")]
pub use mysql::MySqlSink;
pub use sqlite::SqliteSink;
