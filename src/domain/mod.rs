// ============================================================================
// Domain Models Module
// Contains the persisted record model and run configuration
// ============================================================================

pub mod config;
pub mod record;

pub use config::{ConfigError, RunConfig, SinkConfig, SinkDriver};
pub use record::{
    CalculationRecord, NewCalculationRecord, RecordLayout, RecordSlot, RecordTime,
    COMBINED_RECORD_NAME,
};
