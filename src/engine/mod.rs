// ============================================================================
// Engine Module
// Orchestrates accumulation runs against a result sink
// ============================================================================

mod calculation_engine;
mod setup;

pub use calculation_engine::{report_all, CalculationEngine, CalculationResult, RunSummary};
pub use setup::connect_sink;
