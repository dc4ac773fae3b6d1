// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod accumulator;
mod result_sink;

pub use accumulator::{AccumulationOutcome, Accumulator, Verdict};
pub use result_sink::{sink_timestamp, MemorySink, ResultSink, SinkError, SinkResult};
