//! Crate-level error type

use crate::domain::ConfigError;
use crate::interfaces::SinkError;
use crate::numeric::NumericError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a calculation run
#[derive(Error, Debug)]
pub enum Error {
    /// Arithmetic failure inside an accumulator
    #[error("calculation failed: {0}")]
    Numeric(#[from] NumericError),

    /// Invalid environment configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Connection, schema, insert or listing failure
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Diagnostic output could not be written
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
