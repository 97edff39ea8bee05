//! Error types for loading, stepping and writing a simulation run

use thiserror::Error;

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors that abort a simulation run
#[derive(Error, Debug)]
pub enum SimError {
    /// Malformed record in the input stream
    #[error("format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// Invalid configuration or body data
    #[error("invalid value: {0}")]
    Value(String),

    /// Two bodies share a position, so the force between them is undefined
    #[error("bodies {first} and {second} coincide at t = {time}")]
    DegenerateConfiguration {
        first: usize,
        second: usize,
        time: f64,
    },

    /// The separation of two bodies overflowed or became NaN
    #[error("separation of bodies {first} and {second} is not finite at t = {time}")]
    NonFinite {
        first: usize,
        second: usize,
        time: f64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl SimError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        SimError::Format {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn value(message: impl Into<String>) -> Self {
        SimError::Value(message.into())
    }
}
