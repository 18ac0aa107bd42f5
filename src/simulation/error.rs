//! Error types for the simulation engine

use thiserror::Error;

/// Result alias for simulation operations
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Failures that abort a trial or a whole ensemble
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A parameter is outside the range the arithmetic is defined for
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// A finite draw stream ran out before the ensemble finished
    #[error("Random source exhausted after {drawn} draws")]
    RandomSourceExhausted { drawn: usize },
}

impl SimulationError {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn exhausted(drawn: usize) -> Self {
        Self::RandomSourceExhausted { drawn }
    }
}
