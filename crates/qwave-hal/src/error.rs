//! Error types for the HAL crate.

use qwave_ir::IrError;
use qwave_state::StateError;
use thiserror::Error;

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend is not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Invalid circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Initial state does not fit the circuit.
    #[error("Invalid initial state: {0}")]
    InvalidInitialState(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Circuit exceeds backend capabilities.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Unsupported feature.
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Circuit construction or binding failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Wavefunction or measurement failure.
    #[error(transparent)]
    State(#[from] StateError),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl HalError {
    /// True for the invalid-argument class of errors.
    pub fn is_validation(&self) -> bool {
        match self {
            HalError::InvalidCircuit(_)
            | HalError::InvalidInitialState(_)
            | HalError::Configuration(_)
            | HalError::CircuitTooLarge(_)
            | HalError::InvalidShots(_) => true,
            HalError::Ir(e) => e.is_validation(),
            HalError::State(e) => e.is_validation(),
            _ => false,
        }
    }

    /// True for the unknown-name class of errors.
    pub fn is_lookup(&self) -> bool {
        match self {
            HalError::BackendUnavailable(_) => true,
            HalError::Ir(e) => e.is_lookup(),
            _ => false,
        }
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
