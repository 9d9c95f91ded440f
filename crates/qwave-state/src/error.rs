//! Error types for wavefunctions and measurement data.

use thiserror::Error;

/// Errors raised while constructing or transforming states and outcomes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateError {
    /// Amplitude vector length is not a power of two of at least 2.
    #[error("Amplitude vector of length {0} is not a power of two >= 2")]
    InvalidLength(usize),

    /// Numeric amplitudes do not have unit norm.
    #[error("Amplitudes must have unit norm, got squared norm {norm}")]
    NotNormalized {
        /// Sum of squared magnitudes.
        norm: f64,
    },

    /// The numeric part of a symbolic vector already exceeds unit norm.
    #[error("Numeric amplitudes already exceed unit norm ({partial_norm}) in a symbolic state")]
    ExceedsUnity {
        /// Sum of squared magnitudes of the fully numeric entries.
        partial_norm: f64,
    },

    /// Qubit count outside the supported range.
    #[error("Invalid number of qubits: {0}")]
    InvalidQubitCount(usize),

    /// Hamming weight outside `[0, n_qubits]`.
    #[error("Hamming weight {weight} is invalid for {n_qubits} qubits")]
    InvalidHammingWeight {
        /// Requested weight.
        weight: usize,
        /// Number of qubits.
        n_qubits: usize,
    },

    /// Amplitude index outside the vector.
    #[error("Index {index} out of range for {len} amplitudes")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Vector length.
        len: usize,
    },

    /// Sample counts must be positive.
    #[error("Number of samples must be positive, got {0}")]
    InvalidSampleCount(usize),

    /// Operation needs a fully numeric state.
    #[error("Operation '{0}' requires a numeric wavefunction, but free symbols remain")]
    SymbolicState(&'static str),

    /// Array input had an unsupported shape.
    #[error("Expected a flat, column or row vector, got shape {0:?}")]
    InvalidShape(Vec<usize>),

    /// Bitstring contains something other than 0 and 1.
    #[error("Invalid bitstring '{0}'")]
    InvalidBitstring(String),

    /// Bitstrings of different lengths were mixed.
    #[error("Bitstring width mismatch: expected {expected}, got {got}")]
    WidthMismatch {
        /// Width of the first bitstring.
        expected: usize,
        /// Width of the offending bitstring.
        got: usize,
    },

    /// Probability masses are negative or do not sum to one.
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// Pauli operator string could not be parsed or applied.
    #[error("Invalid Pauli operator: {0}")]
    InvalidPauli(String),

    /// Wavefunction document does not match the expected layout.
    #[error("Invalid wavefunction document: {0}")]
    InvalidDocument(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StateError {
    /// True for the invalid-argument class of errors.
    pub fn is_validation(&self) -> bool {
        !matches!(self, StateError::Io(_) | StateError::Serialization(_))
    }
}

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;
