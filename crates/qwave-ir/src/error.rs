//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building circuits or looking up gates.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside the circuit width.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit circuit{}", format_gate_context(.gate_name))]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Width of the circuit.
        num_qubits: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Gate requires a different number of parameters.
    #[error("Gate '{gate_name}' takes {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of parameters.
        expected: usize,
        /// Actual number of parameters provided.
        got: usize,
    },

    /// A parametric gate was applied to qubits before receiving parameters.
    #[error("Gate '{0}' is parametric; call with_params before applying it to qubits")]
    MissingParameters(String),

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Custom gate matrix has the wrong shape.
    #[error("Gate '{gate_name}' matrix has {got} entries, expected {expected}")]
    InvalidMatrix {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of entries.
        expected: usize,
        /// Actual number of entries.
        got: usize,
    },

    /// Parameter is unbound.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

    /// Gate name not present in the builtin registry.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),
}

impl IrError {
    /// True for the unknown-name class of errors.
    pub fn is_lookup(&self) -> bool {
        matches!(self, IrError::UnknownGate(_))
    }

    /// True for the invalid-argument class of errors.
    pub fn is_validation(&self) -> bool {
        !self.is_lookup()
    }
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
