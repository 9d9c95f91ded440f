//! Gate applications: a gate together with the qubits it acts on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{IrError, IrResult};
use crate::gate::{GateKind, StandardGate};
use crate::qubit::QubitId;

/// A gate applied to an ordered list of qubits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate being applied.
    pub gate: GateKind,
    /// Qubits this instruction operates on, controls first.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction, checking arity and duplicate operands.
    pub fn new(
        gate: impl Into<GateKind>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        let gate = gate.into();
        let qubits: Vec<QubitId> = qubits.into_iter().collect();

        let expected = gate.num_qubits();
        if qubits.len() != expected as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected,
                got: qubits.len() as u32,
            });
        }
        for (i, q) in qubits.iter().enumerate() {
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some(gate.name().to_string()),
                });
            }
        }

        Ok(Self { gate, qubits })
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> IrResult<Self> {
        Self::new(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<Self> {
        Self::new(gate, [q1, q2])
    }

    /// Get the name of the gate.
    pub fn name(&self) -> &str {
        self.gate.name()
    }

    /// Highest qubit index touched by this instruction.
    pub fn max_qubit(&self) -> Option<QubitId> {
        self.qubits.iter().copied().max()
    }

    /// Return a copy with gate parameters bound.
    pub fn bind_all(&self, values: &HashMap<String, f64>) -> Self {
        let gate = match &self.gate {
            GateKind::Standard(g) => GateKind::Standard(g.bind_all(values)),
            custom @ GateKind::Custom(_) => custom.clone(),
        };
        Self {
            gate,
            qubits: self.qubits.clone(),
        }
    }
}
