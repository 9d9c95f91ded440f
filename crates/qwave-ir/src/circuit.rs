//! High-level circuit builder API.

use std::collections::{BTreeSet, HashMap};

use crate::error::{IrError, IrResult};
use crate::gate::{GateKind, StandardGate};
use crate::instruction::Instruction;
use crate::parameter::ParameterExpression;
use crate::qubit::QubitId;

/// A quantum circuit: an ordered sequence of gate applications on a fixed
/// number of qubits.
///
/// Every qubit is measured at the end of execution, so there are no explicit
/// measurement instructions or classical registers.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Width of the circuit.
    num_qubits: usize,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit with no qubits.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_size(name, 0)
    }

    /// Create an empty circuit with a given number of qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits: num_qubits as usize,
            instructions: vec![],
        }
    }

    /// Create a circuit from instructions; the width is the highest qubit
    /// index referenced plus one.
    pub fn from_instructions(instructions: impl IntoIterator<Item = Instruction>) -> Self {
        let instructions: Vec<Instruction> = instructions.into_iter().collect();
        let num_qubits = instructions
            .iter()
            .filter_map(Instruction::max_qubit)
            .max()
            .map_or(0, |q| q.index() + 1);
        Self {
            name: "circuit".into(),
            num_qubits,
            instructions,
        }
    }

    /// Rename the circuit.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Widen the circuit by one qubit, returning its id.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits as u32);
        self.num_qubits += 1;
        id
    }

    /// Append an instruction, checking that its qubits are in range.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        for &qubit in &instruction.qubits {
            if qubit.index() >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name: Some(instruction.name().to_string()),
                });
            }
        }
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Apply an arbitrary gate to the given qubits.
    pub fn gate(
        &mut self,
        gate: impl Into<GateKind>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.apply(Instruction::new(gate, qubits)?)
    }

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(gate, qubit)?)
    }

    fn double(&mut self, gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(gate, q1, q2)?)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::T, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.single(StandardGate::Rx(theta.into()), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.single(StandardGate::Ry(theta.into()), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.single(StandardGate::Rz(theta.into()), qubit)
    }

    /// Apply universal U gate.
    pub fn u(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.single(
            StandardGate::U(theta.into(), phi.into(), lambda.into()),
            qubit,
        )
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CX, control, target)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::CZ, control, target)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.double(StandardGate::Swap, q1, q2)
    }

    /// Apply Toffoli gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::new(StandardGate::CCX, [c1, c2, target])?)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True if the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Free symbols across all gate parameters.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        self.instructions
            .iter()
            .flat_map(|inst| inst.gate.symbols())
            .collect()
    }

    /// True if any gate parameter is still symbolic.
    pub fn is_parameterized(&self) -> bool {
        !self.free_symbols().is_empty()
    }

    /// Return a copy with the given symbols bound.
    pub fn bind(&self, values: &HashMap<String, f64>) -> Self {
        Self {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            instructions: self
                .instructions
                .iter()
                .map(|inst| inst.bind_all(values))
                .collect(),
        }
    }

    /// Return a copy of this circuit followed by `other`'s instructions.
    ///
    /// The result is as wide as the wider of the two circuits.
    #[must_use]
    pub fn compose(&self, other: &Circuit) -> Self {
        let mut instructions = self.instructions.clone();
        instructions.extend(other.instructions.iter().cloned());
        Self {
            name: self.name.clone(),
            num_qubits: self.num_qubits.max(other.num_qubits),
            instructions,
        }
    }

    // =========================================================================
    // Standard circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }

    /// Create an n-qubit GHZ state circuit as a CNOT ladder.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size(format!("ghz_{n}"), n);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 1..n {
            circuit.cx(QubitId(i - 1), QubitId(i))?;
        }
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_from_instructions_infers_width() {
        let circuit = Circuit::from_instructions([
            Instruction::single_qubit_gate(StandardGate::X, QubitId(0)).unwrap(),
            Instruction::single_qubit_gate(StandardGate::X, QubitId(2)).unwrap(),
        ]);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn test_out_of_range_qubit_rejected() {
        let mut circuit = Circuit::with_size("test", 2);
        let err = circuit.h(QubitId(2)).unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitOutOfRange {
                num_qubits: 2,
                ..
            }
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_add_qubit_widens_circuit() {
        let mut circuit = Circuit::new("grow");
        let q = circuit.add_qubit();
        circuit.x(q).unwrap();
        assert_eq!(circuit.num_qubits(), 1);
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(3).unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.len(), 3);
    }

    #[test]
    fn test_parameterized_circuit_binding() {
        let mut circuit = Circuit::with_size("vqe", 1);
        circuit
            .rx(ParameterExpression::symbol("theta"), QubitId(0))
            .unwrap();
        assert!(circuit.is_parameterized());
        assert!(circuit.free_symbols().contains("theta"));

        let bound = circuit.bind(&HashMap::from([("theta".to_string(), PI)]));
        assert!(!bound.is_parameterized());
        assert!(circuit.is_parameterized());
    }

    #[test]
    fn test_compose_takes_widest() {
        let a = Circuit::bell().unwrap();
        let b = Circuit::ghz(3).unwrap();
        let composed = a.compose(&b);
        assert_eq!(composed.num_qubits(), 3);
        assert_eq!(composed.len(), 5);
    }
}
