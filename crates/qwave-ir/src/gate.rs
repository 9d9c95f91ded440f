//! Quantum gate types.
//!
//! Gates are opaque descriptions here: the IR names a gate and carries its
//! parameters, the simulator adapters own the matrices.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::error::{IrError, IrResult};
use crate::parameter::ParameterExpression;

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// Phase gate.
    P(ParameterExpression),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Controlled phase gate.
    CP(ParameterExpression),
    /// Controlled rotation around Z.
    CRz(ParameterExpression),
    /// XX rotation gate.
    RXX(ParameterExpression),
    /// YY rotation gate.
    RYY(ParameterExpression),
    /// ZZ rotation gate.
    RZZ(ParameterExpression),
    /// Toffoli gate (CCX).
    CCX,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::CP(_) => "cp",
            StandardGate::CRz(_) => "crz",
            StandardGate::RXX(_) => "rxx",
            StandardGate::RYY(_) => "ryy",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::CP(_)
            | StandardGate::CRz(_)
            | StandardGate::RXX(_)
            | StandardGate::RYY(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX => 3,
        }
    }

    /// Check if any parameter of this gate is still symbolic.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    /// Get parameters of this gate.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CP(p)
            | StandardGate::CRz(p)
            | StandardGate::RXX(p)
            | StandardGate::RYY(p)
            | StandardGate::RZZ(p) => vec![p],

            StandardGate::U(a, b, c) => vec![a, b, c],

            _ => vec![],
        }
    }

    /// Return a copy with every known symbol bound.
    pub fn bind_all(&self, values: &HashMap<String, f64>) -> Self {
        let b = |p: &ParameterExpression| p.bind_all(values);
        match self {
            StandardGate::Rx(p) => StandardGate::Rx(b(p)),
            StandardGate::Ry(p) => StandardGate::Ry(b(p)),
            StandardGate::Rz(p) => StandardGate::Rz(b(p)),
            StandardGate::P(p) => StandardGate::P(b(p)),
            StandardGate::U(t, p, l) => StandardGate::U(b(t), b(p), b(l)),
            StandardGate::CP(p) => StandardGate::CP(b(p)),
            StandardGate::CRz(p) => StandardGate::CRz(b(p)),
            StandardGate::RXX(p) => StandardGate::RXX(b(p)),
            StandardGate::RYY(p) => StandardGate::RYY(b(p)),
            StandardGate::RZZ(p) => StandardGate::RZZ(b(p)),
            other => other.clone(),
        }
    }
}

/// A user-supplied gate given by its unitary matrix.
///
/// The matrix is row-major and always holds `4^num_qubits` entries; both
/// [`CustomGate::new`] and deserialization enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CustomGateFields")]
pub struct CustomGate {
    name: String,
    num_qubits: u32,
    matrix: Vec<Complex64>,
}

#[derive(Deserialize)]
struct CustomGateFields {
    name: String,
    num_qubits: u32,
    matrix: Vec<Complex64>,
}

impl CustomGate {
    /// Create a custom gate, checking the matrix dimension.
    pub fn new(name: impl Into<String>, num_qubits: u32, matrix: Vec<Complex64>) -> IrResult<Self> {
        let name = name.into();
        let entries = 1usize
            .checked_shl(num_qubits)
            .and_then(|dim| dim.checked_mul(dim));
        if entries != Some(matrix.len()) {
            return Err(IrError::InvalidMatrix {
                gate_name: name,
                expected: entries.unwrap_or(usize::MAX),
                got: matrix.len(),
            });
        }
        Ok(Self {
            name,
            num_qubits,
            matrix,
        })
    }

    /// The gate name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Row-major `2^n x 2^n` matrix.
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }
}

impl TryFrom<CustomGateFields> for CustomGate {
    type Error = IrError;

    fn try_from(fields: CustomGateFields) -> IrResult<Self> {
        Self::new(fields.name, fields.num_qubits, fields.matrix)
    }
}

/// A quantum gate, either standard or custom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A gate defined by an explicit matrix.
    Custom(CustomGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => g.name(),
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(g) => g.num_qubits(),
        }
    }

    /// Free symbols in the gate parameters.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        if let GateKind::Standard(g) = self {
            for p in g.parameters() {
                p.collect_symbols(&mut set);
            }
        }
        set
    }
}

impl From<StandardGate> for GateKind {
    fn from(gate: StandardGate) -> Self {
        GateKind::Standard(gate)
    }
}

impl From<CustomGate> for GateKind {
    fn from(gate: CustomGate) -> Self {
        GateKind::Custom(gate)
    }
}
