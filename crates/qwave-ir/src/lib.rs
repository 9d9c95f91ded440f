//! qwave circuit representation
//!
//! This crate holds the circuit description consumed by qwave backends: an
//! ordered list of gate applications on a fixed number of qubits. Gates are
//! described by name and parameters only. Matrices live in the simulator
//! adapters.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`]. Qubit 0 is the most significant bit of a basis
//!   index.
//! - **Gates**: [`StandardGate`] for builtin gates and [`CustomGate`] for
//!   gates given by an explicit unitary
//! - **Parameters**: [`ParameterExpression`] for symbolic rotation angles
//! - **Instructions**: [`Instruction`] combining a gate with its qubits
//! - **Circuit**: [`Circuit`] builder
//! - **Registry**: [`builtin_gate_by_name`] for looking gates up by name
//!
//! # Example: GHZ circuit
//!
//! ```rust
//! use qwave_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("ghz", 3);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.cx(QubitId(1), QubitId(2)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 3);
//! assert_eq!(circuit.len(), 3);
//! ```
//!
//! # Example: Parameterized circuit
//!
//! ```rust
//! use qwave_ir::{Circuit, QubitId, ParameterExpression};
//! use std::collections::HashMap;
//!
//! let mut circuit = Circuit::with_size("variational", 1);
//! circuit.rx(ParameterExpression::symbol("theta"), QubitId(0)).unwrap();
//! assert!(circuit.is_parameterized());
//!
//! let bound = circuit.bind(&HashMap::from([("theta".to_string(), 0.5)]));
//! assert!(!bound.is_parameterized());
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;
pub mod registry;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, GateKind, StandardGate};
pub use instruction::Instruction;
pub use parameter::ParameterExpression;
pub use qubit::QubitId;
pub use registry::{GateFactory, builtin_gate_by_name};
