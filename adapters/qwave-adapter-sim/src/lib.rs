//! qwave local simulators
//!
//! Two exact backends that run entirely in process:
//!
//! - [`StatevectorSimulator`] keeps a dense complex statevector and applies
//!   gates with specialized kernels.
//! - [`SymbolicSimulator`] keeps one expression per amplitude, so circuits
//!   with unbound parameters produce symbolic wavefunctions.
//!
//! Both implement [`QuantumBackend`] and [`QuantumSimulator`], share
//! [`SimulatorConfig`], and register with a [`BackendRegistry`] through
//! [`register_simulators`].
//!
//! # Memory
//!
//! | Qubits | Statevector |
//! |--------|-------------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//! | 25 | ~512 MB |
//! | 30 | ~16 GB |
//!
//! # Example
//!
//! ```rust
//! use qwave_adapter_sim::{SimulatorConfig, StatevectorSimulator};
//! use qwave_hal::QuantumBackend;
//! use qwave_ir::Circuit;
//!
//! let mut sim = StatevectorSimulator::with_config(SimulatorConfig::default().with_seed(1)).unwrap();
//! let measurements = sim.run_circuit_and_measure(&Circuit::bell().unwrap(), 100).unwrap();
//! assert!(measurements.bitstrings().iter().all(|b| b[0] == b[1]));
//! assert_eq!(sim.counters().number_of_jobs_run, 1);
//! ```
//!
//! [`QuantumBackend`]: qwave_hal::QuantumBackend
//! [`QuantumSimulator`]: qwave_hal::QuantumSimulator
//! [`BackendRegistry`]: qwave_hal::BackendRegistry

mod config;
mod simulator;
mod statevector;
mod symbolic;

pub use config::{
    ENV_BATCH_SIZE, ENV_MAX_QUBITS, ENV_SEED, MAX_SUPPORTED_QUBITS, SimulatorConfig,
};
pub use simulator::StatevectorSimulator;
pub use statevector::Statevector;
pub use symbolic::SymbolicSimulator;

use qwave_hal::BackendRegistry;

/// Register both simulators under their default names.
pub fn register_simulators(registry: &mut BackendRegistry) {
    registry.register::<StatevectorSimulator>(StatevectorSimulator::NAME);
    registry.register::<SymbolicSimulator>(SymbolicSimulator::NAME);
}
