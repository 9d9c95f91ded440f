//! qwave backend abstraction
//!
//! This crate defines the contract every qwave backend honors, whether it is
//! an exact simulator or a sampling device:
//! - [`QuantumBackend`] runs circuits and returns sampled [`Measurements`]
//! - [`QuantumSimulator`] adds exact wavefunctions, outcome distributions and
//!   expectation values
//! - [`RunCounters`] record how many circuits and jobs a backend has run
//! - [`Capabilities`] describe qubit count, gates and batching
//! - [`estimate_expectation_values_by_averaging`] turns estimation tasks into
//!   expectation values on any backend
//!
//! Every call is synchronous and blocks until the result is ready.
//!
//! # Implementing a Backend
//!
//! Implementers supply raw execution. Validation and counting come from the
//! provided trait methods.
//!
//! ```ignore
//! use qwave_hal::{Capabilities, HalResult, QuantumBackend, RunCounters};
//! use qwave_ir::Circuit;
//! use qwave_state::Measurements;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//!     counters: RunCounters,
//! }
//!
//! impl QuantumBackend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!     fn capabilities(&self) -> &Capabilities { &self.capabilities }
//!     fn counters(&self) -> &RunCounters { &self.counters }
//!     fn counters_mut(&mut self) -> &mut RunCounters { &mut self.counters }
//!
//!     fn measure(&mut self, circuit: &Circuit, n_samples: usize) -> HalResult<Measurements> {
//!         // Execute and sample
//!         todo!()
//!     }
//! }
//! ```
//!
//! With the `testing` feature, [`testing`] provides conformance checks that
//! backend crates run from their own tests.
//!
//! [`Measurements`]: qwave_state::Measurements

pub mod backend;
pub mod capability;
pub mod counters;
pub mod error;
pub mod estimation;
pub mod registry;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::{BackendConfig, BackendFactory, QuantumBackend, QuantumSimulator};
pub use capability::{Capabilities, GateSet};
pub use counters::RunCounters;
pub use error::{HalError, HalResult};
pub use estimation::{EstimationTask, estimate_expectation_values_by_averaging};
pub use registry::BackendRegistry;
