//! qwave quantum states
//!
//! Wavefunctions with numeric or symbolic amplitudes, sampling, measurement
//! outcomes and Pauli operators.
//!
//! # Bit ordering
//!
//! Qubit 0 is the most significant bit of a basis index. The outcome key of
//! index `i` on `n` qubits is `i` written as an `n`-digit binary number, and
//! sampled bit vectors list qubit 0 first.
//!
//! # Example
//!
//! ```rust
//! use qwave_state::{Wavefunction, sample_from_wavefunction};
//!
//! let wf = Wavefunction::dicke_state(3, 1).unwrap();
//! let probs = wf.get_outcome_probs().unwrap();
//! assert!((probs["010"] - 1.0 / 3.0).abs() < 1e-12);
//!
//! let samples: Vec<Vec<u8>> = sample_from_wavefunction(&wf, 10, Some(7)).unwrap().collect();
//! assert!(samples.iter().all(|s| s.iter().filter(|&&b| b == 1).count() == 1));
//! ```

pub mod amplitude;
pub mod bits;
pub mod distribution;
pub mod error;
pub mod io;
pub mod measurement;
pub mod operator;
pub mod sampling;
pub mod wavefunction;

pub use amplitude::Amplitude;
pub use distribution::MeasurementOutcomeDistribution;
pub use error::{StateError, StateResult};
pub use io::{load_wavefunction, save_wavefunction, wavefunction_from_json, wavefunction_to_json};
pub use measurement::{ExpectationValues, Measurements};
pub use operator::{PauliOp, PauliString, PauliSum, PauliTerm};
pub use sampling::{Samples, sample_from_wavefunction};
pub use wavefunction::{AmplitudeVector, NORM_TOLERANCE, Probabilities, Wavefunction};
