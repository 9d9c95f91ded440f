//! Backend traits and configuration.
//!
//! # Execution contract
//!
//! [`QuantumBackend`] is the tier every backend implements: run one circuit
//! or a set of circuits and return sampled bitstrings. [`QuantumSimulator`]
//! adds exact extraction of wavefunctions, outcome distributions and
//! expectation values.
//!
//! Implementers provide raw execution only ([`QuantumBackend::measure`] and
//! [`QuantumSimulator::simulate`]). The provided methods validate arguments
//! before any work and keep the [`RunCounters`] up to date:
//!
//! | Method | Circuits | Jobs |
//! |--------|----------|------|
//! | `run_circuit_and_measure` | +1 | +1 |
//! | `run_circuitset_and_measure` (m circuits) | +m | +ceil(m/b) with batch size b, else +m |
//! | `get_wavefunction` | +1 | +1 |
//! | `get_measurement_outcome_distribution` | +1 | +1 |
//! | `get_exact_expectation_values` | +1 | +1 |
//!
//! Rejected calls leave the counters untouched.

use std::fmt;

use qwave_ir::{Circuit, GateKind, IrError};
use qwave_state::{
    ExpectationValues, MeasurementOutcomeDistribution, Measurements, PauliSum, Wavefunction,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::Capabilities;
use crate::counters::RunCounters;
use crate::error::{HalError, HalResult};

/// Configuration for a backend instance.
///
/// Backend-specific settings live in `extra` and are read with the typed
/// getters, which report malformed values as configuration errors.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer setting.
    pub fn get_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!(
                    "'{key}' must be a non-negative integer, got {value}"
                ))
            }),
        }
    }

    /// Read a size setting.
    pub fn get_usize(&self, key: &str) -> HalResult<Option<usize>> {
        self.get_u64(key)?
            .map(|v| {
                usize::try_from(v).map_err(|_| {
                    HalError::Configuration(format!("'{key}' is too large: {v}"))
                })
            })
            .transpose()
    }

    /// Deserialize the extras into a typed configuration.
    pub fn parse_extra<T: serde::de::DeserializeOwned>(&self) -> HalResult<T> {
        serde_json::from_value(serde_json::Value::Object(self.extra.clone()))
            .map_err(|e| HalError::Configuration(format!("backend '{}': {e}", self.name)))
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("extra", &self.extra)
            .finish()
    }
}

/// A backend that runs circuits and returns sampled bitstrings.
///
/// # Contract
///
/// - `capabilities()` is infallible and cached at construction time.
/// - `measure()` receives a validated, fully numeric circuit and a positive
///   sample count. It returns exactly that many bitstrings of the circuit's
///   width and does not touch the counters.
/// - Sample counts of zero are rejected before any work.
pub trait QuantumBackend: Send {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Circuits and jobs run so far.
    fn counters(&self) -> &RunCounters;

    /// Mutable access to the run counters.
    fn counters_mut(&mut self) -> &mut RunCounters;

    /// Execute `circuit` and draw `n_samples` bitstrings.
    fn measure(&mut self, circuit: &Circuit, n_samples: usize) -> HalResult<Measurements>;

    /// Execute a batch of circuits. The default runs them one at a time.
    fn measure_batch(
        &mut self,
        circuits: &[Circuit],
        n_samples: &[usize],
    ) -> HalResult<Vec<Measurements>> {
        circuits
            .iter()
            .zip(n_samples)
            .map(|(circuit, &n)| self.measure(circuit, n))
            .collect()
    }

    /// Check a circuit against the backend's capabilities.
    fn validate(&self, circuit: &Circuit) -> HalResult<()> {
        let caps = self.capabilities();
        if circuit.num_qubits() == 0 {
            return Err(HalError::InvalidCircuit(format!(
                "circuit '{}' has no qubits",
                circuit.name()
            )));
        }
        if circuit.num_qubits() > caps.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "circuit '{}' uses {} qubits but {} supports at most {}",
                circuit.name(),
                circuit.num_qubits(),
                caps.name,
                caps.num_qubits
            )));
        }
        for instruction in circuit.instructions() {
            let supported = match &instruction.gate {
                GateKind::Standard(gate) => caps.gate_set.contains(gate.name()),
                GateKind::Custom(_) => caps.gate_set.custom,
            };
            if !supported {
                return Err(HalError::Unsupported(format!(
                    "gate '{}' is not supported by {}",
                    instruction.name(),
                    caps.name
                )));
            }
        }
        Ok(())
    }

    /// Run a circuit and sample `n_samples` bitstrings.
    fn run_circuit_and_measure(
        &mut self,
        circuit: &Circuit,
        n_samples: usize,
    ) -> HalResult<Measurements> {
        check_n_samples(n_samples)?;
        self.validate(circuit)?;
        require_numeric(circuit)?;

        let measurements = self.measure(circuit, n_samples)?;
        check_measurements(circuit, n_samples, &measurements)?;

        self.counters_mut().record(1, 1);
        debug!(
            backend = self.name(),
            circuit = circuit.name(),
            n_samples,
            "ran circuit"
        );
        Ok(measurements)
    }

    /// Run every circuit in `circuits` with the matching sample count.
    ///
    /// Returns one [`Measurements`] per circuit, in order.
    fn run_circuitset_and_measure(
        &mut self,
        circuits: &[Circuit],
        n_samples: &[usize],
    ) -> HalResult<Vec<Measurements>> {
        if circuits.len() != n_samples.len() {
            return Err(HalError::InvalidShots(format!(
                "{} circuits but {} sample counts",
                circuits.len(),
                n_samples.len()
            )));
        }
        for &n in n_samples {
            check_n_samples(n)?;
        }
        for circuit in circuits {
            self.validate(circuit)?;
            require_numeric(circuit)?;
        }

        let results = self.measure_batch(circuits, n_samples)?;
        if results.len() != circuits.len() {
            return Err(HalError::Backend(format!(
                "expected {} results, got {}",
                circuits.len(),
                results.len()
            )));
        }
        for ((circuit, &n), measurements) in circuits.iter().zip(n_samples).zip(&results) {
            check_measurements(circuit, n, measurements)?;
        }

        let jobs = self.capabilities().jobs_for(circuits.len());
        self.counters_mut().record(circuits.len(), jobs);
        debug!(
            backend = self.name(),
            circuits = circuits.len(),
            jobs,
            "ran circuit set"
        );
        Ok(results)
    }

    /// Zero the run counters.
    fn reset_counters(&mut self) {
        self.counters_mut().reset();
    }

    /// View this backend as an exact simulator, if it is one.
    fn as_simulator_mut(&mut self) -> Option<&mut dyn QuantumSimulator> {
        None
    }
}

/// A backend that can also compute exact results.
pub trait QuantumSimulator: QuantumBackend {
    /// Apply `circuit` to `initial_state`.
    ///
    /// `initial_state` is at least as wide as the circuit. Does not touch the
    /// counters.
    fn simulate(
        &mut self,
        circuit: &Circuit,
        initial_state: &Wavefunction,
    ) -> HalResult<Wavefunction>;

    /// Final wavefunction of `circuit`, starting from `initial_state` or the
    /// all-zero state.
    fn get_wavefunction(
        &mut self,
        circuit: &Circuit,
        initial_state: Option<&Wavefunction>,
    ) -> HalResult<Wavefunction> {
        self.validate(circuit)?;
        let wavefunction = match initial_state {
            Some(state) => {
                if state.n_qubits() < circuit.num_qubits() {
                    return Err(HalError::InvalidInitialState(format!(
                        "initial state has {} qubits but circuit '{}' uses {}",
                        state.n_qubits(),
                        circuit.name(),
                        circuit.num_qubits()
                    )));
                }
                self.simulate(circuit, state)?
            }
            None => {
                let zero = Wavefunction::zero_state(circuit.num_qubits())?;
                self.simulate(circuit, &zero)?
            }
        };

        self.counters_mut().record(1, 1);
        debug!(
            backend = self.name(),
            circuit = circuit.name(),
            symbolic = wavefunction.is_symbolic(),
            "simulated wavefunction"
        );
        Ok(wavefunction)
    }

    /// Exact probability of every outcome of `circuit`.
    fn get_measurement_outcome_distribution(
        &mut self,
        circuit: &Circuit,
    ) -> HalResult<MeasurementOutcomeDistribution> {
        require_numeric(circuit)?;
        let wavefunction = self.get_wavefunction(circuit, None)?;
        Ok(MeasurementOutcomeDistribution::from_wavefunction(
            &wavefunction,
        )?)
    }

    /// Exact expectation value of every term of `operator`, in term order.
    fn get_exact_expectation_values(
        &mut self,
        circuit: &Circuit,
        operator: &PauliSum,
    ) -> HalResult<ExpectationValues> {
        require_numeric(circuit)?;
        let width = operator.min_qubits() as usize;
        if width > circuit.num_qubits() {
            return Err(HalError::InvalidCircuit(format!(
                "operator acts on {width} qubits but circuit '{}' has {}",
                circuit.name(),
                circuit.num_qubits()
            )));
        }
        let wavefunction = self.get_wavefunction(circuit, None)?;
        let values = operator
            .terms()
            .iter()
            .map(|term| wavefunction.expectation_value(term))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ExpectationValues::new(values))
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: QuantumBackend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

fn check_n_samples(n_samples: usize) -> HalResult<()> {
    if n_samples == 0 {
        return Err(HalError::InvalidShots(
            "number of samples must be positive".into(),
        ));
    }
    Ok(())
}

fn require_numeric(circuit: &Circuit) -> HalResult<()> {
    let symbols = circuit.free_symbols();
    if symbols.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = symbols.iter().map(String::as_str).collect();
    Err(IrError::UnboundParameter(names.join(", ")).into())
}

fn check_measurements(
    circuit: &Circuit,
    n_samples: usize,
    measurements: &Measurements,
) -> HalResult<()> {
    if measurements.len() != n_samples {
        return Err(HalError::Backend(format!(
            "requested {n_samples} samples of '{}', got {}",
            circuit.name(),
            measurements.len()
        )));
    }
    match measurements.width() {
        Some(width) if width != circuit.num_qubits() => Err(HalError::Backend(format!(
            "circuit '{}' has {} qubits but bitstrings have width {width}",
            circuit.name(),
            circuit.num_qubits()
        ))),
        _ => Ok(()),
    }
}
