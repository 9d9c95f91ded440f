//! Statevector simulator backend.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use qwave_hal::{
    BackendConfig, BackendFactory, Capabilities, HalError, HalResult, QuantumBackend,
    QuantumSimulator, RunCounters,
};
use qwave_ir::Circuit;
use qwave_state::{Measurements, Wavefunction, sample_from_wavefunction};

use crate::config::SimulatorConfig;
use crate::statevector::Statevector;

/// Exact simulator over a dense complex statevector.
///
/// Circuits are applied gate by gate; sampling draws from the final state.
/// With a configured seed, repeated runs give the same bitstrings.
pub struct StatevectorSimulator {
    name: String,
    config: SimulatorConfig,
    capabilities: Capabilities,
    counters: RunCounters,
    rng: StdRng,
}

impl StatevectorSimulator {
    /// Registry name of this backend.
    pub const NAME: &'static str = "statevector";

    /// Create a simulator with default settings.
    pub fn new() -> Self {
        Self::build(Self::NAME.to_string(), SimulatorConfig::default())
    }

    /// Create a simulator from validated settings.
    pub fn with_config(config: SimulatorConfig) -> HalResult<Self> {
        config.validate()?;
        Ok(Self::build(Self::NAME.to_string(), config))
    }

    /// Create a simulator configured from the `QWAVE_SIM_*` variables.
    pub fn from_env() -> HalResult<Self> {
        Self::with_config(SimulatorConfig::from_env()?)
    }

    fn build(name: String, config: SimulatorConfig) -> Self {
        Self {
            capabilities: capabilities_for(&name, &config),
            rng: rng_for(&config),
            name,
            config,
            counters: RunCounters::new(),
        }
    }

    /// The settings this simulator was built with.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    fn evolve(circuit: &Circuit, mut state: Statevector) -> HalResult<Statevector> {
        for instruction in circuit.instructions() {
            state.apply(instruction)?;
        }
        Ok(state)
    }
}

/// Simulator capabilities for `config`.
pub(crate) fn capabilities_for(name: &str, config: &SimulatorConfig) -> Capabilities {
    let capabilities = Capabilities::simulator(config.max_qubits).with_name(name);
    match config.batch_size {
        Some(batch_size) => capabilities.with_batch_size(batch_size),
        None => capabilities,
    }
}

pub(crate) fn rng_for(config: &SimulatorConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draw `n_samples` bitstrings, seeding the sampler from `rng`.
pub(crate) fn sample(
    wavefunction: &Wavefunction,
    n_samples: usize,
    rng: &mut StdRng,
) -> HalResult<Measurements> {
    let seed: u64 = rng.r#gen();
    let samples = sample_from_wavefunction(wavefunction, n_samples, Some(seed))?;
    let measurements = Measurements::new(samples.collect())?;
    debug!(n_samples, "sampled wavefunction");
    Ok(measurements)
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumBackend for StatevectorSimulator {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn counters(&self) -> &RunCounters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut RunCounters {
        &mut self.counters
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name(), qubits = circuit.num_qubits()))]
    fn measure(&mut self, circuit: &Circuit, n_samples: usize) -> HalResult<Measurements> {
        let state = Self::evolve(circuit, Statevector::new(circuit.num_qubits()))?;
        let wavefunction = Wavefunction::new(state.into_amplitudes())?;
        sample(&wavefunction, n_samples, &mut self.rng)
    }

    fn as_simulator_mut(&mut self) -> Option<&mut dyn QuantumSimulator> {
        Some(self)
    }
}

impl QuantumSimulator for StatevectorSimulator {
    #[instrument(skip(self, circuit, initial_state), fields(circuit = circuit.name()))]
    fn simulate(
        &mut self,
        circuit: &Circuit,
        initial_state: &Wavefunction,
    ) -> HalResult<Wavefunction> {
        let amplitudes = initial_state.as_array().ok_or_else(|| {
            HalError::InvalidInitialState(format!(
                "{} needs a numeric initial state, got one with symbols {:?}",
                self.name,
                initial_state.free_symbols()
            ))
        })?;
        let state = Statevector::from_amplitudes(amplitudes.to_vec());
        let state = Self::evolve(circuit, state)?;
        debug!(
            gates = circuit.len(),
            qubits = state.num_qubits(),
            "applied circuit"
        );
        Ok(Wavefunction::new(state.into_amplitudes())?)
    }
}

impl BackendFactory for StatevectorSimulator {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let settings = SimulatorConfig::from_backend_config(&config)?;
        let name = if config.name.is_empty() {
            Self::NAME.to_string()
        } else {
            config.name
        };
        Ok(Self::build(name, settings))
    }
}
