//! Simulator settings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use qwave_hal::{BackendConfig, HalError, HalResult};

/// Environment variable overriding [`SimulatorConfig::max_qubits`].
pub const ENV_MAX_QUBITS: &str = "QWAVE_SIM_MAX_QUBITS";
/// Environment variable overriding [`SimulatorConfig::seed`].
pub const ENV_SEED: &str = "QWAVE_SIM_SEED";
/// Environment variable overriding [`SimulatorConfig::batch_size`].
pub const ENV_BATCH_SIZE: &str = "QWAVE_SIM_BATCH_SIZE";

/// Largest register a dense statevector is allowed to allocate.
pub const MAX_SUPPORTED_QUBITS: u32 = 30;

/// Settings shared by the simulators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Widest circuit accepted.
    pub max_qubits: u32,
    /// Seed for the sampling stream. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Circuits per job for circuit sets. `None` runs one job per circuit.
    pub batch_size: Option<usize>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: 20,
            seed: None,
            batch_size: None,
        }
    }
}

impl SimulatorConfig {
    /// Defaults overridden by the `QWAVE_SIM_*` environment variables.
    pub fn from_env() -> HalResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Read the simulator settings out of a backend configuration's extras.
    pub fn from_backend_config(config: &BackendConfig) -> HalResult<Self> {
        let parsed: Self = config.parse_extra()?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> HalResult<Self> {
        if let Some(max_qubits) = parse_var(&lookup, ENV_MAX_QUBITS)? {
            self.max_qubits = max_qubits;
        }
        if let Some(seed) = parse_var(&lookup, ENV_SEED)? {
            self.seed = Some(seed);
        }
        if let Some(batch_size) = parse_var(&lookup, ENV_BATCH_SIZE)? {
            self.batch_size = Some(batch_size);
        }
        self.validate()?;
        Ok(self)
    }

    /// Fixed sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Maximum circuit width.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Group circuit sets into jobs of `batch_size` circuits.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> HalResult<()> {
        if self.max_qubits == 0 || self.max_qubits > MAX_SUPPORTED_QUBITS {
            return Err(HalError::Configuration(format!(
                "max_qubits must be between 1 and {MAX_SUPPORTED_QUBITS}, got {}",
                self.max_qubits
            )));
        }
        if self.batch_size == Some(0) {
            return Err(HalError::Configuration(
                "batch_size must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> HalResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| HalError::Configuration(format!("{key}={raw:?}: {e}"))),
    }
}
