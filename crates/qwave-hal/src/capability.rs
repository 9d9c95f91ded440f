//! Backend capability introspection.
//!
//! [`Capabilities`] describe what a backend can execute: qubit count,
//! supported gates, whether it is an exact simulator, and how it groups
//! circuits into jobs.

use serde::{Deserialize, Serialize};

/// Capabilities of a quantum backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (lowercase gate names).
    pub gate_set: GateSet,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Circuits per job when the backend batches circuit sets. `None`
    /// means every circuit is its own job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    /// Additional capability flags: `"statevector"`, `"symbolic"`,
    /// `"exact_expectation"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            is_simulator: true,
            batch_size: None,
            features: vec!["statevector".into(), "exact_expectation".into()],
        }
    }

    /// Rename the backend.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Group circuit sets into jobs of `batch_size` circuits.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Add a capability flag.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Whether circuit sets are grouped into batched jobs.
    pub fn supports_batching(&self) -> bool {
        self.batch_size.is_some()
    }

    /// Number of jobs needed to run `num_circuits` circuits.
    pub fn jobs_for(&self, num_circuits: usize) -> usize {
        match self.batch_size {
            Some(b) => num_circuits.div_ceil(b.max(1)),
            None => num_circuits,
        }
    }

    /// Check whether a capability flag is present.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}

/// Gate set supported by a backend.
///
/// Gate names follow the builtin registry naming (lowercase): `h`, `cx`,
/// `rz`, etc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
    /// Whether gates given by an explicit matrix are accepted.
    #[serde(default)]
    pub custom: bool,
}

impl GateSet {
    /// Every builtin gate plus custom matrices.
    pub fn universal() -> Self {
        Self {
            single_qubit: [
                "id", "x", "y", "z", "h", "s", "sdg", "t", "tdg", "sx", "rx", "ry", "rz", "p", "u",
            ]
            .map(String::from)
            .to_vec(),
            two_qubit: [
                "cx", "cy", "cz", "swap", "iswap", "cp", "crz", "rxx", "ryy", "rzz",
            ]
            .map(String::from)
            .to_vec(),
            three_qubit: vec!["ccx".into()],
            custom: true,
        }
    }

    /// Check if a builtin gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate)
            || self.two_qubit.iter().any(|g| g == gate)
            || self.three_qubit.iter().any(|g| g == gate)
    }
}
