//! Probability distributions over measurement outcomes.

use std::collections::BTreeMap;

use crate::bits::{bits_to_string, index_to_bits};
use crate::error::{StateError, StateResult};
use crate::wavefunction::{NORM_TOLERANCE, Wavefunction};

/// Probability mass over fixed-width bitstrings, qubit 0 first.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementOutcomeDistribution {
    distribution: BTreeMap<Vec<u8>, f64>,
    n_qubits: usize,
}

impl MeasurementOutcomeDistribution {
    /// Create a distribution, checking widths, bit values and total mass.
    pub fn new(distribution: BTreeMap<Vec<u8>, f64>) -> StateResult<Self> {
        let n_qubits = distribution
            .keys()
            .next()
            .map(Vec::len)
            .ok_or_else(|| StateError::InvalidDistribution("no outcomes".into()))?;

        let mut total = 0.0;
        for (bits, p) in &distribution {
            if bits.len() != n_qubits {
                return Err(StateError::WidthMismatch {
                    expected: n_qubits,
                    got: bits.len(),
                });
            }
            if bits.iter().any(|&b| b > 1) {
                return Err(StateError::InvalidBitstring(format!("{bits:?}")));
            }
            if p.is_nan() || *p < 0.0 {
                return Err(StateError::InvalidDistribution(format!(
                    "negative mass {p} for {}",
                    bits_to_string(bits)
                )));
            }
            total += p;
        }
        if (total - 1.0).abs() > NORM_TOLERANCE {
            return Err(StateError::InvalidDistribution(format!(
                "masses sum to {total}"
            )));
        }

        Ok(Self {
            distribution,
            n_qubits,
        })
    }

    /// Outcome distribution of a numeric wavefunction. Outcomes with zero
    /// probability are left out.
    pub fn from_wavefunction(wavefunction: &Wavefunction) -> StateResult<Self> {
        let probs =
            wavefunction.numeric_probabilities("MeasurementOutcomeDistribution::from_wavefunction")?;
        let n = wavefunction.n_qubits();
        let distribution = probs
            .iter()
            .enumerate()
            .filter(|(_, p)| **p > 0.0)
            .map(|(i, p)| (index_to_bits(i, n), *p))
            .collect();
        Self::new(distribution)
    }

    /// Width of the outcomes.
    pub fn get_number_of_subsystems(&self) -> usize {
        self.n_qubits
    }

    /// Probability of an outcome; zero for outcomes not present.
    pub fn get(&self, bits: &[u8]) -> f64 {
        self.distribution.get(bits).copied().unwrap_or(0.0)
    }

    /// Outcomes with their masses, in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, f64)> {
        self.distribution.iter().map(|(k, v)| (k, *v))
    }

    /// Number of outcomes with stored mass.
    pub fn len(&self) -> usize {
        self.distribution.len()
    }

    /// True if no outcomes are stored.
    pub fn is_empty(&self) -> bool {
        self.distribution.is_empty()
    }

    /// The underlying map.
    pub fn distribution(&self) -> &BTreeMap<Vec<u8>, f64> {
        &self.distribution
    }

    /// The distribution keyed by `"0101"` strings.
    pub fn by_bitstring(&self) -> BTreeMap<String, f64> {
        self.distribution
            .iter()
            .map(|(k, v)| (bits_to_string(k), *v))
            .collect()
    }
}
