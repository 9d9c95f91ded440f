//! Sampled measurement outcomes and expectation values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bits::{bits_to_string, parse_bitstring};
use crate::distribution::MeasurementOutcomeDistribution;
use crate::error::{StateError, StateResult};
use crate::operator::{PauliString, PauliTerm};

/// Bitstrings sampled from one circuit, in draw order.
///
/// All bitstrings have the same width, qubit 0 first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Measurements {
    bitstrings: Vec<Vec<u8>>,
}

impl Measurements {
    /// Wrap sampled bitstrings, checking widths and bit values.
    pub fn new(bitstrings: Vec<Vec<u8>>) -> StateResult<Self> {
        if let Some(first) = bitstrings.first() {
            let width = first.len();
            for bits in &bitstrings {
                if bits.len() != width {
                    return Err(StateError::WidthMismatch {
                        expected: width,
                        got: bits.len(),
                    });
                }
                if bits.iter().any(|&b| b > 1) {
                    return Err(StateError::InvalidBitstring(format!("{bits:?}")));
                }
            }
        }
        Ok(Self { bitstrings })
    }

    /// Expand a `"0101" -> count` map into bitstrings, in key order.
    pub fn from_counts<S: AsRef<str>>(
        counts: impl IntoIterator<Item = (S, usize)>,
    ) -> StateResult<Self> {
        let mut bitstrings = Vec::new();
        for (key, count) in counts {
            let bits = parse_bitstring(key.as_ref())?;
            bitstrings.extend(std::iter::repeat_n(bits, count));
        }
        Self::new(bitstrings)
    }

    /// The sampled bitstrings.
    pub fn bitstrings(&self) -> &[Vec<u8>] {
        &self.bitstrings
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.bitstrings.len()
    }

    /// True if nothing was sampled.
    pub fn is_empty(&self) -> bool {
        self.bitstrings.is_empty()
    }

    /// Width of the bitstrings, if any were sampled.
    pub fn width(&self) -> Option<usize> {
        self.bitstrings.first().map(Vec::len)
    }

    /// Occurrence count of every observed bitstring.
    pub fn get_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for bits in &self.bitstrings {
            *counts.entry(bits_to_string(bits)).or_insert(0) += 1;
        }
        counts
    }

    /// The most frequent bitstring and its count. Ties go to the
    /// lexicographically smallest key.
    pub fn most_frequent(&self) -> Option<(String, usize)> {
        self.get_counts()
            .into_iter()
            .fold(None, |best: Option<(String, usize)>, (key, count)| match best {
                Some((_, c)) if c >= count => best,
                _ => Some((key, count)),
            })
    }

    /// Empirical outcome distribution.
    pub fn get_distribution(&self) -> StateResult<MeasurementOutcomeDistribution> {
        if self.is_empty() {
            return Err(StateError::InvalidDistribution(
                "no measurements recorded".into(),
            ));
        }
        let total = self.len() as f64;
        let mut mass: BTreeMap<Vec<u8>, f64> = BTreeMap::new();
        for bits in &self.bitstrings {
            *mass.entry(bits.clone()).or_insert(0.0) += 1.0 / total;
        }
        MeasurementOutcomeDistribution::new(mass)
    }

    /// Mean of the ±1 parity of the given qubits across all samples.
    pub fn expectation_of_z_product(&self, qubits: &[u32]) -> StateResult<f64> {
        self.mean_parity(&PauliString::zs(qubits.iter().copied())?)
    }

    /// Estimate of a term measured in its own eigenbasis: coefficient times
    /// the mean parity over the term's qubits. Identity terms give the
    /// coefficient.
    pub fn expectation_of_term(&self, term: &PauliTerm) -> StateResult<f64> {
        if term.is_identity() {
            return Ok(term.coefficient);
        }
        Ok(term.coefficient * self.mean_parity(&term.pauli)?)
    }

    fn mean_parity(&self, pauli: &PauliString) -> StateResult<f64> {
        if self.is_empty() {
            return Err(StateError::InvalidSampleCount(0));
        }
        let mut sum = 0.0;
        for bits in &self.bitstrings {
            sum += pauli.parity_eigenvalue(bits)?;
        }
        Ok(sum / self.len() as f64)
    }
}

impl<'a> IntoIterator for &'a Measurements {
    type Item = &'a Vec<u8>;
    type IntoIter = std::slice::Iter<'a, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bitstrings.iter()
    }
}

/// Expectation values, one per requested operator or task, in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpectationValues {
    values: Vec<f64>,
}

impl ExpectationValues {
    /// Wrap a list of values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// The values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Consume into the inner vector.
    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for ExpectationValues {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl std::ops::Index<usize> for ExpectationValues {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}
