//! Sampling bitstrings from a wavefunction.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::bits::index_to_bits;
use crate::error::{StateError, StateResult};
use crate::wavefunction::Wavefunction;

/// Draw `num_samples` independent measurement outcomes.
///
/// Each outcome is a bit vector with qubit 0 first. The same seed and
/// wavefunction always give the same sequence; without a seed the generator
/// is seeded from system entropy.
pub fn sample_from_wavefunction(
    wavefunction: &Wavefunction,
    num_samples: usize,
    seed: Option<u64>,
) -> StateResult<Samples> {
    if num_samples == 0 {
        return Err(StateError::InvalidSampleCount(num_samples));
    }
    let probabilities = wavefunction.numeric_probabilities("sample_from_wavefunction")?;
    let dist = WeightedIndex::new(probabilities.iter().copied())
        .map_err(|e| StateError::InvalidDistribution(e.to_string()))?;
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    debug!(
        n_qubits = wavefunction.n_qubits(),
        num_samples,
        seeded = seed.is_some(),
        "sampling wavefunction"
    );

    Ok(Samples {
        dist,
        rng,
        n_qubits: wavefunction.n_qubits(),
        remaining: num_samples,
    })
}

/// Iterator over sampled outcomes, in draw order.
#[derive(Debug, Clone)]
pub struct Samples {
    dist: WeightedIndex<f64>,
    rng: StdRng,
    n_qubits: usize,
    remaining: usize,
}

impl Iterator for Samples {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let index = self.dist.sample(&mut self.rng);
        Some(index_to_bits(index, self.n_qubits))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Samples {}
