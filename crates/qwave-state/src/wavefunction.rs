//! The [`Wavefunction`] type.
//!
//! A wavefunction stores `2^n` amplitudes, either as a dense numeric vector
//! or as a vector of symbolic [`Amplitude`] expressions. Every constructor and
//! mutator validates the normalization invariant before anything is stored:
//!
//! - numeric vectors must have unit norm;
//! - symbolic vectors must not already exceed unit norm through their fully
//!   numeric entries.
//!
//! Qubit 0 is the most significant bit of a basis index.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use tracing::trace;

use crate::amplitude::{Amplitude, format_complex};
use crate::bits::index_to_key;
use crate::error::{StateError, StateResult};
use crate::operator::{PauliOp, PauliTerm};

/// Tolerance used for the unit-norm checks.
pub const NORM_TOLERANCE: f64 = 1e-6;

/// Amplitude storage behind a [`Wavefunction`].
#[derive(Debug, Clone)]
pub enum AmplitudeVector {
    /// Dense complex vector.
    Numeric(Array1<Complex64>),
    /// Symbolic expressions, at least one of which has a free symbol.
    Symbolic(Vec<Amplitude>),
}

impl AmplitudeVector {
    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            AmplitudeVector::Numeric(v) => v.len(),
            AmplitudeVector::Symbolic(v) => v.len(),
        }
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the canonical storage for a list of expressions: numeric when no
    /// simplified entry carries a symbol.
    fn from_amplitudes(amplitudes: Vec<Amplitude>) -> StateResult<Self> {
        let amplitudes: Vec<Amplitude> = amplitudes.iter().map(Amplitude::simplify).collect();
        if amplitudes.iter().any(Amplitude::is_symbolic) {
            return Ok(AmplitudeVector::Symbolic(amplitudes));
        }
        let values = amplitudes
            .iter()
            .map(|a| a.evaluate().ok_or(StateError::NotNormalized { norm: f64::NAN }))
            .collect::<StateResult<Vec<_>>>()?;
        Ok(AmplitudeVector::Numeric(Array1::from(values)))
    }

    fn validate(&self) -> StateResult<()> {
        let len = self.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(StateError::InvalidLength(len));
        }
        match self {
            AmplitudeVector::Numeric(v) => {
                let norm: f64 = v.iter().map(Complex64::norm_sqr).sum();
                if (norm - 1.0).abs() > NORM_TOLERANCE || !norm.is_finite() {
                    return Err(StateError::NotNormalized { norm });
                }
            }
            AmplitudeVector::Symbolic(v) => {
                let partial_norm: f64 = v
                    .iter()
                    .filter_map(Amplitude::evaluate)
                    .map(|c| c.norm_sqr())
                    .sum();
                if partial_norm > 1.0 + NORM_TOLERANCE || !partial_norm.is_finite() {
                    return Err(StateError::ExceedsUnity { partial_norm });
                }
            }
        }
        Ok(())
    }
}

/// Per-index probabilities of a wavefunction.
#[derive(Debug, Clone, PartialEq)]
pub enum Probabilities {
    /// `|a_i|^2` for numeric states.
    Numeric(Array1<f64>),
    /// `|a_i|^2` as expressions for symbolic states.
    Symbolic(Vec<Amplitude>),
}

impl Probabilities {
    /// Numeric probabilities, if the state had no free symbols.
    pub fn as_numeric(&self) -> Option<&Array1<f64>> {
        match self {
            Probabilities::Numeric(p) => Some(p),
            Probabilities::Symbolic(_) => None,
        }
    }
}

/// An n-qubit state vector with numeric or symbolic amplitudes.
#[derive(Debug, Clone)]
pub struct Wavefunction {
    amplitudes: AmplitudeVector,
}

impl Wavefunction {
    fn from_vector(amplitudes: AmplitudeVector) -> StateResult<Self> {
        amplitudes.validate()?;
        Ok(Self { amplitudes })
    }

    /// Create a numeric wavefunction.
    pub fn new(amplitudes: Vec<Complex64>) -> StateResult<Self> {
        Self::from_array(Array1::from(amplitudes))
    }

    /// Create a numeric wavefunction from real amplitudes.
    pub fn from_real(amplitudes: Vec<f64>) -> StateResult<Self> {
        Self::from_array(amplitudes.into_iter().map(|a| Complex64::new(a, 0.0)).collect())
    }

    /// Create a numeric wavefunction from a flat array.
    pub fn from_array(amplitudes: Array1<Complex64>) -> StateResult<Self> {
        Self::from_vector(AmplitudeVector::Numeric(amplitudes))
    }

    /// Create a numeric wavefunction from a column (`N x 1`) or row
    /// (`1 x N`) matrix.
    pub fn from_matrix(amplitudes: Array2<Complex64>) -> StateResult<Self> {
        let shape = amplitudes.shape().to_vec();
        if shape[0] != 1 && shape[1] != 1 {
            return Err(StateError::InvalidShape(shape));
        }
        Self::from_array(amplitudes.iter().copied().collect())
    }

    /// Create a wavefunction from expressions. The result is numeric when no
    /// entry carries a free symbol.
    pub fn from_amplitudes(amplitudes: Vec<Amplitude>) -> StateResult<Self> {
        Self::from_vector(AmplitudeVector::from_amplitudes(amplitudes)?)
    }

    /// The all-zero computational basis state `|0...0>`.
    pub fn zero_state(n_qubits: usize) -> StateResult<Self> {
        let dim = dimension(n_qubits)?;
        let mut amplitudes = Array1::zeros(dim);
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self::from_array(amplitudes)
    }

    /// Equal superposition of the basis states with `hamming_weight` ones.
    pub fn dicke_state(n_qubits: usize, hamming_weight: usize) -> StateResult<Self> {
        let dim = dimension(n_qubits)?;
        if hamming_weight > n_qubits {
            return Err(StateError::InvalidHammingWeight {
                weight: hamming_weight,
                n_qubits,
            });
        }

        let count = (0..dim)
            .filter(|i| i.count_ones() as usize == hamming_weight)
            .count();
        let value = Complex64::new(1.0 / (count as f64).sqrt(), 0.0);
        let amplitudes = (0..dim)
            .map(|i| {
                if i.count_ones() as usize == hamming_weight {
                    value
                } else {
                    Complex64::new(0.0, 0.0)
                }
            })
            .collect();
        Self::from_array(amplitudes)
    }

    /// A normalized random state with uniformly drawn real and imaginary
    /// parts, reproducible for a given seed.
    pub fn random(n_qubits: usize, seed: u64) -> StateResult<Self> {
        let dim = dimension(n_qubits)?;
        let mut rng = StdRng::seed_from_u64(seed);
        let raw: Array1<Complex64> = (0..dim)
            .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect();
        let norm = raw.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
        Self::from_array(raw.mapv(|a| a / norm))
    }

    /// Number of amplitudes.
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Always false; a wavefunction has at least two amplitudes.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Number of qubits.
    pub fn n_qubits(&self) -> usize {
        self.len().trailing_zeros() as usize
    }

    /// True if any amplitude still has a free symbol.
    pub fn is_symbolic(&self) -> bool {
        matches!(self.amplitudes, AmplitudeVector::Symbolic(_))
    }

    /// Names of the free symbols across all amplitudes.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        if let AmplitudeVector::Symbolic(v) = &self.amplitudes {
            for a in v {
                a.collect_symbols(&mut set);
            }
        }
        set
    }

    /// Underlying storage.
    pub fn amplitudes(&self) -> &AmplitudeVector {
        &self.amplitudes
    }

    /// Dense amplitudes of a numeric state.
    pub fn as_array(&self) -> Option<&Array1<Complex64>> {
        match &self.amplitudes {
            AmplitudeVector::Numeric(v) => Some(v),
            AmplitudeVector::Symbolic(_) => None,
        }
    }

    /// Amplitude at `index` as an expression.
    pub fn get(&self, index: usize) -> Option<Amplitude> {
        match &self.amplitudes {
            AmplitudeVector::Numeric(v) => v.get(index).map(|c| Amplitude::Constant(*c)),
            AmplitudeVector::Symbolic(v) => v.get(index).cloned(),
        }
    }

    /// Numeric amplitude at `index`, if it has no free symbols.
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        match &self.amplitudes {
            AmplitudeVector::Numeric(v) => v.get(index).copied(),
            AmplitudeVector::Symbolic(v) => v.get(index).and_then(Amplitude::evaluate),
        }
    }

    /// Iterate over the amplitudes as expressions.
    pub fn iter(&self) -> impl Iterator<Item = Amplitude> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Replace the amplitude at `index`.
    ///
    /// The state is left untouched if the new vector would break the
    /// normalization invariant.
    pub fn set(&mut self, index: usize, value: impl Into<Amplitude>) -> StateResult<()> {
        let len = self.len();
        if index >= len {
            return Err(StateError::IndexOutOfRange { index, len });
        }
        let value = value.into().simplify();

        let candidate = match (&self.amplitudes, value.evaluate()) {
            (AmplitudeVector::Numeric(v), Some(c)) => {
                let mut v = v.clone();
                v[index] = c;
                AmplitudeVector::Numeric(v)
            }
            _ => {
                let mut v: Vec<Amplitude> = self.iter().collect();
                v[index] = value;
                AmplitudeVector::from_amplitudes(v)?
            }
        };
        candidate.validate()?;
        self.amplitudes = candidate;
        Ok(())
    }

    /// Substitute symbol values.
    ///
    /// A numeric state is returned as is. A symbolic state yields a new
    /// wavefunction, numeric once every symbol is bound. Fails if the bound
    /// amplitudes break the normalization invariant.
    pub fn bind(&self, values: &HashMap<String, f64>) -> StateResult<Cow<'_, Wavefunction>> {
        match &self.amplitudes {
            AmplitudeVector::Numeric(_) => Ok(Cow::Borrowed(self)),
            AmplitudeVector::Symbolic(v) => {
                trace!(symbols = values.len(), "binding symbolic wavefunction");
                let bound = v.iter().map(|a| a.substitute(values)).collect();
                Ok(Cow::Owned(Self::from_amplitudes(bound)?))
            }
        }
    }

    /// Per-index probabilities `|a_i|^2`.
    pub fn get_probabilities(&self) -> Probabilities {
        match &self.amplitudes {
            AmplitudeVector::Numeric(v) => Probabilities::Numeric(v.mapv(|a| a.norm_sqr())),
            AmplitudeVector::Symbolic(v) => {
                Probabilities::Symbolic(v.iter().map(Amplitude::norm_sqr).collect())
            }
        }
    }

    /// Probability of every outcome key, keyed `"0..."` with qubit 0 first.
    pub fn get_outcome_probs(&self) -> StateResult<BTreeMap<String, f64>> {
        let probs = self.numeric_probabilities("get_outcome_probs")?;
        let n = self.n_qubits();
        Ok(probs
            .iter()
            .enumerate()
            .map(|(i, p)| (index_to_key(i, n), *p))
            .collect())
    }

    pub(crate) fn numeric_probabilities(&self, operation: &'static str) -> StateResult<Array1<f64>> {
        match self.get_probabilities() {
            Probabilities::Numeric(p) => Ok(p),
            Probabilities::Symbolic(_) => Err(StateError::SymbolicState(operation)),
        }
    }

    /// Exact expectation value of a Pauli term, coefficient included.
    pub fn expectation_value(&self, term: &PauliTerm) -> StateResult<f64> {
        let psi = self
            .as_array()
            .ok_or(StateError::SymbolicState("expectation_value"))?;
        let n = self.n_qubits();
        if let Some(q) = term.pauli.max_qubit().filter(|&q| q as usize >= n) {
            return Err(StateError::InvalidPauli(format!(
                "qubit {q} is outside a {n}-qubit state"
            )));
        }

        let mut total = Complex64::new(0.0, 0.0);
        for (i, amp) in psi.iter().enumerate() {
            // P|i> = phase |j>
            let mut j = i;
            let mut phase = Complex64::new(1.0, 0.0);
            for &(q, op) in term.pauli.ops() {
                let mask = 1usize << (n - 1 - q as usize);
                let bit_set = i & mask != 0;
                match op {
                    PauliOp::I => {}
                    PauliOp::X => j ^= mask,
                    PauliOp::Y => {
                        j ^= mask;
                        phase *= if bit_set {
                            Complex64::new(0.0, -1.0)
                        } else {
                            Complex64::new(0.0, 1.0)
                        };
                    }
                    PauliOp::Z => {
                        if bit_set {
                            phase = -phase;
                        }
                    }
                }
            }
            total += psi[j].conj() * phase * amp;
        }
        Ok(term.coefficient * total.re)
    }
}

fn dimension(n_qubits: usize) -> StateResult<usize> {
    if n_qubits == 0 || n_qubits >= usize::BITS as usize {
        return Err(StateError::InvalidQubitCount(n_qubits));
    }
    Ok(1usize << n_qubits)
}

impl PartialEq for Wavefunction {
    fn eq(&self, other: &Self) -> bool {
        match (&self.amplitudes, &other.amplitudes) {
            (AmplitudeVector::Numeric(a), AmplitudeVector::Numeric(b)) => a == b,
            (AmplitudeVector::Symbolic(a), AmplitudeVector::Symbolic(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Wavefunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = match &self.amplitudes {
            AmplitudeVector::Numeric(v) => v.iter().map(|c| format_complex(*c)).collect(),
            AmplitudeVector::Symbolic(v) => v.iter().map(ToString::to_string).collect(),
        };
        write!(f, "Wavefunction([{}])", entries.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn alpha() -> Amplitude {
        Amplitude::symbol("alpha")
    }

    fn symbolic_wf() -> Wavefunction {
        Wavefunction::from_amplitudes(vec![
            alpha(),
            Amplitude::from(0.5),
            Amplitude::symbol("beta"),
            Amplitude::from(0.5),
        ])
        .unwrap()
    }

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_zero_state() {
        for n in 1..=5 {
            let wf = Wavefunction::zero_state(n).unwrap();
            assert_eq!(wf.len(), 1 << n);
            assert_eq!(wf.n_qubits(), n);
            assert_eq!(wf.amplitude(0), Some(c(1.0, 0.0)));
            assert!((1..wf.len()).all(|i| wf.amplitude(i) == Some(c(0.0, 0.0))));
        }
        assert!(matches!(
            Wavefunction::zero_state(0),
            Err(StateError::InvalidQubitCount(0))
        ));
    }

    #[test]
    fn test_dicke_state_indices() {
        let cases: [(usize, &[usize]); 5] = [
            (0, &[0]),
            (1, &[1, 2, 4, 8]),
            (2, &[3, 5, 6, 9, 10, 12]),
            (3, &[7, 11, 13, 14]),
            (4, &[15]),
        ];
        for (weight, expected) in cases {
            let wf = Wavefunction::dicke_state(4, weight).unwrap();
            let value = 1.0 / (expected.len() as f64).sqrt();
            let nonzero: Vec<usize> = (0..16)
                .filter(|&i| wf.amplitude(i).unwrap().norm() > 0.0)
                .collect();
            assert_eq!(nonzero, expected);
            for &i in expected {
                assert!((wf.amplitude(i).unwrap().re - value).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_dicke_state_rejects_bad_arguments() {
        assert!(matches!(
            Wavefunction::dicke_state(2, 3),
            Err(StateError::InvalidHammingWeight { weight: 3, n_qubits: 2 })
        ));
        assert!(Wavefunction::dicke_state(0, 0).is_err());
    }

    #[test]
    fn test_length_must_be_power_of_two() {
        assert!(matches!(
            Wavefunction::from_real(vec![]),
            Err(StateError::InvalidLength(0))
        ));
        assert!(matches!(
            Wavefunction::from_real(vec![1.0]),
            Err(StateError::InvalidLength(1))
        ));
        let mut almost = vec![0.0; 17];
        almost[0] = 1.0;
        assert!(matches!(
            Wavefunction::from_real(almost),
            Err(StateError::InvalidLength(17))
        ));
    }

    #[test]
    fn test_numeric_vectors_need_unit_norm() {
        assert!(Wavefunction::from_real(vec![1.0; 8]).is_err());
        assert!(Wavefunction::from_real(vec![0.0; 4]).is_err());
        assert!(Wavefunction::from_real(vec![0.5; 4]).is_ok());
    }

    #[test]
    fn test_symbolic_partial_norm() {
        assert!(matches!(
            Wavefunction::from_amplitudes(vec![alpha(), Amplitude::from(2.0)]),
            Err(StateError::ExceedsUnity { .. })
        ));
        let s = 3.0_f64.sqrt() / 2.0;
        assert!(
            Wavefunction::from_amplitudes(vec![
                alpha(),
                Amplitude::symbol("beta"),
                Amplitude::from(s),
                Amplitude::from(s),
            ])
            .is_err()
        );
        let wf = Wavefunction::from_amplitudes(vec![alpha(), Amplitude::zero()]).unwrap();
        assert!(wf.is_symbolic());
    }

    #[test]
    fn test_vanishing_symbols_need_unit_norm() {
        let vanished = Amplitude::zero() * alpha();
        assert!(matches!(
            Wavefunction::from_amplitudes(vec![vanished.clone(), Amplitude::from(0.5)]),
            Err(StateError::NotNormalized { .. })
        ));

        let wf = Wavefunction::from_amplitudes(vec![
            vanished + Amplitude::from(FRAC_1_SQRT_2),
            Amplitude::from(FRAC_1_SQRT_2),
        ])
        .unwrap();
        assert!(!wf.is_symbolic());
        assert!(wf.free_symbols().is_empty());
        assert!(wf.get_outcome_probs().is_ok());
    }

    #[test]
    fn test_constructor_picks_storage() {
        let numeric = Wavefunction::from_amplitudes(vec![Amplitude::one(), Amplitude::zero()]).unwrap();
        assert!(!numeric.is_symbolic());
        assert!(numeric.as_array().is_some());
        assert!(symbolic_wf().is_symbolic());
        assert_eq!(
            symbolic_wf().free_symbols().into_iter().collect::<Vec<_>>(),
            vec!["alpha", "beta"]
        );
    }

    #[test]
    fn test_matrix_inputs() {
        let mut column = Array2::zeros((16, 1));
        column[[1, 0]] = c(1.0, 0.0);
        let wf = Wavefunction::from_matrix(column).unwrap();
        assert_eq!(wf.amplitude(1), Some(c(1.0, 0.0)));

        let mut row = Array2::zeros((1, 4));
        row[[0, 3]] = c(0.0, 1.0);
        assert!(Wavefunction::from_matrix(row).is_ok());

        let square = Array2::<Complex64>::zeros((2, 2));
        assert!(matches!(
            Wavefunction::from_matrix(square),
            Err(StateError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_set_rejects_over_unity() {
        for value in [1.0, -1.0] {
            let mut wf = symbolic_wf();
            let before = wf.clone();
            assert!(wf.set(0, value).is_err());
            assert_eq!(wf, before);
        }
    }

    #[test]
    fn test_set_below_unity() {
        let mut wf = symbolic_wf();
        wf.set(0, 0.5).unwrap();
        assert_eq!(wf.get(0), Some(Amplitude::from(0.5)));
        assert!(wf.is_symbolic());

        let mut wf = symbolic_wf();
        wf.set(0, Amplitude::symbol("gamma")).unwrap();
        assert_eq!(wf.get(0), Some(Amplitude::symbol("gamma")));
    }

    #[test]
    fn test_set_switches_storage() {
        let mut wf = Wavefunction::from_amplitudes(vec![alpha(), Amplitude::zero()]).unwrap();
        wf.set(0, 1.0).unwrap();
        assert!(!wf.is_symbolic());

        wf.set(1, Amplitude::symbol("beta")).unwrap();
        assert!(wf.is_symbolic());

        assert!(matches!(
            wf.set(2, 0.0),
            Err(StateError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_iterator_matches_indexing() {
        let wf = symbolic_wf();
        for (i, amp) in wf.iter().enumerate() {
            assert_eq!(Some(amp), wf.get(i));
        }
    }

    #[test]
    fn test_bind_validates() {
        let wf = symbolic_wf();
        let too_big = HashMap::from([("alpha".to_string(), 1.0)]);
        assert!(wf.bind(&too_big).is_err());
        let sum_over = HashMap::from([("alpha".to_string(), 0.5), ("beta".to_string(), 0.6)]);
        assert!(wf.bind(&sum_over).is_err());
    }

    #[test]
    fn test_bind_identity_semantics() {
        let numeric = Wavefunction::from_real(vec![0.5; 4]).unwrap();
        assert!(matches!(numeric.bind(&HashMap::new()).unwrap(), Cow::Borrowed(_)));

        let symbolic = symbolic_wf();
        assert!(matches!(symbolic.bind(&HashMap::new()).unwrap(), Cow::Owned(_)));
    }

    #[test]
    fn test_binding_all_symbols_gives_numeric_state() {
        let values = HashMap::from([("alpha".to_string(), 0.5), ("beta".to_string(), 0.5)]);
        let bound = symbolic_wf().bind(&values).unwrap().into_owned();
        assert!(!bound.is_symbolic());
        assert_eq!(bound, Wavefunction::from_real(vec![0.5; 4]).unwrap());
    }

    #[test]
    fn test_equality() {
        let wf = symbolic_wf();
        let AmplitudeVector::Symbolic(v) = wf.amplitudes().clone() else {
            panic!("expected symbolic storage");
        };
        assert_eq!(Wavefunction::from_amplitudes(v).unwrap(), wf);

        let numeric = Wavefunction::from_real(vec![0.5; 4]).unwrap();
        let copy = Wavefunction::from_array(numeric.as_array().unwrap().clone()).unwrap();
        assert_eq!(numeric, copy);
        assert_ne!(numeric, wf);
    }

    #[test]
    fn test_display() {
        let wf = Wavefunction::new(vec![c(0.0, 1.0), c(0.0, 0.0)]).unwrap();
        let s = wf.to_string();
        assert!(s.starts_with("Wavefunction(["));
        assert!(s.ends_with("])"));
        assert!(s.contains('j'));

        let sym = Wavefunction::from_amplitudes(vec![alpha(), Amplitude::zero()]).unwrap();
        assert!(sym.to_string().contains("alpha"));
    }

    #[test]
    fn test_probabilities_by_kind() {
        let wf = Wavefunction::zero_state(2).unwrap();
        assert!(wf.get_probabilities().as_numeric().is_some());
        let sym = Wavefunction::from_amplitudes(vec![alpha(), Amplitude::zero()]).unwrap();
        assert!(matches!(sym.get_probabilities(), Probabilities::Symbolic(_)));
        assert!(matches!(
            sym.get_outcome_probs(),
            Err(StateError::SymbolicState(_))
        ));
    }

    #[test]
    fn test_outcome_probs_match_probabilities() {
        let cases = vec![
            vec![1.0, 0.0],
            vec![0.5, 0.5, 0.5, 0.5],
            vec![FRAC_1_SQRT_2, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, FRAC_1_SQRT_2],
        ];
        for amplitudes in cases {
            let wf = Wavefunction::from_real(amplitudes).unwrap();
            let probs = wf.get_probabilities();
            let probs = probs.as_numeric().unwrap();
            for (key, p) in wf.get_outcome_probs().unwrap() {
                assert_eq!(key.len(), wf.n_qubits());
                let index = usize::from_str_radix(&key, 2).unwrap();
                assert_eq!(probs[index], p);
            }
        }
    }

    #[test]
    fn test_expectation_values() {
        // |+0>: <X0> = 1, <Z1> = 1, <Z0> = 0
        let plus_zero =
            Wavefunction::from_real(vec![FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2, 0.0]).unwrap();
        let x0 = PauliTerm::parse("X0").unwrap();
        let z0 = PauliTerm::parse("Z0").unwrap();
        let z1 = PauliTerm::parse("2*Z1").unwrap();
        assert!((plus_zero.expectation_value(&x0).unwrap() - 1.0).abs() < 1e-12);
        assert!(plus_zero.expectation_value(&z0).unwrap().abs() < 1e-12);
        assert!((plus_zero.expectation_value(&z1).unwrap() - 2.0).abs() < 1e-12);

        // (|0> + i|1>)/sqrt(2) is the +1 eigenstate of Y.
        let y_plus = Wavefunction::new(vec![c(FRAC_1_SQRT_2, 0.0), c(0.0, FRAC_1_SQRT_2)]).unwrap();
        let y0 = PauliTerm::parse("Y0").unwrap();
        assert!((y_plus.expectation_value(&y0).unwrap() - 1.0).abs() < 1e-12);

        assert!(plus_zero.expectation_value(&PauliTerm::parse("Z5").unwrap()).is_err());
    }

    #[test]
    fn test_random_is_normalized_and_seeded() {
        let a = Wavefunction::random(3, 7).unwrap();
        let b = Wavefunction::random(3, 7).unwrap();
        assert_eq!(a, b);
        let norm: f64 = a.as_array().unwrap().iter().map(|x| x.norm_sqr()).sum();
        assert!((norm - 1.0).abs() < 1e-12);
    }
}
