//! Pauli observables for expectation estimation.
//!
//! A [`PauliTerm`] is a real weight times a [`PauliString`]; a [`PauliSum`]
//! is a list of terms, measured term by term. Qubit `q` in a string is
//! position `q` of a bitstring and mask `1 << (n - 1 - q)` of a basis index.
//!
//! ```rust
//! use qwave_state::operator::PauliTerm;
//!
//! let op = PauliTerm::parse("Z0").unwrap() + PauliTerm::parse("Z1").unwrap() * 2.0;
//! assert_eq!(op.n_terms(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{StateError, StateResult};

/// One Pauli factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    I,
    X,
    Y,
    Z,
}

impl PauliOp {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(PauliOp::I),
            'X' => Some(PauliOp::X),
            'Y' => Some(PauliOp::Y),
            'Z' => Some(PauliOp::Z),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            PauliOp::I => 'I',
            PauliOp::X => 'X',
            PauliOp::Y => 'Y',
            PauliOp::Z => 'Z',
        }
    }
}

/// Product of Pauli factors over `u32` qubit positions.
///
/// Only X, Y and Z factors are kept, ordered by position with each position
/// at most once; the empty product is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PauliString {
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// Build from `(position, factor)` pairs in any order. `I` factors are
    /// discarded; a position given twice is an error.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> StateResult<Self> {
        let mut v: Vec<(u32, PauliOp)> = ops
            .into_iter()
            .filter(|(_, op)| *op != PauliOp::I)
            .collect();
        v.sort_by_key(|(q, _)| *q);
        if let Some(pair) = v.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(StateError::InvalidPauli(format!(
                "qubit {} appears more than once",
                pair[0].0
            )));
        }
        Ok(Self { ops: v })
    }

    /// The identity string.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Z on every listed position.
    pub fn zs(qubits: impl IntoIterator<Item = u32>) -> StateResult<Self> {
        Self::from_ops(qubits.into_iter().map(|q| (q, PauliOp::Z)))
    }

    /// The X/Y/Z factors in position order.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True for the empty product.
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// True if every operator is Z, so the string is diagonal in the
    /// computational basis.
    pub fn is_diagonal(&self) -> bool {
        self.ops.iter().all(|(_, op)| *op == PauliOp::Z)
    }

    /// Largest position carrying a factor.
    pub fn max_qubit(&self) -> Option<u32> {
        self.ops.last().map(|(q, _)| *q)
    }

    /// Positions carrying a factor.
    pub fn qubits(&self) -> impl Iterator<Item = u32> + '_ {
        self.ops.iter().map(|(q, _)| *q)
    }

    /// The ±1 eigenvalue of the string on a bitstring measured in the
    /// string's own eigenbasis: the parity of the bits at its qubits.
    pub fn parity_eigenvalue(&self, bits: &[u8]) -> StateResult<f64> {
        let mut odd = false;
        for q in self.qubits() {
            let bit = bits.get(q as usize).ok_or_else(|| {
                StateError::InvalidPauli(format!(
                    "qubit {q} is outside a {}-bit outcome",
                    bits.len()
                ))
            })?;
            odd ^= *bit == 1;
        }
        Ok(if odd { -1.0 } else { 1.0 })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return write!(f, "I");
        }
        for (i, (q, op)) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}{q}", op.as_char())?;
        }
        Ok(())
    }
}

/// `coefficient * pauli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauliTerm {
    pub coefficient: f64,
    pub pauli: PauliString,
}

impl PauliTerm {
    pub fn new(coefficient: f64, pauli: PauliString) -> Self {
        Self { coefficient, pauli }
    }

    /// Weight 1 on the identity.
    pub fn identity() -> Self {
        Self::new(1.0, PauliString::identity())
    }

    /// Parse terms such as `"X0"`, `"Z0 Z1"`, `"X0*Y3"` or `"-0.5*Z2"`.
    ///
    /// Tokens are separated by whitespace or `*`. Numeric tokens multiply
    /// the coefficient and must be finite; an empty string or a bare `I` is
    /// the identity.
    pub fn parse(s: &str) -> StateResult<Self> {
        let mut coefficient = 1.0;
        let mut ops = Vec::new();

        for token in s.split(|c: char| c == '*' || c.is_whitespace()) {
            if token.is_empty() {
                continue;
            }
            if let Ok(value) = token.parse::<f64>() {
                if !value.is_finite() {
                    return Err(StateError::InvalidPauli(format!(
                        "coefficient '{token}' in '{s}' is not finite"
                    )));
                }
                coefficient *= value;
                continue;
            }
            let mut chars = token.chars();
            let op = chars
                .next()
                .and_then(PauliOp::from_char)
                .ok_or_else(|| StateError::InvalidPauli(format!("bad token '{token}' in '{s}'")))?;
            let index = chars.as_str();
            if index.is_empty() && op == PauliOp::I {
                continue;
            }
            let qubit = index
                .parse::<u32>()
                .map_err(|_| StateError::InvalidPauli(format!("bad qubit index in '{token}'")))?;
            ops.push((qubit, op));
        }

        Ok(Self::new(coefficient, PauliString::from_ops(ops)?))
    }

    /// Replace the coefficient.
    #[must_use]
    pub fn with_coefficient(mut self, coefficient: f64) -> Self {
        self.coefficient = coefficient;
        self
    }

    /// `coefficient * Z(qubit)`.
    pub fn z(qubit: u32, coefficient: f64) -> Self {
        Self::new(
            coefficient,
            PauliString {
                ops: vec![(qubit, PauliOp::Z)],
            },
        )
    }

    /// True for a multiple of the identity.
    pub fn is_identity(&self) -> bool {
        self.pauli.is_identity()
    }
}

impl FromStr for PauliTerm {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.coefficient, self.pauli)
    }
}

/// Terms in the order they were added. Like terms are not merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PauliSum {
    terms: Vec<PauliTerm>,
}

impl PauliSum {
    pub fn from_terms(terms: Vec<PauliTerm>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Width of the narrowest state every term fits on; 0 when no term has a
    /// factor.
    pub fn min_qubits(&self) -> u32 {
        self.terms
            .iter()
            .filter_map(|t| t.pauli.max_qubit())
            .max()
            .map_or(0, |q| q + 1)
    }
}

impl From<PauliTerm> for PauliSum {
    fn from(term: PauliTerm) -> Self {
        Self { terms: vec![term] }
    }
}

impl FromIterator<PauliTerm> for PauliSum {
    fn from_iter<T: IntoIterator<Item = PauliTerm>>(iter: T) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for PauliSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.terms.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(" + "))
    }
}

impl std::ops::Mul<f64> for PauliTerm {
    type Output = PauliTerm;

    fn mul(mut self, rhs: f64) -> Self::Output {
        self.coefficient *= rhs;
        self
    }
}

impl std::ops::Add for PauliTerm {
    type Output = PauliSum;

    fn add(self, rhs: PauliTerm) -> Self::Output {
        PauliSum::from_terms(vec![self, rhs])
    }
}

impl std::ops::Add<PauliTerm> for PauliSum {
    type Output = PauliSum;

    fn add(mut self, rhs: PauliTerm) -> Self::Output {
        self.terms.push(rhs);
        self
    }
}

impl std::ops::Add for PauliSum {
    type Output = PauliSum;

    fn add(mut self, rhs: PauliSum) -> Self::Output {
        self.terms.extend(rhs.terms);
        self
    }
}
