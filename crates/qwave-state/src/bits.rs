//! Conversions between basis indices and bitstrings.
//!
//! Qubit 0 is the most significant bit: for `n` qubits, qubit `q` carries
//! weight `2^(n-1-q)`, so the key of index `i` is `i` written as an
//! `n`-digit binary number.

use crate::error::{StateError, StateResult};

/// Bits of `index`, qubit 0 first.
pub fn index_to_bits(index: usize, n_qubits: usize) -> Vec<u8> {
    (0..n_qubits)
        .map(|q| ((index >> (n_qubits - 1 - q)) & 1) as u8)
        .collect()
}

/// Basis index of a bit sequence, qubit 0 first.
pub fn bits_to_index(bits: &[u8]) -> usize {
    bits.iter().fold(0, |acc, &b| (acc << 1) | usize::from(b & 1))
}

/// Render bits as a `"0101"` key.
pub fn bits_to_string(bits: &[u8]) -> String {
    bits.iter().map(|&b| if b == 0 { '0' } else { '1' }).collect()
}

/// The `n`-digit binary key of `index`.
pub fn index_to_key(index: usize, n_qubits: usize) -> String {
    format!("{index:0n_qubits$b}")
}

/// Parse a `"0101"` key into bits.
pub fn parse_bitstring(key: &str) -> StateResult<Vec<u8>> {
    key.chars()
        .map(|c| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            _ => Err(StateError::InvalidBitstring(key.to_string())),
        })
        .collect()
}
