//! Statevector simulation engine.
//!
//! Qubit 0 is the most significant bit of a basis index, so on an `n`-qubit
//! register qubit `q` owns the mask `1 << (n - 1 - q)`.

use num_complex::Complex64;
use std::f64::consts::PI;

use qwave_hal::{HalError, HalResult};
use qwave_ir::{GateKind, Instruction, IrError, ParameterExpression, StandardGate};

/// A statevector representing a quantum state.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

fn angle(param: &ParameterExpression) -> HalResult<f64> {
    param.as_f64().ok_or_else(|| {
        let names: Vec<String> = param.symbols().into_iter().collect();
        HalError::Ir(IrError::UnboundParameter(names.join(", ")))
    })
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Wrap existing amplitudes. The length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Self {
        let num_qubits = amplitudes.len().trailing_zeros() as usize;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed big-endian.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the statevector, returning its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    #[inline]
    fn mask(&self, qubit: usize) -> usize {
        1 << (self.num_qubits - 1 - qubit)
    }

    /// Apply an instruction to the statevector.
    ///
    /// Fails on gates whose parameters still carry free symbols.
    pub fn apply(&mut self, instruction: &Instruction) -> HalResult<()> {
        let qubits: Vec<_> = instruction.qubits.iter().map(|q| q.index()).collect();
        match &instruction.gate {
            GateKind::Standard(gate) => self.apply_standard_gate(gate, &qubits),
            GateKind::Custom(gate) => {
                self.apply_matrix(gate.matrix(), &qubits);
                Ok(())
            }
        }
    }

    /// Apply a standard gate.
    fn apply_standard_gate(&mut self, gate: &StandardGate, qubits: &[usize]) -> HalResult<()> {
        match gate {
            // Single-qubit gates
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -PI / 2.0),
            StandardGate::T => self.apply_phase(qubits[0], PI / 4.0),
            StandardGate::Tdg => self.apply_phase(qubits[0], -PI / 4.0),
            StandardGate::SX => self.apply_sx(qubits[0]),
            StandardGate::Rx(theta) => self.apply_rx(qubits[0], angle(theta)?),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], angle(theta)?),
            StandardGate::Rz(theta) => self.apply_rz(qubits[0], angle(theta)?),
            StandardGate::P(theta) => self.apply_phase(qubits[0], angle(theta)?),
            StandardGate::U(theta, phi, lambda) => {
                self.apply_u(qubits[0], angle(theta)?, angle(phi)?, angle(lambda)?);
            }

            // Two-qubit gates
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CY => self.apply_cy(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::ISwap => self.apply_iswap(qubits[0], qubits[1]),
            StandardGate::CRz(theta) => self.apply_crz(qubits[0], qubits[1], angle(theta)?),
            StandardGate::CP(theta) => self.apply_cp(qubits[0], qubits[1], angle(theta)?),
            StandardGate::RXX(theta) => self.apply_rxx(qubits[0], qubits[1], angle(theta)?),
            StandardGate::RYY(theta) => self.apply_ryy(qubits[0], qubits[1], angle(theta)?),
            StandardGate::RZZ(theta) => self.apply_rzz(qubits[0], qubits[1], angle(theta)?),

            // Three-qubit gates
            StandardGate::CCX => self.apply_ccx(qubits[0], qubits[1], qubits[2]),
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = self.mask(qubit);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = self.mask(qubit);
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = self.mask(qubit);
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = self.mask(qubit);
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = self.mask(qubit);
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                self.amplitudes[i] *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = self.mask(qubit);
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = self.mask(qubit);
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = self.mask(qubit);
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes[i] *= phase_0;
            } else {
                self.amplitudes[i] *= phase_1;
            }
        }
    }

    fn apply_u(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) {
        let mask = self.mask(qubit);
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let e_il = Complex64::from_polar(1.0, lambda);
        let e_ip = Complex64::from_polar(1.0, phi);
        let e_ipl = Complex64::from_polar(1.0, phi + lambda);

        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - e_il * s * b;
                self.amplitudes[j] = e_ip * s * a + e_ipl * c * b;
            }
        }
    }

    fn apply_sx(&mut self, qubit: usize) {
        // SX = e^{iπ/4} RX(π/2)
        self.apply_rx(qubit, PI / 2.0);
        let global = Complex64::from_polar(1.0, PI / 4.0);
        for amp in &mut self.amplitudes {
            *amp *= global;
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cy(&mut self, control: usize, target: usize) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = self.mask(q1);
        let mask2 = self.mask(q2);
        for i in 0..self.amplitudes.len() {
            let b1 = (i & mask1) != 0;
            let b2 = (i & mask2) != 0;
            if b1 && !b2 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_iswap(&mut self, q1: usize, q2: usize) {
        let mask1 = self.mask(q1);
        let mask2 = self.mask(q2);
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            let b1 = (i & mask1) != 0;
            let b2 = (i & mask2) != 0;
            if b1 && !b2 {
                let j = (i & !mask1) | mask2;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_crz(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..self.amplitudes.len() {
            if i & ctrl_mask != 0 {
                if i & tgt_mask == 0 {
                    self.amplitudes[i] *= phase_0;
                } else {
                    self.amplitudes[i] *= phase_1;
                }
            }
        }
    }

    fn apply_cp(&mut self, control: usize, target: usize, theta: f64) {
        let ctrl_mask = self.mask(control);
        let tgt_mask = self.mask(target);
        let phase = Complex64::from_polar(1.0, theta);
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                self.amplitudes[i] *= phase;
            }
        }
    }

    /// exp(-iθ/2 X⊗X): pairs each index with its doubly flipped partner.
    fn apply_rxx(&mut self, q1: usize, q2: usize, theta: f64) {
        let both = self.mask(q1) | self.mask(q2);
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            let j = i ^ both;
            if i < j {
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    /// exp(-iθ/2 Y⊗Y). Y⊗Y maps |00⟩ to -|11⟩ and |01⟩ to |10⟩.
    fn apply_ryy(&mut self, q1: usize, q2: usize, theta: f64) {
        let mask1 = self.mask(q1);
        let mask2 = self.mask(q2);
        let both = mask1 | mask2;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            let j = i ^ both;
            if i < j {
                // Parity of the pair decides the sign of the Y⊗Y entry.
                let same = ((i & mask1) == 0) == ((i & mask2) == 0);
                let coupling = if same {
                    Complex64::new(0.0, s)
                } else {
                    Complex64::new(0.0, -s)
                };
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + coupling * b;
                self.amplitudes[j] = coupling * a + c * b;
            }
        }
    }

    fn apply_rzz(&mut self, q1: usize, q2: usize, theta: f64) {
        let mask1 = self.mask(q1);
        let mask2 = self.mask(q2);
        let even = Complex64::from_polar(1.0, -theta / 2.0);
        let odd = Complex64::from_polar(1.0, theta / 2.0);
        for i in 0..self.amplitudes.len() {
            let same = ((i & mask1) == 0) == ((i & mask2) == 0);
            self.amplitudes[i] *= if same { even } else { odd };
        }
    }

    // =========================================================================
    // Three-qubit gate implementations
    // =========================================================================

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let c1_mask = self.mask(c1);
        let c2_mask = self.mask(c2);
        let tgt_mask = self.mask(target);
        for i in 0..self.amplitudes.len() {
            if (i & c1_mask != 0) && (i & c2_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    // =========================================================================
    // Dense matrices
    // =========================================================================

    /// Apply a row-major `2^k × 2^k` matrix to `qubits`; the first listed
    /// qubit is the most significant bit of the matrix index.
    fn apply_matrix(&mut self, matrix: &[Complex64], qubits: &[usize]) {
        let k = qubits.len();
        let dim = 1 << k;
        let masks: Vec<usize> = qubits.iter().map(|&q| self.mask(q)).collect();
        let covered: usize = masks.iter().fold(0, |acc, m| acc | m);
        let index = |base: usize, local: usize| {
            masks
                .iter()
                .enumerate()
                .filter(|(b, _)| local & (1 << (k - 1 - b)) != 0)
                .fold(base, |acc, (_, m)| acc | m)
        };

        let mut local = vec![Complex64::new(0.0, 0.0); dim];
        for base in 0..self.amplitudes.len() {
            if base & covered != 0 {
                continue;
            }
            for (l, slot) in local.iter_mut().enumerate() {
                *slot = self.amplitudes[index(base, l)];
            }
            for row in 0..dim {
                let value = (0..dim)
                    .map(|col| matrix[row * dim + col] * local[col])
                    .sum::<Complex64>();
                self.amplitudes[index(base, row)] = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qwave_ir::{CustomGate, QubitId};

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_hadamard() {
        let mut sv = Statevector::new(1);
        sv.apply_h(0);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_h(0);
        sv.apply_cx(0, 1);

        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(sqrt2_inv, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(sqrt2_inv, 0.0)));
    }

    #[test]
    fn test_qubit_zero_is_most_significant() {
        let mut sv = Statevector::new(3);
        sv.apply_x(0);
        assert!(approx_eq(sv.amplitudes[0b100], Complex64::new(1.0, 0.0)));

        let mut sv = Statevector::new(3);
        sv.apply_x(2);
        assert!(approx_eq(sv.amplitudes[0b001], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_sx_squares_to_x() {
        let mut sv = Statevector::new(1);
        sv.apply_sx(0);
        sv.apply_sx(0);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_custom_matrix_matches_builtin_cx() {
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        #[rustfmt::skip]
        let cx = vec![
            one, zero, zero, zero,
            zero, one, zero, zero,
            zero, zero, zero, one,
            zero, zero, one, zero,
        ];
        let gate = CustomGate::new("my_cx", 2, cx).unwrap();
        let inst = Instruction::new(gate, [QubitId(2), QubitId(0)]).unwrap();

        let mut custom = Statevector::new(3);
        custom.apply_x(2);
        custom.apply(&inst).unwrap();

        let mut builtin = Statevector::new(3);
        builtin.apply_x(2);
        builtin.apply_cx(2, 0);

        for (a, b) in custom.amplitudes().iter().zip(builtin.amplitudes()) {
            assert!(approx_eq(*a, *b));
        }
        assert!(approx_eq(custom.amplitudes[0b101], one));
    }

    #[test]
    fn test_symbolic_parameter_is_rejected() {
        let inst = Instruction::single_qubit_gate(
            StandardGate::Rx(ParameterExpression::symbol("theta")),
            QubitId(0),
        )
        .unwrap();
        let mut sv = Statevector::new(1);
        let err = sv.apply(&inst).unwrap_err();
        assert!(matches!(err, HalError::Ir(IrError::UnboundParameter(ref s)) if s == "theta"));
    }
}
