//! Symbolic simulator backend.
//!
//! Amplitudes are [`Amplitude`] expressions, so circuits whose gate angles
//! carry free symbols produce symbolic wavefunctions. Each gate is applied as
//! its dense matrix over the qubits it touches.

use num_complex::Complex64;
use rand::rngs::StdRng;
use std::f64::consts::FRAC_1_SQRT_2;
use tracing::{debug, instrument};

use qwave_hal::{
    BackendConfig, BackendFactory, Capabilities, HalError, HalResult, QuantumBackend,
    QuantumSimulator, RunCounters,
};
use qwave_ir::{Circuit, GateKind, Instruction, ParameterExpression, StandardGate};
use qwave_state::{Amplitude, Measurements, Wavefunction};

use crate::config::SimulatorConfig;
use crate::simulator::{capabilities_for, rng_for, sample};

fn c(re: f64, im: f64) -> Amplitude {
    Amplitude::constant(Complex64::new(re, im))
}

fn zero() -> Amplitude {
    Amplitude::zero()
}

fn one() -> Amplitude {
    Amplitude::one()
}

/// `theta / 2` as an expression.
fn half(theta: &ParameterExpression) -> Amplitude {
    Amplitude::from(theta) * Amplitude::from(0.5)
}

/// `exp(i * x)`.
fn phase(x: Amplitude) -> Amplitude {
    (Amplitude::i() * x).exp()
}

fn is_zero(a: &Amplitude) -> bool {
    matches!(a, Amplitude::Constant(v) if v.norm_sqr() == 0.0)
}

fn diagonal(entries: Vec<Amplitude>) -> Vec<Amplitude> {
    let dim = entries.len();
    let mut matrix = vec![zero(); dim * dim];
    for (i, entry) in entries.into_iter().enumerate() {
        matrix[i * dim + i] = entry;
    }
    matrix
}

/// Permutation matrix sending basis state `col` to `perm[col]`.
fn permutation(perm: &[usize]) -> Vec<Amplitude> {
    let dim = perm.len();
    let mut matrix = vec![zero(); dim * dim];
    for (col, &row) in perm.iter().enumerate() {
        matrix[row * dim + col] = one();
    }
    matrix
}

/// Row-major matrix of a builtin gate. The first qubit of the instruction is
/// the most significant bit of the matrix index.
fn standard_matrix(gate: &StandardGate) -> Vec<Amplitude> {
    let s = FRAC_1_SQRT_2;
    match gate {
        StandardGate::I => diagonal(vec![one(), one()]),
        StandardGate::X => permutation(&[1, 0]),
        StandardGate::Y => vec![zero(), c(0.0, -1.0), c(0.0, 1.0), zero()],
        StandardGate::Z => diagonal(vec![one(), c(-1.0, 0.0)]),
        StandardGate::H => vec![c(s, 0.0), c(s, 0.0), c(s, 0.0), c(-s, 0.0)],
        StandardGate::S => diagonal(vec![one(), c(0.0, 1.0)]),
        StandardGate::Sdg => diagonal(vec![one(), c(0.0, -1.0)]),
        StandardGate::T => diagonal(vec![one(), c(s, s)]),
        StandardGate::Tdg => diagonal(vec![one(), c(s, -s)]),
        StandardGate::SX => vec![c(0.5, 0.5), c(0.5, -0.5), c(0.5, -0.5), c(0.5, 0.5)],
        StandardGate::Rx(theta) => {
            let h = half(theta);
            let cos = h.clone().cos();
            let minus_i_sin = c(0.0, -1.0) * h.sin();
            vec![cos.clone(), minus_i_sin.clone(), minus_i_sin, cos]
        }
        StandardGate::Ry(theta) => {
            let h = half(theta);
            let cos = h.clone().cos();
            let sin = h.sin();
            vec![cos.clone(), -sin.clone(), sin, cos]
        }
        StandardGate::Rz(theta) => {
            let h = half(theta);
            diagonal(vec![phase(-h.clone()), phase(h)])
        }
        StandardGate::P(lambda) => diagonal(vec![one(), phase(Amplitude::from(lambda))]),
        StandardGate::U(theta, phi, lambda) => {
            let h = half(theta);
            let (phi, lambda) = (Amplitude::from(phi), Amplitude::from(lambda));
            let cos = h.clone().cos();
            let sin = h.sin();
            vec![
                cos.clone(),
                -(phase(lambda.clone()) * sin.clone()),
                phase(phi.clone()) * sin,
                phase(phi + lambda) * cos,
            ]
        }
        StandardGate::CX => permutation(&[0, 1, 3, 2]),
        StandardGate::CY => {
            let mut matrix = diagonal(vec![one(), one(), zero(), zero()]);
            matrix[2 * 4 + 3] = c(0.0, -1.0);
            matrix[3 * 4 + 2] = c(0.0, 1.0);
            matrix
        }
        StandardGate::CZ => diagonal(vec![one(), one(), one(), c(-1.0, 0.0)]),
        StandardGate::Swap => permutation(&[0, 2, 1, 3]),
        StandardGate::ISwap => {
            let mut matrix = diagonal(vec![one(), zero(), zero(), one()]);
            matrix[4 + 2] = Amplitude::i();
            matrix[2 * 4 + 1] = Amplitude::i();
            matrix
        }
        StandardGate::CP(lambda) => {
            diagonal(vec![one(), one(), one(), phase(Amplitude::from(lambda))])
        }
        StandardGate::CRz(theta) => {
            let h = half(theta);
            diagonal(vec![one(), one(), phase(-h.clone()), phase(h)])
        }
        StandardGate::RXX(theta) => {
            let h = half(theta);
            let cos = h.clone().cos();
            let minus_i_sin = c(0.0, -1.0) * h.sin();
            let mut matrix = diagonal(vec![cos.clone(), cos.clone(), cos.clone(), cos]);
            for (row, col) in [(0, 3), (1, 2), (2, 1), (3, 0)] {
                matrix[row * 4 + col] = minus_i_sin.clone();
            }
            matrix
        }
        StandardGate::RYY(theta) => {
            let h = half(theta);
            let cos = h.clone().cos();
            let sin = h.sin();
            let plus = Amplitude::i() * sin.clone();
            let minus = c(0.0, -1.0) * sin;
            let mut matrix = diagonal(vec![cos.clone(), cos.clone(), cos.clone(), cos]);
            matrix[3] = plus.clone();
            matrix[3 * 4] = plus;
            matrix[4 + 2] = minus.clone();
            matrix[2 * 4 + 1] = minus;
            matrix
        }
        StandardGate::RZZ(theta) => {
            let h = half(theta);
            let even = phase(-h.clone());
            let odd = phase(h);
            diagonal(vec![even.clone(), odd.clone(), odd, even])
        }
        StandardGate::CCX => permutation(&[0, 1, 2, 3, 4, 5, 7, 6]),
    }
}

fn instruction_matrix(instruction: &Instruction) -> Vec<Amplitude> {
    match &instruction.gate {
        GateKind::Standard(gate) => standard_matrix(gate),
        GateKind::Custom(gate) => gate.matrix().iter().map(|&v| Amplitude::constant(v)).collect(),
    }
}

/// A register of symbolic amplitudes, qubit 0 most significant.
struct SymbolicState {
    amplitudes: Vec<Amplitude>,
    num_qubits: usize,
}

impl SymbolicState {
    fn from_wavefunction(wavefunction: &Wavefunction) -> Self {
        Self {
            amplitudes: wavefunction.iter().collect(),
            num_qubits: wavefunction.n_qubits(),
        }
    }

    fn mask(&self, qubit: usize) -> usize {
        1 << (self.num_qubits - 1 - qubit)
    }

    fn apply(&mut self, instruction: &Instruction) {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        let matrix = instruction_matrix(instruction);
        self.apply_matrix(&matrix, &qubits);
    }

    fn apply_matrix(&mut self, matrix: &[Amplitude], qubits: &[usize]) {
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

        for base in 0..self.amplitudes.len() {
            if base & covered != 0 {
                continue;
            }
            let local: Vec<Amplitude> = (0..dim)
                .map(|l| self.amplitudes[index(base, l)].clone())
                .collect();
            for row in 0..dim {
                let value = (0..dim)
                    .filter(|&col| !is_zero(&matrix[row * dim + col]) && !is_zero(&local[col]))
                    .map(|col| matrix[row * dim + col].clone() * local[col].clone())
                    .reduce(|acc, term| acc + term)
                    .map_or_else(zero, |sum| sum.simplify());
                self.amplitudes[index(base, row)] = value;
            }
        }
    }

    fn into_wavefunction(self) -> HalResult<Wavefunction> {
        Ok(Wavefunction::from_amplitudes(self.amplitudes)?)
    }
}

/// Exact simulator over symbolic amplitudes.
///
/// Accepts circuits with unbound parameters and returns wavefunctions whose
/// amplitudes are expressions in those parameters. Symbolic initial states
/// are accepted too. Sampling and outcome distributions still need a fully
/// bound circuit.
pub struct SymbolicSimulator {
    name: String,
    config: SimulatorConfig,
    capabilities: Capabilities,
    counters: RunCounters,
    rng: StdRng,
}

impl SymbolicSimulator {
    /// Registry name of this backend.
    pub const NAME: &'static str = "symbolic";

    /// Create a simulator with default settings.
    pub fn new() -> Self {
        Self::build(Self::NAME.to_string(), SimulatorConfig::default())
    }

    /// Create a simulator from validated settings.
    pub fn with_config(config: SimulatorConfig) -> HalResult<Self> {
        config.validate()?;
        Ok(Self::build(Self::NAME.to_string(), config))
    }

    fn build(name: String, config: SimulatorConfig) -> Self {
        Self {
            capabilities: capabilities_for(&name, &config).with_feature("symbolic"),
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

    fn evolve(circuit: &Circuit, initial_state: &Wavefunction) -> HalResult<Wavefunction> {
        let mut state = SymbolicState::from_wavefunction(initial_state);
        for instruction in circuit.instructions() {
            state.apply(instruction);
        }
        state.into_wavefunction()
    }
}

impl Default for SymbolicSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumBackend for SymbolicSimulator {
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
        let zero = Wavefunction::zero_state(circuit.num_qubits())?;
        let wavefunction = Self::evolve(circuit, &zero)?;
        if wavefunction.is_symbolic() {
            return Err(HalError::Backend(format!(
                "circuit '{}' left free symbols {:?} in the final state",
                circuit.name(),
                wavefunction.free_symbols()
            )));
        }
        sample(&wavefunction, n_samples, &mut self.rng)
    }

    fn as_simulator_mut(&mut self) -> Option<&mut dyn QuantumSimulator> {
        Some(self)
    }
}

impl QuantumSimulator for SymbolicSimulator {
    #[instrument(skip(self, circuit, initial_state), fields(circuit = circuit.name()))]
    fn simulate(
        &mut self,
        circuit: &Circuit,
        initial_state: &Wavefunction,
    ) -> HalResult<Wavefunction> {
        let wavefunction = Self::evolve(circuit, initial_state)?;
        debug!(
            gates = circuit.len(),
            free_symbols = wavefunction.free_symbols().len(),
            "applied circuit symbolically"
        );
        Ok(wavefunction)
    }
}

impl BackendFactory for SymbolicSimulator {
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
