//! Conformance checks for backend implementations.
//!
//! Every function here panics on a contract violation, so backend crates
//! call them from their own `#[test]` functions:
//!
//! ```rust,ignore
//! #[test]
//! fn conforms() {
//!     let mut sim = StatevectorSimulator::new();
//!     qwave_hal::testing::run_simulator_suite(&mut sim);
//! }
//! ```
//!
//! The functions are generic over `?Sized` backends, so they accept both
//! concrete types and `dyn QuantumBackend` / `dyn QuantumSimulator`.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI};

use num_complex::Complex64;
use qwave_ir::{Circuit, QubitId, builtin_gate_by_name};
use qwave_state::{Measurements, PauliTerm, Wavefunction};

use crate::backend::{QuantumBackend, QuantumSimulator};
use crate::error::HalResult;
use crate::estimation::{EstimationTask, estimate_expectation_values_by_averaging};

/// Samples per sampled gate check.
pub const GATE_TEST_SAMPLES: usize = 1000;

/// Tolerance on wavefunction entries in the simulator checks.
pub const ATOL_WAVEFUNCTION: f64 = 1e-7;

/// `[X(0), X(0), X(1), X(1), X(2)]`: only qubit 2 ends up flipped.
pub fn indexing_circuit() -> Circuit {
    let mut circuit = Circuit::with_size("indexing", 3);
    circuit
        .x(QubitId(0))
        .and_then(|c| c.x(QubitId(0)))
        .and_then(|c| c.x(QubitId(1)))
        .and_then(|c| c.x(QubitId(1)))
        .and_then(|c| c.x(QubitId(2)))
        .expect("indexing circuit is well formed");
    circuit
}

fn all_x_circuit() -> Circuit {
    let mut circuit = Circuit::with_size("all_x", 3);
    for q in 0..3 {
        circuit.x(QubitId(q)).expect("qubit in range");
    }
    circuit
}

/// `[H(0), CNOT(0, 1), CNOT(1, 2)]`.
pub fn ghz_circuit() -> Circuit {
    let mut circuit = Circuit::with_size("ghz", 3);
    circuit
        .h(QubitId(0))
        .and_then(|c| c.cx(QubitId(0), QubitId(1)))
        .and_then(|c| c.cx(QubitId(1), QubitId(2)))
        .expect("ghz circuit is well formed");
    circuit
}

fn most_frequent(measurements: &Measurements) -> String {
    measurements
        .most_frequent()
        .map(|(key, _)| key)
        .expect("measurements are not empty")
}

fn assert_counters<B: QuantumBackend + ?Sized>(backend: &B, circuits: usize, jobs: usize) {
    let counters = backend.counters();
    assert_eq!(
        counters.number_of_circuits_run, circuits,
        "circuits run by {}",
        backend.name()
    );
    assert_eq!(
        counters.number_of_jobs_run, jobs,
        "jobs run by {}",
        backend.name()
    );
}

// ---------------------------------------------------------------------------
// Backend checks
// ---------------------------------------------------------------------------

/// Qubit 0 is the first bit of every bitstring.
pub fn check_run_circuit_and_measure_correct_indexing<B: QuantumBackend + ?Sized>(backend: &mut B) {
    backend.reset_counters();
    let measurements = backend
        .run_circuit_and_measure(&indexing_circuit(), 100)
        .expect("run_circuit_and_measure");

    assert_eq!(most_frequent(&measurements), "001");
    assert_counters(backend, 1, 1);
}

/// A sample count of zero is rejected without touching the counters.
pub fn check_run_circuit_and_measure_rejects_invalid_n_samples<B: QuantumBackend + ?Sized>(
    backend: &mut B,
) {
    backend.reset_counters();
    let err = backend
        .run_circuit_and_measure(&indexing_circuit(), 0)
        .expect_err("zero samples must be rejected");

    assert!(err.is_validation(), "unexpected error class: {err}");
    assert_counters(backend, 0, 0);
}

/// Exactly the requested number of bitstrings comes back.
pub fn check_run_circuit_and_measure_num_measurements<B: QuantumBackend + ?Sized>(
    backend: &mut B,
) {
    for n_samples in [1, 2, 10, 100] {
        backend.reset_counters();
        let measurements = backend
            .run_circuit_and_measure(&indexing_circuit(), n_samples)
            .expect("run_circuit_and_measure");

        assert_eq!(measurements.len(), n_samples);
        assert_counters(backend, 1, 1);
    }
}

/// Every bitstring is as wide as the circuit.
pub fn check_measurements_have_uniform_width<B: QuantumBackend + ?Sized>(backend: &mut B) {
    backend.reset_counters();
    let measurements = backend
        .run_circuit_and_measure(&indexing_circuit(), 100)
        .expect("run_circuit_and_measure");

    assert!(measurements.bitstrings().iter().all(|bits| bits.len() == 3));
    assert_counters(backend, 1, 1);
}

/// A set of 25 circuits counts 25 circuits and one job per batch.
pub fn check_run_circuitset_and_measure<B: QuantumBackend + ?Sized>(backend: &mut B) {
    const NUMBER_OF_CIRCUITS: usize = 25;
    backend.reset_counters();
    let circuits = vec![indexing_circuit(); NUMBER_OF_CIRCUITS];
    let results = backend
        .run_circuitset_and_measure(&circuits, &[100; NUMBER_OF_CIRCUITS])
        .expect("run_circuitset_and_measure");

    assert_eq!(results.len(), NUMBER_OF_CIRCUITS);
    for measurements in &results {
        assert_eq!(most_frequent(measurements), "001");
    }
    let jobs = match backend.capabilities().batch_size {
        Some(batch_size) => NUMBER_OF_CIRCUITS.div_ceil(batch_size),
        None => NUMBER_OF_CIRCUITS,
    };
    assert_counters(backend, NUMBER_OF_CIRCUITS, jobs);
}

/// Each circuit in a set gets its own sample count.
pub fn check_run_circuitset_and_measure_n_samples<B: QuantumBackend + ?Sized>(backend: &mut B) {
    backend.reset_counters();
    let results = backend
        .run_circuitset_and_measure(&[indexing_circuit(), all_x_circuit()], &[100, 105])
        .expect("run_circuitset_and_measure");

    assert_eq!(most_frequent(&results[0]), "001");
    assert_eq!(most_frequent(&results[1]), "111");
    assert_eq!(results[0].len(), 100);
    assert_eq!(results[1].len(), 105);
    assert_eq!(backend.counters().number_of_circuits_run, 2);
}

/// Run every sampling check.
pub fn run_backend_suite<B: QuantumBackend + ?Sized>(backend: &mut B) {
    check_run_circuit_and_measure_correct_indexing(backend);
    check_run_circuit_and_measure_rejects_invalid_n_samples(backend);
    check_run_circuit_and_measure_num_measurements(backend);
    check_measurements_have_uniform_width(backend);
    check_run_circuitset_and_measure(backend);
    check_run_circuitset_and_measure_n_samples(backend);
}

// ---------------------------------------------------------------------------
// Simulator checks
// ---------------------------------------------------------------------------

fn assert_close(actual: Complex64, expected: Complex64, atol: f64, what: &str) {
    assert!(
        (actual - expected).norm() <= atol,
        "{what}: expected {expected}, got {actual}"
    );
}

/// The GHZ circuit has amplitude 1/sqrt(2) at indices 0 and 7.
pub fn check_get_wavefunction<S: QuantumSimulator + ?Sized>(simulator: &mut S) {
    simulator.reset_counters();
    let wavefunction = simulator
        .get_wavefunction(&ghz_circuit(), None)
        .expect("get_wavefunction");

    assert_eq!(wavefunction.len(), 8);
    let amplitudes = wavefunction.as_array().expect("numeric wavefunction");
    let expected = Complex64::new(FRAC_1_SQRT_2, 0.0);
    assert_close(amplitudes[0], expected, ATOL_WAVEFUNCTION, "amplitude 0");
    assert_close(amplitudes[7], expected, ATOL_WAVEFUNCTION, "amplitude 7");
    assert_counters(simulator, 1, 1);
}

/// The GHZ circuit splits its mass between 000 and 111.
pub fn check_measurement_outcome_distribution<S: QuantumSimulator + ?Sized>(simulator: &mut S) {
    simulator.reset_counters();
    let distribution = simulator
        .get_measurement_outcome_distribution(&ghz_circuit())
        .expect("get_measurement_outcome_distribution");

    assert_eq!(distribution.get_number_of_subsystems(), 3);
    assert!((distribution.get(&[0, 0, 0]) - 0.5).abs() <= ATOL_WAVEFUNCTION);
    assert!((distribution.get(&[1, 1, 1]) - 0.5).abs() <= ATOL_WAVEFUNCTION);
    assert_counters(simulator, 1, 1);
}

/// `Z0 + 2*Z1` on `[H(0), X(1)]` gives one value per term: `[0, -2]`.
pub fn check_exact_expectation_values<S: QuantumSimulator + ?Sized>(simulator: &mut S) {
    simulator.reset_counters();
    let mut circuit = Circuit::with_size("h_x", 2);
    circuit
        .h(QubitId(0))
        .and_then(|c| c.x(QubitId(1)))
        .expect("circuit is well formed");
    let operator = PauliTerm::z(0, 1.0) + PauliTerm::z(1, 2.0);

    let values = simulator
        .get_exact_expectation_values(&circuit, &operator)
        .expect("get_exact_expectation_values");

    assert_eq!(values.len(), 2);
    assert!(values[0].abs() <= 1e-12, "got {}", values[0]);
    assert!((values[1] + 2.0).abs() <= 1e-12, "got {}", values[1]);
    assert_counters(simulator, 1, 1);
}

/// A supplied initial state replaces the all-zero state.
pub fn check_get_wavefunction_uses_initial_state<S: QuantumSimulator + ?Sized>(simulator: &mut S) {
    let mut circuit = Circuit::with_size("hh", 2);
    circuit
        .h(QubitId(0))
        .and_then(|c| c.h(QubitId(1)))
        .expect("circuit is well formed");
    let initial = Wavefunction::from_real(vec![0.0, 1.0, 0.0, 0.0]).expect("valid state");

    let from_initial = simulator
        .get_wavefunction(&circuit, Some(&initial))
        .expect("get_wavefunction");
    let from_zero = simulator
        .get_wavefunction(&circuit, None)
        .expect("get_wavefunction");

    let from_initial = from_initial.as_array().expect("numeric wavefunction");
    let from_zero = from_zero.as_array().expect("numeric wavefunction");
    for (i, expected) in [0.5, -0.5, 0.5, -0.5].into_iter().enumerate() {
        assert_close(
            from_initial[i],
            Complex64::new(expected, 0.0),
            1e-12,
            "initial state",
        );
        assert_close(from_zero[i], Complex64::new(0.5, 0.0), 1e-12, "zero state");
    }
}

/// Run every exact-extraction check, plus the sampling checks.
pub fn run_simulator_suite<S: QuantumSimulator + ?Sized>(simulator: &mut S) {
    run_backend_suite(simulator);
    check_get_wavefunction(simulator);
    check_measurement_outcome_distribution(simulator);
    check_exact_expectation_values(simulator);
    check_get_wavefunction_uses_initial_state(simulator);
}

// ---------------------------------------------------------------------------
// Gate checks
// ---------------------------------------------------------------------------

/// One gate applied after preparing each qubit with an initial gate.
#[derive(Debug, Clone)]
pub struct GateCase {
    /// Gate applied to qubit `i` before the tested gate.
    pub initial_gates: Vec<&'static str>,
    /// Builtin name of the gate under test.
    pub tested_gate: &'static str,
    /// Parameters of the tested gate.
    pub params: Vec<f64>,
    /// Expected final amplitudes.
    pub target_amplitudes: Vec<Complex64>,
}

impl GateCase {
    fn new(
        initial_gates: &[&'static str],
        tested_gate: &'static str,
        params: &[f64],
        target_amplitudes: Vec<Complex64>,
    ) -> Self {
        Self {
            initial_gates: initial_gates.to_vec(),
            tested_gate,
            params: params.to_vec(),
            target_amplitudes,
        }
    }

    /// Number of qubits the case acts on.
    pub fn num_qubits(&self) -> usize {
        self.initial_gates.len()
    }

    /// Build the circuit for this case.
    pub fn circuit(&self) -> HalResult<Circuit> {
        let n = self.initial_gates.len() as u32;
        let mut circuit = Circuit::with_size(format!("{}_case", self.tested_gate), n);
        for (q, name) in (0..n).zip(&self.initial_gates) {
            circuit.apply(builtin_gate_by_name(name)?.on([QubitId(q)])?)?;
        }
        let mut gate = builtin_gate_by_name(self.tested_gate)?;
        if gate.is_parametric() {
            gate = gate.with_params(self.params.iter().copied())?;
        }
        circuit.apply(gate.on((0..n).map(QubitId))?)?;
        Ok(circuit)
    }

    /// The expected final state.
    pub fn target_wavefunction(&self) -> HalResult<Wavefunction> {
        Ok(Wavefunction::new(self.target_amplitudes.clone())?)
    }
}

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn phase(angle: f64) -> Complex64 {
    Complex64::from_polar(1.0, angle)
}

/// Single-qubit cases, starting from |1> and from |+>.
pub fn one_qubit_gate_cases() -> Vec<GateCase> {
    let r = FRAC_1_SQRT_2;
    let theta = FRAC_PI_2;
    vec![
        GateCase::new(&["x"], "x", &[], vec![c(1.0, 0.0), c(0.0, 0.0)]),
        GateCase::new(&["x"], "y", &[], vec![c(0.0, -1.0), c(0.0, 0.0)]),
        GateCase::new(&["x"], "z", &[], vec![c(0.0, 0.0), c(-1.0, 0.0)]),
        GateCase::new(&["x"], "h", &[], vec![c(r, 0.0), c(-r, 0.0)]),
        GateCase::new(&["x"], "s", &[], vec![c(0.0, 0.0), c(0.0, 1.0)]),
        GateCase::new(&["x"], "t", &[], vec![c(0.0, 0.0), phase(FRAC_PI_4)]),
        GateCase::new(&["h"], "x", &[], vec![c(r, 0.0), c(r, 0.0)]),
        GateCase::new(&["h"], "y", &[], vec![c(0.0, -r), c(0.0, r)]),
        GateCase::new(&["h"], "z", &[], vec![c(r, 0.0), c(-r, 0.0)]),
        GateCase::new(&["h"], "h", &[], vec![c(1.0, 0.0), c(0.0, 0.0)]),
        GateCase::new(&["h"], "s", &[], vec![c(r, 0.0), c(0.0, r)]),
        GateCase::new(&["h"], "t", &[], vec![c(r, 0.0), r * phase(FRAC_PI_4)]),
        GateCase::new(&["x"], "rx", &[theta], vec![c(0.0, -r), c(r, 0.0)]),
        GateCase::new(&["x"], "ry", &[theta], vec![c(-r, 0.0), c(r, 0.0)]),
        GateCase::new(&["x"], "rz", &[theta], vec![c(0.0, 0.0), phase(FRAC_PI_4)]),
        GateCase::new(&["x"], "p", &[theta], vec![c(0.0, 0.0), c(0.0, 1.0)]),
        GateCase::new(&["x"], "u", &[theta, 0.0, PI], vec![c(r, 0.0), c(-r, 0.0)]),
        GateCase::new(&["h"], "rx", &[theta], vec![c(0.5, -0.5), c(0.5, -0.5)]),
        GateCase::new(&["h"], "ry", &[theta], vec![c(0.0, 0.0), c(1.0, 0.0)]),
        GateCase::new(
            &["h"],
            "rz",
            &[theta],
            vec![r * phase(-FRAC_PI_4), r * phase(FRAC_PI_4)],
        ),
        GateCase::new(&["h"], "p", &[theta], vec![c(r, 0.0), c(0.0, r)]),
        GateCase::new(&["h"], "u", &[theta, 0.0, PI], vec![c(1.0, 0.0), c(0.0, 0.0)]),
    ]
}

/// Two-qubit cases; the tested gate acts on qubits (0, 1).
pub fn two_qubit_gate_cases() -> Vec<GateCase> {
    let r = FRAC_1_SQRT_2;
    let theta = FRAC_PI_2;
    let o = c(0.0, 0.0);
    let one = c(1.0, 0.0);
    let i = c(0.0, 1.0);
    let half = c(0.5, 0.0);
    vec![
        GateCase::new(&["id", "x"], "cx", &[], vec![o, one, o, o]),
        GateCase::new(&["x", "id"], "cx", &[], vec![o, o, o, one]),
        GateCase::new(&["x", "x"], "cx", &[], vec![o, o, one, o]),
        GateCase::new(&["h", "h"], "cx", &[], vec![half; 4]),
        GateCase::new(&["id", "x"], "cy", &[], vec![o, one, o, o]),
        GateCase::new(&["x", "id"], "cy", &[], vec![o, o, o, i]),
        GateCase::new(&["x", "x"], "cy", &[], vec![o, o, -i, o]),
        GateCase::new(
            &["h", "h"],
            "cy",
            &[],
            vec![half, half, c(0.0, -0.5), c(0.0, 0.5)],
        ),
        GateCase::new(&["id", "x"], "cz", &[], vec![o, one, o, o]),
        GateCase::new(&["x", "id"], "cz", &[], vec![o, o, one, o]),
        GateCase::new(&["x", "x"], "cz", &[], vec![o, o, o, -one]),
        GateCase::new(&["h", "h"], "cz", &[], vec![half, half, half, -half]),
        GateCase::new(&["id", "x"], "swap", &[], vec![o, o, one, o]),
        GateCase::new(&["x", "id"], "swap", &[], vec![o, one, o, o]),
        GateCase::new(&["x", "x"], "swap", &[], vec![o, o, o, one]),
        GateCase::new(&["h", "h"], "swap", &[], vec![half; 4]),
        GateCase::new(&["id", "x"], "iswap", &[], vec![o, o, i, o]),
        GateCase::new(&["x", "id"], "iswap", &[], vec![o, i, o, o]),
        GateCase::new(&["x", "x"], "iswap", &[], vec![o, o, o, one]),
        GateCase::new(
            &["h", "h"],
            "iswap",
            &[],
            vec![half, c(0.0, 0.5), c(0.0, 0.5), half],
        ),
        GateCase::new(&["id", "x"], "cp", &[theta], vec![o, one, o, o]),
        GateCase::new(&["x", "x"], "cp", &[theta], vec![o, o, o, i]),
        GateCase::new(&["h", "h"], "cp", &[theta], vec![half, half, half, c(0.0, 0.5)]),
        GateCase::new(&["id", "x"], "crz", &[theta], vec![o, one, o, o]),
        GateCase::new(&["x", "id"], "crz", &[theta], vec![o, o, phase(-FRAC_PI_4), o]),
        GateCase::new(&["x", "x"], "crz", &[theta], vec![o, o, o, phase(FRAC_PI_4)]),
        GateCase::new(&["id", "id"], "rxx", &[theta], vec![c(r, 0.0), o, o, c(0.0, -r)]),
        GateCase::new(&["id", "x"], "rxx", &[theta], vec![o, c(r, 0.0), c(0.0, -r), o]),
        GateCase::new(&["id", "id"], "ryy", &[theta], vec![c(r, 0.0), o, o, c(0.0, r)]),
        GateCase::new(&["id", "x"], "ryy", &[theta], vec![o, c(r, 0.0), c(0.0, -r), o]),
        GateCase::new(&["id", "id"], "rzz", &[theta], vec![phase(-FRAC_PI_4), o, o, o]),
        GateCase::new(&["id", "x"], "rzz", &[theta], vec![o, phase(FRAC_PI_4), o, o]),
        GateCase::new(&["x", "x"], "rzz", &[theta], vec![o, o, o, phase(-FRAC_PI_4)]),
    ]
}

fn included(case: &GateCase, gates_to_exclude: &[&str]) -> bool {
    !gates_to_exclude
        .iter()
        .any(|g| g.eq_ignore_ascii_case(case.tested_gate))
}

/// Compare simulated amplitudes of every gate case against its target.
pub fn check_gates_by_amplitudes<S: QuantumSimulator + ?Sized>(
    simulator: &mut S,
    gates_to_exclude: &[&str],
    atol: f64,
) {
    let cases = one_qubit_gate_cases()
        .into_iter()
        .chain(two_qubit_gate_cases())
        .filter(|case| included(case, gates_to_exclude));
    for case in cases {
        let circuit = case.circuit().expect("gate case circuit");
        let wavefunction = simulator
            .get_wavefunction(&circuit, None)
            .expect("get_wavefunction");
        let amplitudes = wavefunction.as_array().expect("numeric wavefunction");

        assert_eq!(amplitudes.len(), case.target_amplitudes.len());
        for (index, (actual, expected)) in amplitudes.iter().zip(&case.target_amplitudes).enumerate() {
            assert_close(
                *actual,
                *expected,
                atol,
                &format!(
                    "{} after {:?}, amplitude {index}",
                    case.tested_gate, case.initial_gates
                ),
            );
        }
    }
}

/// Compare sampled expectation values of every gate case against the
/// exact values of its target state.
///
/// The tolerance is `exp_val_spread` times three standard deviations for
/// single-qubit cases and five for two-qubit cases.
pub fn check_gates_by_expectation_values<B: QuantumBackend + ?Sized>(
    backend: &mut B,
    gates_to_exclude: &[&str],
    exp_val_spread: f64,
) {
    let sigma = 1.0 / (GATE_TEST_SAMPLES as f64).sqrt();
    let one_qubit_operators = ["Z0", "X0", "Y0"];
    let two_qubit_operators = ["Z0", "Z1", "Z0 Z1", "X0 X1", "Y0 Y1"];

    let cases = one_qubit_gate_cases()
        .into_iter()
        .chain(two_qubit_gate_cases())
        .filter(|case| included(case, gates_to_exclude));
    for case in cases {
        let (operators, k): (&[&str], f64) = if case.num_qubits() == 1 {
            (&one_qubit_operators, 3.0)
        } else {
            (&two_qubit_operators, 5.0)
        };
        let circuit = case.circuit().expect("gate case circuit");
        let target = case.target_wavefunction().expect("target state");

        for op in operators {
            let term = PauliTerm::parse(op).expect("valid operator");
            let expected = target.expectation_value(&term).expect("exact value");
            let tasks = [EstimationTask::sampled(
                term,
                circuit.clone(),
                GATE_TEST_SAMPLES,
            )];
            let values = estimate_expectation_values_by_averaging(backend, &tasks)
                .expect("estimate_expectation_values_by_averaging");

            assert!(
                (values[0] - expected).abs() <= exp_val_spread * sigma * k,
                "{} after {:?}: <{op}> estimated {} but expected {expected}",
                case.tested_gate,
                case.initial_gates,
                values[0]
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_case_targets_are_normalized() {
        for case in one_qubit_gate_cases().into_iter().chain(two_qubit_gate_cases()) {
            let norm: f64 = case.target_amplitudes.iter().map(|a| a.norm_sqr()).sum();
            assert!(
                (norm - 1.0).abs() < 1e-12,
                "{} after {:?}",
                case.tested_gate,
                case.initial_gates
            );
            assert_eq!(case.target_amplitudes.len(), 1 << case.num_qubits());
        }
    }

    #[test]
    fn test_gate_case_circuits_build() {
        for case in one_qubit_gate_cases().into_iter().chain(two_qubit_gate_cases()) {
            let circuit = case.circuit().unwrap();
            assert_eq!(circuit.num_qubits(), case.num_qubits());
            assert_eq!(circuit.len(), case.num_qubits() + 1);
        }
    }

    #[test]
    fn test_indexing_circuit_flips_last_qubit() {
        let circuit = indexing_circuit();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.len(), 5);
    }

    #[test]
    fn test_exclusion_ignores_case() {
        let case = &two_qubit_gate_cases()[0];
        assert!(!included(case, &["CX"]));
        assert!(included(case, &["cz"]));
    }
}
