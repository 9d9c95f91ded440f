//! Expectation-value estimation on top of a backend.
//!
//! Each [`EstimationTask`] pairs an operator with the circuit that prepares
//! the state. Exact tasks delegate to the backend's simulator tier. Sampled
//! tasks rotate every X or Y factor into the computational basis, run the
//! rotated circuits as one circuit set, and average the ±1 parity of each
//! term over the bitstrings.

use qwave_ir::{Circuit, QubitId};
use qwave_state::{ExpectationValues, PauliOp, PauliSum, PauliTerm};
use tracing::{debug, instrument};

use crate::backend::QuantumBackend;
use crate::error::{HalError, HalResult};

/// An operator to estimate on the state prepared by a circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationTask {
    /// Operator to estimate.
    pub operator: PauliSum,
    /// Circuit preparing the state.
    pub circuit: Circuit,
    /// Samples to draw, or `None` for an exact value.
    pub number_of_shots: Option<usize>,
}

impl EstimationTask {
    /// Create a task.
    pub fn new(
        operator: impl Into<PauliSum>,
        circuit: Circuit,
        number_of_shots: Option<usize>,
    ) -> Self {
        Self {
            operator: operator.into(),
            circuit,
            number_of_shots,
        }
    }

    /// A task estimated from `shots` samples.
    pub fn sampled(operator: impl Into<PauliSum>, circuit: Circuit, shots: usize) -> Self {
        Self::new(operator, circuit, Some(shots))
    }

    /// A task computed exactly by a simulator.
    pub fn exact(operator: impl Into<PauliSum>, circuit: Circuit) -> Self {
        Self::new(operator, circuit, None)
    }
}

/// Measurement basis of a term: its X and Y factors.
type Basis = Vec<(u32, PauliOp)>;

fn basis_of(term: &PauliTerm) -> Basis {
    term.pauli
        .ops()
        .iter()
        .copied()
        .filter(|(_, op)| matches!(op, PauliOp::X | PauliOp::Y))
        .collect()
}

/// Circuit that maps the eigenbasis of `basis` onto the computational basis.
fn basis_rotation(basis: &Basis, num_qubits: usize) -> HalResult<Circuit> {
    let mut rotation = Circuit::new("basis_rotation");
    for _ in 0..num_qubits {
        rotation.add_qubit();
    }
    for &(q, op) in basis {
        let qubit = QubitId(q);
        if op == PauliOp::Y {
            rotation.sdg(qubit)?;
        }
        rotation.h(qubit)?;
    }
    Ok(rotation)
}

/// Where one sampled group's circuit and terms land.
struct SampledGroup {
    task: usize,
    terms: Vec<PauliTerm>,
}

fn check_task(index: usize, task: &EstimationTask) -> HalResult<()> {
    if task.number_of_shots == Some(0) {
        return Err(HalError::InvalidShots(format!(
            "task {index} requests zero samples"
        )));
    }
    let width = task.operator.min_qubits() as usize;
    if width > task.circuit.num_qubits() {
        return Err(HalError::InvalidCircuit(format!(
            "task {index}: operator acts on {width} qubits but circuit '{}' has {}",
            task.circuit.name(),
            task.circuit.num_qubits()
        )));
    }
    Ok(())
}

/// Estimate every task's expectation value, in task order.
///
/// Tasks with `number_of_shots: None` need a backend that is also a
/// [`QuantumSimulator`](crate::QuantumSimulator); they fail with
/// [`HalError::Unsupported`] otherwise. Sampled estimates carry an
/// uncertainty of order `1/sqrt(shots)`. All tasks are checked before any
/// circuit runs.
#[instrument(skip(backend, tasks), fields(backend = backend.name(), tasks = tasks.len()))]
pub fn estimate_expectation_values_by_averaging<B: QuantumBackend + ?Sized>(
    backend: &mut B,
    tasks: &[EstimationTask],
) -> HalResult<ExpectationValues> {
    for (index, task) in tasks.iter().enumerate() {
        check_task(index, task)?;
    }
    if tasks.iter().any(|t| t.number_of_shots.is_none()) && backend.as_simulator_mut().is_none()
    {
        return Err(HalError::Unsupported(format!(
            "{} cannot compute exact expectation values",
            backend.name()
        )));
    }

    let mut values = vec![0.0; tasks.len()];
    let mut circuits = Vec::new();
    let mut shots = Vec::new();
    let mut groups = Vec::new();

    for (index, task) in tasks.iter().enumerate() {
        let Some(n_shots) = task.number_of_shots else {
            continue;
        };
        let mut by_basis: Vec<(Basis, Vec<PauliTerm>)> = Vec::new();
        for term in task.operator.terms() {
            if term.is_identity() {
                values[index] += term.coefficient;
                continue;
            }
            let basis = basis_of(term);
            match by_basis.iter_mut().find(|(b, _)| *b == basis) {
                Some((_, terms)) => terms.push(term.clone()),
                None => by_basis.push((basis, vec![term.clone()])),
            }
        }
        for (basis, terms) in by_basis {
            let rotation = basis_rotation(&basis, task.circuit.num_qubits())?;
            circuits.push(task.circuit.compose(&rotation));
            shots.push(n_shots);
            groups.push(SampledGroup { task: index, terms });
        }
    }

    if !circuits.is_empty() {
        let results = backend.run_circuitset_and_measure(&circuits, &shots)?;
        for (group, measurements) in groups.iter().zip(&results) {
            for term in &group.terms {
                values[group.task] += measurements.expectation_of_term(term)?;
            }
        }
    }

    for (index, task) in tasks.iter().enumerate() {
        if task.number_of_shots.is_some() {
            continue;
        }
        let simulator = backend.as_simulator_mut().ok_or_else(|| {
            HalError::Unsupported("exact expectation values need a simulator".into())
        })?;
        let exact = simulator.get_exact_expectation_values(&task.circuit, &task.operator)?;
        values[index] = exact.total();
    }

    debug!(
        sampled_circuits = circuits.len(),
        "estimated expectation values"
    );
    Ok(ExpectationValues::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capabilities;
    use crate::counters::RunCounters;
    use qwave_state::Measurements;

    /// Backend whose samples are always the all-zero bitstring.
    struct ZeroBackend {
        capabilities: Capabilities,
        counters: RunCounters,
        seen: Vec<Circuit>,
    }

    impl ZeroBackend {
        fn new() -> Self {
            Self {
                capabilities: Capabilities::simulator(4),
                counters: RunCounters::new(),
                seen: Vec::new(),
            }
        }
    }

    impl QuantumBackend for ZeroBackend {
        fn name(&self) -> &str {
            "zero"
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

        fn measure(&mut self, circuit: &Circuit, n_samples: usize) -> HalResult<Measurements> {
            self.seen.push(circuit.clone());
            Ok(Measurements::new(vec![
                vec![0; circuit.num_qubits()];
                n_samples
            ])?)
        }
    }

    fn two_qubits() -> Circuit {
        Circuit::with_size("prep", 2)
    }

    #[test]
    fn test_terms_sharing_a_basis_share_a_circuit() {
        let mut backend = ZeroBackend::new();
        let operator = PauliTerm::parse("Z0").unwrap()
            + PauliTerm::parse("2*Z1").unwrap()
            + PauliTerm::parse("X0").unwrap()
            + PauliTerm::parse("X0 Z1").unwrap();
        let tasks = [EstimationTask::sampled(operator, two_qubits(), 10)];

        let values = estimate_expectation_values_by_averaging(&mut backend, &tasks).unwrap();

        assert_eq!(values.len(), 1);
        assert!((values[0] - 5.0).abs() < 1e-12);
        assert_eq!(backend.seen.len(), 2);
        assert_eq!(backend.counters().number_of_circuits_run, 2);
    }

    #[test]
    fn test_basis_rotation_gates() {
        let mut backend = ZeroBackend::new();
        let tasks = [EstimationTask::sampled(
            PauliTerm::parse("Y1").unwrap(),
            two_qubits(),
            4,
        )];
        estimate_expectation_values_by_averaging(&mut backend, &tasks).unwrap();

        let names: Vec<&str> = backend.seen[0]
            .instructions()
            .iter()
            .map(|i| i.name())
            .collect();
        assert_eq!(names, vec!["sdg", "h"]);
        assert_eq!(backend.seen[0].num_qubits(), 2);
    }

    #[test]
    fn test_identity_needs_no_circuit() {
        let mut backend = ZeroBackend::new();
        let tasks = [EstimationTask::sampled(
            PauliTerm::identity().with_coefficient(-0.5),
            two_qubits(),
            100,
        )];
        let values = estimate_expectation_values_by_averaging(&mut backend, &tasks).unwrap();
        assert_eq!(values.values(), &[-0.5]);
        assert!(backend.seen.is_empty());
    }

    #[test]
    fn test_results_follow_task_order() {
        let mut backend = ZeroBackend::new();
        let tasks = [
            EstimationTask::sampled(PauliTerm::z(0, 3.0), two_qubits(), 5),
            EstimationTask::sampled(PauliTerm::identity(), two_qubits(), 5),
            EstimationTask::sampled(PauliTerm::z(1, -1.0), two_qubits(), 5),
        ];
        let values = estimate_expectation_values_by_averaging(&mut backend, &tasks).unwrap();
        assert_eq!(values.values(), &[3.0, 1.0, -1.0]);
        assert_eq!(backend.counters().number_of_jobs_run, 2);
    }

    #[test]
    fn test_invalid_tasks_rejected_before_running() {
        let mut backend = ZeroBackend::new();
        let tasks = [
            EstimationTask::sampled(PauliTerm::z(0, 1.0), two_qubits(), 5),
            EstimationTask::sampled(PauliTerm::z(0, 1.0), two_qubits(), 0),
        ];
        let err = estimate_expectation_values_by_averaging(&mut backend, &tasks).unwrap_err();
        assert!(matches!(err, HalError::InvalidShots(_)));

        let wide = [EstimationTask::sampled(PauliTerm::z(5, 1.0), two_qubits(), 5)];
        let err = estimate_expectation_values_by_averaging(&mut backend, &wide).unwrap_err();
        assert!(err.is_validation());
        assert!(backend.seen.is_empty());
    }

    #[test]
    fn test_exact_tasks_need_a_simulator() {
        let mut backend = ZeroBackend::new();
        let tasks = [EstimationTask::exact(PauliTerm::z(0, 1.0), two_qubits())];
        let err = estimate_expectation_values_by_averaging(&mut backend, &tasks).unwrap_err();
        assert!(matches!(err, HalError::Unsupported(_)));
    }
}
