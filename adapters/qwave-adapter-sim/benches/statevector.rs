//! Benchmarks for the local simulators
//!
//! Run with: cargo bench -p qwave-adapter-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qwave_adapter_sim::{SimulatorConfig, StatevectorSimulator, SymbolicSimulator};
use qwave_hal::{QuantumBackend, QuantumSimulator};
use qwave_ir::{Circuit, ParameterExpression, QubitId};

/// Layered circuit of Hadamards, RZ rotations and a CX ladder.
fn layered_circuit(n: u32, layers: usize) -> Circuit {
    let mut circuit = Circuit::with_size("layered", n);
    for layer in 0..layers {
        for q in 0..n {
            circuit.h(QubitId(q)).unwrap();
            circuit.rz(0.1 * (layer + 1) as f64, QubitId(q)).unwrap();
        }
        for q in 0..n - 1 {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
        }
    }
    circuit
}

fn seeded() -> StatevectorSimulator {
    StatevectorSimulator::with_config(SimulatorConfig::default().with_seed(7)).unwrap()
}

/// Benchmark exact wavefunction extraction
fn bench_get_wavefunction(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_wavefunction");

    for num_qubits in &[4u32, 8, 12, 16] {
        let circuit = layered_circuit(*num_qubits, 4);
        group.bench_with_input(
            BenchmarkId::new("statevector", num_qubits),
            &circuit,
            |b, circuit| {
                let mut sim = seeded();
                b.iter(|| sim.get_wavefunction(black_box(circuit), None).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark sampling
fn bench_run_circuit_and_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_circuit_and_measure");
    let circuit = layered_circuit(10, 2);

    for shots in &[100usize, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("shots", shots), shots, |b, &shots| {
            let mut sim = seeded();
            b.iter(|| sim.run_circuit_and_measure(black_box(&circuit), shots).unwrap());
        });
    }

    group.finish();
}

/// Benchmark symbolic propagation of a parameterized layer
fn bench_symbolic(c: &mut Criterion) {
    let mut group = c.benchmark_group("symbolic");

    for num_qubits in &[2u32, 3, 4] {
        let mut circuit = Circuit::with_size("ansatz", *num_qubits);
        for q in 0..*num_qubits {
            circuit
                .ry(ParameterExpression::symbol(format!("theta_{q}")), QubitId(q))
                .unwrap();
        }
        for q in 0..num_qubits - 1 {
            circuit.cx(QubitId(q), QubitId(q + 1)).unwrap();
        }
        group.bench_with_input(
            BenchmarkId::new("ansatz", num_qubits),
            &circuit,
            |b, circuit| {
                let mut sim = SymbolicSimulator::new();
                b.iter(|| sim.get_wavefunction(black_box(circuit), None).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_get_wavefunction,
    bench_run_circuit_and_measure,
    bench_symbolic
);
criterion_main!(benches);
