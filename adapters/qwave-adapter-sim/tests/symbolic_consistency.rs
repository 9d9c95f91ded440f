//! Symbolic wavefunctions agree with the statevector once symbols are bound.

use std::collections::HashMap;

use proptest::prelude::*;
use qwave_adapter_sim::{StatevectorSimulator, SymbolicSimulator};
use qwave_hal::QuantumSimulator;
use qwave_ir::{Circuit, ParameterExpression, QubitId, StandardGate};

const QUBITS: u32 = 3;

#[derive(Debug, Clone)]
enum Op {
    H(u32),
    Sx(u32),
    Rx(u32, &'static str),
    Ry(u32, &'static str),
    Rz(u32, &'static str),
    U(u32, &'static str),
    Cx(u32, u32),
    Cy(u32, u32),
    ISwap(u32, u32),
    Crz(u32, u32, &'static str),
    Rzz(u32, u32, &'static str),
}

fn symbol() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("alpha"), Just("beta")]
}

fn pair() -> impl Strategy<Value = (u32, u32)> {
    (0..QUBITS, 1..QUBITS).prop_map(|(a, off)| (a, (a + off) % QUBITS))
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..QUBITS).prop_map(Op::H),
        (0..QUBITS).prop_map(Op::Sx),
        (0..QUBITS, symbol()).prop_map(|(q, s)| Op::Rx(q, s)),
        (0..QUBITS, symbol()).prop_map(|(q, s)| Op::Ry(q, s)),
        (0..QUBITS, symbol()).prop_map(|(q, s)| Op::Rz(q, s)),
        (0..QUBITS, symbol()).prop_map(|(q, s)| Op::U(q, s)),
        pair().prop_map(|(a, b)| Op::Cx(a, b)),
        pair().prop_map(|(a, b)| Op::Cy(a, b)),
        pair().prop_map(|(a, b)| Op::ISwap(a, b)),
        (pair(), symbol()).prop_map(|((a, b), s)| Op::Crz(a, b, s)),
        (pair(), symbol()).prop_map(|((a, b), s)| Op::Rzz(a, b, s)),
    ]
}

fn build(ops: &[Op]) -> Circuit {
    let sym = |s: &str| ParameterExpression::symbol(s);
    let mut circuit = Circuit::with_size("random", QUBITS);
    for op in ops {
        match *op {
            Op::H(q) => circuit.h(QubitId(q)),
            Op::Sx(q) => circuit.gate(StandardGate::SX, [QubitId(q)]),
            Op::Rx(q, s) => circuit.rx(sym(s), QubitId(q)),
            Op::Ry(q, s) => circuit.ry(sym(s), QubitId(q)),
            Op::Rz(q, s) => circuit.rz(sym(s), QubitId(q)),
            Op::U(q, s) => circuit.u(sym(s), 0.4, sym(s), QubitId(q)),
            Op::Cx(a, b) => circuit.cx(QubitId(a), QubitId(b)),
            Op::Cy(a, b) => circuit.gate(StandardGate::CY, [QubitId(a), QubitId(b)]),
            Op::ISwap(a, b) => circuit.gate(StandardGate::ISwap, [QubitId(a), QubitId(b)]),
            Op::Crz(a, b, s) => circuit.gate(StandardGate::CRz(sym(s)), [QubitId(a), QubitId(b)]),
            Op::Rzz(a, b, s) => circuit.gate(StandardGate::RZZ(sym(s)), [QubitId(a), QubitId(b)]),
        }
        .unwrap();
    }
    circuit
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn bound_symbolic_state_matches_statevector(
        ops in prop::collection::vec(arb_op(), 1..8),
        alpha in -3.0_f64..3.0,
        beta in -3.0_f64..3.0,
    ) {
        let circuit = build(&ops);
        let values: HashMap<String, f64> =
            [("alpha".to_string(), alpha), ("beta".to_string(), beta)].into();

        let symbolic = SymbolicSimulator::new().get_wavefunction(&circuit, None).unwrap();
        let bound = symbolic.bind(&values).unwrap();
        let numeric = StatevectorSimulator::new()
            .get_wavefunction(&circuit.bind(&values), None)
            .unwrap();

        let bound = bound.as_array().unwrap();
        let numeric = numeric.as_array().unwrap();
        for (a, b) in bound.iter().zip(numeric.iter()) {
            prop_assert!((a - b).norm() < 1e-9, "{a} != {b}");
        }
    }
}
