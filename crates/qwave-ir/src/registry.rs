//! Builtin gate lookup by name.
//!
//! ```rust
//! use qwave_ir::{builtin_gate_by_name, QubitId};
//! use std::f64::consts::PI;
//!
//! let cnot = builtin_gate_by_name("CNOT").unwrap().on([QubitId(0), QubitId(1)]).unwrap();
//! assert_eq!(cnot.name(), "cx");
//!
//! let rx = builtin_gate_by_name("rx")
//!     .unwrap()
//!     .with_params([PI / 2.0])
//!     .unwrap()
//!     .on([QubitId(0)])
//!     .unwrap();
//! assert_eq!(rx.name(), "rx");
//! ```

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::parameter::ParameterExpression;
use crate::qubit::QubitId;

type Build = fn(Vec<ParameterExpression>) -> StandardGate;

/// Constructor returned by [`builtin_gate_by_name`].
#[derive(Debug, Clone)]
pub enum GateFactory {
    /// A gate that is ready to be applied to qubits.
    Fixed(StandardGate),
    /// A gate that needs its parameters before it can be applied.
    Parametric {
        /// Canonical gate name.
        name: &'static str,
        /// Number of parameters the gate takes.
        num_params: usize,
        /// Builds the gate from exactly `num_params` parameters.
        build: Build,
    },
}

impl GateFactory {
    /// Canonical gate name.
    pub fn name(&self) -> &'static str {
        match self {
            GateFactory::Fixed(g) => g.name(),
            GateFactory::Parametric { name, .. } => name,
        }
    }

    /// True if parameters are still required.
    pub fn is_parametric(&self) -> bool {
        matches!(self, GateFactory::Parametric { .. })
    }

    /// Supply gate parameters, returning a fixed factory.
    pub fn with_params<P>(&self, params: impl IntoIterator<Item = P>) -> IrResult<GateFactory>
    where
        P: Into<ParameterExpression>,
    {
        let params: Vec<ParameterExpression> = params.into_iter().map(Into::into).collect();
        let expected = match self {
            GateFactory::Fixed(_) => 0,
            GateFactory::Parametric { num_params, .. } => *num_params,
        };
        if params.len() != expected {
            return Err(IrError::ParameterCountMismatch {
                gate_name: self.name().to_string(),
                expected,
                got: params.len(),
            });
        }
        match self {
            GateFactory::Fixed(g) => Ok(GateFactory::Fixed(g.clone())),
            GateFactory::Parametric { build, .. } => Ok(GateFactory::Fixed(build(params))),
        }
    }

    /// Apply the gate to qubits.
    pub fn on(&self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<Instruction> {
        match self {
            GateFactory::Fixed(g) => Instruction::new(g.clone(), qubits),
            GateFactory::Parametric { name, .. } => {
                Err(IrError::MissingParameters((*name).to_string()))
            }
        }
    }
}

fn first(params: Vec<ParameterExpression>) -> ParameterExpression {
    params
        .into_iter()
        .next()
        .unwrap_or(ParameterExpression::Constant(0.0))
}

fn fixed(gate: StandardGate) -> IrResult<GateFactory> {
    Ok(GateFactory::Fixed(gate))
}

fn single_param(name: &'static str, build: Build) -> IrResult<GateFactory> {
    Ok(GateFactory::Parametric {
        name,
        num_params: 1,
        build,
    })
}

/// Look up a builtin gate by name, ignoring case.
///
/// Unknown names produce [`IrError::UnknownGate`].
pub fn builtin_gate_by_name(name: &str) -> IrResult<GateFactory> {
    match name.to_ascii_lowercase().as_str() {
        "i" | "id" => fixed(StandardGate::I),
        "x" => fixed(StandardGate::X),
        "y" => fixed(StandardGate::Y),
        "z" => fixed(StandardGate::Z),
        "h" => fixed(StandardGate::H),
        "s" => fixed(StandardGate::S),
        "sdg" => fixed(StandardGate::Sdg),
        "t" => fixed(StandardGate::T),
        "tdg" => fixed(StandardGate::Tdg),
        "sx" => fixed(StandardGate::SX),
        "cx" | "cnot" => fixed(StandardGate::CX),
        "cy" => fixed(StandardGate::CY),
        "cz" => fixed(StandardGate::CZ),
        "swap" => fixed(StandardGate::Swap),
        "iswap" => fixed(StandardGate::ISwap),
        "ccx" | "toffoli" | "ccnot" => fixed(StandardGate::CCX),
        "rx" => single_param("rx", |p| StandardGate::Rx(first(p))),
        "ry" => single_param("ry", |p| StandardGate::Ry(first(p))),
        "rz" => single_param("rz", |p| StandardGate::Rz(first(p))),
        "p" | "phase" => single_param("p", |p| StandardGate::P(first(p))),
        "cp" | "cphase" => single_param("cp", |p| StandardGate::CP(first(p))),
        "crz" => single_param("crz", |p| StandardGate::CRz(first(p))),
        "rxx" | "xx" => single_param("rxx", |p| StandardGate::RXX(first(p))),
        "ryy" | "yy" => single_param("ryy", |p| StandardGate::RYY(first(p))),
        "rzz" | "zz" => single_param("rzz", |p| StandardGate::RZZ(first(p))),
        "u" | "u3" => Ok(GateFactory::Parametric {
            name: "u",
            num_params: 3,
            build: |p| {
                let mut p = p.into_iter();
                let theta = p.next().unwrap_or(ParameterExpression::Constant(0.0));
                let phi = p.next().unwrap_or(ParameterExpression::Constant(0.0));
                let lambda = p.next().unwrap_or(ParameterExpression::Constant(0.0));
                StandardGate::U(theta, phi, lambda)
            },
        }),
        _ => Err(IrError::UnknownGate(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(builtin_gate_by_name("H").unwrap().name(), "h");
        assert_eq!(builtin_gate_by_name("cnot").unwrap().name(), "cx");
        assert_eq!(builtin_gate_by_name("CNOT").unwrap().name(), "cx");
    }

    #[test]
    fn test_unknown_gate_is_lookup_error() {
        let err = builtin_gate_by_name("not-a-gate").unwrap_err();
        assert!(err.is_lookup());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_fixed_gate_applies_directly() {
        let inst = builtin_gate_by_name("cz")
            .unwrap()
            .on([QubitId(0), QubitId(2)])
            .unwrap();
        assert_eq!(inst.qubits, vec![QubitId(0), QubitId(2)]);
    }

    #[test]
    fn test_parametric_gate_requires_params() {
        let rx = builtin_gate_by_name("RX").unwrap();
        assert!(rx.is_parametric());
        let err = rx.on([QubitId(0)]).unwrap_err();
        assert!(matches!(err, IrError::MissingParameters(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn test_parameter_arity_checked() {
        let err = builtin_gate_by_name("rz")
            .unwrap()
            .with_params([1.0, 2.0])
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::ParameterCountMismatch {
                expected: 1,
                got: 2,
                ..
            }
        ));

        let err = builtin_gate_by_name("x")
            .unwrap()
            .with_params([1.0])
            .unwrap_err();
        assert!(matches!(err, IrError::ParameterCountMismatch { expected: 0, .. }));
    }

    #[test]
    fn test_u_gate_takes_three_params() {
        let inst = builtin_gate_by_name("U3")
            .unwrap()
            .with_params([0.1, 0.2, 0.3])
            .unwrap()
            .on([QubitId(0)])
            .unwrap();
        match inst.gate {
            crate::gate::GateKind::Standard(StandardGate::U(a, b, c)) => {
                assert_eq!(a.as_f64(), Some(0.1));
                assert_eq!(b.as_f64(), Some(0.2));
                assert_eq!(c.as_f64(), Some(0.3));
            }
            other => panic!("unexpected gate {other:?}"),
        }
    }

    #[test]
    fn test_symbolic_parameters_accepted() {
        let inst = builtin_gate_by_name("ry")
            .unwrap()
            .with_params([ParameterExpression::symbol("theta")])
            .unwrap()
            .on([QubitId(1)])
            .unwrap();
        assert!(inst.gate.symbols().contains("theta"));
    }

    #[test]
    fn test_qubit_arity_checked() {
        let err = builtin_gate_by_name("swap")
            .unwrap()
            .on([QubitId(0)])
            .unwrap_err();
        assert!(err.is_validation());
    }
}
