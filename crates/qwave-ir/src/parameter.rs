//! Real-valued parameter expressions for parametric gates.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::f64::consts::PI;
use std::fmt;

/// A symbolic or concrete gate parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A free symbol.
    Symbol(String),
    /// The constant π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Subtraction.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Multiplication.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Division.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Create a π constant.
    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    /// Check if this expression contains any symbols.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Evaluate to a concrete value, or `None` while symbols remain.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Neg(e) => e.as_f64().map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.as_f64()? + b.as_f64()?),
            ParameterExpression::Sub(a, b) => Some(a.as_f64()? - b.as_f64()?),
            ParameterExpression::Mul(a, b) => Some(a.as_f64()? * b.as_f64()?),
            ParameterExpression::Div(a, b) => {
                let divisor = b.as_f64()?;
                if divisor == 0.0 {
                    return None;
                }
                Some(a.as_f64()? / divisor)
            }
        }
    }

    /// All symbol names in this expression, sorted.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.collect_symbols(&mut set);
        set
    }

    pub(crate) fn collect_symbols(&self, set: &mut BTreeSet<String>) {
        match self {
            ParameterExpression::Constant(_) | ParameterExpression::Pi => {}
            ParameterExpression::Symbol(name) => {
                set.insert(name.clone());
            }
            ParameterExpression::Neg(e) => e.collect_symbols(set),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => {
                a.collect_symbols(set);
                b.collect_symbols(set);
            }
        }
    }

    /// Bind one symbol to a value, returning a new expression.
    pub fn bind(&self, name: &str, value: f64) -> Self {
        self.map_symbols(&|n| (n == name).then_some(value))
    }

    /// Bind every symbol present in `values`; others stay free.
    pub fn bind_all(&self, values: &HashMap<String, f64>) -> Self {
        self.map_symbols(&|n| values.get(n).copied())
    }

    fn map_symbols(&self, lookup: &dyn Fn(&str) -> Option<f64>) -> Self {
        use ParameterExpression as P;
        match self {
            P::Symbol(n) => lookup(n).map_or_else(|| self.clone(), P::Constant),
            P::Constant(_) | P::Pi => self.clone(),
            P::Neg(e) => P::Neg(Box::new(e.map_symbols(lookup))),
            P::Add(a, b) => P::Add(Box::new(a.map_symbols(lookup)), Box::new(b.map_symbols(lookup))),
            P::Sub(a, b) => P::Sub(Box::new(a.map_symbols(lookup)), Box::new(b.map_symbols(lookup))),
            P::Mul(a, b) => P::Mul(Box::new(a.map_symbols(lookup)), Box::new(b.map_symbols(lookup))),
            P::Div(a, b) => P::Div(Box::new(a.map_symbols(lookup)), Box::new(b.map_symbols(lookup))),
        }
    }

    /// Fold constant subexpressions.
    pub fn simplify(&self) -> Self {
        use ParameterExpression as P;
        if let Some(v) = self.as_f64() {
            return P::Constant(v);
        }
        match self {
            P::Neg(e) => P::Neg(Box::new(e.simplify())),
            P::Add(a, b) => P::Add(Box::new(a.simplify()), Box::new(b.simplify())),
            P::Sub(a, b) => P::Sub(Box::new(a.simplify()), Box::new(b.simplify())),
            P::Mul(a, b) => P::Mul(Box::new(a.simplify()), Box::new(b.simplify())),
            P::Div(a, b) => P::Div(Box::new(a.simplify()), Box::new(b.simplify())),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Pi => write!(f, "pi"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<i32> for ParameterExpression {
    fn from(value: i32) -> Self {
        ParameterExpression::Constant(f64::from(value))
    }
}

impl std::ops::Add for ParameterExpression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for ParameterExpression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ParameterExpression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for ParameterExpression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        ParameterExpression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for ParameterExpression {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        ParameterExpression::Div(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let p = ParameterExpression::constant(1.5);
        assert!(!p.is_symbolic());
        assert_eq!(p.as_f64(), Some(1.5));
    }

    #[test]
    fn test_symbol() {
        let p = ParameterExpression::symbol("theta");
        assert!(p.is_symbolic());
        assert_eq!(p.as_f64(), None);
        assert!(p.symbols().contains("theta"));
    }

    #[test]
    fn test_bind() {
        let p = ParameterExpression::symbol("theta") / ParameterExpression::constant(2.0);
        let bound = p.bind("theta", PI);
        assert!(!bound.is_symbolic());
        assert!((bound.as_f64().unwrap() - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_bind_all_leaves_unknown_symbols_free() {
        let p = ParameterExpression::symbol("a") + ParameterExpression::symbol("b");
        let values = HashMap::from([("a".to_string(), 1.0)]);
        let partially = p.bind_all(&values);
        assert!(partially.is_symbolic());
        assert_eq!(partially.symbols().into_iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_simplify_keeps_symbolic_branches() {
        let p = (ParameterExpression::constant(2.0) * ParameterExpression::pi())
            + ParameterExpression::symbol("x");
        match p.simplify() {
            ParameterExpression::Add(a, b) => {
                assert_eq!(a.as_f64(), Some(2.0 * PI));
                assert_eq!(*b, ParameterExpression::symbol("x"));
            }
            other => panic!("unexpected simplification: {other}"),
        }
    }

    #[test]
    fn test_division_by_zero_does_not_evaluate() {
        let p = ParameterExpression::constant(1.0) / ParameterExpression::constant(0.0);
        assert_eq!(p.as_f64(), None);
    }
}
