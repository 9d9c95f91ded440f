//! Symbolic complex amplitudes.
//!
//! An [`Amplitude`] is a small expression tree over complex constants and
//! real-valued symbols. Symbolic wavefunctions store one tree per basis
//! state; binding every symbol folds the tree back into a constant.

use num_complex::Complex64;
use qwave_ir::ParameterExpression;
use std::collections::{BTreeSet, HashMap};
use std::f64::consts::PI;
use std::fmt;

/// A complex-valued expression over real symbols.
#[derive(Debug, Clone, PartialEq)]
pub enum Amplitude {
    /// A complex constant.
    Constant(Complex64),
    /// A free real symbol.
    Symbol(String),
    /// Negation.
    Neg(Box<Amplitude>),
    /// Sum.
    Add(Box<Amplitude>, Box<Amplitude>),
    /// Difference.
    Sub(Box<Amplitude>, Box<Amplitude>),
    /// Product.
    Mul(Box<Amplitude>, Box<Amplitude>),
    /// Quotient.
    Div(Box<Amplitude>, Box<Amplitude>),
    /// Cosine.
    Cos(Box<Amplitude>),
    /// Sine.
    Sin(Box<Amplitude>),
    /// Complex exponential.
    Exp(Box<Amplitude>),
    /// Complex conjugate.
    Conj(Box<Amplitude>),
}

impl Amplitude {
    /// The constant zero.
    pub fn zero() -> Self {
        Amplitude::Constant(Complex64::new(0.0, 0.0))
    }

    /// The constant one.
    pub fn one() -> Self {
        Amplitude::Constant(Complex64::new(1.0, 0.0))
    }

    /// The imaginary unit.
    pub fn i() -> Self {
        Amplitude::Constant(Complex64::new(0.0, 1.0))
    }

    /// A complex constant.
    pub fn constant(value: Complex64) -> Self {
        Amplitude::Constant(value)
    }

    /// A free real symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        Amplitude::Symbol(name.into())
    }

    /// `cos(self)`.
    pub fn cos(self) -> Self {
        Amplitude::Cos(Box::new(self))
    }

    /// `sin(self)`.
    pub fn sin(self) -> Self {
        Amplitude::Sin(Box::new(self))
    }

    /// `exp(self)`.
    pub fn exp(self) -> Self {
        Amplitude::Exp(Box::new(self))
    }

    /// Complex conjugate.
    pub fn conj(self) -> Self {
        Amplitude::Conj(Box::new(self))
    }

    /// True if the expression contains at least one symbol.
    pub fn is_symbolic(&self) -> bool {
        match self {
            Amplitude::Constant(_) => false,
            Amplitude::Symbol(_) => true,
            Amplitude::Neg(e)
            | Amplitude::Cos(e)
            | Amplitude::Sin(e)
            | Amplitude::Exp(e)
            | Amplitude::Conj(e) => e.is_symbolic(),
            Amplitude::Add(a, b)
            | Amplitude::Sub(a, b)
            | Amplitude::Mul(a, b)
            | Amplitude::Div(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// All symbol names, sorted.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.collect_symbols(&mut set);
        set
    }

    pub(crate) fn collect_symbols(&self, set: &mut BTreeSet<String>) {
        match self {
            Amplitude::Constant(_) => {}
            Amplitude::Symbol(name) => {
                set.insert(name.clone());
            }
            Amplitude::Neg(e)
            | Amplitude::Cos(e)
            | Amplitude::Sin(e)
            | Amplitude::Exp(e)
            | Amplitude::Conj(e) => e.collect_symbols(set),
            Amplitude::Add(a, b)
            | Amplitude::Sub(a, b)
            | Amplitude::Mul(a, b)
            | Amplitude::Div(a, b) => {
                a.collect_symbols(set);
                b.collect_symbols(set);
            }
        }
    }

    /// Numeric value, or `None` while symbols remain or on division by zero.
    pub fn evaluate(&self) -> Option<Complex64> {
        Some(match self {
            Amplitude::Constant(c) => *c,
            Amplitude::Symbol(_) => return None,
            Amplitude::Neg(e) => -e.evaluate()?,
            Amplitude::Add(a, b) => a.evaluate()? + b.evaluate()?,
            Amplitude::Sub(a, b) => a.evaluate()? - b.evaluate()?,
            Amplitude::Mul(a, b) => a.evaluate()? * b.evaluate()?,
            Amplitude::Div(a, b) => {
                let divisor = b.evaluate()?;
                if divisor.norm_sqr() == 0.0 {
                    return None;
                }
                a.evaluate()? / divisor
            }
            Amplitude::Cos(e) => e.evaluate()?.cos(),
            Amplitude::Sin(e) => e.evaluate()?.sin(),
            Amplitude::Exp(e) => e.evaluate()?.exp(),
            Amplitude::Conj(e) => e.evaluate()?.conj(),
        })
    }

    /// Replace every symbol present in `values`, then simplify.
    pub fn substitute(&self, values: &HashMap<String, f64>) -> Self {
        self.replace_symbols(values).simplify()
    }

    fn replace_symbols(&self, values: &HashMap<String, f64>) -> Self {
        use Amplitude as A;
        let r = |e: &Amplitude| Box::new(e.replace_symbols(values));
        match self {
            A::Constant(_) => self.clone(),
            A::Symbol(name) => values
                .get(name)
                .map_or_else(|| self.clone(), |v| A::Constant(Complex64::new(*v, 0.0))),
            A::Neg(e) => A::Neg(r(e)),
            A::Add(a, b) => A::Add(r(a), r(b)),
            A::Sub(a, b) => A::Sub(r(a), r(b)),
            A::Mul(a, b) => A::Mul(r(a), r(b)),
            A::Div(a, b) => A::Div(r(a), r(b)),
            A::Cos(e) => A::Cos(r(e)),
            A::Sin(e) => A::Sin(r(e)),
            A::Exp(e) => A::Exp(r(e)),
            A::Conj(e) => A::Conj(r(e)),
        }
    }

    /// Fold constants and drop additive zeros and multiplicative ones.
    pub fn simplify(&self) -> Self {
        use Amplitude as A;
        if let Some(c) = self.evaluate() {
            return A::Constant(c);
        }
        let simplified = match self {
            A::Neg(e) => match e.simplify() {
                A::Neg(inner) => *inner,
                other => A::Neg(Box::new(other)),
            },
            A::Add(a, b) => {
                let (a, b) = (a.simplify(), b.simplify());
                match (a.is_zero(), b.is_zero()) {
                    (true, _) => b,
                    (_, true) => a,
                    _ => A::Add(Box::new(a), Box::new(b)),
                }
            }
            A::Sub(a, b) => {
                let (a, b) = (a.simplify(), b.simplify());
                match (a.is_zero(), b.is_zero()) {
                    (_, true) => a,
                    (true, _) => A::Neg(Box::new(b)),
                    _ => A::Sub(Box::new(a), Box::new(b)),
                }
            }
            A::Mul(a, b) => {
                let (a, b) = (a.simplify(), b.simplify());
                if a.is_zero() || b.is_zero() {
                    A::zero()
                } else if a.is_one() {
                    b
                } else if b.is_one() {
                    a
                } else {
                    A::Mul(Box::new(a), Box::new(b))
                }
            }
            A::Div(a, b) => {
                let (a, b) = (a.simplify(), b.simplify());
                if a.is_zero() {
                    A::zero()
                } else if b.is_one() {
                    a
                } else {
                    A::Div(Box::new(a), Box::new(b))
                }
            }
            A::Cos(e) => A::Cos(Box::new(e.simplify())),
            A::Sin(e) => A::Sin(Box::new(e.simplify())),
            A::Exp(e) => A::Exp(Box::new(e.simplify())),
            A::Conj(e) => e.conjugated().simplify(),
            A::Constant(_) | A::Symbol(_) => self.clone(),
        };
        // Dropping a zero product can leave a symbol-free tree.
        match simplified.evaluate() {
            Some(c) => A::Constant(c),
            None => simplified,
        }
    }

    /// Push a conjugation through the tree. Symbols are real.
    fn conjugated(&self) -> Self {
        use Amplitude as A;
        let c = |e: &Amplitude| Box::new(e.conjugated());
        match self {
            A::Constant(v) => A::Constant(v.conj()),
            A::Symbol(_) => self.clone(),
            A::Neg(e) => A::Neg(c(e)),
            A::Add(a, b) => A::Add(c(a), c(b)),
            A::Sub(a, b) => A::Sub(c(a), c(b)),
            A::Mul(a, b) => A::Mul(c(a), c(b)),
            A::Div(a, b) => A::Div(c(a), c(b)),
            A::Cos(e) => A::Cos(c(e)),
            A::Sin(e) => A::Sin(c(e)),
            A::Exp(e) => A::Exp(c(e)),
            A::Conj(e) => (**e).clone(),
        }
    }

    /// `|self|^2` as an expression.
    pub fn norm_sqr(&self) -> Self {
        match self.evaluate() {
            Some(c) => Amplitude::Constant(Complex64::new(c.norm_sqr(), 0.0)),
            None => (self.clone() * self.conjugated()).simplify(),
        }
    }

    fn is_zero(&self) -> bool {
        matches!(self, Amplitude::Constant(c) if c.norm_sqr() == 0.0)
    }

    fn is_one(&self) -> bool {
        matches!(self, Amplitude::Constant(c) if *c == Complex64::new(1.0, 0.0))
    }
}

/// Render a complex number, suffixing the imaginary part with `j`.
pub(crate) fn format_complex(c: Complex64) -> String {
    if c.im == 0.0 {
        format!("{}", c.re)
    } else if c.re == 0.0 {
        format!("{}j", c.im)
    } else {
        let sign = if c.im < 0.0 { '-' } else { '+' };
        format!("({}{}{}j)", c.re, sign, c.im.abs())
    }
}

impl fmt::Display for Amplitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amplitude::Constant(c) => write!(f, "{}", format_complex(*c)),
            Amplitude::Symbol(name) => write!(f, "{name}"),
            Amplitude::Neg(e) => write!(f, "-({e})"),
            Amplitude::Add(a, b) => write!(f, "({a} + {b})"),
            Amplitude::Sub(a, b) => write!(f, "({a} - {b})"),
            Amplitude::Mul(a, b) => write!(f, "{a}*{b}"),
            Amplitude::Div(a, b) => write!(f, "{a}/{b}"),
            Amplitude::Cos(e) => write!(f, "cos({e})"),
            Amplitude::Sin(e) => write!(f, "sin({e})"),
            Amplitude::Exp(e) => write!(f, "exp({e})"),
            Amplitude::Conj(e) => write!(f, "conjugate({e})"),
        }
    }
}

impl From<f64> for Amplitude {
    fn from(value: f64) -> Self {
        Amplitude::Constant(Complex64::new(value, 0.0))
    }
}

impl From<Complex64> for Amplitude {
    fn from(value: Complex64) -> Self {
        Amplitude::Constant(value)
    }
}

impl From<&ParameterExpression> for Amplitude {
    fn from(expr: &ParameterExpression) -> Self {
        use ParameterExpression as P;
        let b = |e: &ParameterExpression| Box::new(Amplitude::from(e));
        match expr {
            P::Constant(v) => Amplitude::from(*v),
            P::Pi => Amplitude::from(PI),
            P::Symbol(name) => Amplitude::Symbol(name.clone()),
            P::Neg(e) => Amplitude::Neg(b(e)),
            P::Add(x, y) => Amplitude::Add(b(x), b(y)),
            P::Sub(x, y) => Amplitude::Sub(b(x), b(y)),
            P::Mul(x, y) => Amplitude::Mul(b(x), b(y)),
            P::Div(x, y) => Amplitude::Div(b(x), b(y)),
        }
    }
}

impl From<ParameterExpression> for Amplitude {
    fn from(expr: ParameterExpression) -> Self {
        Amplitude::from(&expr)
    }
}

impl std::ops::Add for Amplitude {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amplitude::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for Amplitude {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amplitude::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for Amplitude {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Amplitude::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for Amplitude {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Amplitude::Div(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for Amplitude {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amplitude::Neg(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theta() -> Amplitude {
        Amplitude::symbol("theta")
    }

    #[test]
    fn test_constant_folding() {
        let expr = Amplitude::from(2.0) * Amplitude::i() + Amplitude::from(1.0);
        assert_eq!(expr.simplify(), Amplitude::Constant(Complex64::new(1.0, 2.0)));
    }

    #[test]
    fn test_zero_product_collapses() {
        let expr = Amplitude::zero() * theta().cos() + Amplitude::from(0.5);
        assert_eq!(expr.simplify(), Amplitude::from(0.5));
        assert!(!expr.simplify().is_symbolic());
    }

    #[test]
    fn test_folds_constants_left_by_zero_product() {
        let expr = (Amplitude::zero() * theta() + Amplitude::from(2.0)) * Amplitude::from(0.25);
        assert_eq!(expr.simplify(), Amplitude::from(0.5));
    }

    #[test]
    fn test_substitute_and_evaluate() {
        let expr = (theta() / Amplitude::from(2.0)).cos();
        assert_eq!(expr.evaluate(), None);

        let bound = expr.substitute(&HashMap::from([("theta".to_string(), PI)]));
        let value = bound.evaluate().unwrap();
        assert!(value.norm() < 1e-12);
    }

    #[test]
    fn test_free_symbols_sorted() {
        let expr = Amplitude::symbol("phi") * Amplitude::symbol("alpha").exp();
        let symbols: Vec<_> = expr.free_symbols().into_iter().collect();
        assert_eq!(symbols, vec!["alpha", "phi"]);
    }

    #[test]
    fn test_norm_sqr_of_phase_is_one() {
        let phase = (Amplitude::i() * theta()).exp();
        let norm = phase
            .norm_sqr()
            .substitute(&HashMap::from([("theta".to_string(), 0.7)]))
            .evaluate()
            .unwrap();
        assert!((norm.re - 1.0).abs() < 1e-12);
        assert!(norm.im.abs() < 1e-12);
    }

    #[test]
    fn test_from_parameter_expression() {
        let param = ParameterExpression::symbol("t") * ParameterExpression::pi();
        let amp = Amplitude::from(&param);
        let value = amp
            .substitute(&HashMap::from([("t".to_string(), 0.5)]))
            .evaluate()
            .unwrap();
        assert!((value.re - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_display_uses_j_suffix() {
        assert_eq!(Amplitude::i().to_string(), "1j");
        assert_eq!(
            Amplitude::Constant(Complex64::new(0.5, -0.5)).to_string(),
            "(0.5-0.5j)"
        );
        assert_eq!(theta().cos().to_string(), "cos(theta)");
    }

    #[test]
    fn test_division_by_zero_does_not_evaluate() {
        let expr = Amplitude::one() / Amplitude::zero();
        assert_eq!(expr.evaluate(), None);
    }
}
