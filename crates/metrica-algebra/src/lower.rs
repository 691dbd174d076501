//! Lowering expressions into rational functions.
//!
//! Trigonometric and hyperbolic functions of an integer combination
//! `θ = Σ n_k q_k` of coordinates are rewritten through exponentials:
//!
//! ```text
//! cos θ  = (P + P⁻¹)/2      sin θ  = (P − P⁻¹)/(2i)     P = Π Phase(q_k)^n_k
//! cosh θ = (E + E⁻¹)/2      sinh θ = (E − E⁻¹)/2        E = Π Exp(q_k)^n_k
//! exp θ  = E
//! ```
//!
//! so every identity between them (`sin² + cos² = 1`, angle addition, …)
//! holds exactly in the Laurent ring.
//!
//! Arguments must be integer combinations: `Phase(q)` is `e^{iq}`, and a
//! fractional multiple such as `q/2` has no exact representation in the
//! ring. Rescale the coordinate instead (`q = 2w` turns `cos(q/2)` into
//! `cos(w)`).

use crate::coeff;
use crate::error::AlgebraError;
use crate::expr::{Expr, Function};
use crate::monomial::{Atom, Monomial};
use crate::poly::Poly;
use crate::rational::RationalFunction;
use crate::symbol::Symbol;
use num::{One, ToPrimitive};
use std::collections::BTreeSet;

/// Largest exponent magnitude lowering accepts, both for literal powers
/// and for exponents accumulated in intermediate values.
pub const MAX_EXPONENT: i32 = 1024;

/// The symbols an expression may reference.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    symbols: BTreeSet<Symbol>,
}

impl Scope {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }
}

pub fn lower(expr: &Expr, scope: &Scope) -> Result<RationalFunction, AlgebraError> {
    let value = match expr {
        Expr::Num(q) => RationalFunction::constant(coeff::real(q.clone())),
        Expr::Sym(s) if scope.contains(s) => RationalFunction::var(s),
        Expr::Sym(s) => return Err(AlgebraError::UnknownSymbol(s.to_string())),
        Expr::Add(items) => items.iter().try_fold(RationalFunction::zero(), |acc, item| {
            bounded(&acc + &lower(item, scope)?)
        })?,
        Expr::Mul(items) => items.iter().try_fold(RationalFunction::one(), |acc, item| {
            bounded(&acc * &lower(item, scope)?)
        })?,
        Expr::Neg(inner) => -lower(inner, scope)?,
        Expr::Div(num, den) => lower(num, scope)?.checked_div(&lower(den, scope)?)?,
        Expr::Pow(base, n) => {
            if n.unsigned_abs() > MAX_EXPONENT.unsigned_abs() {
                return Err(overflow());
            }
            lower(base, scope)?.powi(*n)?
        }
        Expr::Apply(function, arg) => apply(*function, arg, scope)?,
    };
    bounded(value)
}

fn overflow() -> AlgebraError {
    AlgebraError::ExponentOverflow {
        limit: MAX_EXPONENT,
    }
}

fn bounded(value: RationalFunction) -> Result<RationalFunction, AlgebraError> {
    if value.max_exponent() > MAX_EXPONENT {
        Err(overflow())
    } else {
        Ok(value)
    }
}

fn apply(function: Function, arg: &Expr, scope: &Scope) -> Result<RationalFunction, AlgebraError> {
    let lowered = lower(arg, scope)?;
    let combination = integer_combination(&lowered).ok_or_else(|| {
        AlgebraError::UnsupportedArgument {
            function: function.name().to_string(),
            argument: arg.to_string(),
        }
    })?;
    if combination.iter().any(|(_, n)| n.unsigned_abs() > MAX_EXPONENT.unsigned_abs()) {
        return Err(overflow());
    }
    let real = matches!(
        function,
        Function::Sinh | Function::Cosh | Function::Tanh | Function::Exp
    );
    let generator = combination
        .iter()
        .fold(Monomial::one(), |acc, (symbol, n)| {
            let atom = if real {
                Atom::Exp(symbol.clone())
            } else {
                Atom::Phase(symbol.clone())
            };
            acc.mul(&Monomial::atom(atom, *n))
        });
    let forward = Poly::term(generator.clone(), coeff::integer(1));
    let backward = Poly::term(generator.inverse(), coeff::integer(1));
    let even = (&forward + &backward).scale(&coeff::ratio(1, 2));
    let odd = if real {
        (&forward - &backward).scale(&coeff::ratio(1, 2))
    } else {
        // 1/(2i) = -i/2
        (&forward - &backward).scale(&(coeff::imaginary(-1) * coeff::ratio(1, 2)))
    };
    let even = RationalFunction::from_poly(even);
    let odd = RationalFunction::from_poly(odd);
    match function {
        Function::Exp => Ok(RationalFunction::from_poly(forward)),
        Function::Cos | Function::Cosh => Ok(even),
        Function::Sin | Function::Sinh => Ok(odd),
        Function::Tan | Function::Tanh => odd.checked_div(&even),
    }
}

/// Reads `Σ n_k q_k` with integer `n_k` and no constant term off a lowered
/// argument. Zero is the empty combination.
fn integer_combination(value: &RationalFunction) -> Option<Vec<(Symbol, i32)>> {
    if !value.denominator().as_constant().is_some_and(|c| c.is_one()) {
        return None;
    }
    let mut combination = Vec::new();
    for (monomial, c) in value.numerator().terms() {
        let [(Atom::Var(symbol), 1)] = monomial.factors() else {
            return None;
        };
        if !coeff::is_real(c) || !c.re.is_integer() {
            return None;
        }
        let n = c.re.to_integer().to_i32()?;
        combination.push((symbol.clone(), n));
    }
    Some(combination)
}
