//! Rational functions: the values every pipeline stage computes with.

use crate::coeff::{self, Coeff};
use crate::error::AlgebraError;
use crate::gcd::gcd;
use crate::monomial::Atom;
use crate::poly::Poly;
use crate::symbol::Symbol;
use num::One;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A quotient `num / den` of Laurent polynomials.
///
/// Every constructor normalizes units out of the denominator: Laurent
/// atoms are shifted to minimum exponent zero, variable monomials shared
/// with the numerator are divided out, and the denominator is made monic.
/// Common polynomial factors are only removed by [`RationalFunction::cancel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationalFunction {
    num: Poly,
    den: Poly,
}

impl RationalFunction {
    pub fn zero() -> Self {
        Self::from_poly(Poly::zero())
    }

    pub fn one() -> Self {
        Self::from_poly(Poly::one())
    }

    pub fn integer(n: i64) -> Self {
        Self::constant(coeff::integer(n))
    }

    pub fn constant(c: Coeff) -> Self {
        Self::from_poly(Poly::constant(c))
    }

    pub fn var(symbol: &Symbol) -> Self {
        Self::from_poly(Poly::var(symbol))
    }

    pub fn from_poly(num: Poly) -> Self {
        Self::from_parts(num, Poly::one())
    }

    pub fn new(num: Poly, den: Poly) -> Result<Self, AlgebraError> {
        if den.is_zero() {
            return Err(AlgebraError::DivisionByZero);
        }
        Ok(Self::from_parts(num, den))
    }

    /// `den` must be non-zero.
    fn from_parts(num: Poly, den: Poly) -> Self {
        Self { num, den }.normalized()
    }

    pub fn numerator(&self) -> &Poly {
        &self.num
    }

    pub fn denominator(&self) -> &Poly {
        &self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn max_exponent(&self) -> i32 {
        self.num.max_exponent().max(self.den.max_exponent())
    }

    pub fn is_polynomial(&self) -> bool {
        self.den.is_constant()
    }

    pub fn as_constant(&self) -> Option<Coeff> {
        if self.is_polynomial() {
            self.num.as_constant()
        } else {
            None
        }
    }

    pub fn scale(&self, c: &Coeff) -> Self {
        Self::from_parts(self.num.scale(c), self.den.clone())
    }

    pub fn recip(&self) -> Result<Self, AlgebraError> {
        Self::new(self.den.clone(), self.num.clone())
    }

    pub fn checked_div(&self, rhs: &Self) -> Result<Self, AlgebraError> {
        Ok(self * &rhs.recip()?)
    }

    pub fn powi(&self, n: i32) -> Result<Self, AlgebraError> {
        let base = if n < 0 { self.recip()? } else { self.clone() };
        let n = n.unsigned_abs();
        Ok(Self::from_parts(base.num.pow(n), base.den.pow(n)))
    }

    /// Partial derivative by the quotient rule.
    pub fn derivative(&self, symbol: &Symbol) -> Self {
        let dn = self.num.derivative(symbol);
        if self.den.is_constant() {
            return Self::from_parts(dn, self.den.clone());
        }
        let dd = self.den.derivative(symbol);
        let num = &(&dn * &self.den) - &(&self.num * &dd);
        Self::from_parts(num, self.den.pow(2))
    }

    /// Exact equality of the represented values.
    pub fn equivalent(&self, other: &Self) -> bool {
        (&(&self.num * &other.den) - &(&other.num * &self.den)).is_zero()
    }

    /// Removes the polynomial gcd of numerator and denominator, giving the
    /// canonical form: equal values cancel to structurally equal fractions.
    pub fn cancel(&self) -> Self {
        if self.num.is_zero() || self.den.is_constant() {
            return self.clone();
        }
        let shift = self.num.content_monomial().filter(Atom::is_laurent);
        let num = self.num.mul_monomial(&shift.inverse());
        let common = gcd(&num, &self.den);
        if common.is_constant() {
            return self.clone();
        }
        let num = num.div_rem(&common).0.mul_monomial(&shift);
        let den = self.den.div_rem(&common).0;
        Self::from_parts(num, den)
    }

    fn normalized(self) -> Self {
        let Self { mut num, mut den } = self;
        if num.is_zero() {
            return Self {
                num,
                den: Poly::one(),
            };
        }
        let den_content = den.content_monomial();
        let shared_vars = num
            .content_monomial()
            .filter(|a| !a.is_laurent())
            .meet(&den_content.filter(|a| !a.is_laurent()));
        let shift = den_content.filter(Atom::is_laurent).mul(&shared_vars);
        if !shift.is_one() {
            let inverse = shift.inverse();
            num = num.mul_monomial(&inverse);
            den = den.mul_monomial(&inverse);
        }
        let lead = den.leading_coeff();
        if !lead.is_one() {
            let inverse = Coeff::one() / lead;
            num = num.scale(&inverse);
            den = den.scale(&inverse);
        }
        Self { num, den }
    }
}

impl<'b> Add<&'b RationalFunction> for &RationalFunction {
    type Output = RationalFunction;

    fn add(self, rhs: &'b RationalFunction) -> RationalFunction {
        if self.is_zero() {
            return rhs.clone();
        }
        if rhs.is_zero() {
            return self.clone();
        }
        if self.den == rhs.den {
            return RationalFunction::from_parts(&self.num + &rhs.num, self.den.clone());
        }
        let num = &(&self.num * &rhs.den) + &(&rhs.num * &self.den);
        RationalFunction::from_parts(num, &self.den * &rhs.den)
    }
}

impl<'b> Sub<&'b RationalFunction> for &RationalFunction {
    type Output = RationalFunction;

    fn sub(self, rhs: &'b RationalFunction) -> RationalFunction {
        self + &(-rhs)
    }
}

impl<'b> Mul<&'b RationalFunction> for &RationalFunction {
    type Output = RationalFunction;

    fn mul(self, rhs: &'b RationalFunction) -> RationalFunction {
        if self.is_zero() || rhs.is_zero() {
            return RationalFunction::zero();
        }
        RationalFunction::from_parts(&self.num * &rhs.num, &self.den * &rhs.den)
    }
}

impl Neg for &RationalFunction {
    type Output = RationalFunction;

    fn neg(self) -> RationalFunction {
        RationalFunction {
            num: -&self.num,
            den: self.den.clone(),
        }
    }
}

macro_rules! forward_owned_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<RationalFunction> for RationalFunction {
            type Output = RationalFunction;

            fn $method(self, rhs: RationalFunction) -> RationalFunction {
                $trait::$method(&self, &rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

impl Neg for RationalFunction {
    type Output = RationalFunction;

    fn neg(self) -> RationalFunction {
        -&self
    }
}

impl fmt::Display for RationalFunction {
    /// Renders the canonical form, so equivalent values print identically.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cancel().to_trig())
    }
}
