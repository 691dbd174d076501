//! Sparse multivariate Laurent polynomials over ℚ(i).
//!
//! Terms live in a `BTreeMap` keyed by [`Monomial`], so iteration is in
//! ascending lexicographic order and the leading term is the last entry.

use crate::coeff::{self, Coeff};
use crate::monomial::{Atom, Monomial};
use crate::symbol::Symbol;
use num::{Complex, One, Signed, Zero};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Poly {
    terms: BTreeMap<Monomial, Coeff>,
}

impl Poly {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn one() -> Self {
        Self::constant(Coeff::one())
    }

    pub fn constant(c: Coeff) -> Self {
        Self::term(Monomial::one(), c)
    }

    pub fn term(monomial: Monomial, c: Coeff) -> Self {
        let mut poly = Self::zero();
        poly.add_term(monomial, c);
        poly
    }

    pub fn atom(atom: Atom) -> Self {
        Self::term(Monomial::atom(atom, 1), Coeff::one())
    }

    pub fn var(symbol: &Symbol) -> Self {
        Self::atom(Atom::Var(symbol.clone()))
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in ascending monomial order.
    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (&Monomial, &Coeff)> {
        self.terms.iter()
    }

    pub fn coefficients(&self) -> impl Iterator<Item = &Coeff> {
        self.terms.values()
    }

    /// The constant value, if the polynomial has no non-trivial monomial.
    pub fn as_constant(&self) -> Option<Coeff> {
        match self.terms.len() {
            0 => Some(Coeff::zero()),
            1 => self.terms.get(&Monomial::one()).cloned(),
            _ => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.as_constant().is_some()
    }

    pub fn leading(&self) -> Option<(&Monomial, &Coeff)> {
        self.terms.last_key_value()
    }

    pub fn leading_coeff(&self) -> Coeff {
        self.leading()
            .map(|(_, c)| c.clone())
            .unwrap_or_else(Coeff::zero)
    }

    fn add_term(&mut self, monomial: Monomial, c: Coeff) {
        if c.is_zero() {
            return;
        }
        match self.terms.get_mut(&monomial) {
            Some(existing) => {
                *existing = &*existing + &c;
                if existing.is_zero() {
                    self.terms.remove(&monomial);
                }
            }
            None => {
                self.terms.insert(monomial, c);
            }
        }
    }

    pub fn scale(&self, c: &Coeff) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self.terms.iter().map(|(m, v)| (m.clone(), v * c)).collect(),
        }
    }

    pub fn mul_monomial(&self, monomial: &Monomial) -> Self {
        if monomial.is_one() {
            return self.clone();
        }
        Self {
            terms: self
                .terms
                .iter()
                .map(|(m, v)| (m.mul(monomial), v.clone()))
                .collect(),
        }
    }

    pub fn pow(&self, n: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut n = n;
        while n > 0 {
            if n & 1 == 1 {
                result = &result * &base;
            }
            n >>= 1;
            if n > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// Scales so the leading coefficient is one.
    pub fn monic(&self) -> Self {
        let lead = self.leading_coeff();
        if lead.is_zero() || lead.is_one() {
            return self.clone();
        }
        self.scale(&(Coeff::one() / lead))
    }

    pub fn conj(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(m, v)| (m.clone(), v.conj())).collect(),
        }
    }

    pub fn is_real(&self) -> bool {
        self.terms.values().all(coeff::is_real)
    }

    pub fn atoms(&self) -> BTreeSet<Atom> {
        self.terms
            .keys()
            .flat_map(|m| m.factors().iter().map(|(a, _)| a.clone()))
            .collect()
    }

    /// Highest exponent of `atom` over all terms; `None` for zero.
    pub fn degree_in(&self, atom: &Atom) -> Option<i32> {
        self.terms.keys().map(|m| m.exponent(atom)).max()
    }

    /// Largest exponent magnitude of any atom in any term.
    pub fn max_exponent(&self) -> i32 {
        self.terms
            .keys()
            .flat_map(|m| m.factors().iter().map(|(_, e)| e.abs()))
            .max()
            .unwrap_or(0)
    }

    /// Groups the terms by their exponent of `atom`, removing the atom.
    pub fn coefficients_in(&self, atom: &Atom) -> BTreeMap<i32, Poly> {
        let mut groups: BTreeMap<i32, Poly> = BTreeMap::new();
        for (m, c) in &self.terms {
            groups
                .entry(m.exponent(atom))
                .or_default()
                .add_term(m.without(atom), c.clone());
        }
        groups
    }

    /// The largest monomial dividing every term (exponent-wise minimum).
    pub fn content_monomial(&self) -> Monomial {
        let mut keys = self.terms.keys();
        let Some(first) = keys.next() else {
            return Monomial::one();
        };
        keys.fold(first.clone(), |acc, m| acc.meet(m))
    }

    /// Partial derivative with respect to a coordinate.
    ///
    /// `Phase(q)^k` differentiates to `i·k·Phase(q)^k` and `Exp(q)^k` to
    /// `k·Exp(q)^k`. Display-only atoms are treated as constants.
    pub fn derivative(&self, symbol: &Symbol) -> Self {
        let mut out = Self::zero();
        let i: Coeff = Complex::i();
        for (m, c) in &self.terms {
            for (atom, e) in m.factors() {
                if atom.symbol() != symbol {
                    continue;
                }
                let k = coeff::integer(i64::from(*e));
                match atom {
                    Atom::Var(_) => {
                        let lowered = m.div(&Monomial::atom(atom.clone(), 1));
                        out.add_term(lowered, &k * c);
                    }
                    Atom::Phase(_) => out.add_term(m.clone(), &(&k * &i) * c),
                    Atom::Exp(_) => out.add_term(m.clone(), &k * c),
                    _ => {}
                }
            }
        }
        out
    }

    /// Division by the leading term of `divisor`, repeated until no term of
    /// the remainder is divisible by it. Exact when the remainder is zero.
    pub fn div_rem(&self, divisor: &Poly) -> (Poly, Poly) {
        let Some((lead_m, lead_c)) = divisor.leading() else {
            return (Self::zero(), self.clone());
        };
        let (lead_m, lead_c) = (lead_m.clone(), lead_c.clone());
        let mut tail = divisor.clone();
        tail.terms.remove(&lead_m);

        let mut quotient = Self::zero();
        let mut remainder = Self::zero();
        let mut rest = self.clone();
        while let Some((m, c)) = rest.terms.pop_last() {
            if lead_m.divides(&m) {
                let q_m = m.div(&lead_m);
                let q_c = &c / &lead_c;
                rest = &rest - &tail.mul_monomial(&q_m).scale(&q_c);
                quotient.add_term(q_m, q_c);
            } else {
                remainder.add_term(m, c);
            }
        }
        (quotient, remainder)
    }

    /// Replaces atom powers by polynomials. Atoms for which `expand`
    /// returns `None` are kept.
    pub fn substitute(&self, expand: impl Fn(&Atom, i32) -> Option<Poly>) -> Poly {
        let mut out = Self::zero();
        for (m, c) in &self.terms {
            let mut product = Self::constant(c.clone());
            let mut kept = Monomial::one();
            for (atom, e) in m.factors() {
                match expand(atom, *e) {
                    Some(replacement) => product = &product * &replacement,
                    None => kept = kept.mul(&Monomial::atom(atom.clone(), *e)),
                }
            }
            out = &out + &product.mul_monomial(&kept);
        }
        out
    }

    /// Rewrites `cos² → 1 − sin²` and `cosh² → 1 + sinh²` so each value
    /// over trig atoms has a single representation.
    pub fn reduce_pythagorean(&self) -> Poly {
        let mut out = Self::zero();
        for (m, c) in &self.terms {
            let mut product = Self::constant(c.clone());
            let mut kept = Monomial::one();
            for (atom, e) in m.factors() {
                let (square, sign) = match atom {
                    Atom::Cos(s) if *e >= 2 => (Atom::Sin(s.clone()), -1),
                    Atom::Cosh(s) if *e >= 2 => (Atom::Sinh(s.clone()), 1),
                    _ => {
                        kept = kept.mul(&Monomial::atom(atom.clone(), *e));
                        continue;
                    }
                };
                let mut identity = Self::one();
                identity.add_term(Monomial::atom(square, 2), coeff::integer(sign));
                product = &product * &identity.pow((*e / 2) as u32);
                kept = kept.mul(&Monomial::atom(atom.clone(), *e % 2));
            }
            out = &out + &product.mul_monomial(&kept);
        }
        out
    }
}

impl<'b> Add<&'b Poly> for &Poly {
    type Output = Poly;

    fn add(self, rhs: &'b Poly) -> Poly {
        let (mut sum, other) = if self.len() >= rhs.len() {
            (self.clone(), rhs)
        } else {
            (rhs.clone(), self)
        };
        for (m, c) in &other.terms {
            sum.add_term(m.clone(), c.clone());
        }
        sum
    }
}

impl<'b> Sub<&'b Poly> for &Poly {
    type Output = Poly;

    fn sub(self, rhs: &'b Poly) -> Poly {
        let mut diff = self.clone();
        for (m, c) in &rhs.terms {
            diff.add_term(m.clone(), -c);
        }
        diff
    }
}

impl<'b> Mul<&'b Poly> for &Poly {
    type Output = Poly;

    fn mul(self, rhs: &'b Poly) -> Poly {
        let mut product = Poly::zero();
        for (ma, ca) in &self.terms {
            for (mb, cb) in &rhs.terms {
                product.add_term(ma.mul(mb), ca * cb);
            }
        }
        product
    }
}

impl Neg for &Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        Poly {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }
}

macro_rules! forward_owned_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<Poly> for Poly {
            type Output = Poly;

            fn $method(self, rhs: Poly) -> Poly {
                $trait::$method(&self, &rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

impl Neg for Poly {
    type Output = Poly;

    fn neg(self) -> Poly {
        -&self
    }
}

impl fmt::Display for Poly {
    /// Terms in descending order, e.g. `4*u^2 + 4*v^2` or `-dt^2*r`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        for (idx, (monomial, c)) in self.terms.iter().rev().enumerate() {
            let (negative, magnitude) = split_sign(c);
            match (idx, negative) {
                (0, true) => f.write_str("-")?,
                (0, false) => {}
                (_, true) => f.write_str(" - ")?,
                (_, false) => f.write_str(" + ")?,
            }
            write_term(f, monomial, &magnitude)?;
        }
        Ok(())
    }
}

/// Pulls the sign out of real and purely imaginary coefficients.
fn split_sign(c: &Coeff) -> (bool, Coeff) {
    if c.im.is_zero() {
        (c.re.is_negative(), Complex::new(c.re.abs(), c.im.clone()))
    } else if c.re.is_zero() {
        (c.im.is_negative(), Complex::new(c.re.clone(), c.im.abs()))
    } else {
        (false, c.clone())
    }
}

fn write_term(f: &mut fmt::Formatter<'_>, monomial: &Monomial, c: &Coeff) -> fmt::Result {
    if !c.im.is_zero() {
        let factor = if c.re.is_zero() {
            if c.im.is_one() {
                "I".to_string()
            } else {
                format!("{}*I", c.im)
            }
        } else {
            format!("({} + {}*I)", c.re, c.im)
        };
        return if monomial.is_one() {
            f.write_str(&factor)
        } else {
            write!(f, "{factor}*{monomial}")
        };
    }
    let q = &c.re;
    if monomial.is_one() {
        return write!(f, "{q}");
    }
    if q.is_one() {
        return write!(f, "{monomial}");
    }
    if q.is_integer() {
        return write!(f, "{q}*{monomial}");
    }
    if q.numer().is_one() {
        write!(f, "{monomial}/{}", q.denom())
    } else {
        write!(f, "{}*{monomial}/{}", q.numer(), q.denom())
    }
}
