//! Atoms and monomials under pure lexicographic order.

use crate::symbol::Symbol;
use std::cmp::Ordering;
use std::fmt;

/// An indeterminate of the polynomial ring.
///
/// `Var`, `Phase` and `Exp` generate the ring values are computed in.
/// `Phase(q)` stands for `e^{iq}` and `Exp(q)` for `e^{q}`; both are units
/// and may carry negative exponents. `Sin`, `Cos`, `Sinh` and `Cosh` only
/// appear in rendered output.
///
/// The variant order is the variable order: a smaller atom is more
/// significant in the monomial order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    Var(Symbol),
    Phase(Symbol),
    Exp(Symbol),
    Sin(Symbol),
    Cos(Symbol),
    Sinh(Symbol),
    Cosh(Symbol),
}

impl Atom {
    /// Whether the atom is invertible in the ring.
    pub fn is_laurent(&self) -> bool {
        matches!(self, Atom::Phase(_) | Atom::Exp(_))
    }

    pub fn symbol(&self) -> &Symbol {
        match self {
            Atom::Var(s)
            | Atom::Phase(s)
            | Atom::Exp(s)
            | Atom::Sin(s)
            | Atom::Cos(s)
            | Atom::Sinh(s)
            | Atom::Cosh(s) => s,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Var(s) => write!(f, "{s}"),
            Atom::Phase(s) => write!(f, "exp(I*{s})"),
            Atom::Exp(s) => write!(f, "exp({s})"),
            Atom::Sin(s) => write!(f, "sin({s})"),
            Atom::Cos(s) => write!(f, "cos({s})"),
            Atom::Sinh(s) => write!(f, "sinh({s})"),
            Atom::Cosh(s) => write!(f, "cosh({s})"),
        }
    }
}

/// A power product of atoms, kept sorted by atom with no zero exponents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Monomial(Vec<(Atom, i32)>);

impl Monomial {
    pub fn one() -> Self {
        Self(Vec::new())
    }

    pub fn atom(atom: Atom, exponent: i32) -> Self {
        if exponent == 0 {
            Self::one()
        } else {
            Self(vec![(atom, exponent)])
        }
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn factors(&self) -> &[(Atom, i32)] {
        &self.0
    }

    pub fn exponent(&self, atom: &Atom) -> i32 {
        self.0
            .binary_search_by(|(a, _)| a.cmp(atom))
            .map(|idx| self.0[idx].1)
            .unwrap_or(0)
    }

    pub fn mul(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a + b)
    }

    pub fn div(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a - b)
    }

    pub fn inverse(&self) -> Self {
        Self(self.0.iter().map(|(a, e)| (a.clone(), -e)).collect())
    }

    pub fn pow(&self, n: i32) -> Self {
        if n == 0 {
            return Self::one();
        }
        Self(self.0.iter().map(|(a, e)| (a.clone(), e * n)).collect())
    }

    /// Per-atom minimum of the two exponent vectors, absent atoms counting
    /// as exponent zero.
    pub fn meet(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a.min(b))
    }

    /// Whether `self` divides `other` with non-negative quotient exponents.
    pub fn divides(&self, other: &Self) -> bool {
        self.0.iter().all(|(atom, e)| *e <= other.exponent(atom))
    }

    pub fn without(&self, atom: &Atom) -> Self {
        self.filter(|a| a != atom)
    }

    pub fn filter(&self, keep: impl Fn(&Atom) -> bool) -> Self {
        Self(self.0.iter().filter(|(a, _)| keep(a)).cloned().collect())
    }

    /// Merge-walks both factor lists, applying `op` to aligned exponents.
    fn combine(&self, other: &Self, op: impl Fn(i32, i32) -> i32) -> Self {
        let mut out = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        loop {
            let (atom, e) = match (self.0.get(i), other.0.get(j)) {
                (None, None) => break,
                (Some((a, ea)), None) => {
                    i += 1;
                    (a, op(*ea, 0))
                }
                (None, Some((b, eb))) => {
                    j += 1;
                    (b, op(0, *eb))
                }
                (Some((a, ea)), Some((b, eb))) => match a.cmp(b) {
                    Ordering::Less => {
                        i += 1;
                        (a, op(*ea, 0))
                    }
                    Ordering::Greater => {
                        j += 1;
                        (b, op(0, *eb))
                    }
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                        (a, op(*ea, *eb))
                    }
                },
            };
            if e != 0 {
                out.push((atom.clone(), e));
            }
        }
        Self(out)
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        let (mut i, mut j) = (0, 0);
        loop {
            match (self.0.get(i), other.0.get(j)) {
                (None, None) => return Ordering::Equal,
                (Some((_, e)), None) => return e.cmp(&0),
                (None, Some((_, e))) => return 0.cmp(e),
                (Some((a, ea)), Some((b, eb))) => match a.cmp(b) {
                    Ordering::Less => return ea.cmp(&0),
                    Ordering::Greater => return 0.cmp(eb),
                    Ordering::Equal if ea != eb => return ea.cmp(eb),
                    Ordering::Equal => {
                        i += 1;
                        j += 1;
                    }
                },
            }
        }
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return f.write_str("1");
        }
        for (idx, (atom, e)) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("*")?;
            }
            match e {
                1 => write!(f, "{atom}")?,
                e if *e < 0 => write!(f, "{atom}^({e})")?,
                e => write!(f, "{atom}^{e}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Atom {
        Atom::Var(Symbol::new(name))
    }

    fn mono(factors: &[(&str, i32)]) -> Monomial {
        factors
            .iter()
            .fold(Monomial::one(), |acc, (name, e)| acc.mul(&Monomial::atom(var(name), *e)))
    }

    #[test]
    fn lex_order_prefers_earlier_atoms() {
        assert!(mono(&[("a", 2)]) > mono(&[("a", 1), ("b", 5)]));
        assert!(mono(&[("a", 1)]) > mono(&[("b", 3)]));
        assert!(mono(&[("b", 1)]) > Monomial::one());
        assert!(Monomial::one() > mono(&[("b", -1)]));
    }

    #[test]
    fn order_is_multiplicative() {
        let small = mono(&[("b", 2)]);
        let large = mono(&[("a", 1)]);
        let shift = mono(&[("a", 3), ("c", 1)]);
        assert!(large.mul(&shift) > small.mul(&shift));
    }

    #[test]
    fn exponents_cancel_out_of_the_factor_list() {
        let m = mono(&[("a", 2), ("b", 1)]);
        let quotient = m.div(&mono(&[("b", 1)]));
        assert_eq!(quotient, mono(&[("a", 2)]));
        assert!(m.div(&m).is_one());
        assert_eq!(m.exponent(&var("a")), 2);
        assert_eq!(m.exponent(&var("z")), 0);
    }

    #[test]
    fn meet_treats_absent_atoms_as_zero() {
        let phase = Atom::Phase(Symbol::new("t"));
        let a = mono(&[("a", 2)]).mul(&Monomial::atom(phase.clone(), -1));
        let b = mono(&[("a", 1), ("b", 1)]);
        assert_eq!(a.meet(&b), mono(&[("a", 1)]).mul(&Monomial::atom(phase, -1)));
    }

    #[test]
    fn divisibility() {
        assert!(mono(&[("a", 1)]).divides(&mono(&[("a", 2), ("b", 1)])));
        assert!(!mono(&[("b", 2)]).divides(&mono(&[("a", 2), ("b", 1)])));
    }

    #[test]
    fn display_joins_factors() {
        let m = mono(&[("r", 1), ("dt", 2)]);
        assert_eq!(m.to_string(), "dt^2*r");
    }
}
