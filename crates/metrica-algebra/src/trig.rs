//! Rendering canonical values back into trigonometric form.
//!
//! ```text
//! num/den over Phase, Exp       (Laurent, complex coefficients)
//!     │  centre den, expand e^{±iq} = cos q ± i·sin q, e^{±q} = cosh q ± sinh q
//! num/den over Sin, Cos, …      (complex coefficients)
//!     │  cos² → 1 − sin², cosh² → 1 + sinh², make den real
//! num/den over Sin, Cos, …      (real, cancelled, integer coefficients)
//! ```
//!
//! Two shortcuts keep the output readable. An `Exp(q)` atom whose exponents
//! all share one sign is printed as `exp(q)` rather than expanded. A
//! denominator that is exactly `c·(M ± M⁻¹)^k` for a monomial `M` is printed
//! as a single power such as `sin(s - t)^4`.

use crate::coeff::{self, Coeff};
use crate::gcd::gcd;
use crate::monomial::{Atom, Monomial};
use crate::poly::Poly;
use crate::rational::RationalFunction;
use num::{BigInt, BigRational, Complex, Integer, One, Signed, Zero};
use std::collections::BTreeSet;
use std::fmt;

/// A real fraction written over variables and `sin`/`cos`/`sinh`/`cosh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrigFraction {
    num: Poly,
    den: Poly,
    power: Option<TrigPower>,
}

/// `function(argument)^exponent`, a denominator kept in factored form.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TrigPower {
    function: &'static str,
    argument: String,
    exponent: u32,
}

impl TrigFraction {
    pub fn numerator(&self) -> &Poly {
        &self.num
    }

    /// The expanded denominator; `1` when it is kept as a factored power.
    pub fn denominator(&self) -> &Poly {
        &self.den
    }
}

impl RationalFunction {
    pub fn to_trig(&self) -> TrigFraction {
        let (mut num, mut den) = (self.numerator().clone(), self.denominator().clone());
        let centre = centring_shift(&den);
        if !centre.is_one() {
            num = num.mul_monomial(&centre);
            den = den.mul_monomial(&centre);
        }
        let (kept, shift) = exponential_form(&num, &den);
        if !shift.is_one() {
            num = num.mul_monomial(&shift);
            den = den.mul_monomial(&shift);
        }

        if let Some((power, factor)) = trig_power(&den) {
            let scaled = expand_exponentials(&num.scale(&(Coeff::one() / factor)), &kept);
            if scaled.is_real() {
                let mut fraction = finish(scaled, Poly::one());
                fraction.power = Some(power);
                return fraction;
            }
        }

        let mut num = expand_exponentials(&num, &kept);
        let mut den = expand_exponentials(&den, &kept);

        let lead = den.leading_coeff();
        if !lead.is_zero() && !lead.is_one() {
            let inverse = Coeff::one() / lead;
            num = num.scale(&inverse);
            den = den.scale(&inverse);
        }
        if !den.is_real() {
            let conjugate = den.conj();
            num = (&num * &conjugate).reduce_pythagorean();
            den = (&den * &conjugate).reduce_pythagorean();
        }
        finish(num, den)
    }
}

/// `Π a^{-k/2}` over Laurent atoms whose denominator degree `k` is even, so
/// that `e^{iq}` and `e^{-iq}` appear in matched pairs.
fn centring_shift(den: &Poly) -> Monomial {
    den.atoms()
        .into_iter()
        .filter(Atom::is_laurent)
        .fold(Monomial::one(), |acc, atom| match den.degree_in(&atom) {
            Some(k) if k > 0 && k % 2 == 0 => acc.mul(&Monomial::atom(atom, -k / 2)),
            _ => acc,
        })
}

/// `Exp` atoms whose exponents over both polynomials never change sign,
/// and the shift making those exponents non-negative.
fn exponential_form(num: &Poly, den: &Poly) -> (BTreeSet<Atom>, Monomial) {
    let mut kept = BTreeSet::new();
    let mut shift = Monomial::one();
    let atoms = num.atoms().into_iter().chain(den.atoms());
    for atom in atoms.filter(|a| matches!(a, Atom::Exp(_))) {
        if kept.contains(&atom) {
            continue;
        }
        let exponents: Vec<i32> = num
            .terms()
            .chain(den.terms())
            .map(|(m, _)| m.exponent(&atom))
            .collect();
        let low = exponents.iter().copied().min().unwrap_or(0);
        let high = exponents.iter().copied().max().unwrap_or(0);
        if low < 0 && high > 0 {
            continue;
        }
        if low < 0 {
            shift = shift.mul(&Monomial::atom(atom.clone(), -low));
        }
        kept.insert(atom);
    }
    (kept, shift)
}

/// Recognizes `den = c·(M ± M⁻¹)^k` with `M` a monomial over only `Phase`
/// or only `Exp` atoms. Returns the power and the constant `c·u^k`, where
/// `M ± M⁻¹ = u·f(θ)`.
fn trig_power(den: &Poly) -> Option<(TrigPower, Coeff)> {
    if den.is_constant() {
        return None;
    }
    let (lead, lc) = den.leading()?;
    let factors = lead.factors();
    if factors.is_empty() {
        return None;
    }
    let phase = factors.iter().all(|(a, _)| matches!(a, Atom::Phase(_)));
    let hyperbolic = factors.iter().all(|(a, _)| matches!(a, Atom::Exp(_)));
    if !(phase || hyperbolic) {
        return None;
    }
    let k = u32::try_from(den.len() - 1).ok().filter(|k| *k > 0)?;
    if factors.iter().any(|(_, e)| e.unsigned_abs() % k != 0) {
        return None;
    }
    let root = factors.iter().fold(Monomial::one(), |acc, (atom, e)| {
        acc.mul(&Monomial::atom(atom.clone(), e / k as i32))
    });
    for sign in [-1, 1] {
        let binomial = &Poly::term(root.clone(), Coeff::one())
            + &Poly::term(root.inverse(), coeff::integer(sign));
        if binomial.pow(k).scale(lc) != *den {
            continue;
        }
        let (function, unit) = match (phase, sign) {
            (true, -1) => ("sin", coeff::imaginary(2)),
            (true, _) => ("cos", coeff::integer(2)),
            (false, -1) => ("sinh", coeff::integer(2)),
            (false, _) => ("cosh", coeff::integer(2)),
        };
        let factor = (0..k).fold(lc.clone(), |acc, _| &acc * &unit);
        let power = TrigPower {
            function,
            argument: combination(&root),
            exponent: k,
        };
        return Some((power, factor));
    }
    None
}

/// Renders the argument `Σ n_k q_k` a generator monomial stands for.
fn combination(root: &Monomial) -> String {
    let mut out = String::new();
    for (idx, (atom, n)) in root.factors().iter().enumerate() {
        let name = atom.symbol();
        let magnitude = n.unsigned_abs();
        let sign = match (idx, *n < 0) {
            (0, true) => "-",
            (0, false) => "",
            (_, true) => " - ",
            (_, false) => " + ",
        };
        out.push_str(sign);
        if magnitude == 1 {
            out.push_str(&name.to_string());
        } else {
            out.push_str(&format!("{magnitude}*{name}"));
        }
    }
    out
}

fn expand_exponentials(p: &Poly, kept: &BTreeSet<Atom>) -> Poly {
    p.substitute(|atom, e| match atom {
        Atom::Phase(s) => {
            let i: Coeff = Complex::i();
            let sign = if e < 0 { -i } else { i };
            let mut base = Poly::atom(Atom::Cos(s.clone()));
            base = &base + &Poly::atom(Atom::Sin(s.clone())).scale(&sign);
            Some(reduced_power(&base, e.unsigned_abs()))
        }
        Atom::Exp(_) if kept.contains(atom) => None,
        Atom::Exp(s) => {
            let sign = if e < 0 { -Coeff::one() } else { Coeff::one() };
            let mut base = Poly::atom(Atom::Cosh(s.clone()));
            base = &base + &Poly::atom(Atom::Sinh(s.clone())).scale(&sign);
            Some(reduced_power(&base, e.unsigned_abs()))
        }
        _ => None,
    })
    .reduce_pythagorean()
}

fn reduced_power(base: &Poly, n: u32) -> Poly {
    (0..n).fold(Poly::one(), |acc, _| (&acc * base).reduce_pythagorean())
}

/// Cancels, clears rational coefficients and folds a constant denominator.
fn finish(num: Poly, den: Poly) -> TrigFraction {
    let fraction = |num: Poly, den: Poly| TrigFraction {
        num,
        den,
        power: None,
    };
    if let Some(c) = den.as_constant() {
        return fraction(num.scale(&(Coeff::one() / c)), Poly::one());
    }
    let (num, den) = if num.is_zero() {
        (num, Poly::one())
    } else {
        let common = gcd(&num, &den);
        if common.is_constant() {
            (num, den)
        } else {
            (num.div_rem(&common).0, den.div_rem(&common).0)
        }
    };
    if let Some(c) = den.as_constant() {
        return fraction(num.scale(&(Coeff::one() / c)), Poly::one());
    }
    if !(num.is_real() && den.is_real()) {
        return fraction(num, den);
    }
    let mut scale = BigInt::one();
    for c in num.coefficients().chain(den.coefficients()) {
        scale = scale.lcm(c.re.denom());
    }
    let mut content = BigInt::zero();
    for c in num.coefficients().chain(den.coefficients()) {
        content = content.gcd(&(c.re.numer() * &scale / c.re.denom()));
    }
    if den.leading_coeff().re.is_negative() {
        content = -content;
    }
    let factor = coeff::real(BigRational::new(scale, content));
    fraction(num.scale(&factor), den.scale(&factor))
}

impl fmt::Display for TrigPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.function, self.argument)?;
        if self.exponent > 1 {
            write!(f, "^{}", self.exponent)?;
        }
        Ok(())
    }
}

impl fmt::Display for TrigFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.power.is_none() && self.den.as_constant().is_some_and(|c| c.is_one()) {
            return write!(f, "{}", self.num);
        }
        if self.num.len() > 1 {
            write!(f, "({})", self.num)?;
        } else {
            write!(f, "{}", self.num)?;
        }
        if let Some(power) = &self.power {
            return write!(f, "/{power}");
        }
        let single_factor = self.den.len() == 1
            && self
                .den
                .leading()
                .is_some_and(|(m, c)| c.is_one() && m.factors().len() == 1);
        if single_factor {
            write!(f, "/{}", self.den)
        } else {
            write!(f, "/({})", self.den)
        }
    }
}
