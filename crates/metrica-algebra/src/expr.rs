//! Expression trees for embeddings and user input.
//!
//! `Expr` is the surface syntax: it is what the parser produces and what
//! catalog builders assemble with operator overloads. It is never
//! simplified in place; [`crate::lower`] turns it into a
//! [`crate::RationalFunction`].

use crate::symbol::Symbol;
use num::{BigInt, BigRational, Signed};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Elementary functions accepted in embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
}

impl Function {
    pub const ALL: [Function; 7] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
        Function::Exp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Exp => "exp",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Num(BigRational),
    Sym(Symbol),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Neg(Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, i32),
    Apply(Function, Box<Expr>),
}

impl Expr {
    pub fn int(n: i64) -> Self {
        Expr::Num(BigRational::from_integer(BigInt::from(n)))
    }

    pub fn sym(name: impl AsRef<str>) -> Self {
        Expr::Sym(Symbol::new(name))
    }

    pub fn pow(self, exponent: i32) -> Self {
        Expr::Pow(Box::new(self), exponent)
    }

    pub fn apply(function: Function, arg: Expr) -> Self {
        Expr::Apply(function, Box::new(arg))
    }

    /// Every symbol the expression mentions.
    pub fn symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Num(_) => {}
            Expr::Sym(s) => {
                out.insert(s.clone());
            }
            Expr::Add(items) | Expr::Mul(items) => {
                for item in items {
                    item.collect_symbols(out);
                }
            }
            Expr::Neg(inner) | Expr::Pow(inner, _) | Expr::Apply(_, inner) => {
                inner.collect_symbols(out)
            }
            Expr::Div(num, den) => {
                num.collect_symbols(out);
                den.collect_symbols(out);
            }
        }
    }

    /// Binding strength used to decide where parentheses go.
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_) => 1,
            Expr::Mul(_) | Expr::Div(..) | Expr::Neg(_) => 2,
            Expr::Num(q) if q.is_negative() || !q.is_integer() => 2,
            Expr::Pow(..) => 3,
            Expr::Num(_) | Expr::Sym(_) | Expr::Apply(..) => 4,
        }
    }

    fn is_negative(&self) -> bool {
        match self {
            Expr::Neg(_) => true,
            Expr::Num(q) => q.is_negative(),
            _ => false,
        }
    }
}

pub fn sin(arg: Expr) -> Expr {
    Expr::apply(Function::Sin, arg)
}

pub fn cos(arg: Expr) -> Expr {
    Expr::apply(Function::Cos, arg)
}

pub fn tan(arg: Expr) -> Expr {
    Expr::apply(Function::Tan, arg)
}

pub fn sinh(arg: Expr) -> Expr {
    Expr::apply(Function::Sinh, arg)
}

pub fn cosh(arg: Expr) -> Expr {
    Expr::apply(Function::Cosh, arg)
}

pub fn tanh(arg: Expr) -> Expr {
    Expr::apply(Function::Tanh, arg)
}

pub fn exp(arg: Expr) -> Expr {
    Expr::apply(Function::Exp, arg)
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Add(mut items), Expr::Add(more)) => {
                items.extend(more);
                Expr::Add(items)
            }
            (Expr::Add(mut items), rhs) => {
                items.push(rhs);
                Expr::Add(items)
            }
            (lhs, Expr::Add(mut items)) => {
                items.insert(0, lhs);
                Expr::Add(items)
            }
            (lhs, rhs) => Expr::Add(vec![lhs, rhs]),
        }
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self + (-rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Mul(mut items), Expr::Mul(more)) => {
                items.extend(more);
                Expr::Mul(items)
            }
            (Expr::Mul(mut items), rhs) => {
                items.push(rhs);
                Expr::Mul(items)
            }
            (lhs, Expr::Mul(mut items)) => {
                items.insert(0, lhs);
                Expr::Mul(items)
            }
            (lhs, rhs) => Expr::Mul(vec![lhs, rhs]),
        }
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs))
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

struct Grouped<'a>(&'a Expr, bool);

impl fmt::Display for Grouped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(q) => write!(f, "{q}"),
            Expr::Sym(s) => write!(f, "{s}"),
            Expr::Add(items) => {
                for (idx, item) in items.iter().enumerate() {
                    match item {
                        Expr::Neg(inner) if idx > 0 => {
                            write!(f, " - {}", Grouped(inner, inner.precedence() < 2))?
                        }
                        Expr::Num(q) if idx > 0 && q.is_negative() => {
                            write!(f, " - {}", q.abs())?
                        }
                        _ if idx > 0 => write!(f, " + {item}")?,
                        _ => write!(f, "{item}")?,
                    }
                }
                Ok(())
            }
            Expr::Mul(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("*")?;
                    }
                    let grouped = item.precedence() < 2 || (idx > 0 && item.is_negative());
                    write!(f, "{}", Grouped(item, grouped))?;
                }
                Ok(())
            }
            Expr::Neg(inner) => write!(f, "-{}", Grouped(inner, inner.precedence() < 2)),
            Expr::Div(num, den) => write!(
                f,
                "{}/{}",
                Grouped(num, num.precedence() < 2),
                Grouped(den, den.precedence() <= 2)
            ),
            Expr::Pow(base, exponent) => {
                let base = Grouped(base, base.precedence() < 4);
                if *exponent < 0 {
                    write!(f, "{base}^({exponent})")
                } else {
                    write!(f, "{base}^{exponent}")
                }
            }
            Expr::Apply(function, arg) => write!(f, "{}({arg})", function.name()),
        }
    }
}
