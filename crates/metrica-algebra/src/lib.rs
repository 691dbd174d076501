//! # Metrica Algebra
//!
//! The exact symbolic engine behind Metrica's pipeline.
//!
//! Embeddings are written as [`Expr`] trees (parsed from text or assembled
//! with operator overloads) and lowered into [`RationalFunction`]s over the
//! Laurent ring ℚ(i)[q…, e^{±iq}…, e^{±q}…]. The ring has no relations
//! between its generators, so zero testing is exact and gcd cancellation
//! gives a canonical form; values are rendered back in `sin`/`cos` form.
//!
//! ## Architecture
//!
//! ```text
//! &str ──parse──▶ Expr             ← Surface syntax, operator overloads
//!                  │
//!               lower(Scope)       ← sin/cos/sinh/cosh/exp → exponentials
//!                  │
//!           RationalFunction       ← num/den of Poly, unit-normalized
//!              │        │
//!          Simplify   derivative   ← Canonical (gcd) or Deferred
//!              │
//!           to_trig ──▶ TrigFraction ← sin/cos rendering
//! ```

pub mod coeff;
pub mod error;
pub mod expr;
pub mod gcd;
pub mod lower;
pub mod monomial;
pub mod parse;
pub mod poly;
pub mod rational;
pub mod simplify;
pub mod symbol;
pub mod trig;

pub use coeff::Coeff;
pub use error::AlgebraError;
pub use expr::{Expr, Function, cos, cosh, exp, sin, sinh, tan, tanh};
pub use lower::{MAX_EXPONENT, Scope, lower};
pub use monomial::{Atom, Monomial};
pub use parse::parse;
pub use poly::Poly;
pub use rational::RationalFunction;
pub use simplify::{Canonical, Deferred, Simplify};
pub use symbol::Symbol;
pub use trig::TrigFraction;
