//! Coordinate registry.
//!
//! Registers coordinate names and derives, for each coordinate `q`, the
//! velocity symbol `dq` and the acceleration symbol `ddq`. Names are
//! validated up front so every later stage can assume a clean namespace.

use crate::error::MetricaError;
use metrica_algebra::{Expr, Function, Scope, Symbol};
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

/// Names reserved for the ambient Euclidean axes.
pub const RESERVED_AXES: &[&str] = &["x", "y", "z"];

pub const VELOCITY_PREFIX: &str = "d";
pub const ACCELERATION_PREFIX: &str = "dd";

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("identifier regex must compile")
    })
}

/// Ordered coordinates with their velocity and acceleration symbols.
///
/// Index `i` of each list refers to the same coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateSet {
    coordinates: Vec<Symbol>,
    velocities: Vec<Symbol>,
    accelerations: Vec<Symbol>,
}

/// Validates `names` and derives the velocity/acceleration symbols.
pub fn register<I, S>(names: I) -> Result<CoordinateSet, MetricaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
    if names.is_empty() {
        return Err(invalid("", "at least one coordinate is required"));
    }

    let mut seen = BTreeSet::new();
    for name in &names {
        if !identifier_re().is_match(name) {
            return Err(invalid(name, "not an identifier"));
        }
        if RESERVED_AXES.contains(&name.as_str()) {
            return Err(invalid(name, "reserved for the ambient axes"));
        }
        if Function::from_name(name).is_some() {
            return Err(invalid(name, "is a function name"));
        }
        if !seen.insert(name.clone()) {
            return Err(invalid(name, "duplicate coordinate"));
        }
    }

    let velocities: Vec<String> = names
        .iter()
        .map(|n| format!("{VELOCITY_PREFIX}{n}"))
        .collect();
    let accelerations: Vec<String> = names
        .iter()
        .map(|n| format!("{ACCELERATION_PREFIX}{n}"))
        .collect();
    for generated in velocities.iter().chain(&accelerations) {
        if !seen.insert(generated.clone()) {
            return Err(invalid(
                generated,
                "collides with a generated velocity or acceleration symbol",
            ));
        }
    }

    Ok(CoordinateSet {
        coordinates: names.iter().map(Symbol::new).collect(),
        velocities: velocities.iter().map(Symbol::new).collect(),
        accelerations: accelerations.iter().map(Symbol::new).collect(),
    })
}

fn invalid(name: &str, reason: &str) -> MetricaError {
    MetricaError::InvalidCoordinateName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

impl CoordinateSet {
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Always false: registration rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn coordinates(&self) -> &[Symbol] {
        &self.coordinates
    }

    pub fn velocities(&self) -> &[Symbol] {
        &self.velocities
    }

    pub fn accelerations(&self) -> &[Symbol] {
        &self.accelerations
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.coordinates.iter().position(|s| s.as_str() == name)
    }

    /// The coordinates as expressions, for building embeddings in code.
    pub fn exprs(&self) -> Vec<Expr> {
        self.coordinates.iter().cloned().map(Expr::Sym).collect()
    }

    /// Embeddings may reference coordinates only.
    pub fn scope(&self) -> Scope {
        Scope::new(self.coordinates.iter().cloned())
    }
}

impl fmt::Display for CoordinateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.coordinates.iter().map(Symbol::as_str).collect();
        write!(f, "({})", names.join(", "))
    }
}
