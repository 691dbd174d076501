//! Built-in coordinate systems.
//!
//! `CATALOG` is the single table of named systems; every lookup, listing
//! and CLI surface reads from it. Entries are ordered like [`SystemId`].

use crate::coordinates::register;
use crate::embedding::Embedding;
use crate::error::MetricaError;
use crate::pipeline::{Derivation, Pipeline};
use metrica_algebra::{Expr, Simplify, cos, cosh, sin, sinh};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SystemId {
    #[serde(rename = "polar")]
    Polar,
    #[serde(rename = "parabolic")]
    Parabolic,
    #[serde(rename = "bipolar")]
    Bipolar,
    #[serde(rename = "2-sphere")]
    TwoSphere,
    #[serde(rename = "cylindrical")]
    Cylindrical,
    #[serde(rename = "spherical")]
    Spherical,
    #[serde(rename = "elliptic")]
    Elliptic,
}

impl SystemId {
    pub const ALL: [SystemId; 7] = [
        SystemId::Polar,
        SystemId::Parabolic,
        SystemId::Bipolar,
        SystemId::TwoSphere,
        SystemId::Cylindrical,
        SystemId::Spherical,
        SystemId::Elliptic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SystemId::Polar => "polar",
            SystemId::Parabolic => "parabolic",
            SystemId::Bipolar => "bipolar",
            SystemId::TwoSphere => "2-sphere",
            SystemId::Cylindrical => "cylindrical",
            SystemId::Spherical => "spherical",
            SystemId::Elliptic => "elliptic",
        }
    }

    pub fn entry(self) -> &'static CatalogEntry {
        &CATALOG[self as usize]
    }

    pub fn derive(self) -> Result<Derivation, MetricaError> {
        self.entry().derive_with(&Pipeline::new())
    }

    pub fn derive_with<S: Simplify>(self, pipeline: &Pipeline<S>) -> Result<Derivation, MetricaError> {
        self.entry().derive_with(pipeline)
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SystemId {
    type Err = MetricaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let id = match wanted.as_str() {
            "sphere" | "two-sphere" | "s2" => Some(SystemId::TwoSphere),
            "cylinder" => Some(SystemId::Cylindrical),
            other => SystemId::ALL.into_iter().find(|id| id.name() == other),
        };
        id.ok_or_else(|| MetricaError::UnknownSystem(s.to_string()))
    }
}

/// One named system: its coordinates and an embedding builder that takes
/// the coordinate expressions in order.
pub struct CatalogEntry {
    pub id: SystemId,
    pub coordinates: &'static [&'static str],
    pub summary: &'static str,
    /// Known to take noticeably longer to simplify.
    pub slow: bool,
    build: fn(&[Expr]) -> Vec<Expr>,
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("id", &self.id)
            .field("coordinates", &self.coordinates)
            .field("slow", &self.slow)
            .finish()
    }
}

impl CatalogEntry {
    pub fn embedding(&self) -> Embedding {
        let q: Vec<Expr> = self.coordinates.iter().map(Expr::sym).collect();
        Embedding::new((self.build)(&q))
    }

    pub fn derive_with<S: Simplify>(&self, pipeline: &Pipeline<S>) -> Result<Derivation, MetricaError> {
        let coordinates = register(self.coordinates)?;
        pipeline.run(coordinates, self.embedding())
    }
}

fn polar(q: &[Expr]) -> Vec<Expr> {
    let (r, t) = (&q[0], &q[1]);
    vec![r.clone() * cos(t.clone()), r.clone() * sin(t.clone())]
}

fn parabolic(q: &[Expr]) -> Vec<Expr> {
    let (u, v) = (&q[0], &q[1]);
    vec![
        u.clone().pow(2) - v.clone().pow(2),
        Expr::int(2) * u.clone() * v.clone(),
    ]
}

fn bipolar(q: &[Expr]) -> Vec<Expr> {
    let (t, s) = (&q[0], &q[1]);
    let denominator = sin(t.clone() - s.clone());
    vec![
        sin(t.clone() + s.clone()) / denominator.clone(),
        Expr::int(2) * sin(t.clone()) * sin(s.clone()) / denominator,
    ]
}

fn two_sphere(q: &[Expr]) -> Vec<Expr> {
    let (f, t) = (&q[0], &q[1]);
    vec![
        sin(f.clone()) * cos(t.clone()),
        sin(f.clone()) * sin(t.clone()),
        cos(f.clone()),
    ]
}

fn cylindrical(q: &[Expr]) -> Vec<Expr> {
    let (r, t, h) = (&q[0], &q[1], &q[2]);
    vec![
        r.clone() * cos(t.clone()),
        r.clone() * sin(t.clone()),
        h.clone(),
    ]
}

fn spherical(q: &[Expr]) -> Vec<Expr> {
    let (r, f, t) = (&q[0], &q[1], &q[2]);
    vec![
        r.clone() * sin(f.clone()) * cos(t.clone()),
        r.clone() * sin(f.clone()) * sin(t.clone()),
        r.clone() * cos(f.clone()),
    ]
}

fn elliptic(q: &[Expr]) -> Vec<Expr> {
    let (m, n) = (&q[0], &q[1]);
    vec![
        cosh(m.clone()) * cos(n.clone()),
        sinh(m.clone()) * sin(n.clone()),
    ]
}

pub static CATALOG: [CatalogEntry; 7] = [
    CatalogEntry {
        id: SystemId::Polar,
        coordinates: &["r", "t"],
        summary: "plane polar coordinates",
        slow: false,
        build: polar,
    },
    CatalogEntry {
        id: SystemId::Parabolic,
        coordinates: &["u", "v"],
        summary: "plane parabolic coordinates",
        slow: false,
        build: parabolic,
    },
    CatalogEntry {
        id: SystemId::Bipolar,
        coordinates: &["t", "s"],
        summary: "plane bipolar coordinates",
        slow: true,
        build: bipolar,
    },
    CatalogEntry {
        id: SystemId::TwoSphere,
        coordinates: &["f", "t"],
        summary: "unit 2-sphere embedded in three dimensions",
        slow: false,
        build: two_sphere,
    },
    CatalogEntry {
        id: SystemId::Cylindrical,
        coordinates: &["r", "t", "h"],
        summary: "cylindrical coordinates in three dimensions",
        slow: false,
        build: cylindrical,
    },
    CatalogEntry {
        id: SystemId::Spherical,
        coordinates: &["r", "f", "t"],
        summary: "spherical coordinates in three dimensions",
        slow: false,
        build: spherical,
    },
    CatalogEntry {
        id: SystemId::Elliptic,
        coordinates: &["m", "n"],
        summary: "plane elliptic coordinates",
        slow: false,
        build: elliptic,
    },
];

pub fn lookup(name: &str) -> Result<&'static CatalogEntry, MetricaError> {
    name.parse::<SystemId>().map(SystemId::entry)
}

pub fn entries() -> impl Iterator<Item = &'static CatalogEntry> {
    CATALOG.iter()
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRow {
    pub id: SystemId,
    pub coordinates: Vec<&'static str>,
    pub transformation: Vec<String>,
    pub summary: &'static str,
    pub slow: bool,
}

pub fn catalog_rows() -> Vec<CatalogRow> {
    entries()
        .map(|entry| CatalogRow {
            id: entry.id,
            coordinates: entry.coordinates.to_vec(),
            transformation: entry
                .embedding()
                .components()
                .iter()
                .map(ToString::to_string)
                .collect(),
            summary: entry.summary,
            slow: entry.slow,
        })
        .collect()
}

pub fn catalog_json() -> Value {
    json!({
        "schema": 1,
        "registryKind": "metrica.catalog.v1",
        "systems": catalog_rows(),
    })
}
