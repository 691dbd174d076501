//! # Metrica Kernel
//!
//! Derives the geometry of a curvilinear coordinate system from its
//! embedding into flat Euclidean space: the induced metric and its inverse,
//! the Christoffel symbols of the second kind, and one geodesic equation
//! per coordinate.
//!
//! Every stage is exact. Entries are [`RationalFunction`]s from
//! `metrica-algebra`, so "is this entry zero?" and "are these two entries
//! equal?" have definite answers and results are reproducible bit for bit.
//!
//! ## Architecture
//!
//! ```text
//! SystemId / SystemFile / names + Expr   ← catalog, TOML, or direct input
//!     │
//! CoordinateSet                          ← q, dq, ddq symbols
//!     │
//! Embedding ─▶ Jacobian                  ← ∂X_k/∂q_i
//!     │
//! Metric, Inverse                        ← g = JᵀJ, g⁻¹
//!     │
//! Christoffel                            ← Γ^k_ij, cancellable
//!     │
//! GeodesicEquation × N                   ← ddq_k + Σ dq_i dq_j Γ^k_ij
//!     │
//! Derivation ─▶ DerivationReport         ← fingerprinted, serializable
//! ```
//!
//! [`RationalFunction`]: metrica_algebra::RationalFunction

pub mod cancel;
pub mod catalog;
pub mod christoffel;
pub mod coordinates;
pub mod definition;
pub mod embedding;
pub mod error;
pub mod fingerprint;
pub mod geodesic;
pub mod matrix;
pub mod metric;
pub mod pipeline;
pub mod report;

pub use cancel::Cancellation;
pub use catalog::{CATALOG, CatalogEntry, SystemId, catalog_json, entries, lookup};
pub use christoffel::{Christoffel, christoffel_symbols};
pub use coordinates::{CoordinateSet, register};
pub use definition::{SystemDefinition, SystemFile};
pub use embedding::{Embedding, axis_name, jacobian};
pub use error::{ErrorStage, MetricaError};
pub use fingerprint::ContentHash;
pub use geodesic::{GeodesicEquation, geodesic_equations};
pub use matrix::Matrix;
pub use metric::{induced_metric, metric_with_inverse};
pub use pipeline::{Derivation, Pipeline, derive};
pub use report::DerivationReport;
