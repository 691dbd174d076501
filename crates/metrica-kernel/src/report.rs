//! Serializable derivation reports.

use crate::fingerprint::ContentHash;
use crate::pipeline::Derivation;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateRow {
    pub name: String,
    pub velocity: String,
    pub acceleration: String,
}

/// A non-zero `Γ^upper_{lower[0] lower[1]}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChristoffelRow {
    pub upper: String,
    pub lower: [String; 2],
    pub value: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeodesicRow {
    pub coordinate: String,
    pub acceleration: String,
    /// `ddq + correction`, equal to zero along a geodesic.
    pub equation: String,
    /// `-correction`, the value of `ddq`.
    pub solved: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DerivationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub coordinates: Vec<CoordinateRow>,
    pub transformation: Vec<String>,
    pub metric: Vec<Vec<String>>,
    pub inverse_metric: Vec<Vec<String>>,
    pub determinant: String,
    pub line_element: String,
    pub christoffel: Vec<ChristoffelRow>,
    pub geodesics: Vec<GeodesicRow>,
    pub fingerprint: ContentHash,
}

impl DerivationReport {
    pub fn from_derivation(derivation: &Derivation) -> Self {
        let coords = derivation.coordinates();
        let coordinates = coords
            .coordinates()
            .iter()
            .zip(coords.velocities())
            .zip(coords.accelerations())
            .map(|((name, velocity), acceleration)| CoordinateRow {
                name: name.to_string(),
                velocity: velocity.to_string(),
                acceleration: acceleration.to_string(),
            })
            .collect();
        let names = coords.coordinates();
        let christoffel = derivation
            .christoffel()
            .nonzero()
            .map(|((k, i, j), value)| ChristoffelRow {
                upper: names[k].to_string(),
                lower: [names[i].to_string(), names[j].to_string()],
                value: value.to_string(),
            })
            .collect();
        let geodesics = derivation
            .geodesics()
            .iter()
            .map(|eq| GeodesicRow {
                coordinate: eq.coordinate().to_string(),
                acceleration: eq.acceleration().to_string(),
                equation: eq.to_string(),
                solved: eq.solved().to_string(),
            })
            .collect();
        Self {
            system: None,
            coordinates,
            transformation: derivation.transformation(),
            metric: derivation.metric().rendered(),
            inverse_metric: derivation.inverse_metric().rendered(),
            determinant: derivation.determinant().to_string(),
            line_element: derivation.line_element(),
            christoffel,
            geodesics,
            fingerprint: derivation.fingerprint(),
        }
    }

    pub fn named(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "schema": 1,
            "reportKind": "metrica.derivation.v1",
            "derivation": self,
        })
    }
}
