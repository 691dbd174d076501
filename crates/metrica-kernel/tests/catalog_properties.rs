//! Integration tests: structural properties every catalog system must have.

use metrica_algebra::Canonical;
use metrica_kernel::{CatalogEntry, Derivation, Matrix, entries};

fn check_properties(entry: &CatalogEntry, derivation: &Derivation) {
    let name = entry.id;
    let n = entry.coordinates.len();

    let g = derivation.metric();
    assert_eq!((g.rows(), g.cols()), (n, n), "{name}: metric shape");
    assert!(g.is_symmetric(), "{name}: metric is not symmetric");

    let product = g.product(derivation.inverse_metric(), &Canonical);
    assert!(
        product.equivalent(&Matrix::identity(n)),
        "{name}: g·g⁻¹ is not the identity: {:?}",
        product.rendered()
    );

    let gamma = derivation.christoffel();
    assert_eq!(gamma.dimension(), n, "{name}: christoffel dimension");
    assert!(gamma.is_symmetric(), "{name}: christoffel is not symmetric");

    let geodesics = derivation.geodesics();
    assert_eq!(geodesics.len(), n, "{name}: one equation per coordinate");
    for (eq, q) in geodesics.iter().zip(entry.coordinates) {
        assert_eq!(eq.coordinate().as_str(), *q, "{name}: equation order");
        assert_eq!(eq.acceleration().as_str(), format!("dd{q}"));
    }
}

#[test]
fn catalog_systems_are_consistent() {
    assert!(entries().any(|e| e.slow), "slow entries are checked too");
    for entry in entries() {
        let derivation = entry.id.derive().unwrap_or_else(|e| panic!("{}: {e}", entry.id));
        check_properties(entry, &derivation);
    }
}

#[test]
fn catalog_derivations_are_deterministic() {
    for entry in entries() {
        let a = entry.id.derive().unwrap_or_else(|e| panic!("{}: {e}", entry.id));
        let b = entry.id.derive().unwrap_or_else(|e| panic!("{}: {e}", entry.id));
        assert_eq!(a, b, "{}: derivations differ", entry.id);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(
            serde_json::to_value(a.report()).expect("serializes"),
            serde_json::to_value(b.report()).expect("serializes"),
        );
    }
}

#[test]
fn fingerprints_distinguish_systems() {
    let mut seen = std::collections::BTreeSet::new();
    for entry in entries() {
        let d = entry.id.derive().unwrap_or_else(|e| panic!("{}: {e}", entry.id));
        assert!(seen.insert(d.fingerprint().0), "{}: fingerprint collision", entry.id);
    }
}
