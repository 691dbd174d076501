//! Integration tests: closed-form results for well-known coordinate systems,
//! plus the failure modes of each pipeline stage.

use metrica_algebra::{AlgebraError, Deferred, Expr, RationalFunction, lower, parse};
use metrica_kernel::{
    Cancellation, CoordinateSet, Embedding, ErrorStage, MetricaError, Pipeline, SystemFile,
    SystemId, derive, register,
};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

fn value(coords: &CoordinateSet, source: &str) -> RationalFunction {
    let expr = parse(source).unwrap_or_else(|e| panic!("failed to parse {source}: {e}"));
    lower(&expr, &coords.scope()).unwrap_or_else(|e| panic!("failed to lower {source}: {e}"))
}

fn custom(names: &[&str], embedding: &[&str]) -> Result<metrica_kernel::Derivation, MetricaError> {
    let coords = register(names)?;
    Pipeline::new().run(coords, Embedding::parse(embedding)?)
}

#[test]
fn flat_plane_has_no_christoffel_symbols() {
    let d = custom(&["u", "v"], &["u", "v"]).expect("derives");
    assert_eq!(d.metric().rendered(), vec![vec!["1", "0"], vec!["0", "1"]]);
    assert_eq!(d.christoffel().nonzero().count(), 0);
    let lines: Vec<String> = d.geodesics().iter().map(ToString::to_string).collect();
    assert_eq!(lines, vec!["ddu", "ddv"]);
}

#[test]
fn polar_summary() {
    let d = SystemId::Polar.derive().expect("derives");
    let mut lines = d.transformation();
    lines.push(d.line_element());
    for eq in d.geodesics() {
        lines.push(format!("{} = {}", eq.acceleration(), eq.solved()));
    }
    insta::assert_snapshot!(lines.join("\n"), @r"
    x = r*cos(t)
    y = r*sin(t)
    ds^2 = dr^2 + dt^2*r^2
    ddr = dt^2*r
    ddt = -2*dr*dt/r
    ");
}

#[test]
fn two_sphere_values() {
    let d = SystemId::TwoSphere.derive().expect("derives");
    assert_eq!(d.metric().get(1, 1).to_string(), "sin(f)^2");
    assert_eq!(d.christoffel().get(0, 1, 1).to_string(), "-sin(f)*cos(f)");
    assert_eq!(d.christoffel().get(1, 0, 1).to_string(), "cos(f)/sin(f)");
    assert_eq!(d.line_element(), "ds^2 = df^2 + dt^2*sin(f)^2");
    let lines: Vec<String> = d.geodesics().iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec!["ddf - dt^2*sin(f)*cos(f)", "ddt + 2*df*dt*cos(f)/sin(f)"]
    );
}

#[test]
fn parabolic_values() {
    let d = SystemId::Parabolic.derive().expect("derives");
    let gamma = d.christoffel();
    assert_eq!(gamma.get(0, 0, 0).to_string(), "u/(u^2 + v^2)");
    assert_eq!(gamma.get(0, 1, 1).to_string(), "-u/(u^2 + v^2)");
    assert_eq!(gamma.get(0, 0, 1).to_string(), "v/(u^2 + v^2)");
    assert_eq!(gamma.get(1, 1, 1).to_string(), "v/(u^2 + v^2)");
    assert_eq!(gamma.get(1, 0, 0).to_string(), "-v/(u^2 + v^2)");
    assert_eq!(gamma.nonzero().count(), 8);
}

#[test]
fn bipolar_denominators_stay_factored() {
    let d = SystemId::Bipolar.derive().expect("derives");
    assert_eq!(d.metric().get(0, 0).to_string(), "4*sin(s)^2/sin(s - t)^4");
    assert_eq!(d.metric().get(1, 1).to_string(), "4*sin(t)^2/sin(s - t)^4");
}

#[test]
fn cylindrical_and_spherical_metrics() {
    let d = SystemId::Cylindrical.derive().expect("derives");
    let coords = d.coordinates().clone();
    assert!(d.metric().get(0, 0).equivalent(&value(&coords, "1")));
    assert!(d.metric().get(1, 1).equivalent(&value(&coords, "r^2")));
    assert!(d.metric().get(2, 2).equivalent(&value(&coords, "1")));
    assert_eq!(d.christoffel().nonzero().count(), 3);

    let d = SystemId::Spherical.derive().expect("derives");
    let coords = d.coordinates().clone();
    assert!(d.metric().get(1, 1).equivalent(&value(&coords, "r^2")));
    assert!(d.metric().get(2, 2).equivalent(&value(&coords, "r^2*sin(f)^2")));
    assert!(d.metric().get(0, 2).is_zero());
    let gamma = d.christoffel();
    assert!(gamma.get(0, 1, 1).equivalent(&value(&coords, "-r")));
    assert!(gamma.get(0, 2, 2).equivalent(&value(&coords, "-r*sin(f)^2")));
    assert!(gamma.get(1, 0, 1).equivalent(&value(&coords, "1/r")));
    assert!(gamma.get(1, 2, 2).equivalent(&value(&coords, "-sin(f)*cos(f)")));
    assert!(gamma.get(2, 0, 2).equivalent(&value(&coords, "1/r")));
    assert!(gamma.get(2, 1, 2).equivalent(&value(&coords, "cos(f)/sin(f)")));
}

#[test]
fn elliptic_metric_is_conformal() {
    let d = SystemId::Elliptic.derive().expect("derives");
    let coords = d.coordinates().clone();
    let scale = value(&coords, "sinh(m)^2 + sin(n)^2");
    assert!(d.metric().get(0, 0).equivalent(&scale));
    assert!(d.metric().get(1, 1).equivalent(&scale));
    assert!(d.metric().get(0, 1).is_zero());
}

#[test]
fn exponential_conformal_map() {
    let d = custom(&["u", "v"], &["exp(u)*cos(v)", "exp(u)*sin(v)"]).expect("derives");
    assert_eq!(d.metric().get(0, 0).to_string(), "exp(u)^2");
    assert_eq!(d.metric().get(1, 1).to_string(), "exp(u)^2");
    assert!(d.metric().get(0, 1).is_zero());
    let gamma = d.christoffel();
    assert_eq!(gamma.get(0, 0, 0).to_string(), "1");
    assert_eq!(gamma.get(0, 1, 1).to_string(), "-1");
    assert_eq!(gamma.get(1, 0, 1).to_string(), "1");
    assert_eq!(gamma.nonzero().count(), 4);
}

#[test]
fn oversized_inputs_are_errors() {
    let nested = format!("{}u{}", "(".repeat(200_000), ")".repeat(200_000));
    for source in ["u^2147483647*u", "u^1000*u^1000", nested.as_str()] {
        let err = custom(&["u", "v"], &[source, "v"]).expect_err("rejected");
        match err {
            MetricaError::SymbolicEvaluation {
                component: 0,
                source: AlgebraError::Parse { .. } | AlgebraError::ExponentOverflow { .. },
            } => {}
            other => panic!("unexpected result: {other}"),
        }
    }
}

#[test]
fn invalid_names_fail_in_the_registry() {
    for names in [vec!["r", "r"], vec!["x", "y"], vec!["x", "t"], vec!["t", "dt"], vec![]] {
        let err = custom(&names, &["1", "2"]).expect_err("rejected");
        assert!(
            matches!(err, MetricaError::InvalidCoordinateName { .. }),
            "{names:?} gave {err}"
        );
        assert_eq!(err.stage(), ErrorStage::Registry);
    }
}

#[test]
fn unknown_symbols_fail_in_the_embedding() {
    let err = custom(&["u", "v"], &["u", "v*w"]).expect_err("w is not a coordinate");
    assert!(matches!(
        err,
        MetricaError::SymbolicEvaluation { component: 1, .. }
    ));
    assert_eq!(err.stage(), ErrorStage::Embedding);
}

#[test]
fn short_embeddings_are_rejected() {
    let err = custom(&["u", "v"], &["u*v"]).expect_err("one component for two coordinates");
    assert!(matches!(
        err,
        MetricaError::EmbeddingDimension {
            ambient: 1,
            coordinates: 2
        }
    ));
}

#[test]
fn degenerate_embeddings_are_singular() {
    let err = custom(&["u", "v"], &["u + v", "u + v"]).expect_err("rank one");
    assert!(matches!(err, MetricaError::SingularMetric { dimension: 2 }));
    assert_eq!(err.stage(), ErrorStage::Metric);
}

#[test]
fn cancellation_by_flag_and_deadline() {
    let entry = SystemId::Spherical.entry();

    let flagged = Pipeline::new()
        .with_cancellation(Cancellation::none().with_flag(Arc::new(AtomicBool::new(true))));
    let err = entry.derive_with(&flagged).expect_err("flag is set");
    assert!(matches!(
        err,
        MetricaError::Cancelled {
            stage: ErrorStage::Christoffel,
            completed: 0,
            total: 27
        }
    ));

    let expired = Pipeline::new().with_cancellation(Cancellation::none().with_deadline(Instant::now()));
    let err = entry.derive_with(&expired).expect_err("deadline passed");
    assert_eq!(err.stage(), ErrorStage::Christoffel);

    let unset = Pipeline::new().with_cancellation(Cancellation::none());
    assert!(entry.derive_with(&unset).is_ok());
}

#[test]
fn deferred_simplification_is_equivalent() {
    let canonical = SystemId::TwoSphere.derive().expect("derives");
    let deferred = SystemId::TwoSphere
        .derive_with(&Pipeline::new().with_simplifier(Deferred))
        .expect("derives");
    assert!(canonical.metric().equivalent(deferred.metric()));
    assert!(canonical.inverse_metric().equivalent(deferred.inverse_metric()));
    for (a, b) in canonical.geodesics().iter().zip(deferred.geodesics()) {
        assert!(a.expression().equivalent(&b.expression()));
    }
    assert_eq!(canonical.fingerprint(), deferred.fingerprint());
}

#[test]
fn expression_input_matches_catalog() {
    let (r, t) = (Expr::sym("r"), Expr::sym("t"));
    let direct = derive(
        ["r", "t"],
        vec![r.clone() * metrica_algebra::cos(t.clone()), r * metrica_algebra::sin(t)],
    )
    .expect("derives");
    let catalog = SystemId::Polar.derive().expect("derives");
    assert_eq!(direct.fingerprint(), catalog.fingerprint());
}

#[test]
fn definition_files_run_through_the_pipeline() {
    let file = SystemFile::from_toml_str(
        r#"
[[system]]
name = "elliptic"
coordinates = ["m", "n"]
embedding = ["cosh(m)*cos(n)", "sinh(m)*sin(n)"]
"#,
    )
    .expect("valid file");
    let from_file = file
        .get("elliptic")
        .expect("present")
        .derive_with(&Pipeline::new())
        .expect("derives");
    let from_catalog = SystemId::Elliptic.derive().expect("derives");
    assert_eq!(from_file.fingerprint(), from_catalog.fingerprint());
}
