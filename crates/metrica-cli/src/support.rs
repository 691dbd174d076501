use crate::cli::RunOptions;
use metrica_kernel::{Cancellation, Derivation, DerivationReport, ErrorStage, MetricaError, Pipeline};
use serde::Serialize;
use serde_json::{Value, json};
use std::io::IsTerminal;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "METRICA_LOG";

/// Installs the stderr log subscriber. `--verbose` wins over `METRICA_LOG`;
/// without either only warnings are shown.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

pub fn pipeline(options: RunOptions) -> Pipeline {
    let cancellation = match options.timeout_ms {
        Some(ms) => Cancellation::none().with_timeout(Duration::from_millis(ms)),
        None => Cancellation::none(),
    };
    Pipeline::new().with_cancellation(cancellation)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorPayload {
    stage: ErrorStage,
    message: String,
}

/// Reports `err` and exits with status 1. In JSON mode the error is
/// printed to stdout as `{"error": {"stage", "message"}}`.
pub fn exit_with(err: &MetricaError, json_output: bool) -> ! {
    if json_output {
        let payload = json!({
            "error": ErrorPayload {
                stage: err.stage(),
                message: err.to_string(),
            }
        });
        println!("{}", render_json(&payload, "error"));
    } else {
        eprintln!("error: {err}");
    }
    std::process::exit(1);
}

pub fn render_json(payload: &Value, what: &str) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|err| {
        eprintln!("error: failed to render {what} json: {err}");
        std::process::exit(2);
    })
}

/// Text rendering of one derivation.
pub fn print_derivation(title: &str, derivation: &Derivation) {
    let report = derivation.report();
    println!("{title} {}", derivation.coordinates());
    println!("Coordinate transformation:");
    for line in &report.transformation {
        println!("  {line}");
    }
    println!("Line element:");
    println!("  {}", report.line_element);
    println!("Christoffel symbols:");
    if report.christoffel.is_empty() {
        println!("  (all zero)");
    }
    for row in &report.christoffel {
        println!(
            "  Gamma^{}_({},{}) = {}",
            row.upper, row.lower[0], row.lower[1], row.value
        );
    }
    println!("Second derivative components:");
    for row in &report.geodesics {
        println!("  {} = {}", row.acceleration, row.solved);
    }
    println!("Fingerprint: {}", report.fingerprint.short(16));
}

pub fn derivation_set_json(reports: Vec<DerivationReport>) -> Value {
    json!({
        "schema": 1,
        "reportKind": "metrica.derivation_set.v1",
        "derivations": reports,
    })
}
