use crate::cli::RunOptions;
use crate::support::{exit_with, pipeline, print_derivation, render_json};
use metrica_kernel::catalog::lookup;
use tracing::warn;

pub fn run(system: &str, options: RunOptions) {
    let entry = lookup(system).unwrap_or_else(|err| exit_with(&err, options.json));
    if entry.slow && options.timeout_ms.is_none() {
        warn!(system = %entry.id, "this system is slow to simplify; consider --timeout-ms");
    }

    let derivation = entry
        .derive_with(&pipeline(options))
        .unwrap_or_else(|err| exit_with(&err, options.json));

    if options.json {
        let payload = derivation.report().named(entry.id.name()).to_json();
        println!("{}", render_json(&payload, "derivation"));
        return;
    }
    print_derivation(entry.id.name(), &derivation);
}
