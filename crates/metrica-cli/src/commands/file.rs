use crate::cli::RunOptions;
use crate::support::{derivation_set_json, exit_with, pipeline, print_derivation, render_json};
use metrica_kernel::{SystemDefinition, SystemFile};
use tracing::info;

pub fn run(path: &str, name: Option<&str>, options: RunOptions) {
    let file = SystemFile::load(path).unwrap_or_else(|err| exit_with(&err, options.json));
    let selected: Vec<&SystemDefinition> = match name {
        Some(name) => vec![file.get(name).unwrap_or_else(|err| exit_with(&err, options.json))],
        None => file.systems.iter().collect(),
    };
    info!(path, systems = selected.len(), "loaded system definitions");

    let pipeline = pipeline(options);
    let mut reports = Vec::with_capacity(selected.len());
    for (idx, system) in selected.iter().enumerate() {
        let derivation = system
            .derive_with(&pipeline)
            .unwrap_or_else(|err| exit_with(&err, options.json));
        if options.json {
            reports.push(derivation.report().named(system.name.as_str()));
        } else {
            if idx > 0 {
                println!();
            }
            print_derivation(&system.name, &derivation);
        }
    }

    if options.json {
        println!("{}", render_json(&derivation_set_json(reports), "derivation set"));
    }
}
