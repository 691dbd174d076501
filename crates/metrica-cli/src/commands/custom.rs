use crate::cli::RunOptions;
use crate::support::{exit_with, pipeline, print_derivation, render_json};
use metrica_kernel::{Embedding, register};

pub fn run(coords: Vec<String>, embedding: Vec<String>, options: RunOptions) {
    let coordinates = register(&coords).unwrap_or_else(|err| exit_with(&err, options.json));
    let embedding = Embedding::parse(&embedding).unwrap_or_else(|err| exit_with(&err, options.json));

    let derivation = pipeline(options)
        .run(coordinates, embedding)
        .unwrap_or_else(|err| exit_with(&err, options.json));

    if options.json {
        let payload = derivation.report().named("custom").to_json();
        println!("{}", render_json(&payload, "derivation"));
        return;
    }
    print_derivation("custom", &derivation);
}
