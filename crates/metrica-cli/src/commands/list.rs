use crate::support::render_json;
use metrica_kernel::catalog::{catalog_json, catalog_rows};

pub fn run(json_output: bool) {
    if json_output {
        println!("{}", render_json(&catalog_json(), "catalog"));
        return;
    }

    println!("metrica catalog");
    for row in catalog_rows() {
        let slow = if row.slow { " (slow)" } else { "" };
        println!(
            "  {:<12} ({}){slow}  {}",
            row.id.name(),
            row.coordinates.join(", "),
            row.summary
        );
    }
}
