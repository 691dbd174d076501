//! Metrica CLI: the `metrica` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.verbose);

    match cli.command {
        Commands::List { json } => commands::list::run(json),

        Commands::Derive { system, options } => commands::derive::run(&system, options),

        Commands::Custom {
            coords,
            embedding,
            options,
        } => commands::custom::run(coords, embedding, options),

        Commands::File {
            path,
            name,
            options,
        } => commands::file::run(&path, name.as_deref(), options),
    }
}
