use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "metrica",
    about = "Metrica: metrics, Christoffel symbols and geodesic equations of coordinate systems",
    version
)]
pub struct Cli {
    /// Log pipeline stages at debug level (overrides METRICA_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that runs a derivation.
#[derive(Args, Debug, Clone, Copy)]
pub struct RunOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Abandon the Christoffel stage after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the built-in coordinate systems
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Derive a built-in coordinate system
    Derive {
        /// System name (polar, parabolic, bipolar, 2-sphere, cylindrical, spherical, elliptic)
        system: String,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Derive a coordinate system given on the command line
    Custom {
        /// Comma-separated coordinate names, e.g. `r,t`
        #[arg(long, value_delimiter = ',', required = true)]
        coords: Vec<String>,

        /// One embedding component; repeat once per ambient axis
        #[arg(long = "embed", required = true)]
        embedding: Vec<String>,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Derive the systems defined in a TOML file
    File {
        /// Path to the system-definition file
        path: String,

        /// Only derive the system with this name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        options: RunOptions,
    },
}
