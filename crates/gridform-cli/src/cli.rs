//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Gridform: check and edit tabular data against a form schema
#[derive(Parser)]
#[command(name = "gridform")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "GRIDFORM_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest files and report validation failures
    Check {
        /// Data files (CSV/TSV); all are ingested together
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        schema: SchemaArgs,

        #[command(flatten)]
        parser: ParserArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what changed between an original file and its edited version
    Diff {
        /// The file as originally ingested
        #[arg(value_name = "ORIGINAL")]
        original: PathBuf,

        /// The edited file; rows are matched to ORIGINAL by position
        #[arg(value_name = "EDITED")]
        edited: PathBuf,

        #[command(flatten)]
        schema: SchemaArgs,

        #[command(flatten)]
        parser: ParserArgs,
    },

    /// Serve the grid API
    Serve {
        /// Files to load before accepting requests
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Port for web server
        #[arg(short, long, env = "GRIDFORM_PORT")]
        port: Option<u16>,

        #[command(flatten)]
        schema: SchemaArgs,

        #[command(flatten)]
        parser: ParserArgs,
    },
}

/// Where the form schema comes from.
#[derive(Args, Clone, Debug, Default)]
pub struct SchemaArgs {
    /// Load the schema from a local JSON file (takes precedence over --schema-url)
    #[arg(long = "schema", value_name = "FILE")]
    pub schema_path: Option<PathBuf>,

    /// Base URL of the service exposing /api/v1/forms
    #[arg(long, env = "GRIDFORM_SCHEMA_URL", value_name = "URL")]
    pub schema_url: Option<String>,
}

/// Parser overrides.
#[derive(Args, Clone, Debug, Default)]
pub struct ParserArgs {
    /// Field delimiter (auto-detected when omitted)
    #[arg(short, long)]
    pub delimiter: Option<char>,
}
