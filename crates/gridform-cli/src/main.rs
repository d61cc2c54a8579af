//! Gridform CLI - schema-checked tabular data.

mod cli;
mod commands;
mod config;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use config::{FileConfig, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let file = FileConfig::load_optional(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            files,
            schema,
            parser,
            json,
        } => {
            let settings = Settings::resolve(file, &schema, &parser, None)?;
            commands::check::run(files, settings, json)
        }

        Commands::Diff {
            original,
            edited,
            schema,
            parser,
        } => {
            let settings = Settings::resolve(file, &schema, &parser, None)?;
            commands::diff::run(original, edited, settings)
        }

        Commands::Serve {
            files,
            port,
            schema,
            parser,
        } => {
            let settings = Settings::resolve(file, &schema, &parser, port)?;
            commands::serve::run(files, settings)
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "gridform=debug,gridform_cli=debug,tower_http=debug"
    } else {
        "gridform=info,gridform_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
