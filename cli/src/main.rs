#![deny(missing_docs)]

//! # Clientgen CLI
//!
//! Command line front-end for the client generator.
//!
//! Supported Commands:
//! - `generate`: OpenAPI description -> client SDK sources for one language.

use clap::{Parser, Subcommand};
use clientgen_core::AppResult;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI client SDK generator")]
struct Cli {
    /// Log filter directive (e.g. `debug`, `clientgen_core=trace`). Falls back to `RUST_LOG`, then `info`.
    #[clap(long, global = true, env = "CLIENTGEN_LOG_LEVEL")]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates a client SDK from an OpenAPI description.
    Generate(generate::GenerateArgs),
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match &cli.command {
        Commands::Generate(args) => generate::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "clientgen",
            "--log-level",
            "debug",
            "generate",
            "--openapi",
            "pets.yaml",
            "--language",
            "go",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Commands::Generate(args) = cli.command;
        assert_eq!(args.openapi.as_deref(), Some(std::path::Path::new("pets.yaml")));
        assert_eq!(args.language.as_deref(), Some("go"));
    }
}
