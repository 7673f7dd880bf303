//! cache-data: inspect and resolve region snapshot resources
//!
//! ## Commands
//!
//! - **resolve**: show where a region would be exported to or imported from
//! - **inspect**: list the entries of a JSON snapshot
//! - **normalize**: rewrite a snapshot so every typed entry carries `@type`
//!
//! ## Example Usage
//!
//! ```bash
//! # Where would region Example be exported?
//! cache-data resolve --region Example
//!
//! # Import location with an override template
//! cache-data resolve --region Example --import \
//!     --property 'cache.data.import.resource.location=file:///srv/#{#regionName}.json'
//!
//! # List the entries of a snapshot
//! cache-data inspect file:///srv/example.json
//!
//! # Normalize a snapshot into a new file
//! cache-data normalize classpath:example.json --output file:///tmp/example.json
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cache_data_cli;

use cache_data_cli::{
    inspect::InspectCmd, normalize::NormalizeCmd, resolve::ResolveCmd, CliContext,
};

#[derive(Parser)]
#[command(
    name = "cache-data",
    author,
    version,
    about = "Region snapshot import/export tooling",
    long_about = "Resolve, inspect and normalize the JSON resources that regions are \
                  exported to and imported from."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set a property (key=value), overriding the process environment
    #[arg(long = "property", short = 'D', global = true, value_parser = cache_data_cli::parse_property)]
    properties: Vec<(String, String)>,

    /// Activate a profile (repeatable)
    #[arg(long = "profile", global = true)]
    profiles: Vec<String>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the export (default) or import resource for a region
    Resolve(ResolveCmd),

    /// List the entries stored in a snapshot resource
    Inspect(InspectCmd),

    /// Rewrite a snapshot with type metadata restored
    Normalize(NormalizeCmd),
}

fn main() -> Result<()> {
    let Cli {
        command,
        properties,
        profiles,
        json,
        verbose,
    } = Cli::parse();

    cache_data_cli::init_tracing(verbose);

    let context = CliContext {
        environment: Arc::new(cache_data_cli::build_environment(properties, profiles)),
        json,
    };

    match command {
        Commands::Resolve(cmd) => cmd.execute(&context),
        Commands::Inspect(cmd) => cmd.execute(&context),
        Commands::Normalize(cmd) => cmd.execute(&context),
    }
}
