//! fhir-tabular command-line interface

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use fhir_tabular::cli::CliError;
use fhir_tabular::cli::commands::flatten::{FlattenArgs, handle_flatten};
use fhir_tabular::cli::commands::specs::{SpecsArgs, handle_specs};
use fhir_tabular::cli::commands::tabulate::{TabulateArgs, handle_tabulate};
use fhir_tabular::cli::logging::init_logging;

/// Flatten FHIR resources into typed tables
#[derive(Parser)]
#[command(name = "fhir-tabular")]
#[command(author, version, about = "Flatten FHIR Bundles into typed tables", long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a typed table from Bundles or resources
    Tabulate {
        /// Files, glob patterns or http(s) URLs
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Resource type to tabulate
        #[arg(short, long, default_value = "Patient")]
        resource_type: String,
        /// Column spec catalog (yaml, json or toml) overlaid on the built-ins
        #[arg(long)]
        spec_file: Option<PathBuf>,
        /// Output format (tab, json, summary)
        #[arg(short, long, default_value = "tab")]
        format: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Stop at the first document that fails
        #[arg(long)]
        fail_fast: bool,
        /// Keep columns missing from the column spec as string columns
        #[arg(long)]
        keep_undeclared: bool,
        /// HTTP timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Print flattened resources as JSON
    Flatten {
        /// File or http(s) URL
        input: String,
        /// Only flatten resources of this type
        #[arg(short, long)]
        resource_type: Option<String>,
        /// HTTP timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Print the column spec catalog
    Specs {
        /// Only print this resource type
        #[arg(short, long)]
        resource_type: Option<String>,
        /// Column spec catalog overlaid on the built-ins
        #[arg(long)]
        spec_file: Option<PathBuf>,
        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let result = match cli.command {
        Commands::Tabulate {
            inputs,
            resource_type,
            spec_file,
            format,
            output,
            fail_fast,
            keep_undeclared,
            timeout,
        } => handle_tabulate(&TabulateArgs {
            inputs,
            resource_type,
            spec_file,
            format,
            output,
            fail_fast,
            keep_undeclared,
            timeout,
        }),
        Commands::Flatten {
            input,
            resource_type,
            timeout,
        } => handle_flatten(&FlattenArgs {
            input,
            resource_type,
            timeout,
        }),
        Commands::Specs {
            resource_type,
            spec_file,
            format,
        } => handle_specs(&SpecsArgs {
            resource_type,
            spec_file,
            format,
        }),
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
    Ok(())
}

fn report(error: &CliError) {
    eprintln!("Error: {}", error.user_message());
}
