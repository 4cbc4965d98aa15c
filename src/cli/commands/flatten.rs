//! CLI command for printing flattened resources

use indexmap::IndexMap;
use serde_json::Value;

use crate::bundle::{extract, extract_all};
use crate::cli::CliError;
use crate::cli::commands::emit;
use crate::flatten::Flattener;
use crate::ingest::{DocumentSource, Fetcher, HttpFetcher};
use crate::models::FlatRow;

/// Arguments for the `flatten` command
pub struct FlattenArgs {
    /// File or URL
    pub input: String,
    /// Only flatten resources of this type
    pub resource_type: Option<String>,
    /// HTTP timeout in seconds
    pub timeout: u64,
}

/// Handle the `flatten` command
///
/// With a resource type the output is an array of rows, otherwise an object
/// keyed by resource type.
pub fn handle_flatten(args: &FlattenArgs) -> Result<(), CliError> {
    let fetcher = HttpFetcher::new(args.timeout)?;
    let document = load(&args.input, &fetcher)?;
    let flattener = Flattener::new();

    let output = match &args.resource_type {
        Some(resource_type) => {
            let extraction = extract(document, resource_type)?;
            let rows = flattener.flatten_all(&extraction.resources)?;
            eprintln!("Flattened {} {} resource(s)", rows.len(), resource_type);
            serde_json::to_value(rows)
        }
        None => {
            let mut grouped: IndexMap<String, Vec<FlatRow>> = IndexMap::new();
            for (resource_type, resources) in extract_all(document)? {
                grouped.insert(resource_type, flattener.flatten_all(&resources)?);
            }
            eprintln!("Flattened {} resource type(s)", grouped.len());
            serde_json::to_value(grouped)
        }
    }
    .map_err(|e| CliError::InvalidArgument(e.to_string()))?;

    let output_str = serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    emit(&output_str, None)
}

fn load(input: &str, fetcher: &dyn Fetcher) -> Result<Value, CliError> {
    Ok(DocumentSource::parse(input).load(fetcher)?)
}
