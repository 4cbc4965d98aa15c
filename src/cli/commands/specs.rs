//! CLI command for printing column specs

use std::path::PathBuf;

use crate::cli::CliError;
use crate::cli::commands::{emit, load_catalog};

/// Arguments for the `specs` command
pub struct SpecsArgs {
    /// Only print the column spec of this resource type
    pub resource_type: Option<String>,
    /// Catalog file overlaid on the built-in specs
    pub spec_file: Option<PathBuf>,
    /// Output format (yaml, json)
    pub format: String,
}

/// Handle the `specs` command
pub fn handle_specs(args: &SpecsArgs) -> Result<(), CliError> {
    let mut catalog = load_catalog(args.spec_file.as_deref())?;
    if let Some(resource_type) = &args.resource_type {
        catalog = catalog.only(resource_type)?;
    }

    let output_str = match args.format.as_str() {
        "json" => catalog.to_json_string()?,
        "yaml" => catalog.to_yaml_string()?,
        other => {
            return Err(CliError::InvalidArgument(format!(
                "unknown format {other}. Valid options: yaml, json"
            )));
        }
    };

    emit(&output_str, None)
}
