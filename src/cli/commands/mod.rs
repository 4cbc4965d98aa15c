//! CLI command implementations

pub mod flatten;
pub mod specs;
pub mod tabulate;

use std::path::Path;

use crate::cli::CliError;
use crate::schema::SpecCatalog;

/// Built-in specs, overlaid with a user catalog file when given
pub fn load_catalog(spec_file: Option<&Path>) -> Result<SpecCatalog, CliError> {
    let mut catalog = SpecCatalog::builtin();
    if let Some(path) = spec_file {
        catalog.merge(SpecCatalog::from_path(path)?);
    }
    Ok(catalog)
}

/// Write to a file or print to stdout
pub fn emit(content: &str, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
            eprintln!("Written to: {}", path.display());
        }
        None => println!("{}", content.trim_end_matches('\n')),
    }
    Ok(())
}
