//! Error types for column specs and catalogs

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or loading column specs
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A spec without a resource type
    #[error("Column spec has no resource type")]
    MissingResourceType,

    /// A column declared in more than one bucket
    #[error("Column {column} of {resource_type} is declared in more than one bucket")]
    Overlap {
        resource_type: String,
        column: String,
    },

    /// No spec for the requested resource type
    #[error("No column spec for resource type: {0}")]
    UnknownResourceType(String),

    /// Catalog content could not be parsed
    #[error("Failed to parse column spec catalog ({format}): {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// Catalog file extension is not one of yaml, yml, json, toml
    #[error("Unsupported catalog file: {0}")]
    UnsupportedFormat(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            SchemaError::UnknownResourceType(resource_type) => format!(
                "No column spec for resource type: {resource_type}\n\n\
                Hint: Run 'fhir-tabular specs' to list the built-in specs, or pass --spec-file."
            ),
            SchemaError::Overlap {
                resource_type,
                column,
            } => format!(
                "Column {column} of {resource_type} is declared in more than one bucket.\n\n\
                Hint: A column must be exactly one of string, categorical or numeric."
            ),
            SchemaError::UnsupportedFormat(path) => format!(
                "Unsupported catalog file: {}\n\nHint: Use a .yaml, .yml, .json or .toml file.",
                path.display()
            ),
            _ => self.to_string(),
        }
    }
}
