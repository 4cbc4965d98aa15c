//! Errors reported by the command-line tool

use thiserror::Error;

use crate::bundle::ExtractError;
use crate::export::ExportError;
use crate::flatten::FlattenError;
use crate::ingest::{IngestError, SourceError};
use crate::schema::SchemaError;

/// Errors returned by command handlers
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Flatten(#[from] FlattenError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            CliError::Ingest(e) => e.user_message(),
            CliError::Source(e) => e.user_message(),
            CliError::Schema(e) => e.user_message(),
            CliError::Extract(e) => format!(
                "{e}\n\nHint: Input must be a FHIR Bundle with an `entry` array or a single resource."
            ),
            _ => self.to_string(),
        }
    }
}
