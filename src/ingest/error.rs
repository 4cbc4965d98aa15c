//! Error types for ingestion

use std::path::PathBuf;
use thiserror::Error;

use crate::bundle::ExtractError;
use crate::flatten::FlattenError;
use crate::schema::SchemaError;
use crate::table::TableError;

/// Errors raised while reading one document
#[derive(Error, Debug)]
pub enum SourceError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON
    #[error("JSON parsing error in {source_name}: {error}")]
    Json { source_name: String, error: String },

    /// The endpoint does not look like an http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request failed or returned a non-success status
    #[error("Request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    /// Pattern matching error
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

impl SourceError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            SourceError::FileNotFound(path) => {
                format!(
                    "File not found: {}\n\nHint: Check the path or quote glob patterns.",
                    path.display()
                )
            }
            SourceError::InvalidUrl(url) => {
                format!(
                    "Invalid URL: {url}\n\n\
                    Hint: Use a full endpoint such as https://hapi.fhir.org/baseR4/Patient"
                )
            }
            SourceError::Http { url, reason } => {
                format!(
                    "Could not fetch {url}: {reason}\n\n\
                    Hint: Check the server is reachable or raise --timeout."
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Errors that can occur during ingestion
#[derive(Error, Debug)]
pub enum IngestError {
    /// A document could not be loaded
    #[error("{source_name}: {error}")]
    Source {
        source_name: String,
        #[source]
        error: SourceError,
    },

    /// A document has neither Bundle nor resource shape
    #[error("{source_name}: {error}")]
    Extract {
        source_name: String,
        #[source]
        error: ExtractError,
    },

    /// A resource could not be flattened
    #[error("{source_name}: {error}")]
    Flatten {
        source_name: String,
        #[source]
        error: FlattenError,
    },

    /// No column spec for the requested resource type
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Table assembly failed; this aborts the whole run
    #[error(transparent)]
    Table(#[from] TableError),

    /// Input resolution failed before any document was read
    #[error(transparent)]
    Input(#[from] SourceError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl IngestError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            IngestError::Source { source_name, error } => {
                format!("{source_name}: {}", error.user_message())
            }
            IngestError::Schema(e) => e.user_message(),
            IngestError::Table(e) => e.user_message(),
            IngestError::Input(e) => e.user_message(),
            IngestError::InvalidConfig(msg) => {
                format!("Invalid configuration: {msg}\n\nHint: Check your ingest configuration.")
            }
            _ => self.to_string(),
        }
    }

    /// Whether the error belongs to a single document, so the run may go on
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            IngestError::Source { .. } | IngestError::Extract { .. } | IngestError::Flatten { .. }
        )
    }
}
