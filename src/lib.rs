//! FHIR Tabular - flatten FHIR resources into typed tables
//!
//! Provides:
//! - Resource flattening (nested JSON to one-level `FlatRow`s)
//! - Bundle resource extraction
//! - Column specs per resource type, built-in and file based
//! - Typed table assembly (numeric, categorical, string)
//! - Multi-document ingestion from files, globs and FHIR endpoints
//! - Table export (tab-separated, JSON)

pub mod bundle;
pub mod export;
pub mod flatten;
pub mod ingest;
pub mod models;
pub mod schema;
pub mod table;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use bundle::{ExtractError, Extraction, Layout, extract, extract_all};
pub use export::{ExportError, ExportFormat, JsonExporter, TabExporter};
pub use flatten::{FlattenConfig, FlattenError, Flattener, flatten};
pub use ingest::{
    DocumentSource, IngestConfig, IngestError, IngestReport, IngestStats, Ingestor, SourceError,
    tabulate_documents,
};
pub use schema::{ColumnSpec, DriftPolicy, SchemaError, SpecCatalog};
pub use table::{TableBuilder, TableError, build_table};

// Re-export models
pub use models::{Cell, ColumnKind, ColumnRole, FlatRow, NULL_MARKER, Table, TableColumn};
