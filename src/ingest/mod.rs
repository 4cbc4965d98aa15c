//! Multi-document ingestion
//!
//! Reads each document in turn, extracts the resources of the configured
//! type, flattens them and feeds the rows into one [`TableBuilder`].
//! Problems confined to a document are recorded in [`IngestStats`] and the
//! run goes on; a numeric column that does not parse aborts the run.

mod config;
mod error;
mod source;

pub use config::{IngestConfig, IngestConfigBuilder};
pub use error::{IngestError, SourceError};
#[cfg(feature = "http")]
pub use source::HttpFetcher;
pub use source::{
    DocumentSource, Fetcher, OfflineFetcher, discover_files, read_json_file, resolve_inputs,
    validate_endpoint,
};

use std::time::{Duration, Instant};

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, info_span, warn};

use crate::bundle::extract;
use crate::flatten::Flattener;
use crate::models::Table;
use crate::schema::{ColumnSpec, SpecCatalog};
use crate::table::TableBuilder;

/// Statistics from an ingestion run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    /// Documents read and extracted without error
    pub documents_processed: usize,
    /// Documents skipped because of an error
    pub documents_failed: usize,
    /// Resources of the requested type found
    pub resources_extracted: usize,
    /// Bundle entries without a usable resource
    pub skipped_entries: usize,
    /// Number of errors encountered
    pub errors_count: usize,
    /// List of errors (limited to first 100)
    pub errors: Vec<String>,
    /// Duration of the run
    #[serde(skip)]
    pub duration: Duration,
}

impl IngestStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error (limited to 100)
    pub fn add_error(&mut self, error: String) {
        self.errors_count += 1;
        if self.errors.len() < 100 {
            self.errors.push(error);
        }
    }

    /// Whether any document failed
    pub fn has_failures(&self) -> bool {
        self.documents_failed > 0
    }

    /// Format duration as human-readable string
    pub fn duration_string(&self) -> String {
        let millis = self.duration.as_millis();
        if millis < 1000 {
            format!("{}ms", millis)
        } else {
            let secs = self.duration.as_secs();
            if secs < 60 {
                format!("{}s", secs)
            } else {
                format!("{}m {}s", secs / 60, secs % 60)
            }
        }
    }
}

/// Table and statistics produced by a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub table: Table,
    pub stats: IngestStats,
}

/// Runs documents through extraction, flattening and tabularization
pub struct Ingestor {
    config: IngestConfig,
    spec: ColumnSpec,
    flattener: Flattener,
    /// Built on the first URL source
    fetcher: OnceCell<Box<dyn Fetcher>>,
}

impl Ingestor {
    /// Create an ingestor, taking the column spec from the config override or
    /// from the catalog.
    ///
    /// URLs are fetched with a blocking HTTP client when the `http` feature is
    /// enabled; otherwise they fail per document. The client is only built
    /// once a URL source is read.
    pub fn new(config: IngestConfig, catalog: &SpecCatalog) -> Result<Self, IngestError> {
        let spec = match &config.column_spec {
            Some(spec) => {
                if spec.resource_type != config.resource_type {
                    return Err(IngestError::InvalidConfig(format!(
                        "column spec is for {} but the run is for {}",
                        spec.resource_type, config.resource_type
                    )));
                }
                spec.validate()?;
                spec.clone()
            }
            None => catalog.require(&config.resource_type)?.clone(),
        };

        let flattener = Flattener::with_config(config.flatten.clone());

        Ok(Self {
            config,
            spec,
            flattener,
            fetcher: OnceCell::new(),
        })
    }

    /// Replace the fetcher used for URL sources
    pub fn with_fetcher(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.fetcher = OnceCell::with_value(fetcher);
        self
    }

    fn fetcher(&self) -> Result<&dyn Fetcher, SourceError> {
        self.fetcher
            .get_or_try_init(|| default_fetcher(&self.config))
            .map(|fetcher| fetcher.as_ref())
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// The column spec rows are typed with
    pub fn spec(&self) -> &ColumnSpec {
        &self.spec
    }

    /// Resolve command-line style inputs, then run
    pub fn run_inputs<S: AsRef<str>>(&self, inputs: &[S]) -> Result<IngestReport, IngestError> {
        let sources = resolve_inputs(inputs)?;
        self.run(sources)
    }

    /// Ingest already parsed documents
    pub fn run_values<I>(&self, documents: I) -> Result<IngestReport, IngestError>
    where
        I: IntoIterator<Item = Value>,
    {
        let sources = documents
            .into_iter()
            .enumerate()
            .map(|(index, document)| DocumentSource::inline(format!("document {}", index), document))
            .collect();
        self.run(sources)
    }

    /// Ingest documents in order and build the table
    pub fn run(&self, sources: Vec<DocumentSource>) -> Result<IngestReport, IngestError> {
        let _span = info_span!(
            "ingest",
            resource_type = %self.spec.resource_type,
            documents = sources.len()
        )
        .entered();

        let start = Instant::now();
        let mut stats = IngestStats::new();
        let mut builder = TableBuilder::new(self.spec.clone())?;

        for source in sources {
            let name = source.display();
            match self.process_document(source, &mut builder, &mut stats) {
                Ok(resources) => {
                    stats.documents_processed += 1;
                    debug!(source = %name, resources, "Document ingested");
                }
                Err(e) if e.is_document_error() && self.config.continue_on_error => {
                    warn!("Skipping {}: {}", name, e);
                    stats.documents_failed += 1;
                    stats.add_error(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        let table = builder.finish()?;
        stats.duration = start.elapsed();

        info!(
            documents = stats.documents_processed,
            failed = stats.documents_failed,
            rows = table.row_count(),
            columns = table.column_count(),
            duration = %stats.duration_string(),
            "Ingestion complete"
        );

        Ok(IngestReport { table, stats })
    }

    /// Returns the number of resources taken from the document
    fn process_document(
        &self,
        source: DocumentSource,
        builder: &mut TableBuilder,
        stats: &mut IngestStats,
    ) -> Result<usize, IngestError> {
        let source_name = source.display();

        let loaded = match source {
            DocumentSource::Url(_) => self.fetcher().and_then(|fetcher| source.load(fetcher)),
            local => local.load(&OfflineFetcher),
        };
        let document = loaded.map_err(|error| IngestError::Source {
            source_name: source_name.clone(),
            error,
        })?;

        let extraction =
            extract(document, &self.spec.resource_type).map_err(|error| IngestError::Extract {
                source_name: source_name.clone(),
                error,
            })?;

        // Flatten everything first so a bad resource leaves no partial rows
        let rows = self
            .flattener
            .flatten_all(&extraction.resources)
            .map_err(|error| IngestError::Flatten { source_name, error })?;

        let count = rows.len();
        builder.extend(rows);
        stats.resources_extracted += count;
        stats.skipped_entries += extraction.skipped_entries;
        Ok(count)
    }
}

#[cfg(feature = "http")]
fn default_fetcher(config: &IngestConfig) -> Result<Box<dyn Fetcher>, SourceError> {
    let fetcher = HttpFetcher::new(config.http_timeout_seconds)?;
    Ok(Box::new(fetcher))
}

#[cfg(not(feature = "http"))]
fn default_fetcher(_config: &IngestConfig) -> Result<Box<dyn Fetcher>, SourceError> {
    Ok(Box::new(OfflineFetcher))
}

/// Tabulate parsed documents with the built-in spec for `resource_type`
pub fn tabulate_documents<I>(documents: I, resource_type: &str) -> Result<IngestReport, IngestError>
where
    I: IntoIterator<Item = Value>,
{
    let config = IngestConfig::new(resource_type);
    Ingestor::new(config, &SpecCatalog::builtin())?.run_values(documents)
}
