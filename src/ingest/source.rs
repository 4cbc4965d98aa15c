//! Document sources
//!
//! A document is read from a local JSON file, fetched with an HTTP GET from a
//! FHIR endpoint, or handed over already parsed.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::SourceError;

/// Accepted endpoint shapes: `http(s)://[sub.]domain.tld[/path]`
static ENDPOINT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://(?:\w+\.)?\w+\.\w+(?:/\S*)?$").unwrap());

/// `http(s)://host:port[/path]`, as used by local test servers
static HOST_PORT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[\w.-]+:\d{1,5}(?:/\S*)?$").unwrap());

/// Check that a string looks like a FHIR endpoint before any request is made
pub fn validate_endpoint(url: &str) -> Result<(), SourceError> {
    if ENDPOINT_REGEX.is_match(url) || HOST_PORT_REGEX.is_match(url) {
        Ok(())
    } else {
        Err(SourceError::InvalidUrl(url.to_string()))
    }
}

/// Where a document comes from
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentSource {
    /// Local JSON file
    File(PathBuf),
    /// FHIR endpoint returning a Bundle or a resource
    Url(String),
    /// Already parsed JSON
    Inline { name: String, document: Value },
}

impl DocumentSource {
    /// Parse a source string.
    ///
    /// Supported formats:
    /// - URL: `http://...`, `https://...`
    /// - Local: anything else
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            DocumentSource::Url(source.to_string())
        } else {
            DocumentSource::File(PathBuf::from(source))
        }
    }

    pub fn inline(name: impl Into<String>, document: Value) -> Self {
        DocumentSource::Inline {
            name: name.into(),
            document,
        }
    }

    /// Name used in logs and reports
    pub fn display(&self) -> String {
        match self {
            DocumentSource::File(path) => path.display().to_string(),
            DocumentSource::Url(url) => url.clone(),
            DocumentSource::Inline { name, .. } => name.clone(),
        }
    }

    /// Read and parse the document
    pub fn load(self, fetcher: &dyn Fetcher) -> Result<Value, SourceError> {
        match self {
            DocumentSource::File(path) => read_json_file(&path),
            DocumentSource::Url(url) => {
                validate_endpoint(&url)?;
                fetcher.fetch(&url)
            }
            DocumentSource::Inline { document, .. } => Ok(document),
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Parse a JSON file
pub fn read_json_file(path: &Path) -> Result<Value, SourceError> {
    if !path.exists() {
        return Err(SourceError::FileNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| SourceError::Json {
        source_name: path.display().to_string(),
        error: e.to_string(),
    })
}

/// Expand a glob pattern into file sources, sorted by path
pub fn discover_files(pattern: &str) -> Result<Vec<DocumentSource>, SourceError> {
    let entries = glob::glob(pattern)
        .map_err(|e| SourceError::InvalidPattern(format!("{}: {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => {
                // Log but continue
                warn!("Error accessing path: {}", e);
            }
        }
    }

    files.sort();
    debug!(pattern, matched = files.len(), "Discovered files");
    Ok(files.into_iter().map(DocumentSource::File).collect())
}

/// Turn command-line style inputs into sources.
///
/// URLs are kept as they are, strings containing glob metacharacters are
/// expanded, everything else is a file path.
pub fn resolve_inputs<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<DocumentSource>, SourceError> {
    let mut sources = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        match DocumentSource::parse(input) {
            DocumentSource::File(_) if is_glob(input) => {
                let found = discover_files(input)?;
                if found.is_empty() {
                    warn!(pattern = input, "Pattern matched no files");
                }
                sources.extend(found);
            }
            source => sources.push(source),
        }
    }
    Ok(sources)
}

fn is_glob(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Fetches a JSON document over the network
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Value, SourceError>;
}

/// Fetcher for builds without HTTP support, and for offline runs
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineFetcher;

impl Fetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> Result<Value, SourceError> {
        Err(SourceError::Http {
            url: url.to_string(),
            reason: "HTTP support not enabled. Build with --features http".to_string(),
        })
    }
}

/// Blocking HTTP fetcher
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    /// Create a fetcher with a request timeout in seconds
    pub fn new(timeout_seconds: u64) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| SourceError::Http {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[cfg(feature = "http")]
impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Value, SourceError> {
        debug!("Sending request to FHIR endpoint: {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/fhir+json, application/json")
            .send()
            .map_err(|e| SourceError::Http {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        response.json::<Value>().map_err(|e| SourceError::Json {
            source_name: url.to_string(),
            error: e.to_string(),
        })
    }
}
