//! Configuration for ingestion runs

use serde::{Deserialize, Serialize};

use crate::flatten::FlattenConfig;
use crate::schema::ColumnSpec;

/// Configuration for turning documents into a table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestConfig {
    /// Resource type to tabulate, e.g. `Patient`
    pub resource_type: String,

    /// Spec used instead of the catalog entry for `resource_type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_spec: Option<ColumnSpec>,

    /// Record failing documents in the report and go on
    pub continue_on_error: bool,

    /// Timeout for HTTP requests in seconds
    pub http_timeout_seconds: u64,

    /// Flattening options
    #[serde(default)]
    pub flatten: FlattenConfig,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            resource_type: "Patient".to_string(),
            column_spec: None,
            continue_on_error: true,
            http_timeout_seconds: 30,
            flatten: FlattenConfig::default(),
        }
    }
}

impl IngestConfig {
    /// Create a configuration for a resource type
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Self::default()
        }
    }

    /// Create a builder for custom configuration
    pub fn builder() -> IngestConfigBuilder {
        IngestConfigBuilder::default()
    }
}

/// Builder for IngestConfig
#[derive(Debug, Default)]
pub struct IngestConfigBuilder {
    config: IngestConfig,
}

impl IngestConfigBuilder {
    /// Set the resource type
    pub fn resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.config.resource_type = resource_type.into();
        self
    }

    /// Use this spec instead of the catalog entry
    pub fn column_spec(mut self, spec: ColumnSpec) -> Self {
        self.config.column_spec = Some(spec);
        self
    }

    /// Keep going after a document fails
    pub fn continue_on_error(mut self, enabled: bool) -> Self {
        self.config.continue_on_error = enabled;
        self
    }

    /// Set the HTTP timeout (at least one second)
    pub fn http_timeout_seconds(mut self, seconds: u64) -> Self {
        self.config.http_timeout_seconds = seconds.max(1);
        self
    }

    /// Set the flattening options
    pub fn flatten(mut self, flatten: FlattenConfig) -> Self {
        self.config.flatten = flatten;
        self
    }

    /// Build the configuration
    pub fn build(self) -> IngestConfig {
        self.config
    }
}
