//! Configuration for resource flattening

use serde::{Deserialize, Serialize};

/// Configuration for [`Flattener`](super::Flattener)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlattenConfig {
    /// Joins path segments and list indices
    pub separator: String,

    /// Maximum nesting depth for objects and arrays
    pub max_depth: usize,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            separator: "_".to_string(),
            max_depth: 64,
        }
    }
}

impl FlattenConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> FlattenConfigBuilder {
        FlattenConfigBuilder::default()
    }
}

/// Builder for FlattenConfig
#[derive(Debug, Default)]
pub struct FlattenConfigBuilder {
    config: FlattenConfig,
}

impl FlattenConfigBuilder {
    /// Set the path separator
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.config.separator = separator.into();
        self
    }

    /// Set the maximum nesting depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Build the configuration
    pub fn build(self) -> FlattenConfig {
        self.config
    }
}
