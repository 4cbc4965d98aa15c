//! Error types for flattening

use thiserror::Error;

/// Errors that can occur while flattening a resource
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlattenError {
    /// Invalid JSON structure (not an object at root)
    #[error("Invalid resource structure: expected object at root, found {0}")]
    InvalidStructure(String),

    /// Maximum depth exceeded
    #[error("Maximum nesting depth exceeded: {depth} > {max}")]
    MaxDepthExceeded { depth: usize, max: usize },
}
