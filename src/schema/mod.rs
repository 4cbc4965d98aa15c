//! Column specs
//!
//! A [`ColumnSpec`] lists, per FHIR resource type, which flattened columns
//! are numeric, categorical or free text, together with the renames and the
//! derived reference column applied while building a table. Specs are plain
//! data: they live in a [`SpecCatalog`], either the built-in one or one read
//! from a configuration file.

pub mod builtin;
mod catalog;
mod column_spec;
mod error;

pub use catalog::SpecCatalog;
pub use column_spec::{
    ColumnRename, ColumnSpec, DeclaredType, DriftPolicy, REFERENCE_SCHEME,
};
pub use error::SchemaError;
