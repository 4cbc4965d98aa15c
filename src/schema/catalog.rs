//! Column spec catalog
//!
//! A catalog maps resource types to their [`ColumnSpec`]. The built-in
//! catalog covers Patient, Encounter, Observation and MedicationRequest;
//! user catalogs are read from YAML, JSON or TOML files of the form
//!
//! ```yaml
//! specs:
//!   - resourceType: Condition
//!     categoricalColumns: [Condition_clinicalStatus_coding_0_code]
//!     stringColumns: [Condition_id, Condition_subject_reference]
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::builtin;
use super::column_spec::ColumnSpec;
use super::error::SchemaError;

/// On-disk layout of a catalog
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    specs: Vec<ColumnSpec>,
}

/// Column specs keyed by resource type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecCatalog {
    specs: IndexMap<String, ColumnSpec>,
}

impl SpecCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in specs
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for spec in builtin::all() {
            catalog.specs.insert(spec.resource_type.clone(), spec);
        }
        catalog
    }

    /// Add or replace a spec after validating it
    pub fn insert(&mut self, spec: ColumnSpec) -> Result<Option<ColumnSpec>, SchemaError> {
        spec.validate()?;
        Ok(self.specs.insert(spec.resource_type.clone(), spec))
    }

    pub fn get(&self, resource_type: &str) -> Option<&ColumnSpec> {
        self.specs.get(resource_type)
    }

    /// Like [`get`](Self::get) but with an error for unknown types
    pub fn require(&self, resource_type: &str) -> Result<&ColumnSpec, SchemaError> {
        self.get(resource_type)
            .ok_or_else(|| SchemaError::UnknownResourceType(resource_type.to_string()))
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn specs(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.specs.values()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Overlay `other` on this catalog; specs of the same type are replaced
    pub fn merge(&mut self, other: SpecCatalog) {
        for (resource_type, spec) in other.specs {
            debug!(resource_type = %resource_type, "Overriding column spec");
            self.specs.insert(resource_type, spec);
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        let file: CatalogFile = serde_yaml::from_str(content).map_err(|e| SchemaError::Parse {
            format: "yaml",
            message: e.to_string(),
        })?;
        Self::from_specs(file.specs)
    }

    pub fn from_json_str(content: &str) -> Result<Self, SchemaError> {
        let file: CatalogFile = serde_json::from_str(content).map_err(|e| SchemaError::Parse {
            format: "json",
            message: e.to_string(),
        })?;
        Self::from_specs(file.specs)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SchemaError> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| SchemaError::Parse {
            format: "toml",
            message: e.to_string(),
        })?;
        Self::from_specs(file.specs)
    }

    /// Load a catalog file, picking the parser from the extension
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let catalog = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&fs::read_to_string(path)?)?,
            "json" => Self::from_json_str(&fs::read_to_string(path)?)?,
            "toml" => Self::from_toml_str(&fs::read_to_string(path)?)?,
            _ => return Err(SchemaError::UnsupportedFormat(path.to_path_buf())),
        };

        info!(
            path = %path.display(),
            specs = catalog.len(),
            "Loaded column spec catalog"
        );
        Ok(catalog)
    }

    pub fn to_yaml_string(&self) -> Result<String, SchemaError> {
        serde_yaml::to_string(&self.to_file()).map_err(|e| SchemaError::Parse {
            format: "yaml",
            message: e.to_string(),
        })
    }

    pub fn to_json_string(&self) -> Result<String, SchemaError> {
        serde_json::to_string_pretty(&self.to_file()).map_err(|e| SchemaError::Parse {
            format: "json",
            message: e.to_string(),
        })
    }

    fn from_specs(specs: Vec<ColumnSpec>) -> Result<Self, SchemaError> {
        let mut catalog = Self::new();
        for spec in specs {
            catalog.insert(spec)?;
        }
        Ok(catalog)
    }

    fn to_file(&self) -> CatalogFile {
        CatalogFile {
            specs: self.specs.values().cloned().collect(),
        }
    }

    /// Restrict the catalog to a single resource type
    pub fn only(&self, resource_type: &str) -> Result<Self, SchemaError> {
        let spec = self.require(resource_type)?.clone();
        let mut catalog = Self::new();
        catalog.specs.insert(spec.resource_type.clone(), spec);
        Ok(catalog)
    }
}
