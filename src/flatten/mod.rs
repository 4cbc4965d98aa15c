//! Resource flattening
//!
//! Turns a nested FHIR resource into a single-level [`FlatRow`]. Nested
//! objects contribute their path segments joined with `_`, array elements
//! contribute their index:
//!
//! ```rust
//! use fhir_tabular::flatten::flatten;
//! use serde_json::json;
//!
//! let resource = json!({"name": [{"family": "Chalmers", "given": ["Peter", "James"]}]});
//! let row = flatten(resource.as_object().unwrap());
//!
//! assert_eq!(row.get("name_0_family"), Some(&json!("Chalmers")));
//! assert_eq!(row.get("name_0_given_1"), Some(&json!("James")));
//! ```

mod config;
mod error;

pub use config::{FlattenConfig, FlattenConfigBuilder};
pub use error::FlattenError;

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::models::FlatRow;

/// Flatten a resource with the default separator and no depth limit
pub fn flatten(resource: &Map<String, Value>) -> FlatRow {
    let mut walker = Walker {
        separator: "_",
        max_depth: None,
        row: FlatRow::new(),
        known_keys: None,
    };
    // Without a depth limit the walk cannot fail
    let _ = walker.object(resource, "", 0);
    walker.row
}

/// Result of [`Flattener::flatten_with_keys`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenOutput {
    /// The flattened row
    pub row: FlatRow,
    /// Every key path visited, containers included, in first-visit order
    pub known_keys: Vec<String>,
}

/// Configurable flattener
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    config: FlattenConfig,
}

impl Flattener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FlattenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Flatten a JSON value whose root must be an object
    pub fn flatten(&self, resource: &Value) -> Result<FlatRow, FlattenError> {
        let object = root_object(resource)?;
        let mut walker = self.walker(false);
        walker.object(object, "", 0)?;
        Ok(walker.row)
    }

    /// Flatten and also report every key path encountered on the way
    pub fn flatten_with_keys(&self, resource: &Value) -> Result<FlattenOutput, FlattenError> {
        let object = root_object(resource)?;
        let mut walker = self.walker(true);
        walker.object(object, "", 0)?;
        Ok(FlattenOutput {
            row: walker.row,
            known_keys: walker
                .known_keys
                .map(|keys| keys.into_iter().collect())
                .unwrap_or_default(),
        })
    }

    /// Flatten several resources, stopping at the first failure
    pub fn flatten_all<'a, I>(&self, resources: I) -> Result<Vec<FlatRow>, FlattenError>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        resources.into_iter().map(|r| self.flatten(r)).collect()
    }

    fn walker(&self, track_keys: bool) -> Walker<'_> {
        Walker {
            separator: &self.config.separator,
            max_depth: Some(self.config.max_depth),
            row: FlatRow::new(),
            known_keys: track_keys.then(IndexSet::new),
        }
    }
}

struct Walker<'a> {
    separator: &'a str,
    max_depth: Option<usize>,
    row: FlatRow,
    known_keys: Option<IndexSet<String>>,
}

impl Walker<'_> {
    fn object(
        &mut self,
        object: &Map<String, Value>,
        prefix: &str,
        depth: usize,
    ) -> Result<(), FlattenError> {
        self.check_depth(depth)?;

        for (key, value) in object {
            let new_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}{}{key}", self.separator)
            };
            self.value(value, new_key, depth)?;
        }
        Ok(())
    }

    fn value(&mut self, value: &Value, key: String, depth: usize) -> Result<(), FlattenError> {
        if let Some(known) = self.known_keys.as_mut() {
            known.insert(key.clone());
        }

        match value {
            Value::Object(nested) => self.object(nested, &key, depth + 1),
            Value::Array(items) => self.array(items, &key, depth + 1),
            scalar => {
                self.row.insert(key, scalar.clone());
                Ok(())
            }
        }
    }

    fn array(&mut self, items: &[Value], prefix: &str, depth: usize) -> Result<(), FlattenError> {
        self.check_depth(depth)?;

        for (index, item) in items.iter().enumerate() {
            let item_key = format!("{prefix}{}{index}", self.separator);
            match item {
                Value::Object(nested) => self.object(nested, &item_key, depth + 1)?,
                // Nested arrays get another index segment
                Value::Array(inner) => self.array(inner, &item_key, depth + 1)?,
                scalar => {
                    self.row.insert(item_key, scalar.clone());
                }
            }
        }
        Ok(())
    }

    fn check_depth(&self, depth: usize) -> Result<(), FlattenError> {
        match self.max_depth {
            Some(max) if depth > max => Err(FlattenError::MaxDepthExceeded { depth, max }),
            _ => Ok(()),
        }
    }
}

fn root_object(value: &Value) -> Result<&Map<String, Value>, FlattenError> {
    value
        .as_object()
        .ok_or_else(|| FlattenError::InvalidStructure(value_type_name(value).to_string()))
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
