//! Column allowlist for one resource type

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::SchemaError;

/// Prefix of the derived reference column value
pub const REFERENCE_SCHEME: &str = "urn:uuid:";

/// What happens to columns present in the data but not declared in a spec
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DriftPolicy {
    /// Leave them out of the table, listing them as excluded
    #[default]
    Drop,
    /// Append them as string (meta) columns after the declared ones
    KeepAsString,
}

impl std::str::FromStr for DriftPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "drop" => Ok(DriftPolicy::Drop),
            "keepasstring" | "keep" => Ok(DriftPolicy::KeepAsString),
            _ => Err(format!(
                "Invalid drift policy: {}. Valid options: drop, keep-as-string",
                s
            )),
        }
    }
}

/// A column rename applied after the resource-type prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

impl ColumnRename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Declares how the flattened columns of one resource type are typed.
///
/// Column names are the final table names: the flat key prefixed with
/// `<resourceType>_` and, if listed in `renames`, renamed.
///
/// # Example
///
/// ```rust
/// use fhir_tabular::schema::ColumnSpec;
///
/// let spec = ColumnSpec::new("Patient")
///     .with_string_columns(["Patient_id"])
///     .with_categorical_columns(["Patient_gender"]);
///
/// assert!(spec.validate().is_ok());
/// assert_eq!(spec.column_prefix(), "Patient_");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    /// FHIR resource type, e.g. `Observation`
    pub resource_type: String,
    /// Free text columns (table metas)
    #[serde(default)]
    pub string_columns: Vec<String>,
    /// Enumerated columns
    #[serde(default)]
    pub categorical_columns: Vec<String>,
    /// Columns parsed as 64-bit floats
    #[serde(default)]
    pub numeric_columns: Vec<String>,
    /// Renames applied in order after prefixing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub renames: Vec<ColumnRename>,
    /// Name of a derived `urn:uuid:<id>` column, added when the id column exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_column: Option<String>,
    /// Handling of undeclared columns
    #[serde(default)]
    pub drift: DriftPolicy,
}

/// Bucket a declared column belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    Numeric,
    Categorical,
    String,
}

impl ColumnSpec {
    /// Create an empty spec for a resource type
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            string_columns: Vec::new(),
            categorical_columns: Vec::new(),
            numeric_columns: Vec::new(),
            renames: Vec::new(),
            reference_column: None,
            drift: DriftPolicy::Drop,
        }
    }

    pub fn with_string_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.string_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.push(ColumnRename::new(from, to));
        self
    }

    pub fn with_reference_column(mut self, name: impl Into<String>) -> Self {
        self.reference_column = Some(name.into());
        self
    }

    pub fn with_drift(mut self, drift: DriftPolicy) -> Self {
        self.drift = drift;
        self
    }

    /// `<resourceType>_`, prepended to every flat key
    pub fn column_prefix(&self) -> String {
        format!("{}_", self.resource_type)
    }

    /// Name of the prefixed `id` column
    pub fn id_column(&self) -> String {
        format!("{}id", self.column_prefix())
    }

    /// Bucket of a declared column, `None` for undeclared ones
    pub fn declared_type(&self, column: &str) -> Option<DeclaredType> {
        let contains = |list: &[String]| list.iter().any(|c| c == column);
        if contains(&self.numeric_columns) {
            Some(DeclaredType::Numeric)
        } else if contains(&self.categorical_columns) {
            Some(DeclaredType::Categorical)
        } else if contains(&self.string_columns) {
            Some(DeclaredType::String)
        } else {
            None
        }
    }

    /// Check that the resource type is set and the three buckets are disjoint
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.resource_type.trim().is_empty() {
            return Err(SchemaError::MissingResourceType);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let buckets = [
            &self.numeric_columns,
            &self.categorical_columns,
            &self.string_columns,
        ];
        for column in buckets.into_iter().flatten() {
            if !seen.insert(column.as_str()) {
                return Err(SchemaError::Overlap {
                    resource_type: self.resource_type.clone(),
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }
}
