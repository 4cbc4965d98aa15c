//! Column model for typed tables

use serde::{Deserialize, Serialize};

/// How a column's values are interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ColumnKind {
    /// 64-bit floating point values, the null marker parses to NaN
    Numeric,
    /// Finite label set, enumerated in first-seen order
    Categorical { values: Vec<String> },
    /// Free text
    String,
}

impl ColumnKind {
    /// Short name used in headers and summaries
    pub fn name(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical { .. } => "categorical",
            ColumnKind::String => "string",
        }
    }
}

/// Whether a column is a modelling feature or descriptive metadata.
///
/// Numeric and categorical columns are features, string columns are metas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Feature,
    Meta,
}

/// Column of a [`Table`](super::Table)
///
/// # Example
///
/// ```rust
/// use fhir_tabular::models::{ColumnRole, TableColumn};
///
/// let column = TableColumn::string("Patient_id");
/// assert_eq!(column.role, ColumnRole::Meta);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    /// Column name (prefixed flat key, e.g. `Patient_gender`)
    pub name: String,
    /// Value interpretation
    pub kind: ColumnKind,
    /// Feature or meta
    pub role: ColumnRole,
}

impl TableColumn {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Numeric,
            role: ColumnRole::Feature,
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Categorical { values },
            role: ColumnRole::Feature,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::String,
            role: ColumnRole::Meta,
        }
    }

    /// Enumerated values of a categorical column
    pub fn categories(&self) -> Option<&[String]> {
        match &self.kind {
            ColumnKind::Categorical { values } => Some(values),
            _ => None,
        }
    }

    pub fn is_feature(&self) -> bool {
        self.role == ColumnRole::Feature
    }
}
