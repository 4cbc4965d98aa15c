//! Typed table model

use serde::{Deserialize, Deserializer, Serialize};

use super::column::{ColumnKind, TableColumn};
use super::row::NULL_MARKER;

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// JSON writes NaN as `null`, which reads back as NaN
    Number(#[serde(deserialize_with = "number_or_null")] f64),
    Text(String),
}

fn number_or_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            Cell::Number(_) => None,
        }
    }

    /// Render the cell for text output, NaN prints as the null marker
    pub fn render(&self) -> String {
        match self {
            Cell::Number(n) if n.is_nan() => NULL_MARKER.to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

/// Flattened resources assembled into typed columns.
///
/// Columns are ordered numeric, categorical, string. Rows hold one cell per
/// column in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// FHIR resource type the rows were taken from
    pub resource_type: String,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<Cell>>,
    /// Columns present in the data but not declared for this resource type
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_columns: Vec<String>,
}

impl Table {
    pub fn empty(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            excluded_columns: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&TableColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Cell at `row` in the named column
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// All cells of the named column, top to bottom; `None` for rows too
    /// short to hold it
    pub fn column_values(&self, name: &str) -> Option<Vec<Option<&Cell>>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row.get(index)).collect())
    }

    /// Index of the first row whose cell count differs from the column count
    pub fn ragged_row(&self) -> Option<usize> {
        let width = self.columns.len();
        self.rows.iter().position(|row| row.len() != width)
    }

    /// Numeric and categorical columns
    pub fn feature_columns(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns.iter().filter(|c| c.is_feature())
    }

    /// String columns
    pub fn meta_columns(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns.iter().filter(|c| !c.is_feature())
    }

    /// Position of a categorical cell inside its column's value list
    pub fn category_index(&self, row: usize, column: &str) -> Option<usize> {
        let col = self.column(column)?;
        let ColumnKind::Categorical { values } = &col.kind else {
            return None;
        };
        let text = self.cell(row, column)?.as_str()?;
        values.iter().position(|v| v == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ragged() -> Table {
        let mut table = Table::empty("Patient");
        table.columns = vec![TableColumn::string("a"), TableColumn::string("b")];
        table.rows = vec![
            vec![Cell::Text("a0".to_string()), Cell::Text("b0".to_string())],
            vec![Cell::Text("a1".to_string())],
        ];
        table
    }

    #[test]
    fn test_column_values_short_row() {
        let table = ragged();

        assert_eq!(table.cell(1, "b"), None);
        assert_eq!(
            table.column_values("b"),
            Some(vec![Some(&Cell::Text("b0".to_string())), None])
        );
        assert_eq!(table.column_values("missing"), None);
    }

    #[test]
    fn test_ragged_row() {
        assert_eq!(ragged().ragged_row(), Some(1));
        assert_eq!(Table::empty("Patient").ragged_row(), None);
    }
}
