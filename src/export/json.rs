//! JSON exporter
//!
//! Writes the [`Table`] model as is: resource type, typed columns, rows and
//! the columns left out of the table. NaN cells are written as `null`.

use crate::export::ExportError;
use crate::models::Table;

/// Exporter for JSON format
pub struct JsonExporter;

impl JsonExporter {
    /// Serialize a table, pretty-printed when `pretty` is set
    pub fn export(table: &Table, pretty: bool) -> Result<String, ExportError> {
        let result = if pretty {
            serde_json::to_string_pretty(table)
        } else {
            serde_json::to_string(table)
        };
        result.map_err(|e| ExportError::SerializationError(e.to_string()))
    }

    /// Read a table written by [`JsonExporter::export`]
    ///
    /// Every row must hold one cell per column.
    pub fn import(content: &str) -> Result<Table, ExportError> {
        let table: Table = serde_json::from_str(content)
            .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        if let Some(row) = table.ragged_row() {
            return Err(ExportError::SerializationError(format!(
                "row {} has {} cell(s) but the table has {} column(s)",
                row,
                table.rows[row].len(),
                table.columns.len()
            )));
        }
        Ok(table)
    }
}
