//! Table builder

use indexmap::IndexSet;
use serde_json::Value;
use tracing::{debug, info};

use super::error::TableError;
use crate::models::{Cell, FlatRow, NULL_MARKER, Table, TableColumn, scalar_to_text};
use crate::schema::{ColumnSpec, DriftPolicy, REFERENCE_SCHEME};

/// Build a table from flattened rows in one go
pub fn build_table<I>(rows: I, spec: &ColumnSpec) -> Result<Table, TableError>
where
    I: IntoIterator<Item = FlatRow>,
{
    let mut builder = TableBuilder::new(spec.clone())?;
    builder.extend(rows);
    builder.finish()
}

/// Collects rows across documents, then types them into a [`Table`]
#[derive(Debug, Clone)]
pub struct TableBuilder {
    spec: ColumnSpec,
    rows: Vec<FlatRow>,
}

impl TableBuilder {
    /// Create a builder, rejecting invalid specs up front
    pub fn new(spec: ColumnSpec) -> Result<Self, TableError> {
        spec.validate()?;
        Ok(Self {
            spec,
            rows: Vec::new(),
        })
    }

    pub fn spec(&self) -> &ColumnSpec {
        &self.spec
    }

    /// Add a row of resource-relative keys (`id`, `gender`, ...)
    pub fn push_row(&mut self, row: FlatRow) {
        let row = self.normalize(row);
        self.rows.push(row);
    }

    pub fn extend<I>(&mut self, rows: I)
    where
        I: IntoIterator<Item = FlatRow>,
    {
        for row in rows {
            self.push_row(row);
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Type the collected rows.
    ///
    /// Fails on the first numeric cell that does not parse.
    pub fn finish(self) -> Result<Table, TableError> {
        let spec = &self.spec;

        let mut present: IndexSet<&str> = IndexSet::new();
        for row in &self.rows {
            present.extend(row.keys());
        }

        let declared = |list: &[String]| -> Vec<String> {
            list.iter()
                .filter(|c| present.contains(c.as_str()))
                .cloned()
                .collect()
        };
        let numeric = declared(&spec.numeric_columns);
        let categorical = declared(&spec.categorical_columns);
        let mut strings = declared(&spec.string_columns);

        let undeclared: Vec<String> = present
            .iter()
            .filter(|c| spec.declared_type(c).is_none())
            .map(|c| c.to_string())
            .collect();

        let excluded_columns = match spec.drift {
            DriftPolicy::Drop => undeclared,
            DriftPolicy::KeepAsString => {
                strings.extend(undeclared);
                Vec::new()
            }
        };
        if !excluded_columns.is_empty() {
            debug!(
                resource_type = %spec.resource_type,
                columns = ?excluded_columns,
                "Columns not in the column spec were left out"
            );
        }

        let mut columns = Vec::with_capacity(numeric.len() + categorical.len() + strings.len());
        let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); self.rows.len()];

        for name in &numeric {
            for (index, row) in self.rows.iter().enumerate() {
                let text = cell_text(row, name);
                let number = parse_number(&text).ok_or_else(|| TableError::TypeCoercion {
                    column: name.clone(),
                    row: index,
                    value: text.clone(),
                })?;
                cells[index].push(Cell::Number(number));
            }
            columns.push(TableColumn::numeric(name.clone()));
        }

        for name in &categorical {
            let mut values: IndexSet<String> = IndexSet::new();
            for (index, row) in self.rows.iter().enumerate() {
                let text = cell_text(row, name);
                values.insert(text.clone());
                cells[index].push(Cell::Text(text));
            }
            columns.push(TableColumn::categorical(
                name.clone(),
                values.into_iter().collect(),
            ));
        }

        for name in &strings {
            for (index, row) in self.rows.iter().enumerate() {
                cells[index].push(Cell::Text(cell_text(row, name)));
            }
            columns.push(TableColumn::string(name.clone()));
        }

        info!(
            resource_type = %spec.resource_type,
            rows = cells.len(),
            numeric = numeric.len(),
            categorical = categorical.len(),
            strings = strings.len(),
            excluded = excluded_columns.len(),
            "Built table"
        );

        Ok(Table {
            resource_type: spec.resource_type.clone(),
            columns,
            rows: cells,
            excluded_columns,
        })
    }

    /// Prefix, rename and add the derived reference column
    fn normalize(&self, row: FlatRow) -> FlatRow {
        let prefix = self.spec.column_prefix();
        let mut row = row.map_keys(|key| format!("{prefix}{key}"));

        for rename in &self.spec.renames {
            row.rename(&rename.from, &rename.to);
        }

        if let Some(reference_column) = &self.spec.reference_column {
            let reference = match row.get(&self.spec.id_column()) {
                Some(Value::Null) | None => None,
                Some(id) => Some(format!("{REFERENCE_SCHEME}{}", scalar_to_text(id))),
            };
            if let Some(reference) = reference {
                row.insert(reference_column.clone(), Value::String(reference));
            }
        }

        row
    }
}

fn cell_text(row: &FlatRow, column: &str) -> String {
    row.text(column).unwrap_or_else(|| NULL_MARKER.to_string())
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed == NULL_MARKER {
        return Some(f64::NAN);
    }
    trimmed.parse::<f64>().ok()
}
