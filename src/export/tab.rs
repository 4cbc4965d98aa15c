//! Tab-separated exporter
//!
//! Layout:
//!
//! ```text
//! Observation_valueQuantity_value  Observation_status  Observation_id
//! continuous                       discrete            string
//!                                                      meta
//! 4.2                              final               o1
//! ```
//!
//! The second row holds the column types, the third flags string columns as
//! `meta`. Missing values print as `nan`.

use crate::models::{ColumnKind, ColumnRole, Table};

/// Exporter for the three-header tab format
pub struct TabExporter;

impl TabExporter {
    /// Export a table, one line per header row and per data row
    pub fn export(table: &Table) -> String {
        let mut out = String::new();

        let names: Vec<String> = table.columns.iter().map(|c| escape(&c.name)).collect();
        push_line(&mut out, &names);

        let types: Vec<String> = table
            .columns
            .iter()
            .map(|c| type_label(&c.kind).to_string())
            .collect();
        push_line(&mut out, &types);

        let flags: Vec<String> = table
            .columns
            .iter()
            .map(|c| match c.role {
                ColumnRole::Meta => "meta".to_string(),
                ColumnRole::Feature => String::new(),
            })
            .collect();
        push_line(&mut out, &flags);

        for row in &table.rows {
            let cells: Vec<String> = row.iter().map(|cell| escape(&cell.render())).collect();
            push_line(&mut out, &cells);
        }

        out
    }
}

fn type_label(kind: &ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Numeric => "continuous",
        ColumnKind::Categorical { .. } => "discrete",
        ColumnKind::String => "string",
    }
}

fn push_line(out: &mut String, fields: &[String]) {
    out.push_str(&fields.join("\t"));
    out.push('\n');
}

/// Tabs and line breaks would shift cells, so they become spaces
fn escape(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, TableColumn};
    use pretty_assertions::assert_eq;

    fn table() -> Table {
        let mut table = Table::empty("Observation");
        table.columns = vec![
            TableColumn::numeric("Observation_valueQuantity_value"),
            TableColumn::categorical("Observation_status", vec!["final".to_string()]),
            TableColumn::string("Observation_note_0_text"),
        ];
        table.rows = vec![
            vec![
                Cell::Number(4.2),
                Cell::Text("final".to_string()),
                Cell::Text("line one\nline two".to_string()),
            ],
            vec![
                Cell::Number(f64::NAN),
                Cell::Text("final".to_string()),
                Cell::Text("nan".to_string()),
            ],
        ];
        table
    }

    #[test]
    fn test_export_headers_and_rows() {
        let output = TabExporter::export(&table());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Observation_valueQuantity_value\tObservation_status\tObservation_note_0_text",
                "continuous\tdiscrete\tstring",
                "\t\tmeta",
                "4.2\tfinal\tline one line two",
                "nan\tfinal\tnan",
            ]
        );
    }

    #[test]
    fn test_export_empty_table() {
        let output = TabExporter::export(&Table::empty("Patient"));
        assert_eq!(output, "\n\n\n");
    }
}
