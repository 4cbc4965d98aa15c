//! Output formatting for CLI

use crate::ingest::IngestReport;
use crate::models::{ColumnKind, Table};

/// Format an ingestion report as a human-readable summary
pub fn format_summary(report: &IngestReport) -> String {
    let stats = &report.stats;
    let table = &report.table;
    let mut output = String::new();

    if !stats.errors.is_empty() {
        output.push_str("\n⚠️  Skipped Documents:\n");
        for error in &stats.errors {
            output.push_str(&format!("  - {}\n", error));
        }
        if stats.errors_count > stats.errors.len() {
            output.push_str(&format!(
                "  ... and {} more\n",
                stats.errors_count - stats.errors.len()
            ));
        }
    }

    output.push_str(&format!(
        "\n✅ {} table: {} row(s), {} column(s)\n",
        table.resource_type,
        table.row_count(),
        table.column_count()
    ));
    output.push_str(&format!("  Documents processed: {}\n", stats.documents_processed));
    output.push_str(&format!("  Documents failed: {}\n", stats.documents_failed));
    output.push_str(&format!("  Resources extracted: {}\n", stats.resources_extracted));
    if stats.skipped_entries > 0 {
        output.push_str(&format!("  Bundle entries skipped: {}\n", stats.skipped_entries));
    }
    output.push_str(&format!("  Duration: {}\n", stats.duration_string()));

    output.push_str(&format_columns(table));
    output
}

/// List columns with their type, categorical values included
pub fn format_columns(table: &Table) -> String {
    let mut output = String::new();

    let features: Vec<_> = table.feature_columns().collect();
    if !features.is_empty() {
        output.push_str("\nFeatures:\n");
        for column in features {
            match &column.kind {
                ColumnKind::Categorical { values } => output.push_str(&format!(
                    "  - {} ({}: {})\n",
                    column.name,
                    column.kind.name(),
                    values.join(", ")
                )),
                kind => output.push_str(&format!("  - {} ({})\n", column.name, kind.name())),
            }
        }
    }

    let metas: Vec<_> = table.meta_columns().collect();
    if !metas.is_empty() {
        output.push_str("\nMetas:\n");
        for column in metas {
            output.push_str(&format!("  - {}\n", column.name));
        }
    }

    if !table.excluded_columns.is_empty() {
        output.push_str(&format!(
            "\nNot in column spec ({}): {}\n",
            table.excluded_columns.len(),
            table.excluded_columns.join(", ")
        ));
    }

    output
}
