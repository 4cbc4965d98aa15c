//! Export functionality
//!
//! Provides exporters for typed tables:
//! - Tab-separated with three header rows (names, types, flags)
//! - JSON

pub mod json;
pub mod tab;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::models::Table;

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Output format for a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Tab,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tab" | "tsv" => Ok(ExportFormat::Tab),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!("Invalid export format: {}. Valid options: tab, json", s)),
        }
    }
}

impl ExportFormat {
    /// Guess the format from a file extension, defaulting to tab
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => ExportFormat::Json,
            _ => ExportFormat::Tab,
        }
    }

    /// Render a table in this format
    pub fn render(self, table: &Table) -> Result<String, ExportError> {
        match self {
            ExportFormat::Tab => Ok(TabExporter::export(table)),
            ExportFormat::Json => JsonExporter::export(table, true),
        }
    }
}

/// Render a table and write it to a file
pub fn write_table(table: &Table, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    let content = format.render(table)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

// Re-export for convenience
pub use json::JsonExporter;
pub use tab::TabExporter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, TableColumn};
    use tempfile::TempDir;

    #[test]
    fn test_format_from_str() {
        assert_eq!("TAB".parse::<ExportFormat>(), Ok(ExportFormat::Tab));
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out/table.json")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out/table.tab")), ExportFormat::Tab);
    }

    #[test]
    fn test_write_table_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("patients.tab");

        let mut table = Table::empty("Patient");
        table.columns.push(TableColumn::string("Patient_id"));
        table.rows.push(vec![Cell::Text("p1".to_string())]);

        write_table(&table, &path, ExportFormat::Tab).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Patient_id\n"));
    }
}
