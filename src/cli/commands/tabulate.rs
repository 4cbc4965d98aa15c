//! CLI command for building typed tables

use std::path::PathBuf;

use crate::cli::CliError;
use crate::cli::commands::{emit, load_catalog};
use crate::cli::output::format_summary;
use crate::export::{ExportFormat, write_table};
use crate::ingest::{IngestConfig, Ingestor};
use crate::schema::DriftPolicy;

/// Arguments for the `tabulate` command
pub struct TabulateArgs {
    /// Files, glob patterns or URLs
    pub inputs: Vec<String>,
    /// Resource type to tabulate
    pub resource_type: String,
    /// Catalog file overlaid on the built-in specs
    pub spec_file: Option<PathBuf>,
    /// Output format (tab, json, summary)
    pub format: String,
    /// Output file path (stdout if not provided)
    pub output: Option<PathBuf>,
    /// Stop at the first failing document
    pub fail_fast: bool,
    /// Keep undeclared columns as strings
    pub keep_undeclared: bool,
    /// HTTP timeout in seconds
    pub timeout: u64,
}

/// What `tabulate` prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabulateOutput {
    Summary,
    Table(ExportFormat),
}

impl TabulateOutput {
    pub fn parse(format: &str) -> Result<Self, CliError> {
        match format {
            "summary" => Ok(TabulateOutput::Summary),
            other => other
                .parse()
                .map(TabulateOutput::Table)
                .map_err(CliError::InvalidArgument),
        }
    }
}

/// Handle the `tabulate` command
pub fn handle_tabulate(args: &TabulateArgs) -> Result<(), CliError> {
    if args.inputs.is_empty() {
        return Err(CliError::InvalidArgument(
            "at least one input is required".to_string(),
        ));
    }
    let output = TabulateOutput::parse(&args.format)?;

    let catalog = load_catalog(args.spec_file.as_deref())?;
    let mut spec = catalog.require(&args.resource_type)?.clone();
    if args.keep_undeclared {
        spec.drift = DriftPolicy::KeepAsString;
    }

    let config = IngestConfig::builder()
        .resource_type(&args.resource_type)
        .column_spec(spec)
        .continue_on_error(!args.fail_fast)
        .http_timeout_seconds(args.timeout)
        .build();

    eprintln!("Tabulating {} resources...", args.resource_type);
    eprintln!("  Inputs: {}", args.inputs.len());

    let ingestor = Ingestor::new(config, &catalog)?;
    let report = ingestor.run_inputs(&args.inputs)?;

    eprintln!(
        "  Rows: {}, columns: {}, failed documents: {}",
        report.table.row_count(),
        report.table.column_count(),
        report.stats.documents_failed
    );

    match (output, args.output.as_deref()) {
        (TabulateOutput::Table(format), Some(path)) => {
            write_table(&report.table, path, format)?;
            eprintln!("Written to: {}", path.display());
            Ok(())
        }
        (TabulateOutput::Table(format), None) => emit(&format.render(&report.table)?, None),
        (TabulateOutput::Summary, path) => emit(&format_summary(&report), path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(dir: &TempDir, format: &str, output: Option<PathBuf>) -> TabulateArgs {
        TabulateArgs {
            inputs: vec![dir.path().join("bundle.json").display().to_string()],
            resource_type: "Patient".to_string(),
            spec_file: None,
            format: format.to_string(),
            output,
            fail_fast: false,
            keep_undeclared: false,
            timeout: 5,
        }
    }

    fn write_bundle(dir: &TempDir) {
        let bundle = r#"{"entry": [{"resource": {"resourceType": "Patient", "id": "123", "gender": "male"}}]}"#;
        fs::write(dir.path().join("bundle.json"), bundle).unwrap();
    }

    #[test]
    fn test_parse_output() {
        assert_eq!(TabulateOutput::parse("summary").unwrap(), TabulateOutput::Summary);
        assert_eq!(
            TabulateOutput::parse("json").unwrap(),
            TabulateOutput::Table(ExportFormat::Json)
        );
        assert!(matches!(
            TabulateOutput::parse("csv"),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bad_format_rejected_before_reading_inputs() {
        let dir = TempDir::new().unwrap();
        // No bundle on disk: the format check has to fail first
        let err = handle_tabulate(&args(&dir, "xlsx", None)).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }

    #[test]
    fn test_output_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        write_bundle(&dir);
        let path = dir.path().join("out").join("nested").join("patients.tab");

        handle_tabulate(&args(&dir, "tab", Some(path.clone()))).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Patient_gender"));
        assert!(written.contains("123"));
    }
}
