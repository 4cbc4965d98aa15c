//! Table assembly and ingestion tests

use std::fs;

use fhir_tabular::ingest::OfflineFetcher;
use fhir_tabular::{
    Cell, ColumnKind, ColumnSpec, DriftPolicy, ExportFormat, FlatRow, IngestConfig, Ingestor,
    SpecCatalog, TableError, build_table, extract, flatten, tabulate_documents,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

fn rows(resources: &[Value]) -> Vec<FlatRow> {
    resources
        .iter()
        .map(|r| flatten(r.as_object().unwrap()))
        .collect()
}

fn column_names(table: &fhir_tabular::Table) -> Vec<&str> {
    table.columns.iter().map(|c| c.name.as_str()).collect()
}

mod build_table_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scenario_patient() {
        let bundle = json!({"entry": [{"resource": {
            "resourceType": "Patient", "id": "123", "gender": "male"
        }}]});
        let extraction = extract(bundle, "Patient").unwrap();

        let catalog = SpecCatalog::builtin();
        let table = build_table(rows(&extraction.resources), catalog.get("Patient").unwrap()).unwrap();

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, "Patient_id"), Some(&Cell::Text("123".to_string())));
        assert_eq!(
            table.cell(0, "Patient_gender"),
            Some(&Cell::Text("male".to_string()))
        );
        assert_eq!(
            table.column("Patient_gender").unwrap().kind,
            ColumnKind::Categorical {
                values: vec!["male".to_string()]
            }
        );
    }

    #[test]
    fn test_zero_rows() {
        let spec = ColumnSpec::new("Observation").with_string_columns(["Observation_id"]);
        let table = build_table(Vec::new(), &spec).unwrap();

        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_missing_cells_get_null_marker() {
        let spec = ColumnSpec::new("Observation")
            .with_numeric_columns(["Observation_valueQuantity_value"])
            .with_string_columns(["Observation_id", "Observation_issued"]);

        let table = build_table(
            rows(&[
                json!({"id": "o1", "valueQuantity": {"value": 5}}),
                json!({"id": "o2", "issued": "2024-01-01T00:00:00Z"}),
            ]),
            &spec,
        )
        .unwrap();

        assert_eq!(
            table.cell(0, "Observation_issued"),
            Some(&Cell::Text("nan".to_string()))
        );
        let value = table
            .cell(1, "Observation_valueQuantity_value")
            .and_then(Cell::as_f64)
            .unwrap();
        assert!(value.is_nan());
    }

    #[test]
    fn test_nan_text_parses_as_nan() {
        let spec = ColumnSpec::new("Observation")
            .with_numeric_columns(["Observation_valueQuantity_value"]);
        let table = build_table(
            rows(&[json!({"valueQuantity": {"value": "nan"}})]),
            &spec,
        )
        .unwrap();

        assert!(table.rows[0][0].as_f64().unwrap().is_nan());
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let spec = ColumnSpec::new("Encounter").with_categorical_columns(["Encounter_status"]);
        let resources: Vec<Value> = ["A", "B", "A", "C"]
            .iter()
            .map(|s| json!({"status": s}))
            .collect();

        let table = build_table(rows(&resources), &spec).unwrap();
        assert_eq!(
            table.column("Encounter_status").unwrap().categories(),
            Some(&["A".to_string(), "B".to_string(), "C".to_string()][..])
        );
    }

    #[test]
    fn test_column_order_numeric_categorical_string() {
        let spec = ColumnSpec::new("Observation")
            .with_string_columns(["Observation_id"])
            .with_categorical_columns(["Observation_status"])
            .with_numeric_columns(["Observation_valueQuantity_value"]);

        let table = build_table(
            rows(&[json!({"id": "o1", "status": "final", "valueQuantity": {"value": 1}})]),
            &spec,
        )
        .unwrap();

        assert_eq!(
            column_names(&table),
            vec![
                "Observation_valueQuantity_value",
                "Observation_status",
                "Observation_id"
            ]
        );
    }

    #[test]
    fn test_type_coercion_error() {
        let spec = ColumnSpec::new("Observation")
            .with_numeric_columns(["Observation_valueQuantity_value"]);
        let err = build_table(
            rows(&[json!({"valueQuantity": {"value": "ten"}})]),
            &spec,
        )
        .unwrap_err();

        match err {
            TableError::TypeCoercion { column, row, value } => {
                assert_eq!(column, "Observation_valueQuantity_value");
                assert_eq!(row, 0);
                assert_eq!(value, "ten");
            }
            other => panic!("Expected type coercion error, got {:?}", other),
        }
    }

    #[test]
    fn test_drift_policies() {
        let resources = [json!({"id": "e1", "language": "en"})];
        let spec = ColumnSpec::new("Encounter").with_string_columns(["Encounter_id"]);

        let dropped = build_table(rows(&resources), &spec).unwrap();
        assert_eq!(column_names(&dropped), vec!["Encounter_id"]);
        assert_eq!(dropped.excluded_columns, vec!["Encounter_language"]);

        let kept = build_table(rows(&resources), &spec.with_drift(DriftPolicy::KeepAsString)).unwrap();
        assert_eq!(column_names(&kept), vec!["Encounter_id", "Encounter_language"]);
        assert!(kept.excluded_columns.is_empty());
    }

    #[test]
    fn test_reference_column() {
        let table = build_table(
            rows(&[json!({"resourceType": "Observation", "id": "abc", "status": "final"})]),
            &fhir_tabular::schema::builtin::observation(),
        )
        .unwrap();

        assert_eq!(
            table.cell(0, "Observation_full_id"),
            Some(&Cell::Text("urn:uuid:abc".to_string()))
        );
    }
}

mod ingest_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &TempDir, name: &str, value: &Value) {
        fs::write(dir.path().join(name), serde_json::to_string(value).unwrap()).unwrap();
    }

    fn observation(id: &str, value: f64, status: &str) -> Value {
        json!({"resource": {
            "resourceType": "Observation",
            "id": id,
            "status": status,
            "valueQuantity": {"value": value, "unit": "kg"}
        }})
    }

    #[test]
    fn test_ingest_glob_of_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.json", &json!({"entry": [observation("o2", 80.5, "amended")]}));
        write(&dir, "a.json", &json!({"entry": [observation("o1", 70.0, "final")]}));
        fs::write(dir.path().join("c.json"), "{ not json").unwrap();

        let pattern = format!("{}/*.json", dir.path().display());
        let ingestor = Ingestor::new(IngestConfig::new("Observation"), &SpecCatalog::builtin())
            .unwrap()
            .with_fetcher(Box::new(OfflineFetcher));
        let report = ingestor.run_inputs(&[pattern]).unwrap();

        assert_eq!(report.stats.documents_processed, 2);
        assert_eq!(report.stats.documents_failed, 1);
        assert_eq!(report.table.row_count(), 2);
        assert_eq!(
            report.table.cell(0, "Observation_id"),
            Some(&Cell::Text("o1".to_string()))
        );
        assert_eq!(
            report.table.column("Observation_status").unwrap().categories(),
            Some(&["final".to_string(), "amended".to_string()][..])
        );
    }

    #[test]
    fn test_spec_file_overrides_builtin() {
        let dir = TempDir::new().unwrap();
        let spec_path = dir.path().join("specs.yaml");
        fs::write(
            &spec_path,
            "specs:\n  - resourceType: Observation\n    stringColumns: [Observation_id]\n",
        )
        .unwrap();

        let mut catalog = SpecCatalog::builtin();
        catalog.merge(SpecCatalog::from_path(&spec_path).unwrap());

        let ingestor = Ingestor::new(IngestConfig::new("Observation"), &catalog)
            .unwrap()
            .with_fetcher(Box::new(OfflineFetcher));
        let report = ingestor
            .run_values(vec![json!({"entry": [observation("o1", 1.0, "final")]})])
            .unwrap();

        assert_eq!(column_names(&report.table), vec!["Observation_id"]);
    }

    #[test]
    fn test_empty_searchset_gives_no_rows() {
        let searchset = json!({
            "resourceType": "Bundle",
            "id": "b-77",
            "type": "searchset",
            "total": 0
        });
        let report = tabulate_documents(vec![searchset], "Patient").unwrap();

        assert_eq!(report.stats.documents_processed, 1);
        assert_eq!(report.stats.resources_extracted, 0);
        assert_eq!(report.table.row_count(), 0);
        assert_eq!(report.table.column_count(), 0);
    }

    #[test]
    fn test_tabulate_and_export() {
        let report = tabulate_documents(
            vec![json!({"entry": [observation("o1", 70.0, "final")]})],
            "Observation",
        )
        .unwrap();

        let tab = ExportFormat::Tab.render(&report.table).unwrap();
        let lines: Vec<&str> = tab.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Observation_valueQuantity_value\t"));
        assert!(lines[1].starts_with("continuous\tdiscrete"));
        assert!(lines[2].ends_with("meta"));
        assert!(lines[3].starts_with("70\tfinal"));
    }
}
