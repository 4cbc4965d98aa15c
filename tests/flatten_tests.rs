//! Flattening and extraction tests

use fhir_tabular::{FlatRow, Flattener, Layout, extract, extract_all, flatten};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn flat(value: Value) -> FlatRow {
    flatten(value.as_object().unwrap())
}

fn keys(row: &FlatRow) -> Vec<&str> {
    row.keys().collect()
}

mod flatten_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_shapes() {
        assert_eq!(keys(&flat(json!({"a": {"b": 1}}))), vec!["a_b"]);
        assert_eq!(keys(&flat(json!({"a": [1, 2]}))), vec!["a_0", "a_1"]);
        assert_eq!(keys(&flat(json!({"a": [{"b": 1}]}))), vec!["a_0_b"]);
    }

    #[test]
    fn test_deterministic() {
        let resource = json!({
            "resourceType": "Observation",
            "code": {"coding": [{"system": "http://loinc.org", "code": "8867-4"}]},
            "valueQuantity": {"value": 72, "unit": "beats/minute"}
        });

        let first = flat(resource.clone());
        let second = flat(resource);
        assert_eq!(first, second);
        assert_eq!(
            keys(&first),
            vec![
                "resourceType",
                "code_coding_0_system",
                "code_coding_0_code",
                "valueQuantity_value",
                "valueQuantity_unit",
            ]
        );
    }

    #[test]
    fn test_depth_gives_segment_count() {
        let resource = json!({"root": {"l1": {"l2": {"l3": "leaf"}}}});
        let row = flat(resource);

        let key = keys(&row)[0];
        assert_eq!(key, "root_l1_l2_l3");
        assert_eq!(key.split('_').count(), 4);
    }

    #[test]
    fn test_empty_containers_and_null() {
        let row = flat(json!({"a": {}, "b": [], "c": null}));
        assert_eq!(keys(&row), vec!["c"]);
        assert_eq!(row.get("c"), Some(&Value::Null));
        assert!(flat(json!({})).is_empty());
    }

    #[test]
    fn test_known_keys_follow_object_fields() {
        let output = Flattener::new()
            .flatten_with_keys(&json!({"name": [{"family": "Lovelace", "given": ["Ada"]}]}))
            .unwrap();

        assert_eq!(keys(&output.row), vec!["name_0_family", "name_0_given_0"]);
        assert_eq!(
            output.known_keys,
            vec!["name", "name_0_family", "name_0_given"]
        );
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        assert!(Flattener::new().flatten(&json!([1, 2])).is_err());
    }
}

mod extract_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scenario_bundle() {
        let bundle = json!({"entry": [{"resource": {
            "resourceType": "Patient", "id": "123", "gender": "male"
        }}]});

        let extraction = extract(bundle, "Patient").unwrap();
        assert_eq!(extraction.len(), 1);
        assert_eq!(
            extraction.resources[0],
            json!({"resourceType": "Patient", "id": "123", "gender": "male"})
        );

        let row = flat(extraction.resources[0].clone());
        assert_eq!(keys(&row), vec!["resourceType", "id", "gender"]);
        assert_eq!(row.text("id").as_deref(), Some("123"));
    }

    #[test]
    fn test_no_matching_entries() {
        let bundle = json!({"entry": [{"resource": {"resourceType": "Encounter", "id": "e1"}}]});
        let extraction = extract(bundle, "Patient").unwrap();
        assert!(extraction.is_empty());
    }

    #[test]
    fn test_bare_resource_requires_prefix() {
        let extraction = extract(json!({"resourceType": "Patient", "id": "p1"}), "Patient").unwrap();

        assert_eq!(extraction.layout, Layout::Bare);
        assert!(extraction.requires_prefix());
        assert_eq!(extraction.len(), 1);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(extract(json!("text"), "Patient").is_err());
        assert!(extract(json!({"entry": {"resource": {}}}), "Patient").is_err());
    }

    #[test]
    fn test_extract_all_groups_by_type() {
        let bundle = json!({"entry": [
            {"resource": {"resourceType": "Patient", "id": "p1"}},
            {"resource": {"resourceType": "Observation", "id": "o1"}},
            {"resource": {"resourceType": "Patient", "id": "p2"}}
        ]});

        let groups = extract_all(bundle).unwrap();
        let types: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(types, vec!["Patient", "Observation"]);
        assert_eq!(groups["Patient"].len(), 2);
    }
}
