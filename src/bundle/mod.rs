//! Bundle resource extraction
//!
//! A FHIR document is either a Bundle (an object with an `entry` array whose
//! items wrap a resource under `resource`) or one bare resource. Extraction
//! picks the resources of one type out of either shape.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::flatten::value_type_name;

const ENTRY_FIELD: &str = "entry";
const RESOURCE_FIELD: &str = "resource";
const RESOURCE_TYPE_FIELD: &str = "resourceType";
const BUNDLE_TYPE: &str = "Bundle";

/// Errors raised while extracting resources from a document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// The document does not have the shape of a Bundle or a resource
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

/// Shape of the document the resources came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Resources were unwrapped from Bundle entries
    Bundle,
    /// The document itself is the resource
    Bare,
}

/// Resources of one type taken from a document
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub resource_type: String,
    pub resources: Vec<Value>,
    pub layout: Layout,
    /// Bundle entries without a usable `resource` / `resourceType`
    pub skipped_entries: usize,
}

impl Extraction {
    /// Bare documents carry none of the Bundle's wrapping, so their rows
    /// still need the resource-type naming prefix
    pub fn requires_prefix(&self) -> bool {
        self.layout == Layout::Bare
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Extract every resource of `resource_type` from a document.
///
/// Bundle entries keep their order. A Bundle without an `entry` field has no
/// resources; any other document without one is returned whole as a single
/// resource of the requested type.
pub fn extract(document: Value, resource_type: &str) -> Result<Extraction, ExtractError> {
    let mut object = into_object(document)?;

    let Some(entries) = object.remove(ENTRY_FIELD) else {
        if is_bundle(&object) {
            debug!(resource_type, "Bundle has no entries");
            return Ok(Extraction {
                resource_type: resource_type.to_string(),
                resources: Vec::new(),
                layout: Layout::Bundle,
                skipped_entries: 0,
            });
        }
        if let Some(found) = object.get(RESOURCE_TYPE_FIELD).and_then(Value::as_str)
            && found != resource_type
        {
            warn!(
                expected = resource_type,
                found, "Bare resource has a different resourceType, using it anyway"
            );
        }
        return Ok(Extraction {
            resource_type: resource_type.to_string(),
            resources: vec![Value::Object(object)],
            layout: Layout::Bare,
            skipped_entries: 0,
        });
    };

    let entries = into_entries(entries)?;
    let mut resources = Vec::new();
    let mut skipped_entries = 0;

    for (index, entry) in entries.into_iter().enumerate() {
        match unwrap_entry(entry) {
            Some((kind, resource)) if kind == resource_type => resources.push(resource),
            Some(_) => {}
            None => {
                warn!(index, "Bundle entry has no resource or resourceType, skipping");
                skipped_entries += 1;
            }
        }
    }

    debug!(
        resource_type,
        matched = resources.len(),
        skipped_entries,
        "Extracted resources from bundle"
    );

    Ok(Extraction {
        resource_type: resource_type.to_string(),
        resources,
        layout: Layout::Bundle,
        skipped_entries,
    })
}

/// Group every resource of a document by its `resourceType`.
///
/// Groups appear in the order their type is first seen. A bare resource
/// without `resourceType` is grouped under an empty string.
pub fn extract_all(document: Value) -> Result<IndexMap<String, Vec<Value>>, ExtractError> {
    let mut object = into_object(document)?;

    let mut groups: IndexMap<String, Vec<Value>> = IndexMap::new();

    match object.remove(ENTRY_FIELD) {
        Some(entries) => {
            for entry in into_entries(entries)? {
                if let Some((kind, resource)) = unwrap_entry(entry) {
                    groups.entry(kind).or_default().push(resource);
                }
            }
        }
        None if is_bundle(&object) => {}
        None => {
            let kind = object
                .get(RESOURCE_TYPE_FIELD)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            groups.entry(kind).or_default().push(Value::Object(object));
        }
    }

    Ok(groups)
}

/// Searches with no hits return a Bundle without `entry`
fn is_bundle(object: &Map<String, Value>) -> bool {
    object.get(RESOURCE_TYPE_FIELD).and_then(Value::as_str) == Some(BUNDLE_TYPE)
}

fn into_object(document: Value) -> Result<Map<String, Value>, ExtractError> {
    match document {
        Value::Object(object) => Ok(object),
        other => Err(ExtractError::MalformedDocument(format!(
            "expected a JSON object, found {}",
            value_type_name(&other)
        ))),
    }
}

fn into_entries(entries: Value) -> Result<Vec<Value>, ExtractError> {
    match entries {
        Value::Array(items) => Ok(items),
        other => Err(ExtractError::MalformedDocument(format!(
            "`entry` must be an array, found {}",
            value_type_name(&other)
        ))),
    }
}

fn unwrap_entry(entry: Value) -> Option<(String, Value)> {
    let Value::Object(mut entry) = entry else {
        return None;
    };
    let resource = entry.remove(RESOURCE_FIELD)?;
    let kind = resource.get(RESOURCE_TYPE_FIELD)?.as_str()?.to_string();
    Some((kind, resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle() -> Value {
        json!({
            "resourceType": "Bundle",
            "type": "transaction",
            "entry": [
                {"fullUrl": "urn:uuid:1", "resource": {"resourceType": "Patient", "id": "1"}},
                {"fullUrl": "urn:uuid:2", "resource": {"resourceType": "Encounter", "id": "2"}},
                {"fullUrl": "urn:uuid:3", "resource": {"resourceType": "Patient", "id": "3"}}
            ]
        })
    }

    #[test]
    fn test_extract_filters_and_keeps_order() {
        let extraction = extract(bundle(), "Patient").unwrap();

        assert_eq!(extraction.layout, Layout::Bundle);
        assert!(!extraction.requires_prefix());
        assert_eq!(extraction.len(), 2);
        assert_eq!(extraction.resources[0]["id"], "1");
        assert_eq!(extraction.resources[1]["id"], "3");
    }

    #[test]
    fn test_extract_unwraps_resource() {
        let doc = json!({"entry": [{"resource": {"resourceType": "Patient", "id": "123", "gender": "male"}}]});
        let extraction = extract(doc, "Patient").unwrap();

        assert_eq!(
            extraction.resources,
            vec![json!({"resourceType": "Patient", "id": "123", "gender": "male"})]
        );
    }

    #[test]
    fn test_extract_no_match() {
        let extraction = extract(bundle(), "Observation").unwrap();
        assert!(extraction.is_empty());
        assert_eq!(extraction.skipped_entries, 0);
    }

    #[test]
    fn test_extract_bare_resource() {
        let doc = json!({"resourceType": "Encounter", "id": "e1", "status": "finished"});
        let extraction = extract(doc.clone(), "Encounter").unwrap();

        assert_eq!(extraction.layout, Layout::Bare);
        assert!(extraction.requires_prefix());
        assert_eq!(extraction.resources, vec![doc]);
    }

    #[test]
    fn test_extract_skips_broken_entries() {
        let doc = json!({"entry": [
            {"fullUrl": "urn:uuid:x"},
            {"resource": {"id": "no-type"}},
            {"resource": {"resourceType": "Patient", "id": "ok"}}
        ]});
        let extraction = extract(doc, "Patient").unwrap();

        assert_eq!(extraction.len(), 1);
        assert_eq!(extraction.skipped_entries, 2);
    }

    #[test]
    fn test_extract_malformed() {
        assert!(matches!(
            extract(json!([1, 2, 3]), "Patient"),
            Err(ExtractError::MalformedDocument(_))
        ));
        assert!(matches!(
            extract(json!({"entry": {"resource": {}}}), "Patient"),
            Err(ExtractError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_extract_all_groups_by_type() {
        let groups = extract_all(bundle()).unwrap();

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["Patient", "Encounter"]);
        assert_eq!(groups["Patient"].len(), 2);
        assert_eq!(groups["Encounter"].len(), 1);
    }

    #[test]
    fn test_extract_bundle_without_entries() {
        let searchset = json!({
            "resourceType": "Bundle",
            "id": "b-77",
            "type": "searchset",
            "total": 0
        });

        let extraction = extract(searchset.clone(), "Patient").unwrap();
        assert!(extraction.is_empty());
        assert_eq!(extraction.layout, Layout::Bundle);
        assert!(!extraction.requires_prefix());

        assert!(extract_all(searchset).unwrap().is_empty());
    }

    #[test]
    fn test_extract_all_bare() {
        let groups = extract_all(json!({"resourceType": "Observation", "id": "o"})).unwrap();
        assert_eq!(groups["Observation"].len(), 1);
    }
}
