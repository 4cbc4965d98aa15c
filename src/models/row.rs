//! Flat row model

use indexmap::IndexMap;
use indexmap::map::Iter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker written into cells that have no value (missing column or JSON `null`)
pub const NULL_MARKER: &str = "nan";

/// A single flattened resource.
///
/// Keys are underscore-joined field paths, values are JSON scalars. The map
/// keeps insertion order, so two flattenings of the same document always
/// produce the same key sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRow {
    cells: IndexMap<String, Value>,
}

impl FlatRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, overwriting any previous value for the same key.
    ///
    /// An overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.cells.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Column keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.cells.iter()
    }

    /// Cell value rendered as text, `None` when the key is absent
    pub fn text(&self, key: &str) -> Option<String> {
        self.cells.get(key).map(scalar_to_text)
    }

    /// Rewrite every key, keeping order.
    ///
    /// When two keys map to the same new key the later one wins.
    pub fn map_keys<F>(self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let mut cells = IndexMap::with_capacity(self.cells.len());
        for (key, value) in self.cells {
            cells.insert(f(&key), value);
        }
        Self { cells }
    }

    /// Rename a single key in place, keeping its position.
    ///
    /// An existing `to` cell is discarded, so the renamed value wins
    /// whatever the field order.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to || !self.cells.contains_key(from) {
            return self.cells.contains_key(from);
        }
        self.cells.shift_remove(to);
        let cells = std::mem::take(&mut self.cells);
        *self = cells
            .into_iter()
            .map(|(key, value)| {
                if key == from {
                    (to.to_string(), value)
                } else {
                    (key, value)
                }
            })
            .collect();
        true
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.cells
    }
}

impl FromIterator<(String, Value)> for FlatRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FlatRow {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Render a scalar the way it appears in a table cell.
///
/// Strings are taken verbatim, `null` becomes [`NULL_MARKER`], numbers and
/// booleans use their JSON spelling. Containers never reach a row, but are
/// rendered as compact JSON for completeness.
pub fn scalar_to_text(value: &Value) -> String {
    match value {
        Value::Null => NULL_MARKER.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
