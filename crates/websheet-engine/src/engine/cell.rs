//! Cell data structures for the spreadsheet grid.
//!
//! - [`ComputedValue`] - The cached result of a cell (number, text or error marker)
//! - [`CellRecord`] - Raw text, optional formula and computed value for one cell
//! - [`CellStore`] - Sparse storage keyed by cell identifier (backed by `DashMap`)

use dashmap::DashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::cell_ref::normalize_id;
use super::format::{format_number, parse_number};

/// Marker shown in place of a result when a formula fails to evaluate.
pub const ERROR_MARKER: &str = "#ERROR";
/// Marker shown for formulas that take part in (or read from) a reference cycle.
pub const CYCLE_MARKER: &str = "#CYCLE!";

/// The value a cell displays.
#[derive(Clone, Debug, PartialEq)]
pub enum ComputedValue {
    Number(f64),
    Text(String),
    Error,
    Cycle,
}

impl ComputedValue {
    /// Numeric reading of the value; text goes through [`parse_number`].
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ComputedValue::Number(n) => Some(*n),
            ComputedValue::Text(s) => parse_number(s),
            ComputedValue::Error | ComputedValue::Cycle => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            ComputedValue::Number(n) => format_number(*n),
            ComputedValue::Text(s) => s.clone(),
            ComputedValue::Error => ERROR_MARKER.to_string(),
            ComputedValue::Cycle => CYCLE_MARKER.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ComputedValue::Error | ComputedValue::Cycle)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ComputedRepr {
    Number(f64),
    Text(String),
}

impl Serialize for ComputedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            ComputedValue::Number(n) if n.is_finite() => ComputedRepr::Number(*n),
            other => ComputedRepr::Text(other.as_text()),
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ComputedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ComputedRepr::deserialize(deserializer)? {
            ComputedRepr::Number(n) => ComputedValue::Number(n),
            ComputedRepr::Text(s) if s == ERROR_MARKER => ComputedValue::Error,
            ComputedRepr::Text(s) if s == CYCLE_MARKER => ComputedValue::Cycle,
            ComputedRepr::Text(s) => ComputedValue::Text(s),
        })
    }
}

/// One stored cell. Persists as `{ "value": .., "formula"?: .., "computed"?: .. }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(rename = "value")]
    pub raw_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(rename = "computed", default, skip_serializing_if = "Option::is_none")]
    pub computed_value: Option<ComputedValue>,
}

impl CellRecord {
    /// A non-formula cell: the computed value is the raw text, uncoerced.
    pub fn plain(raw: &str) -> CellRecord {
        CellRecord {
            raw_value: raw.to_string(),
            formula: None,
            computed_value: Some(ComputedValue::Text(raw.to_string())),
        }
    }

    /// A formula cell with its freshly computed value.
    pub fn with_formula(raw: &str, computed: ComputedValue) -> CellRecord {
        CellRecord {
            raw_value: raw.to_string(),
            formula: Some(raw.to_string()),
            computed_value: Some(computed),
        }
    }

    pub fn is_formula(&self) -> bool {
        self.formula.is_some()
    }

    /// `computedValue ?? rawValue`.
    pub fn resolved(&self) -> ComputedValue {
        self.computed_value
            .clone()
            .unwrap_or_else(|| ComputedValue::Text(self.raw_value.clone()))
    }

    /// Text loaded back into the edit buffer: the formula if any, else the raw value.
    pub fn input_text(&self) -> &str {
        self.formula.as_deref().unwrap_or(&self.raw_value)
    }
}

/// Sparse cell storage keyed by uppercase identifier.
#[derive(Debug, Default)]
pub struct CellStore {
    cells: DashMap<String, CellRecord>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<CellRecord> {
        self.cells.get(&normalize_id(id)).map(|r| r.value().clone())
    }

    pub fn set(&self, id: &str, record: CellRecord) {
        self.cells.insert(normalize_id(id), record);
    }

    pub fn remove(&self, id: &str) -> Option<CellRecord> {
        self.cells.remove(&normalize_id(id)).map(|(_, r)| r)
    }

    pub fn clear(&self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Resolved value of a cell, None when the cell has never been written.
    pub fn value(&self, id: &str) -> Option<ComputedValue> {
        self.cells.get(&normalize_id(id)).map(|r| r.resolved())
    }

    /// Numeric value used when a formula references `id`: absent or non-numeric is 0.
    pub fn number(&self, id: &str) -> f64 {
        self.value(id).and_then(|v| v.as_number()).unwrap_or(0.0)
    }

    /// Sorted copy of the contents, in the persisted map shape.
    pub fn to_map(&self) -> BTreeMap<String, CellRecord> {
        self.cells
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Replace the contents with `map`.
    pub fn replace_with(&self, map: BTreeMap<String, CellRecord>) {
        self.cells.clear();
        for (id, record) in map {
            self.set(&id, record);
        }
    }
}
