//! Value types shared across the coalescing core.

use serde::{Deserialize, Serialize};

/// Orientation for interpreting a rectangular cell range.
///
/// Matches the upstream wire names `ROWS` and `COLUMNS`. Defaults to rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[default]
    #[serde(rename = "ROWS")]
    Rows,
    #[serde(rename = "COLUMNS")]
    Columns,
}

impl Dimension {
    /// Wire name used by the upstream value endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Rows => "ROWS",
            Dimension::Columns => "COLUMNS",
        }
    }
}

/// How a request names its target spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetRef {
    /// A raw spreadsheet identifier, used as-is.
    Id(String),
    /// A symbolic name resolved through the alias table.
    Alias(String),
}

/// A single range request as supplied by the caller.
///
/// Immutable once parsed; coalescing only reads from it.
#[derive(Debug, Clone)]
pub struct RangeRequest {
    pub spreadsheet: SpreadsheetRef,
    pub range: String,
    pub dimension: Dimension,
}

/// Grouping discriminant for batch coalescing.
///
/// Two keys are equal iff both components are equal. Identifiers are
/// case-sensitive and never normalized; the derived `Hash` combines both
/// components, so keys sharing only one component never collide into the
/// same slot semantically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    pub spreadsheet_id: String,
    pub dimension: Dimension,
}

impl CompositeKey {
    pub fn new(spreadsheet_id: impl Into<String>, dimension: Dimension) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            dimension,
        }
    }
}

/// Accumulated parameters for one upstream batch call.
///
/// `ranges` preserves first-seen insertion order and never contains the same
/// literal range string twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPayload {
    pub spreadsheet_id: String,
    pub dimension: Dimension,
    pub ranges: Vec<String>,
}

impl BatchPayload {
    /// Creates an empty payload for a key that has just been seen for the
    /// first time.
    pub fn empty(spreadsheet_id: impl Into<String>, dimension: Dimension) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            dimension,
            ranges: Vec::new(),
        }
    }

    /// Exact string membership check; required before every range insert.
    pub fn contains_range(&self, range: &str) -> bool {
        self.ranges.iter().any(|r| r == range)
    }
}

/// One value range returned by the upstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub range: String,
    #[serde(default)]
    pub major_dimension: Dimension,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// Result produced for one coalesced group after its upstream call resolves.
///
/// `spreadsheet` is the caller-supplied symbolic name, reattached by reverse
/// lookup against the alias table when one is configured for the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet: Option<String>,
    pub spreadsheet_id: String,
    pub value_ranges: Vec<ValueRange>,
}
