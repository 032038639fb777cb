use serde::{Deserialize, Serialize};

/// One recorded call-frame instance.
///
/// A record owns `locations.len()` steppable positions covering the half-open
/// cursor range `[begin_cursor, begin_cursor + locations.len())`. Consecutive
/// records in a snapshot are contiguous and non-overlapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Stable position among all records, assigned by the host.
    pub index: usize,
    /// Display name. A qualifier before the first `#` or `.` is used for
    /// grouping in the dropdown.
    pub name: String,
    pub frame_depth: u32,
    pub begin_cursor: u64,
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<RecordArg>>,
}

impl Record {
    /// One past the cursor of the last location in this record.
    pub fn end_cursor(&self) -> u64 {
        self.begin_cursor + self.locations.len() as u64
    }

    pub fn contains_cursor(&self, cursor: u64) -> bool {
        cursor >= self.begin_cursor && cursor < self.end_cursor()
    }

    /// Absolute cursor of the location at `offset` within this record.
    pub fn location_cursor(&self, offset: usize) -> u64 {
        self.begin_cursor + offset as u64
    }
}

/// A single steppable position inside a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    /// Set by some hosts instead of letting the panel derive the current
    /// position from the log index.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub current: bool,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current: false,
        }
    }
}

/// A `name=value` pair shown after the frame name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordArg {
    pub name: String,
    pub value: String,
}

/// Minimum frame depth across a displayed set, used as the indentation base.
/// Returns `None` for an empty set so callers cannot index past it.
pub fn min_depth(records: &[Record]) -> Option<u32> {
    records.iter().map(|r| r.frame_depth).min()
}
