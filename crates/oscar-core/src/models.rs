use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dtypes::ColumnType;

/// Sentinel id shared by electrons and positrons so that a pair groups together.
pub const DILEPTON_PSEUDO_ID: i32 = -1111;

/// PDG Monte-Carlo number of the electron (positron is `-11`).
pub const ELECTRON_PDG: i32 = 11;

/// Trailing metadata columns appended to every row after the header columns.
pub const METADATA_COLUMNS: [&str; 9] = [
    "block_no",
    "in_particles",
    "out_particles",
    "block_weight",
    "block_partial",
    "block_type",
    "event",
    "ensemble",
    "io_role",
];

/// Position of the `io_role` column within [`METADATA_COLUMNS`].
const IO_ROLE_SLOT: usize = 8;

// ── IoRole ────────────────────────────────────────────────────────────────────

/// Whether a data row is an incoming or outgoing participant of its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoRole {
    In,
    Out,
    /// Both countdowns were exhausted (or never set).
    Unknown,
    /// Placeholder rows synthesised for events without data.
    #[serde(rename = "NA")]
    NotApplicable,
}

impl IoRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            IoRole::In => "in",
            IoRole::Out => "out",
            IoRole::Unknown => "unknown",
            IoRole::NotApplicable => "NA",
        }
    }
}

impl fmt::Display for IoRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Comment grammar results ───────────────────────────────────────────────────

/// Values carried by an `# interaction ...` comment line.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionInfo {
    pub weight: f64,
    pub partial: f64,
    pub interaction_type: i64,
    /// Present only in the extended format (`in <n> out <m>`).
    pub in_count: Option<u32>,
    pub out_count: Option<u32>,
}

/// Values carried by an `# event <n> ensemble <m>` comment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventInfo {
    pub event: i64,
    pub ensemble: i64,
}

// ── BlockContext ──────────────────────────────────────────────────────────────

/// Running per-block state carried from comment lines onto the data rows
/// that follow them.  One instance lives for exactly one parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockContext {
    /// Zero-based counter of interaction lines seen so far.
    pub interaction_number: Option<i64>,
    pub in_count: Option<u32>,
    pub out_count: Option<u32>,
    pub in_remaining: u32,
    pub out_remaining: u32,
    pub weight: Option<f64>,
    pub partial: Option<f64>,
    pub interaction_type: Option<i64>,
    pub event: Option<i64>,
    pub ensemble: Option<i64>,
}

impl BlockContext {
    /// A context with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new interaction block.
    pub fn apply_interaction(&mut self, info: &InteractionInfo) {
        self.weight = Some(info.weight);
        self.partial = Some(info.partial);
        self.interaction_type = Some(info.interaction_type);
        self.interaction_number = Some(self.interaction_number.map_or(0, |n| n + 1));
        self.in_count = info.in_count;
        self.out_count = info.out_count;
        self.in_remaining = info.in_count.unwrap_or(0);
        self.out_remaining = info.out_count.unwrap_or(0);
    }

    /// Adopt a new event / ensemble pair.
    pub fn apply_event(&mut self, info: &EventInfo) {
        self.event = Some(info.event);
        self.ensemble = Some(info.ensemble);
    }

    /// Consume one slot of the in/out countdown and return the role it denotes.
    pub fn next_role(&mut self) -> IoRole {
        if self.in_remaining > 0 {
            self.in_remaining -= 1;
            IoRole::In
        } else if self.out_remaining > 0 {
            self.out_remaining -= 1;
            IoRole::Out
        } else {
            IoRole::Unknown
        }
    }

    /// Metadata for the next data row.  Advances the role countdown.
    pub fn row_meta(&mut self) -> RowMeta {
        let io_role = self.next_role();
        RowMeta {
            block_no: self.interaction_number,
            in_particles: self.in_count,
            out_particles: self.out_count,
            block_weight: self.weight,
            block_partial: self.partial,
            block_type: self.interaction_type,
            event: self.event,
            ensemble: self.ensemble,
            io_role,
        }
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

/// Block metadata attached to a single output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowMeta {
    pub block_no: Option<i64>,
    pub in_particles: Option<u32>,
    pub out_particles: Option<u32>,
    pub block_weight: Option<f64>,
    pub block_partial: Option<f64>,
    pub block_type: Option<i64>,
    pub event: Option<i64>,
    pub ensemble: Option<i64>,
    pub io_role: IoRole,
}

impl RowMeta {
    /// Metadata for an event that produced no data rows: everything zeroed
    /// except the event id.
    pub fn placeholder(event: Option<i64>) -> Self {
        Self {
            block_no: Some(0),
            in_particles: Some(0),
            out_particles: Some(0),
            block_weight: Some(0.0),
            block_partial: Some(0.0),
            block_type: Some(0),
            event,
            ensemble: Some(0),
            io_role: IoRole::NotApplicable,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.io_role == IoRole::NotApplicable
    }

    /// Numeric value of the metadata column at `slot`.  `io_role` has none.
    pub fn numeric(&self, slot: usize) -> Option<f64> {
        match slot {
            0 => self.block_no.map(|v| v as f64),
            1 => self.in_particles.map(f64::from),
            2 => self.out_particles.map(f64::from),
            3 => self.block_weight,
            4 => self.block_partial,
            5 => self.block_type.map(|v| v as f64),
            6 => self.event.map(|v| v as f64),
            7 => self.ensemble.map(|v| v as f64),
            _ => None,
        }
    }

    /// Textual rendering of the metadata column at `slot`; empty when unset.
    pub fn render(&self, slot: usize) -> String {
        if slot == IO_ROLE_SLOT {
            return self.io_role.to_string();
        }
        match slot {
            3 | 4 => self.numeric(slot).map(|v| v.to_string()).unwrap_or_default(),
            _ => self
                .numeric(slot)
                .map(|v| format!("{}", v as i64))
                .unwrap_or_default(),
        }
    }
}

/// One parsed data line (or synthesised placeholder) with its block context.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    /// Values for the header columns, in header order.
    pub values: Vec<f64>,
    pub meta: RowMeta,
}

impl OutputRow {
    /// Header fields plus the fixed metadata fields.
    pub fn field_count(&self) -> usize {
        self.values.len() + METADATA_COLUMNS.len()
    }
}

// ── Column resolution ─────────────────────────────────────────────────────────

/// A column selector: by name, or by ordinal position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        ColumnRef::Name(name)
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => f.write_str(name),
            ColumnRef::Index(i) => write!(f, "#{}", i),
        }
    }
}

/// Resolve `column` against `names`.
///
/// Names are matched exactly first.  A name that matches nothing but parses
/// as an unsigned integer falls back to an ordinal lookup.
pub fn resolve_column<S: AsRef<str>>(names: &[S], column: &ColumnRef) -> Option<usize> {
    match column {
        ColumnRef::Name(name) => names
            .iter()
            .position(|n| n.as_ref() == name)
            .or_else(|| {
                name.parse::<usize>()
                    .ok()
                    .filter(|&i| i < names.len())
            }),
        ColumnRef::Index(i) => (*i < names.len()).then_some(*i),
    }
}

// ── ParsedTable ───────────────────────────────────────────────────────────────

/// Flat table produced by one parse: header columns plus metadata columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    columns: Vec<String>,
    pub(crate) column_types: Vec<ColumnType>,
    pub(crate) rows: Vec<OutputRow>,
}

impl ParsedTable {
    /// Build a table; every header column starts out as `Float64`.
    pub fn new(columns: Vec<String>, rows: Vec<OutputRow>) -> Self {
        let column_types = vec![ColumnType::Float64; columns.len()];
        Self {
            columns,
            column_types,
            rows,
        }
    }

    /// Header column names only.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Header columns followed by [`METADATA_COLUMNS`].
    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .cloned()
            .chain(METADATA_COLUMNS.iter().map(|s| s.to_string()))
            .collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len() + METADATA_COLUMNS.len()
    }

    /// Storage type of header column `index`.
    pub fn column_type(&self, index: usize) -> Option<ColumnType> {
        self.column_types.get(index).copied()
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of synthesised empty-event rows.
    pub fn placeholder_count(&self) -> usize {
        self.rows.iter().filter(|r| r.meta.is_placeholder()).count()
    }

    /// Index into [`column_names`](Self::column_names) for `column`.
    pub fn resolve(&self, column: &ColumnRef) -> Option<usize> {
        resolve_column(&self.column_names(), column)
    }

    /// Index of a header column by exact name.
    pub fn data_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Numeric value at (`row`, `col`), where `col` indexes the full column list.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        let r = self.rows.get(row)?;
        if col < r.values.len() {
            Some(r.values[col])
        } else {
            r.meta.numeric(col - r.values.len())
        }
    }

    /// All values of one column, `None` where the row has no value.
    pub fn column_values(&self, column: &ColumnRef) -> Option<Vec<Option<f64>>> {
        let col = self.resolve(column)?;
        Some((0..self.rows.len()).map(|r| self.value(r, col)).collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
