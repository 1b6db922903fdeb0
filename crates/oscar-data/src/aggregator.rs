//! Dilepton pair aggregation over parsed OSCAR tables.
//!
//! Electrons and positrons emitted by the same interaction share one
//! pseudo id, so grouping rows by their block context and summing the
//! momenta merges each pair into a single dilepton four-vector.  Every
//! other species groups with itself.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use oscar_core::error::{OscarError, Result};
use oscar_core::kinematics::FourMomentum;
use oscar_core::models::{
    resolve_column, ColumnRef, IoRole, ParsedTable, DILEPTON_PSEUDO_ID, ELECTRON_PDG,
};
use serde::Serialize;
use tracing::debug;

/// Column names exposed by [`DileptonRecord::numeric`], in order.
pub const RECORD_COLUMNS: [&str; 16] = [
    "run",
    "t",
    "pseudo_id",
    "event",
    "block_no",
    "io_role",
    "block_weight",
    "block_type",
    "p0",
    "px",
    "py",
    "pz",
    "m_inv",
    "y",
    "parent_id",
    "block_weight_adj",
];

/// Collapse `±11` onto [`DILEPTON_PSEUDO_ID`]; every other id is unchanged.
pub fn pseudo_id(pdg: i32) -> i32 {
    if pdg.abs() == ELECTRON_PDG {
        DILEPTON_PSEUDO_ID
    } else {
        pdg
    }
}

// ── DileptonRecord ────────────────────────────────────────────────────────────

/// One aggregated group: a merged lepton pair or a single other particle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DileptonRecord {
    /// Index of the run the row came from (0 for single-file analyses).
    pub run: usize,
    pub t: f64,
    pub pseudo_id: i32,
    pub event: Option<i64>,
    pub block_no: Option<i64>,
    pub io_role: IoRole,
    pub block_weight: Option<f64>,
    pub block_type: Option<i64>,
    #[serde(flatten)]
    pub momentum: FourMomentum,
    pub m_inv: f64,
    pub y: Option<f64>,
    /// PDG id of the incoming particle of the block; 0 for non-dileptons.
    pub parent_id: i32,
    pub block_weight_adj: f64,
}

impl DileptonRecord {
    pub fn is_dilepton(&self) -> bool {
        self.pseudo_id == DILEPTON_PSEUDO_ID
    }

    /// Numeric value of column `index` in [`RECORD_COLUMNS`].
    pub fn numeric(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.run as f64),
            1 => Some(self.t),
            2 => Some(f64::from(self.pseudo_id)),
            3 => self.event.map(|v| v as f64),
            4 => self.block_no.map(|v| v as f64),
            6 => self.block_weight,
            7 => self.block_type.map(|v| v as f64),
            8 => Some(self.momentum.p0),
            9 => Some(self.momentum.px),
            10 => Some(self.momentum.py),
            11 => Some(self.momentum.pz),
            12 => Some(self.m_inv),
            13 => self.y,
            14 => Some(f64::from(self.parent_id)),
            15 => Some(self.block_weight_adj),
            _ => None,
        }
    }

    /// Value of `column`, resolved by name or ordinal.
    pub fn get(&self, column: &ColumnRef) -> Option<f64> {
        resolve_column(&RECORD_COLUMNS, column).and_then(|i| self.numeric(i))
    }
}

// ── Grouping key ──────────────────────────────────────────────────────────────

/// `(t, pseudo_id, event, block_no, io_role, block_weight, block_type)`.
///
/// Floats compare with `total_cmp`; unset metadata takes part as its own
/// value instead of dropping the row.
#[derive(Debug, Clone, Copy)]
struct GroupKey {
    t: f64,
    pseudo_id: i32,
    event: Option<i64>,
    block_no: Option<i64>,
    io_role: IoRole,
    block_weight: Option<f64>,
    block_type: Option<i64>,
}

fn cmp_opt_f64(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (a, b) => a.is_some().cmp(&b.is_some()),
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.t
            .total_cmp(&other.t)
            .then(self.pseudo_id.cmp(&other.pseudo_id))
            .then(self.event.cmp(&other.event))
            .then(self.block_no.cmp(&other.block_no))
            .then(self.io_role.cmp(&other.io_role))
            .then(cmp_opt_f64(self.block_weight, other.block_weight))
            .then(self.block_type.cmp(&other.block_type))
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

// ── Aggregation ───────────────────────────────────────────────────────────────

fn required_column(table: &ParsedTable, name: &str) -> Result<usize> {
    table
        .data_index(name)
        .ok_or_else(|| OscarError::MissingColumn(name.to_string()))
}

fn format_row(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Merge lepton pairs: group rows by block context and pseudo id, sum the
/// four-momenta per group, and sort by `(event, t, block_no)`.
///
/// Requires the header columns `t`, `pdg`, `p0`, `px`, `py`, `pz`.
pub fn aggregate_dilepton_pairs(table: &ParsedTable) -> Result<Vec<DileptonRecord>> {
    let t_col = required_column(table, "t")?;
    let pdg_col = required_column(table, "pdg")?;
    let p0_col = required_column(table, "p0")?;
    let px_col = required_column(table, "px")?;
    let py_col = required_column(table, "py")?;
    let pz_col = required_column(table, "pz")?;

    let mut groups: BTreeMap<GroupKey, FourMomentum> = BTreeMap::new();

    let expected = table.columns().len();
    for (index, row) in table.rows().iter().enumerate() {
        // Short rows are reported instead of indexed; `line_number` is the row position.
        let field = |col: usize| -> Result<f64> {
            row.values
                .get(col)
                .copied()
                .ok_or_else(|| OscarError::ColumnCount {
                    line_number: index + 1,
                    got: row.values.len(),
                    expected,
                    line: format_row(&row.values),
                })
        };
        let key = GroupKey {
            t: field(t_col)?,
            pseudo_id: pseudo_id(field(pdg_col)? as i32),
            event: row.meta.event,
            block_no: row.meta.block_no,
            io_role: row.meta.io_role,
            block_weight: row.meta.block_weight,
            block_type: row.meta.block_type,
        };
        *groups.entry(key).or_default() +=
            FourMomentum::new(field(p0_col)?, field(px_col)?, field(py_col)?, field(pz_col)?);
    }

    let mut records: Vec<DileptonRecord> = groups
        .into_iter()
        .map(|(key, momentum)| DileptonRecord {
            run: 0,
            t: key.t,
            pseudo_id: key.pseudo_id,
            event: key.event,
            block_no: key.block_no,
            io_role: key.io_role,
            block_weight: key.block_weight,
            block_type: key.block_type,
            momentum,
            m_inv: 0.0,
            y: None,
            parent_id: 0,
            block_weight_adj: key.block_weight.unwrap_or(0.0),
        })
        .collect();

    records.sort_by(|a, b| {
        a.event
            .cmp(&b.event)
            .then(a.t.total_cmp(&b.t))
            .then(a.block_no.cmp(&b.block_no))
    });

    debug!(
        "Aggregated {} rows into {} groups ({} dileptons)",
        table.len(),
        records.len(),
        records.iter().filter(|r| r.is_dilepton()).count()
    );

    Ok(records)
}

/// Fill `m_inv` with the clipped invariant mass of each record.
pub fn calculate_invariant_mass(records: &mut [DileptonRecord]) {
    for record in records {
        record.m_inv = record.momentum.mass();
    }
}

/// Fill `y` with the longitudinal rapidity of each record.
pub fn calculate_rapidity(records: &mut [DileptonRecord]) {
    for record in records {
        record.y = record.momentum.rapidity();
    }
}

/// Attach the incoming particle's id of each `(run, event, block_no)` block
/// to the dilepton records of that block.  Non-dilepton records get 0.
pub fn enrich_with_parent(records: &mut [DileptonRecord]) {
    let mut parents: HashMap<(usize, Option<i64>, Option<i64>), i32> = HashMap::new();
    for record in records.iter().filter(|r| r.io_role == IoRole::In) {
        parents
            .entry((record.run, record.event, record.block_no))
            .or_insert(record.pseudo_id);
    }

    for record in records.iter_mut() {
        record.parent_id = if record.is_dilepton() {
            parents
                .get(&(record.run, record.event, record.block_no))
                .copied()
                .unwrap_or(0)
        } else {
            0
        };
    }
}

/// Divide every block weight by the number of dilepton records.
///
/// A set without dileptons keeps its weights unchanged.
pub fn adjust_weights(records: &mut [DileptonRecord]) {
    let dileptons = records.iter().filter(|r| r.is_dilepton()).count();
    let divisor = if dileptons == 0 { 1.0 } else { dileptons as f64 };
    for record in records {
        record.block_weight_adj = record.block_weight.unwrap_or(0.0) / divisor;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
