//! Fixed-width storage types for OSCAR columns.
//!
//! Parsed values are held as `f64`; applying the type map quantizes every
//! known column to the precision it would have in compact storage and
//! remembers the type so exports can render integers without decimals.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::ParsedTable;

/// Storage type of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Float32,
    Float64,
    Int32,
    Int16,
    Int8,
}

impl ColumnType {
    pub fn is_integer(&self) -> bool {
        matches!(self, ColumnType::Int32 | ColumnType::Int16 | ColumnType::Int8)
    }

    /// Round-trip `value` through this storage type.
    ///
    /// Integer casts truncate toward zero and saturate at the type bounds;
    /// NaN becomes 0 for integer types.
    pub fn quantize(&self, value: f64) -> f64 {
        match self {
            ColumnType::Float32 => value as f32 as f64,
            ColumnType::Float64 => value,
            ColumnType::Int32 => value as i32 as f64,
            ColumnType::Int16 => value as i16 as f64,
            ColumnType::Int8 => value as i8 as f64,
        }
    }

    /// Render `value` the way this type prints.
    pub fn format(&self, value: f64) -> String {
        match self {
            ColumnType::Float32 => (value as f32).to_string(),
            ColumnType::Float64 => value.to_string(),
            _ => format!("{}", value as i64),
        }
    }
}

/// Column types for the standard SMASH OSCAR2013 (extended) columns.
pub fn oscar_data_types() -> HashMap<&'static str, ColumnType> {
    use ColumnType::*;
    [
        ("t", Float32),
        ("x", Float32),
        ("y", Float32),
        ("z", Float32),
        ("mass", Float32),
        ("p0", Float32),
        ("px", Float32),
        ("py", Float32),
        ("pz", Float32),
        ("pdg", Int32),
        ("ID", Int32),
        ("charge", Int8),
        ("ncoll", Int16),
        ("form_time", Float32),
        ("xsecfac", Float32),
        ("proc_id_origin", Int16),
        ("proc_type_origin", Int16),
        ("time_last_coll", Float32),
        ("pdg_mother1", Int32),
        ("pdg_mother2", Int32),
        ("baryon_number", Int8),
        ("strangeness", Int8),
        ("weight", Float64),
        ("partial", Float64),
    ]
    .into_iter()
    .collect()
}

impl ParsedTable {
    /// Apply `types` to the header columns present in this table.
    ///
    /// Names in `types` that the table does not carry are ignored; columns
    /// not named in `types` keep their current type.
    pub fn with_data_types(mut self, types: &HashMap<&str, ColumnType>) -> Self {
        let targets: Vec<(usize, ColumnType)> = self
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(i, name)| types.get(name.as_str()).map(|t| (i, *t)))
            .collect();

        for (i, ty) in &targets {
            self.column_types[*i] = *ty;
        }
        for row in &mut self.rows {
            for (i, ty) in &targets {
                if let Some(v) = row.values.get_mut(*i) {
                    *v = ty.quantize(*v);
                }
            }
        }
        self
    }
}
