//! CSV export of parsed tables and aggregated dilepton records.

use std::io::Write;

use oscar_core::error::{OscarError, Result};
use oscar_core::models::{ParsedTable, METADATA_COLUMNS};

use crate::aggregator::{DileptonRecord, RECORD_COLUMNS};

/// Record columns that hold integers.
const INTEGER_RECORD_COLUMNS: [usize; 6] = [0, 2, 3, 4, 7, 14];

const IO_ROLE_RECORD_COLUMN: usize = 5;

fn csv_error(err: csv::Error) -> OscarError {
    OscarError::Other(anyhow::Error::new(err))
}

fn render_record(record: &DileptonRecord, index: usize) -> String {
    if index == IO_ROLE_RECORD_COLUMN {
        return record.io_role.to_string();
    }
    match record.numeric(index) {
        Some(v) if INTEGER_RECORD_COLUMNS.contains(&index) => format!("{}", v as i64),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Write `records` as CSV with a [`RECORD_COLUMNS`] header.  Unset values
/// are written as empty fields.
pub fn write_records_csv<W: Write>(writer: W, records: &[DileptonRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(RECORD_COLUMNS).map_err(csv_error)?;
    for record in records {
        wtr.write_record((0..RECORD_COLUMNS.len()).map(|i| render_record(record, i)))
            .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a parsed table as CSV: header columns in their storage type,
/// then the metadata columns.
pub fn write_table_csv<W: Write>(writer: W, table: &ParsedTable) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.column_names()).map_err(csv_error)?;

    for row in table.rows() {
        let mut fields: Vec<String> = Vec::with_capacity(row.field_count());
        for (i, value) in row.values.iter().enumerate() {
            fields.push(match table.column_type(i) {
                Some(ty) => ty.format(*value),
                None => value.to_string(),
            });
        }
        fields.extend((0..METADATA_COLUMNS.len()).map(|slot| row.meta.render(slot)));
        wtr.write_record(&fields).map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}
