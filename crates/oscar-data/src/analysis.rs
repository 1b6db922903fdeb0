//! Analysis pipelines for SMASH dilepton output.
//!
//! Ties the parser and the pair aggregator together: parse → apply storage
//! types → aggregate pairs → invariant mass and rapidity → parent ids →
//! weight normalisation.  [`aggregate_runs`] does the same over every run
//! directory of a batch.

use std::path::{Path, PathBuf};
use std::time::Instant;

use oscar_core::dtypes::oscar_data_types;
use oscar_core::error::{OscarError, Result};
use oscar_core::models::{resolve_column, ColumnRef, ParsedTable};
use tracing::{debug, info};

use crate::aggregator::{
    adjust_weights, aggregate_dilepton_pairs, calculate_invariant_mass, calculate_rapidity,
    enrich_with_parent, DileptonRecord, RECORD_COLUMNS,
};
use crate::reader::{find_output_files, read_table_with_blocks};

// ── Public types ──────────────────────────────────────────────────────────────

/// Aggregated dilepton records with column access by name or ordinal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DileptonTable {
    pub records: Vec<DileptonRecord>,
}

impl DileptonTable {
    pub fn new(records: Vec<DileptonRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with the dilepton pseudo id.
    pub fn dileptons(&self) -> impl Iterator<Item = &DileptonRecord> {
        self.records.iter().filter(|r| r.is_dilepton())
    }

    /// Values of one column, or `None` if the column does not exist.
    pub fn column(&self, column: &ColumnRef) -> Option<Vec<Option<f64>>> {
        let index = resolve_column(&RECORD_COLUMNS, column)?;
        Some(self.records.iter().map(|r| r.numeric(index)).collect())
    }
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// Output files that were parsed, in processing order.
    pub files: Vec<PathBuf>,
    /// Data lines read across all files.
    pub data_rows: usize,
    /// Placeholder rows synthesised for empty events.
    pub placeholder_rows: usize,
    /// Records after pair aggregation.
    pub records: usize,
    /// Records carrying the dilepton pseudo id.
    pub dileptons: usize,
    /// Wall-clock seconds spent parsing.
    pub parse_time_seconds: f64,
    /// Wall-clock seconds spent aggregating and deriving kinematics.
    pub transform_time_seconds: f64,
}

/// The complete output of [`analyze_file`] or [`aggregate_runs`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub table: DileptonTable,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Aggregate one parsed table without normalising weights.
///
/// Records are tagged with `run`.
pub fn analyze_table(table: &ParsedTable, run: usize) -> Result<Vec<DileptonRecord>> {
    let mut records = aggregate_dilepton_pairs(table)?;
    for record in records.iter_mut() {
        record.run = run;
    }
    calculate_invariant_mass(&mut records);
    calculate_rapidity(&mut records);
    enrich_with_parent(&mut records);
    Ok(records)
}

/// Run the full pipeline over a single output file.
pub fn analyze_file(path: &Path) -> Result<AnalysisResult> {
    let mut metadata = AnalysisMetadata::default();
    let mut records = process_run(path, 0, &mut metadata)?;

    let transform_start = Instant::now();
    adjust_weights(&mut records);
    metadata.transform_time_seconds += transform_start.elapsed().as_secs_f64();

    Ok(finish(records, metadata))
}

/// Run the pipeline over every `file_name` found below `root/data_dir`.
///
/// Event ids are shifted by a running offset so they stay unique across
/// runs, and weights are normalised once over the combined records.
pub fn aggregate_runs(root: &Path, data_dir: &str, file_name: &str) -> Result<AnalysisResult> {
    let search_root = if data_dir.is_empty() {
        root.to_path_buf()
    } else {
        root.join(data_dir)
    };
    if !search_root.is_dir() {
        return Err(OscarError::FileNotFound(search_root));
    }

    let files = find_output_files(&search_root, file_name);
    if files.is_empty() {
        return Err(OscarError::Config(format!(
            "no '{}' files found below {}",
            file_name,
            search_root.display()
        )));
    }
    info!("Aggregating {} runs below {}", files.len(), search_root.display());

    let mut metadata = AnalysisMetadata::default();
    let mut combined: Vec<DileptonRecord> = Vec::new();
    let mut event_offset: i64 = 0;

    for (run, path) in files.iter().enumerate() {
        let mut records = process_run(path, run, &mut metadata)?;

        let mut next_offset = event_offset;
        for record in records.iter_mut() {
            if let Some(event) = record.event.as_mut() {
                *event += event_offset;
                next_offset = next_offset.max(*event + 1);
            }
        }
        debug!(
            "Run {} ({}): {} records, event offset {}",
            run,
            path.display(),
            records.len(),
            event_offset
        );
        event_offset = next_offset;
        combined.append(&mut records);
    }

    let transform_start = Instant::now();
    adjust_weights(&mut combined);
    metadata.transform_time_seconds += transform_start.elapsed().as_secs_f64();

    Ok(finish(combined, metadata))
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn process_run(
    path: &Path,
    run: usize,
    metadata: &mut AnalysisMetadata,
) -> Result<Vec<DileptonRecord>> {
    let parse_start = Instant::now();
    let table = read_table_with_blocks(path)?.with_data_types(&oscar_data_types());
    metadata.parse_time_seconds += parse_start.elapsed().as_secs_f64();

    let placeholders = table.placeholder_count();
    metadata.files.push(path.to_path_buf());
    metadata.data_rows += table.len() - placeholders;
    metadata.placeholder_rows += placeholders;

    let transform_start = Instant::now();
    let records = analyze_table(&table, run)?;
    metadata.transform_time_seconds += transform_start.elapsed().as_secs_f64();
    Ok(records)
}

fn finish(records: Vec<DileptonRecord>, mut metadata: AnalysisMetadata) -> AnalysisResult {
    let table = DileptonTable::new(records);
    metadata.records = table.len();
    metadata.dileptons = table.dileptons().count();
    info!(
        "Analysis complete: {} records, {} dileptons from {} file(s)",
        metadata.records,
        metadata.dileptons,
        metadata.files.len()
    );
    AnalysisResult { table, metadata }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use oscar_core::models::{IoRole, DILEPTON_PSEUDO_ID};
    use tempfile::TempDir;

    const RUN: &str = "#!OSCAR2013Extended Dileptons t x y z mass p0 px py pz pdg ID charge\n\
        # event 0 ensemble 0\n\
        # interaction in 1 out 2 weight 0.004 partial 0.004 type 5\n\
        2.0 0 0 0 0.78 0.80 0.00 0.00 0.30 113 1 0\n\
        2.0 0 0 0 0.0005 0.40 0.10 0.00 0.10 11 2 -1\n\
        2.0 0 0 0 0.0005 0.40 -0.10 0.00 0.20 -11 3 1\n\
        # event 1 ensemble 0\n\
        # event 2 ensemble 0\n\
        # interaction in 1 out 2 weight 0.002 partial 0.002 type 5\n\
        1.5 0 0 0 0.78 0.90 0.00 0.00 0.00 223 4 0\n\
        1.5 0 0 0 0.0005 0.45 0.20 0.00 0.00 11 5 -1\n\
        1.5 0 0 0 0.0005 0.45 -0.20 0.00 0.00 -11 6 1\n";

    fn write_run(dir: &Path, name: &str) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, RUN).unwrap();
        path
    }

    // ── analyze_file ──────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_file_pipeline() {
        let dir = TempDir::new().unwrap();
        let path = write_run(dir.path(), "Dileptons.oscar");

        let result = analyze_file(&path).unwrap();
        let meta = &result.metadata;
        assert_eq!(meta.files, vec![path]);
        assert_eq!(meta.data_rows, 6);
        assert_eq!(meta.placeholder_rows, 1);
        assert_eq!(meta.dileptons, 2);
        // rho, pair, placeholder, omega, pair
        assert_eq!(meta.records, 5);

        let pairs: Vec<&DileptonRecord> = result.table.dileptons().collect();
        assert_eq!(pairs[0].parent_id, 113);
        assert_eq!(pairs[1].parent_id, 223);
        assert!((pairs[1].m_inv - 0.9).abs() < 1e-6);
        assert!((pairs[0].block_weight_adj - 0.002).abs() < 1e-12);
        assert!((pairs[1].block_weight_adj - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_analyze_file_placeholder_record() {
        let dir = TempDir::new().unwrap();
        let path = write_run(dir.path(), "Dileptons.oscar");
        let result = analyze_file(&path).unwrap();

        let placeholder = result
            .table
            .records
            .iter()
            .find(|r| r.io_role == IoRole::NotApplicable)
            .unwrap();
        assert_eq!(placeholder.event, Some(1));
        assert_eq!(placeholder.pseudo_id, 0);
        assert_eq!(placeholder.block_weight_adj, 0.0);
    }

    #[test]
    fn test_analyze_file_missing() {
        let err = analyze_file(Path::new("/tmp/no-such-dir/Dileptons.oscar")).unwrap_err();
        assert!(matches!(err, OscarError::FileRead { .. }));
    }

    // ── aggregate_runs ────────────────────────────────────────────────────────

    #[test]
    fn test_aggregate_runs_offsets_events_and_normalises_once() {
        let dir = TempDir::new().unwrap();
        write_run(&dir.path().join("data/0"), "Dileptons.oscar");
        write_run(&dir.path().join("data/1"), "Dileptons.oscar");

        let result = aggregate_runs(dir.path(), "data", "Dileptons.oscar").unwrap();
        assert_eq!(result.metadata.files.len(), 2);
        assert_eq!(result.metadata.dileptons, 4);

        let events: Vec<Option<i64>> = result.table.dileptons().map(|r| r.event).collect();
        assert_eq!(events, vec![Some(0), Some(2), Some(3), Some(5)]);

        let runs: Vec<usize> = result.table.dileptons().map(|r| r.run).collect();
        assert_eq!(runs, vec![0, 0, 1, 1]);

        let first = result.table.dileptons().next().unwrap();
        assert!((first.block_weight_adj - 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_runs_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = aggregate_runs(dir.path(), "absent", "Dileptons.oscar").unwrap_err();
        assert!(matches!(err, OscarError::FileNotFound(_)));
    }

    #[test]
    fn test_aggregate_runs_without_files() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        let err = aggregate_runs(dir.path(), "data", "Dileptons.oscar").unwrap_err();
        assert!(matches!(err, OscarError::Config(_)));
    }

    // ── DileptonTable ─────────────────────────────────────────────────────────

    #[test]
    fn test_column_by_name_and_ordinal() {
        let dir = TempDir::new().unwrap();
        let path = write_run(dir.path(), "Dileptons.oscar");
        let table = analyze_file(&path).unwrap().table;

        let ids = table.column(&ColumnRef::from("pseudo_id")).unwrap();
        assert_eq!(ids.len(), table.len());
        assert!(ids.contains(&Some(f64::from(DILEPTON_PSEUDO_ID))));

        let by_ordinal = table.column(&ColumnRef::from("2")).unwrap();
        assert_eq!(by_ordinal, ids);

        assert!(table.column(&ColumnRef::from("nope")).is_none());
    }
}
