//! Block-context parser for SMASH / OSCAR text output.
//!
//! Turns a comment-annotated, whitespace-delimited listing into a
//! [`ParsedTable`]: every data row carries the interaction and event
//! context that was live when it was read, and events that produced no
//! rows are represented by a zero-filled placeholder row.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use oscar_core::error::{OscarError, Result};
use oscar_core::models::{
    BlockContext, EventInfo, InteractionInfo, OutputRow, ParsedTable, RowMeta,
};
use regex::Regex;
use tracing::{debug, warn};

/// Prefix of the schema line.
const HEADER_PREFIX: &str = "#!";

/// Column names start after this token on the schema line.
const SCHEMA_MARKER: &str = "Dileptons";

// ── Comment grammars ──────────────────────────────────────────────────────────

fn interaction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"#\s*interaction\b.*?\bweight\s+(?P<weight>[-+0-9.eE]+).*?\bpartial\s+(?P<partial>[-+0-9.eE]+).*?\btype\s+(?P<type>[-+0-9]+)",
        )
        .expect("regex is valid")
    })
}

fn in_out_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bin\s+(?P<in>\d+)\s+out\s+(?P<out>\d+)").expect("regex is valid")
    })
}

fn event_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"#\s*event\s+(?P<event>\d+)\s+ensemble\s+(?P<ensemble>\d+)")
            .expect("regex is valid")
    })
}

/// Recognise an `# interaction ... weight <w> partial <p> type <t>` line.
///
/// The extended format additionally carries `in <n> out <m>`; both counts
/// are `None` when that pair is absent.  Returns `None` when the line does
/// not match or a captured number does not parse.
pub fn parse_interaction(line: &str) -> Option<InteractionInfo> {
    let caps = interaction_re().captures(line)?;
    let weight = caps["weight"].parse::<f64>().ok()?;
    let partial = caps["partial"].parse::<f64>().ok()?;
    let interaction_type = caps["type"].parse::<i64>().ok()?;

    let (in_count, out_count) = match in_out_re().captures(line) {
        Some(io) => (io["in"].parse().ok(), io["out"].parse().ok()),
        None => (None, None),
    };

    Some(InteractionInfo {
        weight,
        partial,
        interaction_type,
        in_count,
        out_count,
    })
}

/// Recognise an `# event <n> ensemble <m>` line.
pub fn parse_event(line: &str) -> Option<EventInfo> {
    let caps = event_re().captures(line)?;
    Some(EventInfo {
        event: caps["event"].parse().ok()?,
        ensemble: caps["ensemble"].parse().ok()?,
    })
}

/// Column names from a `#!` schema line: the tokens after `Dileptons`, or
/// every token after the first when that marker is missing.
pub fn parse_header(line: &str) -> Vec<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let names = match tokens.iter().position(|t| *t == SCHEMA_MARKER) {
        Some(idx) => &tokens[idx + 1..],
        None => tokens.get(1..).unwrap_or(&[]),
    };
    names.iter().map(|s| s.to_string()).collect()
}

// ── BlockParser ───────────────────────────────────────────────────────────────

/// Line-at-a-time parser state.  Feed every line in order, then call
/// [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct BlockParser {
    columns: Option<Vec<String>>,
    ctx: BlockContext,
    rows: Vec<OutputRow>,
    seen_event: bool,
    event_has_data: bool,
    last_line_number: usize,
    data_rows: usize,
    placeholders: usize,
}

impl BlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current block context.
    pub fn context(&self) -> &BlockContext {
        &self.ctx
    }

    /// Process one input line.  `line_number` is 1-based and only used for
    /// error messages.
    pub fn feed_line(&mut self, line_number: usize, raw: &str) -> Result<()> {
        self.last_line_number = line_number;
        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }

        if line.starts_with(HEADER_PREFIX) {
            self.handle_header(line_number, line)
        } else if line.starts_with('#') {
            self.handle_comment(line_number, line)
        } else {
            self.handle_data(line_number, line)
        }
    }

    /// Close the last event and return the table.
    pub fn finish(mut self) -> Result<ParsedTable> {
        if self.seen_event && !self.event_has_data {
            let line_number = self.last_line_number;
            self.push_placeholder(line_number, "<end of input>")?;
        }

        debug!(
            "Parsed {} lines: {} data rows, {} empty-event placeholders",
            self.last_line_number, self.data_rows, self.placeholders
        );

        let columns = match self.columns {
            Some(c) => c,
            None => {
                warn!("No '#!' header line found; returning an empty table");
                Vec::new()
            }
        };
        Ok(ParsedTable::new(columns, self.rows))
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// A later header replaces the earlier schema, but only while no rows
    /// exist or the column count stays the same.
    fn handle_header(&mut self, line_number: usize, line: &str) -> Result<()> {
        let columns = parse_header(line);
        if let Some(current) = &self.columns {
            if !self.rows.is_empty() && current.len() != columns.len() {
                return Err(OscarError::SchemaChanged {
                    line_number,
                    got: columns.len(),
                    expected: current.len(),
                    line: line.to_string(),
                });
            }
        }
        self.columns = Some(columns);
        Ok(())
    }

    fn handle_comment(&mut self, line_number: usize, line: &str) -> Result<()> {
        if let Some(info) = parse_interaction(line) {
            self.ctx.apply_interaction(&info);
            return Ok(());
        }

        if let Some(info) = parse_event(line) {
            if self.seen_event && !self.event_has_data {
                self.push_placeholder(line_number, line)?;
            }
            self.ctx.apply_event(&info);
            self.seen_event = true;
            self.event_has_data = false;
        }

        Ok(())
    }

    fn handle_data(&mut self, line_number: usize, line: &str) -> Result<()> {
        // Numeric prefix of the line; parsing stops at the first non-number.
        let values: Vec<f64> = line
            .split_whitespace()
            .map_while(|token| token.parse::<f64>().ok())
            .collect();
        if values.is_empty() {
            debug!("Skipping non-numeric line {}: {}", line_number, line);
            return Ok(());
        }

        let expected = match &self.columns {
            Some(columns) => columns.len(),
            None => {
                return Err(OscarError::MissingHeader {
                    line_number,
                    line: line.to_string(),
                })
            }
        };
        if values.len() != expected {
            return Err(OscarError::ColumnCount {
                line_number,
                got: values.len(),
                expected,
                line: line.to_string(),
            });
        }

        let meta = self.ctx.row_meta();
        self.rows.push(OutputRow { values, meta });
        self.data_rows += 1;
        self.event_has_data = true;
        Ok(())
    }

    /// Append the zero row standing in for the current event.
    fn push_placeholder(&mut self, line_number: usize, line: &str) -> Result<()> {
        let width = match &self.columns {
            Some(columns) => columns.len(),
            None => {
                return Err(OscarError::MissingHeader {
                    line_number,
                    line: line.to_string(),
                })
            }
        };
        self.rows.push(OutputRow {
            values: vec![0.0; width],
            meta: RowMeta::placeholder(self.ctx.event),
        });
        self.placeholders += 1;
        Ok(())
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse an OSCAR listing from any buffered source.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD and parsing
/// continues.  The first format error aborts the parse.
pub fn parse_reader<R: BufRead>(mut reader: R) -> Result<ParsedTable> {
    let mut parser = BlockParser::new();
    let mut buf: Vec<u8> = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;
        let line = String::from_utf8_lossy(&buf);
        parser.feed_line(line_number, &line)?;
    }

    parser.finish()
}

/// Parse an OSCAR listing held in memory.
pub fn parse_str(text: &str) -> Result<ParsedTable> {
    parse_reader(text.as_bytes())
}

/// Read an OSCAR file and attach block metadata to every data row.
///
/// The file handle is dropped on every return path.
pub fn read_table_with_blocks(path: &Path) -> Result<ParsedTable> {
    let file = std::fs::File::open(path).map_err(|source| OscarError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let table = parse_reader(std::io::BufReader::new(file)).map_err(|err| match err {
        OscarError::Io(source) => OscarError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;

    debug!(
        "File {}: {} rows ({} placeholders), {} columns",
        path.display(),
        table.len(),
        table.placeholder_count(),
        table.columns().len()
    );
    Ok(table)
}

/// Build `base/folder/file_name` and require that it exists.
pub fn resolve_output_file(file_name: &str, folder: &str, base: &Path) -> Result<PathBuf> {
    let path = base.join(folder).join(file_name);
    if !path.exists() {
        warn!("File not found: {}", path.display());
        return Err(OscarError::FileNotFound(path));
    }
    Ok(path)
}

/// Find every file called `file_name` below `root`, sorted by path.
pub fn find_output_files(root: &Path, file_name: &str) -> Vec<PathBuf> {
    if !root.exists() {
        warn!("Data path does not exist: {}", root.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use oscar_core::models::{IoRole, METADATA_COLUMNS};
    use std::io::Write;
    use tempfile::TempDir;

    const SCENARIO: &str = "#!OSCAR2013Extended Dileptons t p0 px py pz pdg\n\
        #interaction weight 0.5 partial 0.5 type 1\n\
        #event 0 ensemble 0\n\
        1.0 1.0 0.1 0.1 0.1 11\n\
        1.0 0.9 -0.1 -0.1 -0.1 -11\n\
        #event 1 ensemble 0\n";

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn write_file(dir: &Path, rel: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    fn roles(table: &ParsedTable) -> Vec<IoRole> {
        table.rows().iter().map(|r| r.meta.io_role).collect()
    }

    // ── Comment grammars ──────────────────────────────────────────────────────

    #[test]
    fn test_parse_interaction_basic() {
        let info = parse_interaction("#interaction weight 0.5 partial 0.25 type 1").unwrap();
        assert_eq!(info.weight, 0.5);
        assert_eq!(info.partial, 0.25);
        assert_eq!(info.interaction_type, 1);
        assert_eq!(info.in_count, None);
        assert_eq!(info.out_count, None);
    }

    #[test]
    fn test_parse_interaction_extended_smash_line() {
        let line = "# interaction in 1 out 2 rho 0.0000000 weight 1.2500000e-06 partial 6.3e-07 type 5";
        let info = parse_interaction(line).unwrap();
        assert_eq!(info.in_count, Some(1));
        assert_eq!(info.out_count, Some(2));
        assert!((info.weight - 1.25e-6).abs() < 1e-18);
        assert!((info.partial - 6.3e-7).abs() < 1e-18);
        assert_eq!(info.interaction_type, 5);
    }

    #[test]
    fn test_parse_interaction_requires_all_fields() {
        assert!(parse_interaction("# interaction in 1 out 2 weight 0.5 type 1").is_none());
        assert!(parse_interaction("# weight 0.5 partial 0.5 type 1").is_none());
    }

    #[test]
    fn test_parse_interaction_unparseable_number() {
        assert!(parse_interaction("#interaction weight 1.2.3 partial 0.5 type 1").is_none());
    }

    #[test]
    fn test_parse_event() {
        let info = parse_event("# event 12 ensemble 3 out 40").unwrap();
        assert_eq!(info.event, 12);
        assert_eq!(info.ensemble, 3);
        assert!(parse_event("# event end").is_none());
        assert!(parse_event("#interaction weight 1 partial 1 type 1").is_none());
    }

    #[test]
    fn test_parse_header_after_marker() {
        let cols = parse_header("#!OSCAR2013Extended Dileptons t x y z mass p0 px py pz pdg ID charge");
        assert_eq!(cols.len(), 12);
        assert_eq!(cols[0], "t");
        assert_eq!(cols[11], "charge");
    }

    #[test]
    fn test_parse_header_fallback_without_marker() {
        let cols = parse_header("#!OSCAR2013 particle_lists t x y z");
        assert_eq!(cols, vec!["particle_lists", "t", "x", "y", "z"]);
    }

    // ── Parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_scenario_rows_and_placeholder() {
        let table = parse_str(SCENARIO).unwrap();

        assert_eq!(table.columns(), &["t", "p0", "px", "py", "pz", "pdg"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0].values, vec![1.0, 1.0, 0.1, 0.1, 0.1, 11.0]);
        assert_eq!(table.rows()[0].meta.block_weight, Some(0.5));
        assert_eq!(table.rows()[0].meta.block_type, Some(1));
        assert_eq!(table.rows()[0].meta.event, Some(0));

        let placeholder = &table.rows()[2];
        assert!(placeholder.meta.is_placeholder());
        assert_eq!(placeholder.meta.event, Some(1));
        assert_eq!(placeholder.values, vec![0.0; 6]);
    }

    #[test]
    fn test_every_row_has_same_field_count() {
        let table = parse_str(SCENARIO).unwrap();
        for row in table.rows() {
            assert_eq!(row.field_count(), 6 + METADATA_COLUMNS.len());
        }
    }

    #[test]
    fn test_role_tagging_from_counts() {
        let input = "#!OSCAR Dileptons t pdg\n\
            # interaction in 2 out 1 weight 1 partial 1 type 3\n\
            # event 0 ensemble 0\n\
            0.1 2212\n0.1 2212\n0.1 113\n0.1 11\n";
        let table = parse_str(input).unwrap();
        assert_eq!(
            roles(&table),
            vec![IoRole::In, IoRole::In, IoRole::Out, IoRole::Unknown]
        );
        assert_eq!(table.rows()[0].meta.in_particles, Some(2));
        assert_eq!(table.rows()[0].meta.out_particles, Some(1));
        assert_eq!(table.rows()[0].meta.block_no, Some(0));
    }

    #[test]
    fn test_block_number_increments_per_interaction() {
        let input = "#!OSCAR Dileptons t pdg\n\
            # event 0 ensemble 0\n\
            # interaction in 1 out 2 weight 1 partial 1 type 5\n\
            0.1 113\n0.2 11\n0.2 -11\n\
            # interaction in 1 out 2 weight 2 partial 2 type 5\n\
            0.3 223\n0.4 11\n0.4 -11\n";
        let table = parse_str(input).unwrap();
        let blocks: Vec<Option<i64>> = table.rows().iter().map(|r| r.meta.block_no).collect();
        assert_eq!(blocks, vec![Some(0), Some(0), Some(0), Some(1), Some(1), Some(1)]);
        assert_eq!(
            roles(&table),
            vec![IoRole::In, IoRole::Out, IoRole::Out, IoRole::In, IoRole::Out, IoRole::Out]
        );
        assert_eq!(table.rows()[3].meta.block_weight, Some(2.0));
    }

    #[test]
    fn test_rows_before_any_interaction_have_unset_metadata() {
        let input = "#!OSCAR Dileptons t pdg\n0.1 22\n";
        let table = parse_str(input).unwrap();
        let meta = &table.rows()[0].meta;
        assert_eq!(meta.block_no, None);
        assert_eq!(meta.block_weight, None);
        assert_eq!(meta.event, None);
        assert_eq!(meta.io_role, IoRole::Unknown);
        assert_eq!(table.placeholder_count(), 0);
    }

    #[test]
    fn test_mid_stream_empty_event_gets_placeholder() {
        let input = "#!OSCAR Dileptons t pdg\n\
            # event 0 ensemble 0\n\
            # event 1 ensemble 4\n\
            0.5 11\n\
            # event 2 ensemble 0\n\
            0.7 -11\n";
        let table = parse_str(input).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.rows()[0].meta.is_placeholder());
        assert_eq!(table.rows()[0].meta.event, Some(0));
        assert_eq!(table.rows()[1].meta.event, Some(1));
        assert_eq!(table.rows()[1].meta.ensemble, Some(4));
        assert_eq!(table.rows()[2].meta.event, Some(2));
        assert_eq!(table.placeholder_count(), 1);
    }

    #[test]
    fn test_consecutive_empty_events_each_get_one_placeholder() {
        let input = "#!OSCAR Dileptons t pdg\n\
            # event 0 ensemble 0\n# event 1 ensemble 0\n# event 2 ensemble 0\n";
        let table = parse_str(input).unwrap();
        let events: Vec<Option<i64>> = table.rows().iter().map(|r| r.meta.event).collect();
        assert_eq!(events, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(table.placeholder_count(), 3);
    }

    #[test]
    fn test_row_count_is_data_lines_plus_placeholders() {
        let input = "#!OSCAR Dileptons t pdg\n\
            # event 0 ensemble 0\n0.1 11\n0.1 -11\n\
            # event 1 ensemble 0\n\
            # event 2 ensemble 0\n0.3 22\n\
            # event 3 ensemble 0\n";
        let table = parse_str(input).unwrap();
        assert_eq!(table.len(), 3 + 2);
        assert_eq!(table.placeholder_count(), 2);
    }

    #[test]
    fn test_blank_lines_and_other_comments_ignored() {
        let input = "\n#!OSCAR Dileptons t pdg\n\n# Units: fm none\n   \n\
            # event 0 ensemble 0\n\n0.1 11\n# SMASH-3.1\n";
        let table = parse_str(input).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].values, vec![0.1, 11.0]);
    }

    #[test]
    fn test_header_overwritten_by_later_header() {
        let input = "#!OSCAR Dileptons a b c\n#!OSCAR Dileptons t pdg\n0.1 11\n";
        let table = parse_str(input).unwrap();
        assert_eq!(table.columns(), &["t", "pdg"]);
    }

    #[test]
    fn test_header_with_new_width_after_rows_is_fatal() {
        let input = "#!OSCAR Dileptons t pdg\n\
            # event 0 ensemble 0\n\
            0.1 11\n\
            #!OSCAR Dileptons t p0 px py pz pdg\n\
            1 1 0 0 0 11\n";
        let err = parse_str(input).unwrap_err();
        match err {
            OscarError::SchemaChanged {
                line_number,
                got,
                expected,
                ..
            } => {
                assert_eq!(line_number, 4);
                assert_eq!(got, 6);
                assert_eq!(expected, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_with_new_width_after_placeholder_is_fatal() {
        let input = "#!OSCAR Dileptons t pdg\n\
            # event 0 ensemble 0\n\
            # event 1 ensemble 0\n\
            #!OSCAR Dileptons t p0 pdg\n";
        let err = parse_str(input).unwrap_err();
        assert!(matches!(err, OscarError::SchemaChanged { line_number: 4, .. }));
    }

    #[test]
    fn test_same_width_header_after_rows_renames_columns() {
        let input = "#!OSCAR Dileptons t pdg\n\
            # event 0 ensemble 0\n\
            0.1 11\n\
            #!OSCAR Dileptons time pid\n\
            0.2 -11\n";
        let table = parse_str(input).unwrap();
        assert_eq!(table.columns(), &["time", "pid"]);
        assert_eq!(table.len(), 2);
        assert!(table.rows().iter().all(|r| r.values.len() == 2));
    }

    #[test]
    fn test_empty_event_placeholder_zeroes_ensemble() {
        let input = "#!OSCAR Dileptons t pdg\n\
            # event 4 ensemble 7\n\
            # event 5 ensemble 0\n\
            0.3 11\n";
        let table = parse_str(input).unwrap();
        assert_eq!(table.len(), 2);
        let placeholder = &table.rows()[0].meta;
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.event, Some(4));
        assert_eq!(placeholder.ensemble, Some(0));
        assert_eq!(table.rows()[0].values, vec![0.0, 0.0]);
        assert_eq!(table.rows()[1].meta.event, Some(5));
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let err = parse_str("# event 0 ensemble 0\n0.1 11\n").unwrap_err();
        match err {
            OscarError::MissingHeader { line_number, line } => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "0.1 11");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_column_mismatch_is_fatal_and_names_line() {
        let input = "#!OSCAR Dileptons t p0 pdg\n0.1 1.0 11\n0.2 2.0\n0.3 3.0 11\n";
        let err = parse_str(input).unwrap_err();
        match &err {
            OscarError::ColumnCount {
                line_number,
                got,
                expected,
                line,
            } => {
                assert_eq!(*line_number, 3);
                assert_eq!(*got, 2);
                assert_eq!(*expected, 3);
                assert_eq!(line, "0.2 2.0");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("got 2, expected 3"));
    }

    #[test]
    fn test_non_numeric_line_skipped() {
        let input = "#!OSCAR Dileptons t pdg\nend of listing\n0.1 11\n";
        let table = parse_str(input).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_no_header_and_no_rows_gives_empty_table() {
        let table = parse_str("# just a comment\n\n").unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_header_only_gives_empty_table() {
        let table = parse_str("#!OSCAR Dileptons t pdg\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_substituted() {
        let mut bytes = b"#!OSCAR Dileptons t pdg\n# comment \xff\xfe here\n# event 0 ensemble 0\n".to_vec();
        bytes.extend_from_slice(b"0.1 11\n");
        let table = parse_reader(&bytes[..]).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_trailing_newline() {
        let table = parse_str("#!OSCAR Dileptons t pdg\n0.1 11").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_reparse_is_identical() {
        let a = parse_str(SCENARIO).unwrap();
        let b = parse_str(SCENARIO).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_feed_line_updates_context() {
        let mut parser = BlockParser::new();
        parser.feed_line(1, "#!OSCAR Dileptons t pdg").unwrap();
        parser
            .feed_line(2, "# interaction in 1 out 2 weight 0.1 partial 0.2 type 7")
            .unwrap();
        assert_eq!(parser.context().interaction_type, Some(7));
        assert_eq!(parser.context().in_remaining, 1);
        parser.feed_line(3, "0.1 113").unwrap();
        assert_eq!(parser.context().in_remaining, 0);
        assert_eq!(parser.context().out_remaining, 2);
    }

    // ── Files ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_read_table_with_blocks_from_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "Dileptons.oscar", SCENARIO.as_bytes());
        let table = read_table_with_blocks(&path).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_read_table_with_blocks_missing_file() {
        let err = read_table_with_blocks(Path::new("/tmp/no-such-dir-oscar/Dileptons.oscar"))
            .unwrap_err();
        assert!(matches!(err, OscarError::FileRead { .. }));
    }

    #[test]
    fn test_resolve_output_file() {
        let dir = TempDir::new().unwrap();
        let expected = write_file(dir.path(), "run_a/Dileptons.oscar", b"");
        let path = resolve_output_file("Dileptons.oscar", "run_a", dir.path()).unwrap();
        assert_eq!(path, expected);

        let err = resolve_output_file("Dileptons.oscar", "run_b", dir.path()).unwrap_err();
        assert!(matches!(err, OscarError::FileNotFound(_)));
    }

    #[test]
    fn test_find_output_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "2/Dileptons.oscar", b"");
        write_file(dir.path(), "1/Dileptons.oscar", b"");
        write_file(dir.path(), "1/particle_lists.oscar", b"");
        write_file(dir.path(), "3/nested/Dileptons.oscar", b"");

        let files = find_output_files(dir.path(), "Dileptons.oscar");
        let rel: Vec<PathBuf> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("1/Dileptons.oscar"),
                PathBuf::from("2/Dileptons.oscar"),
                PathBuf::from("3/nested/Dileptons.oscar"),
            ]
        );
    }

    #[test]
    fn test_find_output_files_nonexistent_root() {
        assert!(find_output_files(Path::new("/tmp/does-not-exist-oscar-xyz"), "x").is_empty());
    }
}
