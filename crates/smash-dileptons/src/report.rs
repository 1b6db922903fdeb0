//! Plain-text and JSON reports for non-interactive output modes.

use std::fmt::Write as _;

use serde::Serialize;

use oscar_core::formatting::{format_number, format_weight, percentage};
use oscar_data::analysis::AnalysisMetadata;
use oscar_data::histogram::HistogramSet;

/// JSON document printed by `--output json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub source: &'a str,
    pub metadata: &'a AnalysisMetadata,
    pub histogram: &'a HistogramSet,
}

/// Render the analysis summary, per-parent yields and the binned total.
pub fn render_text(source: &str, metadata: &AnalysisMetadata, set: &HistogramSet) -> String {
    let mut out = String::new();
    let edges = set.total.edges();
    let (lo, hi) = (edges[0], edges[edges.len() - 1]);

    let _ = writeln!(out, "SMASH dileptons: {}", source);
    let _ = writeln!(
        out,
        "Files: {}  data rows: {}  placeholders: {}  records: {}  dileptons: {}",
        metadata.files.len(),
        format_number(metadata.data_rows as f64, 0),
        format_number(metadata.placeholder_rows as f64, 0),
        format_number(metadata.records as f64, 0),
        format_number(metadata.dileptons as f64, 0),
    );
    let _ = writeln!(
        out,
        "Histogram of {} weighted by {}, {} bins in [{}, {}]",
        set.value_column,
        set.weight_column,
        set.total.bin_count(),
        lo,
        hi
    );
    let _ = writeln!(out);

    let total = set.total.total();
    let _ = writeln!(
        out,
        "{:<20} {:>8} {:>10} {:>12} {:>7}",
        "Parent", "PDG id", "Dileptons", "Weighted", "Share"
    );
    for s in &set.series {
        let _ = writeln!(
            out,
            "{:<20} {:>8} {:>10} {:>12} {:>6.1}%",
            s.label,
            s.parent_id,
            format_number(s.histogram.entries() as f64, 0),
            format_weight(s.histogram.total()),
            percentage(s.histogram.total(), total, 1)
        );
    }
    let _ = writeln!(
        out,
        "{:<20} {:>8} {:>10} {:>12}",
        "TOTAL",
        "",
        format_number(set.total.entries() as f64, 0),
        format_weight(total)
    );
    if set.skipped > 0 {
        let _ = writeln!(out, "({} dileptons outside the range or without a value)", set.skipped);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{:>10} {:>12} {:>8}", "center", "weighted", "entries");
    for ((center, sum), count) in set
        .total
        .centers()
        .iter()
        .zip(set.total.sum_weights())
        .zip(set.total.counts())
    {
        let _ = writeln!(
            out,
            "{:>10.4} {:>12} {:>8}",
            center,
            format_weight(*sum),
            count
        );
    }
    out
}
