//! Per-parent summary table for the dilepton histogram TUI.
//!
//! One row per parent particle with its dilepton count and weighted yield,
//! plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use oscar_core::formatting;
use oscar_data::histogram::HistogramSet;

use crate::themes::Theme;

/// Data for a single row of the summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: String,
    pub parent_id: i32,
    /// Dilepton records that landed inside the histogram range.
    pub dileptons: u64,
    /// Sum of weights over those records.
    pub weighted: f64,
    /// Share of the total weighted yield in percent.
    pub share: f64,
}

/// Build the summary rows for `set`, in series order.
pub fn summary_rows(set: &HistogramSet) -> Vec<SummaryRow> {
    let total = set.total.total();
    set.series
        .iter()
        .map(|s| SummaryRow {
            label: s.label.clone(),
            parent_id: s.parent_id,
            dileptons: s.histogram.entries(),
            weighted: s.histogram.total(),
            share: formatting::percentage(s.histogram.total(), total, 1),
        })
        .collect()
}

/// Render the per-parent summary of `set` into `area`.
pub fn render_summary_table(frame: &mut Frame, area: Rect, set: &HistogramSet, theme: &Theme) {
    let header_cells = ["Parent", "PDG id", "Dileptons", "Weighted", "Share"]
        .iter()
        .map(|h| Cell::from(*h).style(theme.table_header));
    let header = Row::new(header_cells).height(1);

    let mut rows: Vec<Row> = summary_rows(set)
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(row.label).style(theme.series_style(i)),
                Cell::from(row.parent_id.to_string()),
                Cell::from(formatting::format_number(row.dileptons as f64, 0)),
                Cell::from(formatting::format_weight(row.weighted)),
                Cell::from(format!("{:.1}%", row.share)),
            ])
            .style(style)
        })
        .collect();

    let skipped_style = if set.skipped > 0 {
        theme.error
    } else {
        Style::default()
    };
    rows.push(
        Row::new(vec![
            Cell::from("TOTAL"),
            Cell::from(format!("{} parents", set.series.len())),
            Cell::from(formatting::format_number(set.total.entries() as f64, 0)),
            Cell::from(formatting::format_weight(set.total.total())),
            Cell::from(format!("{} skipped", set.skipped)).style(skipped_style),
        ])
        .style(theme.table_total),
    );

    let widths = [
        Constraint::Length(18),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator)
                .title(" Parents "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
