//! Bar-chart rendering of one histogram series.
//!
//! Bars are scaled to integer heights relative to the tallest bin; the
//! printed value above each bar is the real weighted sum.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use oscar_core::formatting;
use oscar_data::histogram::{Histogram, HistogramSet};

use crate::themes::Theme;

/// Integer resolution of the scaled bar heights.
const BAR_SCALE: f64 = 1000.0;

/// Which series of a [`HistogramSet`] is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Total,
    Series(usize),
}

impl Selection {
    /// Next selection, wrapping from the last series back to the total.
    pub fn next(self, series: usize) -> Self {
        match self {
            Selection::Total if series > 0 => Selection::Series(0),
            Selection::Series(i) if i + 1 < series => Selection::Series(i + 1),
            _ => Selection::Total,
        }
    }

    pub fn previous(self, series: usize) -> Self {
        match self {
            Selection::Total if series > 0 => Selection::Series(series - 1),
            Selection::Series(i) if i > 0 => Selection::Series(i - 1),
            _ => Selection::Total,
        }
    }
}

/// Title and histogram for `selection`; out-of-range indices fall back to
/// the total.
pub fn selected<'a>(set: &'a HistogramSet, selection: Selection) -> (String, &'a Histogram) {
    match selection {
        Selection::Series(i) => match set.series.get(i) {
            Some(s) => (format!("{} ({})", s.label, s.parent_id), &s.histogram),
            None => ("All parents".to_string(), &set.total),
        },
        Selection::Total => ("All parents".to_string(), &set.total),
    }
}

/// `(label, scaled height, printed value)` for every bin.
pub fn bar_values(hist: &Histogram) -> Vec<(String, u64, String)> {
    let max = hist.max_sum();
    hist.centers()
        .into_iter()
        .zip(hist.sum_weights())
        .map(|(center, &sum)| {
            let height = if max > 0.0 && sum > 0.0 {
                ((sum / max) * BAR_SCALE).round() as u64
            } else {
                0
            };
            (format!("{:.2}", center), height, formatting::format_weight(sum))
        })
        .collect()
}

/// Render the header, the bar chart and the key hints into `area`.
pub fn render_histogram_view(
    frame: &mut Frame,
    area: Rect,
    set: &HistogramSet,
    selection: Selection,
    source: &str,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    let (title, hist) = selected(set, selection);
    let series_style = match selection {
        Selection::Series(i) => theme.series_style(i),
        Selection::Total => theme.value,
    };

    let header = vec![
        Line::from(vec![
            Span::styled("Source: ", theme.label),
            Span::styled(source.to_string(), theme.info),
        ]),
        Line::from(vec![
            Span::styled("Axis: ", theme.label),
            Span::styled(set.value_column.clone(), theme.value),
            Span::styled("  weighted by ", theme.label),
            Span::styled(set.weight_column.clone(), theme.value),
            Span::styled(format!("  ({} bins)", hist.bin_count()), theme.dim),
        ]),
        Line::from(vec![
            Span::styled("Series: ", theme.label),
            Span::styled(title.clone(), series_style),
            Span::styled(
                format!(
                    "  entries {}  total {}",
                    formatting::format_number(hist.entries() as f64, 0),
                    formatting::format_weight(hist.total())
                ),
                theme.dim,
            ),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(header)).style(theme.text),
        chunks[0],
    );

    let values = bar_values(hist);
    let bars: Vec<Bar> = values
        .into_iter()
        .map(|(label, height, text)| {
            Bar::default()
                .value(height)
                .label(Line::from(label))
                .text_value(text)
        })
        .collect();

    let inner_width = chunks[1].width.saturating_sub(2);
    let bins = hist.bin_count().max(1) as u16;
    let bar_gap: u16 = if inner_width / bins >= 4 { 1 } else { 0 };
    let bar_width = (inner_width / bins).saturating_sub(bar_gap).max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.separator)
                .title(Span::styled(format!(" {} ", title), theme.header)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .bar_style(series_style)
        .value_style(theme.bar_value)
        .label_style(theme.bar_label);
    frame.render_widget(chart, chunks[1]);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Tab/→ next series  ←/Shift+Tab previous  s summary  q quit",
            theme.dim,
        ))),
        chunks[2],
    );
}

/// Render a "no data" placeholder when no dileptons were found.
pub fn render_no_data(frame: &mut Frame, area: Rect, source: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No dilepton records found", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(format!("Source: {}", source), theme.dim)),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" SMASH dileptons ", theme.header)),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
