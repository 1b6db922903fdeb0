//! Weighted 1-D histograms of dilepton records, split by parent particle.

use std::collections::BTreeMap;

use oscar_core::error::{OscarError, Result};
use oscar_core::models::ColumnRef;
use oscar_core::pdg::ParticleTable;
use serde::Serialize;

use crate::analysis::DileptonTable;

/// `n` evenly spaced points from `start` to `stop`, both included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut points: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            points[n - 1] = stop;
            points
        }
    }
}

// ── Histogram ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    edges: Vec<f64>,
    sum_weights: Vec<f64>,
    counts: Vec<u64>,
}

impl Histogram {
    /// Requires at least two finite, strictly increasing edges.
    pub fn new(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(OscarError::InvalidHistogram(format!(
                "need at least 2 bin edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(OscarError::InvalidHistogram(
                "bin edges must be finite".to_string(),
            ));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(OscarError::InvalidHistogram(
                "bin edges must be strictly increasing".to_string(),
            ));
        }
        let bins = edges.len() - 1;
        Ok(Self {
            edges,
            sum_weights: vec![0.0; bins],
            counts: vec![0; bins],
        })
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn sum_weights(&self) -> &[f64] {
        &self.sum_weights
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_count(&self) -> usize {
        self.counts.len()
    }

    /// Bin containing `value`.  Bins are half-open except the last, which
    /// also contains the upper edge.
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let first = self.edges[0];
        let last = self.edges[self.edges.len() - 1];
        if value.is_nan() || value < first || value > last {
            return None;
        }
        if value == last {
            return Some(self.bin_count() - 1);
        }
        // First edge strictly greater than value, minus one.
        let upper = self.edges.partition_point(|&e| e <= value);
        Some(upper - 1)
    }

    /// Add `weight` to the bin containing `value`; returns whether it landed.
    pub fn fill(&mut self, value: f64, weight: f64) -> bool {
        match self.bin_index(value) {
            Some(i) => {
                self.sum_weights[i] += weight;
                self.counts[i] += 1;
                true
            }
            None => false,
        }
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    pub fn total(&self) -> f64 {
        self.sum_weights.iter().sum()
    }

    pub fn entries(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_sum(&self) -> f64 {
        self.sum_weights.iter().copied().fold(0.0, f64::max)
    }
}

// ── Series per parent ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub parent_id: i32,
    pub label: String,
    pub histogram: Histogram,
}

/// One histogram per parent plus their sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSet {
    pub value_column: String,
    pub weight_column: String,
    pub series: Vec<HistogramSeries>,
    pub total: Histogram,
    /// Dilepton records whose value or weight was missing or out of range.
    pub skipped: usize,
}

impl HistogramSet {
    pub fn series_for(&self, parent_id: i32) -> Option<&HistogramSeries> {
        self.series.iter().find(|s| s.parent_id == parent_id)
    }
}

/// Histogram `value` of every dilepton record, weighted by `weight`,
/// with one series per parent id in ascending id order.
pub fn histogram_by_parent(
    table: &DileptonTable,
    value: &ColumnRef,
    weight: &ColumnRef,
    edges: &[f64],
    particles: &ParticleTable,
) -> Result<HistogramSet> {
    let values = table
        .column(value)
        .ok_or_else(|| OscarError::MissingColumn(value.to_string()))?;
    let weights = table
        .column(weight)
        .ok_or_else(|| OscarError::MissingColumn(weight.to_string()))?;

    let empty = Histogram::new(edges.to_vec())?;
    let mut total = empty.clone();
    let mut per_parent: BTreeMap<i32, Histogram> = BTreeMap::new();
    let mut skipped = 0usize;

    for ((record, v), w) in table.records.iter().zip(values).zip(weights) {
        if !record.is_dilepton() {
            continue;
        }
        let (Some(v), Some(w)) = (v, w) else {
            skipped += 1;
            continue;
        };
        if w.is_nan() || !total.fill(v, w) {
            skipped += 1;
            continue;
        }
        per_parent
            .entry(record.parent_id)
            .or_insert_with(|| empty.clone())
            .fill(v, w);
    }

    let series = per_parent
        .into_iter()
        .map(|(parent_id, histogram)| HistogramSeries {
            parent_id,
            label: particles.label(parent_id),
            histogram,
        })
        .collect();

    Ok(HistogramSet {
        value_column: value.to_string(),
        weight_column: weight.to_string(),
        series,
        total,
        skipped,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
