//! Minimum-score filtering for interaction tables.

use crate::data::{CellValue, TableView};
use crate::error::{ExplorerError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A minimum interaction score in `[0.8, 1.0]`.
///
/// Construction rejects out-of-range values rather than clamping them.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    /// Smallest selectable threshold.
    pub const MIN: f64 = 0.8;
    /// Largest selectable threshold.
    pub const MAX: f64 = 1.0;
    /// Slider increment.
    pub const STEP: f64 = 0.01;

    const EPS: f64 = 1e-9;

    /// Create a threshold, rejecting values outside `[MIN, MAX]`.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value < Self::MIN - Self::EPS || value > Self::MAX + Self::EPS {
            return Err(ExplorerError::InvalidParameter(format!(
                "threshold must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )));
        }
        Ok(Self(value.clamp(Self::MIN, Self::MAX)))
    }

    /// Threshold value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether this is the default (lowest) threshold.
    pub fn is_default(&self) -> bool {
        (self.0 - Self::MIN).abs() < Self::EPS
    }

    /// Every position of the slider, `0.80, 0.81, ..., 1.00`.
    pub fn slider_positions() -> Vec<Threshold> {
        let steps = ((Self::MAX - Self::MIN) / Self::STEP).round() as usize;
        (0..=steps)
            .map(|i| {
                let v = Self::MIN + i as f64 * Self::STEP;
                Threshold((v * 100.0).round() / 100.0)
            })
            .collect()
    }

    /// Whether a score passes (strictly greater than the threshold).
    #[inline]
    pub fn passes(&self, score: f64) -> bool {
        score > self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold(Self::MIN)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ExplorerError;

    fn try_from(value: f64) -> Result<Self> {
        Threshold::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(t: Threshold) -> f64 {
        t.0
    }
}

impl std::fmt::Display for Threshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Keep rows whose schema score is strictly greater than the threshold.
///
/// Rows with a missing score are dropped. Order is preserved, and an empty
/// result is a valid (empty) view.
pub fn filter_threshold(view: &TableView, threshold: &Threshold) -> Result<TableView> {
    let column = view.table().schema().score_column.clone();
    filter_threshold_on(view, &column, threshold)
}

/// Keep rows whose value in `column` is strictly greater than the threshold.
///
/// # Arguments
/// * `view` - The view to filter
/// * `column` - A numeric column of the view's table
/// * `threshold` - Strict lower bound
pub fn filter_threshold_on(view: &TableView, column: &str, threshold: &Threshold) -> Result<TableView> {
    let table = view.table();
    let col_idx = table.column_index(column)?;

    let keep: Vec<usize> = view
        .rows()
        .par_iter()
        .copied()
        .filter(|&pos| match table.cell_at(pos, col_idx) {
            CellValue::Number(v) => threshold.passes(*v),
            _ => false,
        })
        .collect();

    debug!(
        table = table.name(),
        column,
        threshold = threshold.value(),
        before = view.len(),
        after = keep.len(),
        "threshold filter"
    );
    Ok(view.with_rows(keep))
}

/// Result of threshold filtering with statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdFilterResult {
    /// Threshold applied.
    pub threshold: f64,
    /// Rows before filtering.
    pub n_before: usize,
    /// Rows after filtering.
    pub n_after: usize,
    /// Rows removed.
    pub n_removed: usize,
}

impl std::fmt::Display for ThresholdFilterResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Threshold Filter Result (score > {:.2})", self.threshold)?;
        writeln!(f, "  Rows before:  {}", self.n_before)?;
        writeln!(f, "  Rows after:   {}", self.n_after)?;
        writeln!(f, "  Rows removed: {}", self.n_removed)?;
        Ok(())
    }
}

/// Filter with statistics about what was filtered.
pub fn filter_threshold_with_stats(
    view: &TableView,
    threshold: &Threshold,
) -> Result<(TableView, ThresholdFilterResult)> {
    let filtered = filter_threshold(view, threshold)?;
    let result = ThresholdFilterResult {
        threshold: threshold.value(),
        n_before: view.len(),
        n_after: filtered.len(),
        n_removed: view.len() - filtered.len(),
    };
    Ok((filtered, result))
}
