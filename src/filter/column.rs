//! Per-column predicates: numeric ranges and text matches.

use crate::data::{CellValue, ColumnType, TableView};
use crate::error::{ExplorerError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a text query is compared with cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Whole-cell equality, ignoring case.
    #[default]
    Exact,
    /// Substring match, ignoring case.
    Contains,
}

/// A predicate over one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnPredicate {
    /// Inclusive numeric range.
    Range { lo: f64, hi: f64 },
    /// Case-insensitive text query; an empty query keeps every row.
    Text {
        query: String,
        #[serde(default)]
        mode: TextMatch,
    },
}

impl ColumnPredicate {
    /// Column type this predicate applies to.
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnPredicate::Range { .. } => ColumnType::Numeric,
            ColumnPredicate::Text { .. } => ColumnType::Text,
        }
    }

    /// Whether the predicate keeps every row.
    pub fn is_pass_through(&self) -> bool {
        matches!(self, ColumnPredicate::Text { query, .. } if query.trim().is_empty())
    }
}

/// A predicate bound to a column name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub predicate: ColumnPredicate,
}

impl ColumnFilter {
    /// Create a column filter.
    pub fn new(column: &str, predicate: ColumnPredicate) -> Self {
        Self {
            column: column.to_string(),
            predicate,
        }
    }

    /// The pass-through filter for a column: the observed `[min, max]` for
    /// numeric columns, an empty query for text columns.
    pub fn default_for(view: &TableView, column: &str) -> Result<Self> {
        let predicate = match view.table().column_type(column)? {
            ColumnType::Numeric => {
                let (lo, hi) = observed_range(view, column)?.unwrap_or((f64::MIN, f64::MAX));
                ColumnPredicate::Range { lo, hi }
            }
            ColumnType::Text => ColumnPredicate::Text {
                query: String::new(),
                mode: TextMatch::Exact,
            },
        };
        Ok(Self::new(column, predicate))
    }

    /// Apply to a view.
    pub fn apply(&self, view: &TableView) -> Result<TableView> {
        filter_column(view, &self.column, &self.predicate)
    }
}

/// Minimum and maximum of a numeric column over the rows of a view.
///
/// `None` when the view has no non-missing value in the column.
pub fn observed_range(view: &TableView, column: &str) -> Result<Option<(f64, f64)>> {
    let table = view.table();
    let col_idx = table.column_index(column)?;
    if table.column_type(column)? != ColumnType::Numeric {
        return Err(ExplorerError::InvalidParameter(format!(
            "Column '{}' is not numeric",
            column
        )));
    }
    Ok(view
        .rows()
        .iter()
        .filter_map(|&pos| table.cell_at(pos, col_idx).as_number())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        }))
}

/// Keep rows of `view` whose `column` satisfies `predicate`.
///
/// Numeric ranges are inclusive at both ends and never match a missing
/// value. Text queries are trimmed and compared case-insensitively. The
/// predicate kind must match the column type. Applying the same filter twice
/// gives the same view as applying it once.
pub fn filter_column(view: &TableView, column: &str, predicate: &ColumnPredicate) -> Result<TableView> {
    let table = view.table();
    let col_idx = table.column_index(column)?;
    let column_type = table.column_type(column)?;

    if predicate.column_type() != column_type {
        return Err(ExplorerError::InvalidParameter(format!(
            "{:?} predicate cannot filter {:?} column '{}'",
            predicate.column_type(),
            column_type,
            column
        )));
    }

    let keep: Vec<usize> = match predicate {
        ColumnPredicate::Range { lo, hi } => {
            if lo.is_nan() || hi.is_nan() || lo > hi {
                return Err(ExplorerError::InvalidParameter(format!(
                    "Invalid range [{}, {}] for column '{}'",
                    lo, hi, column
                )));
            }
            let (lo, hi) = (*lo, *hi);
            view.rows()
                .par_iter()
                .copied()
                .filter(|&pos| match table.cell_at(pos, col_idx) {
                    CellValue::Number(v) => *v >= lo && *v <= hi,
                    _ => false,
                })
                .collect()
        }
        ColumnPredicate::Text { query, mode } => {
            let needle = query.trim().to_lowercase();
            if needle.is_empty() {
                return Ok(view.clone());
            }
            view.rows()
                .par_iter()
                .copied()
                .filter(|&pos| match table.cell_at(pos, col_idx) {
                    CellValue::Text(s) => {
                        let hay = s.to_lowercase();
                        match mode {
                            TextMatch::Exact => hay == needle,
                            TextMatch::Contains => hay.contains(&needle),
                        }
                    }
                    _ => false,
                })
                .collect()
        }
    };

    debug!(
        table = table.name(),
        column,
        before = view.len(),
        after = keep.len(),
        "column filter"
    );
    Ok(view.with_rows(keep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ppi_table;

    fn ids(view: &TableView) -> Vec<String> {
        view.iter().map(|r| r.identifier().unwrap()).collect()
    }

    #[test]
    fn test_range_inclusive() {
        let view = TableView::full(ppi_table());
        let pred = ColumnPredicate::Range { lo: 0.85, hi: 0.91 };
        let filtered = filter_column(&view, "PCorr-PPI score", &pred).unwrap();
        assert_eq!(ids(&filtered), vec!["BRAF-MAP2K1", "KRAS-RAF1", "NFKB1-RELA"]);
    }

    #[test]
    fn test_text_exact_case_insensitive() {
        let view = TableView::full(ppi_table());
        let pred = ColumnPredicate::Text {
            query: "  KINASE ".into(),
            mode: TextMatch::Exact,
        };
        let filtered = filter_column(&view, "Note", &pred).unwrap();
        assert_eq!(ids(&filtered), vec!["BRAF-MAP2K1", "KRAS-RAF1"]);
    }

    #[test]
    fn test_text_contains() {
        let view = TableView::full(ppi_table());
        let pred = ColumnPredicate::Text {
            query: "rnai".into(),
            mode: TextMatch::Contains,
        };
        let filtered = filter_column(&view, "Data source", &pred).unwrap();
        assert_eq!(ids(&filtered), vec!["ABL1-BCR", "BRAF-MAP2K1"]);
    }

    #[test]
    fn test_empty_query_passes_through() {
        let view = TableView::full(ppi_table());
        let filter = ColumnFilter::default_for(&view, "Note").unwrap();
        assert!(filter.predicate.is_pass_through());
        assert_eq!(filter.apply(&view).unwrap().len(), view.len());
    }

    #[test]
    fn test_default_numeric_range_keeps_all() {
        let view = TableView::full(ppi_table());
        let filter = ColumnFilter::default_for(&view, "PCorr-PPI score").unwrap();
        assert_eq!(
            filter.predicate,
            ColumnPredicate::Range { lo: 0.80, hi: 0.97 }
        );
        assert_eq!(filter.apply(&view).unwrap().len(), 5);
    }

    #[test]
    fn test_missing_never_in_range() {
        let view = TableView::full(ppi_table());
        // Note column for TP53-MDM2 is NA; text filter never matches it
        let pred = ColumnPredicate::Text {
            query: "a".into(),
            mode: TextMatch::Contains,
        };
        let filtered = filter_column(&view, "Note", &pred).unwrap();
        assert!(!ids(&filtered).contains(&"TP53-MDM2".to_string()));
    }

    #[test]
    fn test_type_mismatch_and_unknown_column() {
        let view = TableView::full(ppi_table());
        let range = ColumnPredicate::Range { lo: 0.0, hi: 1.0 };
        assert!(matches!(
            filter_column(&view, "Note", &range),
            Err(ExplorerError::InvalidParameter(_))
        ));
        assert!(matches!(
            filter_column(&view, "Nope", &range),
            Err(ExplorerError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_empty_view_stays_empty() {
        let view = TableView::full(ppi_table()).with_rows(vec![]);
        let pred = ColumnPredicate::Range { lo: 0.0, hi: 1.0 };
        assert!(filter_column(&view, "PCorr-PPI score", &pred).unwrap().is_empty());
        assert_eq!(observed_range(&view, "PCorr-PPI score").unwrap(), None);
    }

    #[test]
    fn test_predicate_yaml() {
        let pred: ColumnPredicate =
            serde_yaml::from_str("type: text\nquery: CRISPR\nmode: contains\n").unwrap();
        assert_eq!(
            pred,
            ColumnPredicate::Text {
                query: "CRISPR".into(),
                mode: TextMatch::Contains
            }
        );
    }
}
