//! Paginated, sortable, single-selection grid over a table view.
//!
//! [`GridState`] is an explicit value: the caller owns it per page and
//! re-synchronises it with [`GridState::sync`] whenever the filtered view
//! may have changed.

mod export;

pub use export::{export_file_name, ExportContext};

use crate::data::{RowRef, TableView};
use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Rows per page of a main table.
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Rows per page of an exploration result table.
pub const EXPLORATION_PAGE_SIZE: usize = 10;

/// Sort direction of a grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

/// Grid state for one page visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridState {
    page_size: usize,
    page: usize,
    sort: Option<SortKey>,
    /// Table position of the selected row.
    selected: Option<usize>,
    /// Fingerprint of the view the page/selection refer to.
    view_fingerprint: Option<u64>,
}

impl Default for GridState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// One page of rows as displayed.
#[derive(Debug)]
pub struct GridPage<'a> {
    /// Rows on this page, in display order.
    pub rows: Vec<RowRef<'a>>,
    /// Zero-based page index.
    pub page: usize,
    /// Number of pages (at least 1).
    pub n_pages: usize,
    /// Rows across all pages.
    pub total: usize,
}

impl GridState {
    /// Create a grid with a page size (zero is treated as one).
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 0,
            sort: None,
            selected: None,
            view_fingerprint: None,
        }
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current zero-based page.
    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Active sort.
    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    /// Table position of the selected row.
    pub fn selected_position(&self) -> Option<usize> {
        self.selected
    }

    /// Reconcile with the current view. When the view's identity changed,
    /// the selection is cleared and paging restarts at the first page.
    ///
    /// Returns `true` when state was reset.
    pub fn sync(&mut self, view: &TableView) -> bool {
        let fingerprint = view.fingerprint();
        if self.view_fingerprint == Some(fingerprint) {
            return false;
        }
        let had_view = self.view_fingerprint.is_some();
        self.view_fingerprint = Some(fingerprint);
        self.page = 0;
        self.selected = None;
        had_view
    }

    /// Sort by a column; `None` restores the view order.
    pub fn set_sort(&mut self, view: &TableView, sort: Option<SortKey>) -> Result<()> {
        if let Some(key) = &sort {
            view.table().column_index(&key.column)?;
        }
        self.sort = sort;
        self.page = 0;
        Ok(())
    }

    /// Move to a page, clamped to the last page.
    pub fn set_page(&mut self, view: &TableView, page: usize) {
        self.page = page.min(n_pages(view.len(), self.page_size) - 1);
    }

    /// The view in display order (sort applied).
    pub fn display_view(&self, view: &TableView) -> Result<TableView> {
        let Some(key) = &self.sort else {
            return Ok(view.clone());
        };
        let table = view.table();
        let col_idx = table.column_index(&key.column)?;
        let mut rows = view.rows().to_vec();
        // Stable; missing values last in both directions
        rows.sort_by(|&a, &b| {
            let (x, y) = (table.cell_at(a, col_idx), table.cell_at(b, col_idx));
            match (x.is_missing(), y.is_missing(), key.direction) {
                (false, false, SortDirection::Descending) => y.sort_cmp(x),
                _ => x.sort_cmp(y),
            }
        });
        Ok(view.with_rows(rows))
    }

    /// Rows of the current page.
    pub fn page_rows<'a>(&self, display: &'a TableView) -> GridPage<'a> {
        let total = display.len();
        let n_pages = n_pages(total, self.page_size);
        let page = self.page.min(n_pages - 1);
        let start = page * self.page_size;
        let rows = (start..(start + self.page_size).min(total))
            .filter_map(|i| display.get(i))
            .collect();
        GridPage {
            rows,
            page,
            n_pages,
            total,
        }
    }

    /// Select the row at a position on the current page.
    ///
    /// Selecting is an explicit action; nothing is selected by default.
    pub fn select(&mut self, view: &TableView, position_on_page: usize) -> Result<usize> {
        self.sync(view);
        let display = self.display_view(view)?;
        let page_start = self.page.min(n_pages(display.len(), self.page_size) - 1) * self.page_size;
        let index = (position_on_page < self.page_size)
            .then(|| page_start + position_on_page)
            .filter(|&i| i < display.len())
            .ok_or_else(|| {
                ExplorerError::InvalidParameter(format!(
                    "No row at position {} of page {}",
                    position_on_page, self.page
                ))
            })?;
        let position = display.rows()[index];
        self.selected = Some(position);
        Ok(position)
    }

    /// Select a row by its table position, if it is in the view.
    pub fn select_position(&mut self, view: &TableView, position: usize) -> Result<()> {
        self.sync(view);
        if view.find_position(position).is_none() {
            return Err(ExplorerError::InvalidParameter(format!(
                "Row {} is not in the current view",
                position
            )));
        }
        self.selected = Some(position);
        Ok(())
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The selected row, if it still belongs to this view.
    pub fn selected<'a>(&self, view: &'a TableView) -> Option<RowRef<'a>> {
        if self.view_fingerprint != Some(view.fingerprint()) {
            return None;
        }
        view.find_position(self.selected?)
    }

    /// Write the whole filtered view (all pages, display order) as CSV.
    pub fn export_csv<W: Write>(&self, view: &TableView, writer: W) -> Result<()> {
        self.display_view(view)?.write_csv(writer)
    }
}

fn n_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ppi_table;
    use crate::filter::{filter_threshold, Threshold};

    fn ids(rows: &[RowRef<'_>]) -> Vec<String> {
        rows.iter().map(|r| r.identifier().unwrap()).collect()
    }

    #[test]
    fn test_paging() {
        let view = TableView::full(ppi_table());
        let mut grid = GridState::new(2);
        grid.sync(&view);
        let display = grid.display_view(&view).unwrap();
        let page = grid.page_rows(&display);
        assert_eq!(page.n_pages, 3);
        assert_eq!(ids(&page.rows), vec!["ABL1-BCR", "BRAF-MAP2K1"]);

        grid.set_page(&view, 10);
        let page = grid.page_rows(&display);
        assert_eq!(page.page, 2);
        assert_eq!(ids(&page.rows), vec!["TP53-MDM2"]);
    }

    #[test]
    fn test_sort_text_and_missing_last() {
        let view = TableView::full(ppi_table());
        let mut grid = GridState::default();
        grid.set_sort(
            &view,
            Some(SortKey {
                column: "Note".into(),
                direction: SortDirection::Descending,
            }),
        )
        .unwrap();
        let display = grid.display_view(&view).unwrap();
        let order: Vec<String> = display.iter().map(|r| r.text("Note").unwrap()).collect();
        assert_eq!(order, vec!["kinase", "kinase", "fusion", "canonical", ""]);
    }

    #[test]
    fn test_sort_numeric_ascending() {
        let view = TableView::full(ppi_table());
        let mut grid = GridState::default();
        grid.set_sort(
            &view,
            Some(SortKey {
                column: "PCorr-PPI score".into(),
                direction: SortDirection::Ascending,
            }),
        )
        .unwrap();
        let display = grid.display_view(&view).unwrap();
        assert_eq!(display.get(0).unwrap().identifier().unwrap(), "TP53-MDM2");
    }

    #[test]
    fn test_select_and_invalidate() {
        let table = ppi_table();
        let view = TableView::full(table);
        let mut grid = GridState::default();
        grid.sync(&view);
        assert!(grid.selected(&view).is_none());

        grid.select(&view, 1).unwrap();
        assert_eq!(grid.selected(&view).unwrap().identifier().unwrap(), "BRAF-MAP2K1");

        let narrowed = filter_threshold(&view, &Threshold::new(0.9).unwrap()).unwrap();
        assert!(grid.selected(&narrowed).is_none());
        assert!(grid.sync(&narrowed));
        assert!(grid.selected_position().is_none());
    }

    #[test]
    fn test_select_out_of_range() {
        let view = TableView::full(ppi_table()).with_rows(vec![]);
        let mut grid = GridState::default();
        assert!(grid.select(&view, 0).is_err());

        let view = TableView::full(ppi_table());
        assert!(matches!(
            grid.select(&view, usize::MAX),
            Err(ExplorerError::InvalidParameter(_))
        ));
        assert!(grid.select(&view, 5).is_err());
        assert!(grid.selected_position().is_none());
    }

    #[test]
    fn test_export_row_count() {
        let view = TableView::full(ppi_table());
        let filtered = filter_threshold(&view, &Threshold::new(0.85).unwrap()).unwrap();
        let grid = GridState::default();
        let mut buf = Vec::new();
        grid.export_csv(&filtered, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), filtered.len() + 1);
    }
}
