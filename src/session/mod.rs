//! Per-page browsing state advanced by events.
//!
//! A [`PageState`] is created when a page is opened and dropped when the
//! user leaves it; nothing is shared between pages. [`PageState::apply`]
//! returns the next state and leaves the current one untouched, so a failed
//! event never corrupts the session.

use crate::data::{DrugCatalog, InteractionTable, TableView};
use crate::detail::{resolve, ResolvedDetail};
use crate::error::Result;
use crate::filter::{default_lineage, ColumnFilter, ColumnPredicate, Threshold};
use crate::grid::{GridState, SortKey, DEFAULT_PAGE_SIZE};
use crate::pipeline::ViewPipeline;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A user action on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PageEvent {
    SetThreshold { value: Threshold },
    SetLineage { lineage: String },
    SetColumnFilter { filter: ColumnFilter },
    ClearColumnFilter,
    SetSort { sort: Option<SortKey> },
    SetPage { page: usize },
    /// Select the row at a position on the current page.
    Select { position_on_page: usize },
    ClearSelection,
    SetHighlight { view: usize, term: String },
}

impl PageEvent {
    /// Whether the event can change which rows are visible.
    pub fn changes_view(&self) -> bool {
        matches!(
            self,
            PageEvent::SetThreshold { .. }
                | PageEvent::SetLineage { .. }
                | PageEvent::SetColumnFilter { .. }
                | PageEvent::ClearColumnFilter
        )
    }
}

/// Filter, grid and detail state of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageState {
    pub threshold: Threshold,
    pub lineage: Option<String>,
    pub column_filter: Option<ColumnFilter>,
    /// The column filter is the observed `[min, max]` of the upstream view
    /// and follows it when the threshold or lineage changes.
    #[serde(default)]
    pub column_filter_default: bool,
    pub grid: GridState,
    pub detail: Option<ResolvedDetail>,
}

impl PageState {
    /// Fresh state for a table: default threshold, the default lineage for
    /// lineage-specific tables, nothing selected.
    pub fn new(table: &Arc<InteractionTable>) -> Result<Self> {
        Self::with_page_size(table, DEFAULT_PAGE_SIZE)
    }

    /// Fresh state with a custom grid page size.
    pub fn with_page_size(table: &Arc<InteractionTable>, page_size: usize) -> Result<Self> {
        let lineage = if table.schema().lineage_column.is_some() {
            default_lineage(&TableView::full(Arc::clone(table)))?
        } else {
            None
        };
        let mut state = Self {
            threshold: Threshold::default(),
            lineage,
            column_filter: None,
            column_filter_default: false,
            grid: GridState::new(page_size),
            detail: None,
        };
        let view = state.view(table)?;
        state.grid.sync(&view);
        Ok(state)
    }

    /// Lineage scope then score threshold, without the column filter.
    fn upstream_pipeline(&self) -> ViewPipeline {
        let mut pipeline = ViewPipeline::new();
        if let Some(lineage) = &self.lineage {
            pipeline = pipeline.lineage(lineage);
        }
        pipeline.threshold(self.threshold)
    }

    /// The pipeline that produces this page's view: lineage scope, then
    /// score threshold, then the column filter.
    pub fn pipeline(&self) -> ViewPipeline {
        let pipeline = self.upstream_pipeline();
        match &self.column_filter {
            Some(filter) => pipeline.column_filter(filter),
            None => pipeline,
        }
    }

    /// Rows the column filter sees.
    pub fn upstream_view(&self, table: &Arc<InteractionTable>) -> Result<TableView> {
        self.upstream_pipeline().run(table)
    }

    /// Recompute a default numeric range over the current upstream rows.
    fn refresh_default_range(&mut self, table: &Arc<InteractionTable>) -> Result<()> {
        if !self.column_filter_default {
            return Ok(());
        }
        if let Some(filter) = &self.column_filter {
            let upstream = self.upstream_view(table)?;
            let refreshed = ColumnFilter::default_for(&upstream, &filter.column)?;
            debug!(column = %refreshed.column, predicate = ?refreshed.predicate, "default range recomputed");
            self.column_filter = Some(refreshed);
        }
        Ok(())
    }

    /// Current filtered view.
    pub fn view(&self, table: &Arc<InteractionTable>) -> Result<TableView> {
        self.pipeline().run(table)
    }

    /// Apply an event and return the next state.
    ///
    /// Events that change the view clear the selection and its detail.
    pub fn apply(
        &self,
        table: &Arc<InteractionTable>,
        catalog: Option<&DrugCatalog>,
        event: PageEvent,
    ) -> Result<Self> {
        let mut next = self.clone();
        let changes_view = event.changes_view();
        match event {
            PageEvent::SetThreshold { value } => {
                next.threshold = value;
                next.refresh_default_range(table)?;
            }
            PageEvent::SetLineage { lineage } => {
                next.lineage = Some(lineage);
                next.refresh_default_range(table)?;
            }
            PageEvent::SetColumnFilter { filter } => {
                let upstream = next.upstream_view(table)?;
                next.column_filter_default = matches!(filter.predicate, ColumnPredicate::Range { .. })
                    && ColumnFilter::default_for(&upstream, &filter.column)? == filter;
                next.column_filter = Some(filter);
            }
            PageEvent::ClearColumnFilter => {
                next.column_filter = None;
                next.column_filter_default = false;
            }
            PageEvent::SetSort { sort } => {
                let view = next.view(table)?;
                next.grid.set_sort(&view, sort)?;
            }
            PageEvent::SetPage { page } => {
                let view = next.view(table)?;
                next.grid.set_page(&view, page);
            }
            PageEvent::Select { position_on_page } => {
                let view = next.view(table)?;
                next.grid.select(&view, position_on_page)?;
                next.detail = match next.grid.selected(&view) {
                    Some(row) => Some(resolve(row, catalog)?),
                    None => None,
                };
            }
            PageEvent::ClearSelection => {
                next.grid.clear_selection();
                next.detail = None;
            }
            PageEvent::SetHighlight { view, term } => {
                if let Some(detail) = next.detail.as_mut() {
                    detail.set_highlight(view, &term)?;
                }
            }
        }

        if changes_view {
            let view = next.view(table)?;
            if next.grid.sync(&view) || next.grid.selected(&view).is_none() {
                next.grid.clear_selection();
                next.detail = None;
            }
            debug!(rows = view.len(), "page view changed");
        }
        Ok(next)
    }

    /// The selected row's resolved detail.
    pub fn detail(&self) -> Option<&ResolvedDetail> {
        self.detail.as_ref()
    }
}
