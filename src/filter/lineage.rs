//! Lineage scoping for lineage-specific (L-PCorr) tables.

use crate::data::{CellValue, TableView};
use crate::error::{ExplorerError, Result};
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;

/// Lineage offered first when a lineage-specific table is opened.
pub const DEFAULT_LINEAGE: &str = "Myeloid";

fn lineage_column_index(view: &TableView) -> Result<usize> {
    let table = view.table();
    let column = table.schema().lineage_column.as_deref().ok_or_else(|| {
        ExplorerError::InvalidParameter(format!(
            "Table '{}' is not lineage-specific",
            table.name()
        ))
    })?;
    table.column_index(column)
}

/// Distinct lineages present in a view, sorted.
pub fn lineages(view: &TableView) -> Result<Vec<String>> {
    let table = view.table();
    let col_idx = lineage_column_index(view)?;
    let set: BTreeSet<String> = view
        .rows()
        .iter()
        .filter_map(|&pos| table.cell_at(pos, col_idx).as_text().map(String::from))
        .collect();
    Ok(set.into_iter().collect())
}

/// The lineage to preselect: [`DEFAULT_LINEAGE`] when present, otherwise
/// the first lineage in sort order.
pub fn default_lineage(view: &TableView) -> Result<Option<String>> {
    let all = lineages(view)?;
    if all.iter().any(|l| l == DEFAULT_LINEAGE) {
        return Ok(Some(DEFAULT_LINEAGE.to_string()));
    }
    Ok(all.into_iter().next())
}

/// Keep rows of one lineage (exact match on the schema's lineage column).
pub fn filter_lineage(view: &TableView, lineage: &str) -> Result<TableView> {
    let table = view.table();
    let col_idx = lineage_column_index(view)?;

    let keep: Vec<usize> = view
        .rows()
        .par_iter()
        .copied()
        .filter(|&pos| matches!(table.cell_at(pos, col_idx), CellValue::Text(l) if l == lineage))
        .collect();

    debug!(table = table.name(), lineage, before = view.len(), after = keep.len(), "lineage filter");
    Ok(view.with_rows(keep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{InteractionTable, TableKind, TableSchema};
    use std::sync::Arc;

    fn lpcorr_view() -> TableView {
        let schema = TableSchema::for_kind(TableKind::Ppi).with_lineage_column("Lineage");
        let header = ["PPI", "PCorr-PPI score", "Data source", "Lineage"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let records = vec![
            vec!["A-B", "0.9", "CRISPR", "Skin"],
            vec!["C-D", "0.95", "CRISPR", "Myeloid"],
            vec!["E-F", "0.85", "RNAi", "Skin"],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect())
        .collect();
        let table = InteractionTable::from_records("lpcorr_ppi", schema, header, records).unwrap();
        TableView::full(Arc::new(table))
    }

    #[test]
    fn test_filter_lineage() {
        let view = lpcorr_view();
        let skin = filter_lineage(&view, "Skin").unwrap();
        assert_eq!(skin.len(), 2);
        assert!(filter_lineage(&view, "Lung").unwrap().is_empty());
    }

    #[test]
    fn test_lineages_and_default() {
        let view = lpcorr_view();
        assert_eq!(lineages(&view).unwrap(), vec!["Myeloid", "Skin"]);
        assert_eq!(default_lineage(&view).unwrap().as_deref(), Some("Myeloid"));
    }

    #[test]
    fn test_requires_lineage_schema() {
        let view = TableView::full(crate::data::ppi_table());
        assert!(matches!(
            filter_lineage(&view, "Skin"),
            Err(ExplorerError::InvalidParameter(_))
        ));
    }
}
