//! Entity-membership filters over composite identifiers.

use crate::data::{CellValue, TableView};
use crate::error::Result;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Entity symbols of a hyphen-joined identifier, trimmed, blanks dropped.
pub fn identifier_tokens(identifier: &str) -> impl Iterator<Item = &str> {
    identifier.split('-').map(str::trim).filter(|t| !t.is_empty())
}

/// Keep rows whose identifier mentions `entity`.
pub fn filter_entity(view: &TableView, entity: &str) -> Result<TableView> {
    let entity = entity.trim();
    filter_identifier(view, |id| identifier_tokens(id).any(|t| t == entity))
}

/// Keep rows whose identifier mentions any entity of `entities`.
pub fn filter_any_entity(view: &TableView, entities: &HashSet<String>) -> Result<TableView> {
    filter_identifier(view, |id| identifier_tokens(id).any(|t| entities.contains(t)))
}

/// Keep rows whose text value in `column` is one of `values`.
pub fn filter_values_in(view: &TableView, column: &str, values: &HashSet<String>) -> Result<TableView> {
    let table = view.table();
    let col_idx = table.column_index(column)?;
    let keep = view
        .rows()
        .par_iter()
        .copied()
        .filter(|&pos| match table.cell_at(pos, col_idx) {
            CellValue::Text(s) => values.contains(s),
            CellValue::Number(v) => values.contains(&v.to_string()),
            CellValue::Missing => false,
        })
        .collect();
    Ok(view.with_rows(keep))
}

/// Every entity symbol appearing in the view's identifiers.
pub fn collect_entities(view: &TableView) -> Result<BTreeSet<String>> {
    let table = view.table();
    let col_idx = table.column_index(&table.schema().id_column)?;
    Ok(view
        .rows()
        .iter()
        .flat_map(|&pos| {
            table
                .cell_at(pos, col_idx)
                .to_string()
                .split('-')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect())
}

fn filter_identifier<F>(view: &TableView, keep_id: F) -> Result<TableView>
where
    F: Fn(&str) -> bool + Sync,
{
    let table = view.table();
    let col_idx = table.column_index(&table.schema().id_column)?;
    let keep = view
        .rows()
        .par_iter()
        .copied()
        .filter(|&pos| match table.cell_at(pos, col_idx) {
            CellValue::Text(id) => keep_id(id),
            _ => false,
        })
        .collect();
    Ok(view.with_rows(keep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ppi_table;

    #[test]
    fn test_filter_entity_exact_token() {
        let view = TableView::full(ppi_table());
        let hits = filter_entity(&view, "RAF1").unwrap();
        assert_eq!(hits.len(), 1);
        // Token match, not substring: "RAF" is not "RAF1"
        assert!(filter_entity(&view, "RAF").unwrap().is_empty());
    }

    #[test]
    fn test_filter_any_entity() {
        let view = TableView::full(ppi_table());
        let set: HashSet<String> = ["BRAF", "TP53"].iter().map(|s| s.to_string()).collect();
        assert_eq!(filter_any_entity(&view, &set).unwrap().len(), 2);
    }

    #[test]
    fn test_collect_entities() {
        let view = TableView::full(ppi_table()).with_rows(vec![0, 1]);
        let genes = collect_entities(&view).unwrap();
        assert_eq!(
            genes.into_iter().collect::<Vec<_>>(),
            vec!["ABL1", "BCR", "BRAF", "MAP2K1"]
        );
    }

    #[test]
    fn test_filter_values_in() {
        let view = TableView::full(ppi_table());
        let set: HashSet<String> = ["fusion".to_string()].into_iter().collect();
        assert_eq!(filter_values_in(&view, "Note", &set).unwrap().len(), 1);
    }
}
