//! Gene- and drug-centric queries across interaction tables.

use crate::data::{
    normalize_name, CellValue, ComplexIndex, RowRef, TableKind, TableView, DRUG_ID_COLUMN,
    DRUG_NAME_COLUMN, GENE_COLUMN, SMILES_COLUMN,
};
use crate::detail::{split_identifier, validate_smiles, ResolvedDetail};
use crate::error::{ExplorerError, Result};
use crate::filter::{
    collect_entities, filter_any_entity, filter_entity, filter_threshold, filter_values_in,
    Threshold,
};
use crate::plot::{network_chart, NetworkChart, PlotSettings};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// How to look a drug up in a DGI table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "query", rename_all = "snake_case")]
pub enum DrugQuery {
    /// Exact match on `Drug id`.
    Id(String),
    /// Normalised substring match on `Drug name`.
    Name(String),
    /// Exact match on `SMILES` after a syntax check.
    Smiles(String),
}

/// Rows of each relation view whose identifier mentions `gene` and whose
/// score passes `threshold`, in input order.
///
/// With `dgi_genes`, rows are further restricted to those touching at
/// least one gene that has a drug interaction.
pub fn gene_interactions(
    relations: &[TableView],
    gene: &str,
    threshold: &Threshold,
    dgi_genes: Option<&HashSet<String>>,
) -> Result<Vec<TableView>> {
    relations
        .iter()
        .map(|view| {
            let mut hits = filter_entity(&filter_threshold(view, threshold)?, gene)?;
            if let Some(genes) = dgi_genes {
                hits = filter_any_entity(&hits, genes)?;
            }
            debug!(table = view.table().name(), gene, rows = hits.len(), "gene interactions");
            Ok(hits)
        })
        .collect()
}

/// Genes that appear in the `Gene` column of a DGI view.
pub fn dgi_genes(dgi: &TableView) -> Result<HashSet<String>> {
    let table = dgi.table();
    let col_idx = table.column_index(GENE_COLUMN)?;
    Ok(dgi
        .rows()
        .iter()
        .filter_map(|&pos| table.cell_at(pos, col_idx).as_text().map(String::from))
        .collect())
}

/// DGI rows matching a drug query. No match is an empty view.
pub fn drug_query(dgi: &TableView, query: &DrugQuery) -> Result<TableView> {
    let hits = match query {
        DrugQuery::Id(id) => {
            let ids: HashSet<String> = [id.trim().to_string()].into_iter().collect();
            filter_values_in(dgi, DRUG_ID_COLUMN, &ids)?
        }
        DrugQuery::Name(name) => {
            let needle = normalize_name(name);
            let table = dgi.table();
            let col_idx = table.column_index(DRUG_NAME_COLUMN)?;
            let keep = dgi
                .rows()
                .par_iter()
                .copied()
                .filter(|&pos| match table.cell_at(pos, col_idx) {
                    CellValue::Text(names) => !needle.is_empty() && normalize_name(names).contains(&needle),
                    _ => false,
                })
                .collect();
            dgi.with_rows(keep)
        }
        DrugQuery::Smiles(smiles) => {
            validate_smiles(smiles)?;
            let wanted: HashSet<String> = [smiles.trim().to_string()].into_iter().collect();
            filter_values_in(dgi, SMILES_COLUMN, &wanted)?
        }
    };
    debug!(?query, rows = hits.len(), "drug query");
    Ok(hits)
}

/// DGI rows whose gene appears in any identifier of the relation views.
pub fn related_only(dgi: &TableView, relations: &[TableView]) -> Result<TableView> {
    let mut genes = HashSet::new();
    for view in relations {
        genes.extend(collect_entities(view)?);
    }
    filter_values_in(dgi, GENE_COLUMN, &genes)
}

/// TPI rows belonging to a TriNET complex, best score first.
pub fn complex_tpis(
    index: &ComplexIndex,
    tpi: &TableView,
    source: &str,
    complex: &str,
) -> Result<TableView> {
    let ids: HashSet<String> = index.tpis(source, complex)?.iter().cloned().collect();
    let id_column = tpi.table().schema().id_column.clone();
    let hits = filter_values_in(tpi, &id_column, &ids)?;

    let table = hits.table();
    let score_idx = table.column_index(&table.schema().score_column)?;
    let mut rows = hits.rows().to_vec();
    rows.sort_by(|&a, &b| {
        let (x, y) = (table.cell_at(a, score_idx), table.cell_at(b, score_idx));
        match (x.as_number(), y.as_number()) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
    Ok(hits.with_rows(rows))
}

/// TPIs of a complex under one gene-effect source.
#[derive(Debug, Clone)]
pub struct SourceTpis {
    pub source: String,
    /// Best score first; empty when the lookup failed.
    pub rows: TableView,
    pub error: Option<String>,
}

/// A selected TriNET complex.
#[derive(Debug, Clone)]
pub struct ComplexDetail {
    pub complex: String,
    pub network: NetworkChart,
    pub tpis: Vec<SourceTpis>,
}

/// Network of a selected complex's genes plus the TPIs assembled into it.
///
/// The complex index is keyed by each source view's data source and by the
/// complex identifier itself. A source without an entry keeps its slot
/// with `error` set.
pub fn complex_detail(
    detail: &ResolvedDetail,
    index: &ComplexIndex,
    tpi: &TableView,
    settings: &PlotSettings,
) -> Result<ComplexDetail> {
    if detail.kind != TableKind::Complex {
        return Err(ExplorerError::InvalidParameter(format!(
            "'{}' is a {} row, not a complex",
            detail.identifier,
            detail.kind.label()
        )));
    }
    let network = network_chart(&detail.genes(), settings, None)?;
    let tpis = detail
        .views
        .iter()
        .map(|view| match complex_tpis(index, tpi, &view.gene_source, &detail.identifier) {
            Ok(rows) => SourceTpis {
                source: view.gene_source.clone(),
                rows,
                error: None,
            },
            Err(e) => {
                warn!(complex = %detail.identifier, source = %view.gene_source, error = %e, "no associated TPIs");
                SourceTpis {
                    source: view.gene_source.clone(),
                    rows: tpi.with_rows(Vec::new()),
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();
    Ok(ComplexDetail {
        complex: detail.identifier.clone(),
        network,
        tpis,
    })
}

/// Network of the genes of a relation row with each gene's top drug.
pub fn relation_network(row: RowRef<'_>, settings: &PlotSettings, dgi: &TableView) -> Result<NetworkChart> {
    let identifier = row.identifier()?;
    let genes = split_identifier(&identifier, row.table().schema().arity)?;
    let genes: Vec<&str> = genes.iter().map(String::as_str).collect();
    network_chart(&genes, settings, Some(dgi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ppi_table, InteractionTable, TableSchema};
    use crate::detail::resolve;
    use crate::plot::NodeCategory;
    use std::sync::Arc;

    fn table(kind: TableKind, header: &[&str], records: Vec<Vec<&str>>) -> TableView {
        let header = header.iter().map(|s| s.to_string()).collect();
        let records = records
            .into_iter()
            .map(|r| r.into_iter().map(String::from).collect())
            .collect();
        let t = InteractionTable::from_records(kind.label(), TableSchema::for_kind(kind), header, records).unwrap();
        TableView::full(Arc::new(t))
    }

    fn dgi() -> TableView {
        table(
            TableKind::Dgi,
            &["DGI", "PCorr-DGI score", "Data source (Drug)", "Data source (Gene)", "Drug id", "Drug name", "Gene", "SMILES"],
            vec![
                vec!["D865-BRAF", "0.93", "CTRP", "CRISPR", "D865", "PLX4720; PLX-4720", "BRAF", "CC(=O)N"],
                vec!["D1-KRAS", "0.85", "GDSC", "CRISPR", "D1", "Sotorasib", "KRAS", "C1CCCCC1"],
                vec!["D2-EGFR", "0.82", "GDSC", "CRISPR", "D2", "Erlotinib", "EGFR", "NA"],
            ],
        )
    }

    fn tpi() -> TableView {
        table(
            TableKind::Tpi,
            &["TPI", "TPCA-PCorr-TPI score", "Data source"],
            vec![
                vec!["ABL1-BCR-GRB2", "0.90", "CRISPR"],
                vec!["A-B-C", "0.95", "CRISPR"],
                vec!["X-Y-Z", "0.99", "CRISPR"],
            ],
        )
    }

    #[test]
    fn test_gene_interactions() {
        let ppi = TableView::full(ppi_table());
        let t = Threshold::new(0.85).unwrap();
        let hits = gene_interactions(&[ppi.clone(), tpi()], "BCR", &t, None).unwrap();
        assert_eq!(hits[0].len(), 1);
        assert_eq!(hits[1].len(), 1);

        // NFKB1-RELA sits exactly at 0.85 and is excluded
        let hits = gene_interactions(&[ppi], "RELA", &t, None).unwrap();
        assert!(hits[0].is_empty());
    }

    #[test]
    fn test_gene_interactions_dgi_only() {
        let ppi = TableView::full(ppi_table());
        let genes = dgi_genes(&dgi()).unwrap();
        let t = Threshold::default();
        let hits = gene_interactions(&[ppi.clone()], "MAP2K1", &t, Some(&genes)).unwrap();
        assert_eq!(hits[0].len(), 1);
        let hits = gene_interactions(&[ppi], "TP53", &t, Some(&genes)).unwrap();
        assert!(hits[0].is_empty());
    }

    #[test]
    fn test_drug_query_variants() {
        let dgi = dgi();
        assert_eq!(drug_query(&dgi, &DrugQuery::Id("D1".into())).unwrap().len(), 1);
        let by_name = drug_query(&dgi, &DrugQuery::Name("plx 4720".into())).unwrap();
        assert_eq!(by_name.get(0).unwrap().identifier().unwrap(), "D865-BRAF");
        assert!(drug_query(&dgi, &DrugQuery::Name("zzz".into())).unwrap().is_empty());
        assert_eq!(drug_query(&dgi, &DrugQuery::Smiles(" C1CCCCC1 ".into())).unwrap().len(), 1);
        assert!(matches!(
            drug_query(&dgi, &DrugQuery::Smiles("C1CC(".into())),
            Err(ExplorerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_related_only() {
        let ppi = TableView::full(ppi_table());
        let related = related_only(&dgi(), &[ppi]).unwrap();
        let genes: Vec<String> = related.iter().map(|r| r.text("Gene").unwrap()).collect();
        assert_eq!(genes, vec!["BRAF", "KRAS"]);
    }

    #[test]
    fn test_complex_tpis_sorted() {
        let mut index = ComplexIndex::new();
        index.insert("CRISPR", "ABL1-BCR-GRB2-A", "ABL1-BCR-GRB2");
        index.insert("CRISPR", "ABL1-BCR-GRB2-A", "A-B-C");
        let rows = complex_tpis(&index, &tpi(), "CRISPR", "ABL1-BCR-GRB2-A").unwrap();
        let ids: Vec<String> = rows.iter().map(|r| r.identifier().unwrap()).collect();
        assert_eq!(ids, vec!["A-B-C", "ABL1-BCR-GRB2"]);
        assert!(complex_tpis(&index, &tpi(), "CRISPR", "none").is_err());
        assert!(complex_tpis(&index, &tpi(), "RNAi", "ABL1-BCR-GRB2-A").is_err());
    }

    fn trinet() -> TableView {
        table(
            TableKind::Complex,
            &["Complex", "TriNET score", "Data source", "Complex size"],
            vec![
                vec!["ABL1-BCR-GRB2-A", "0.92", "CRISPR", "4"],
                vec!["X-Y-Z", "0.88", "CRISPR; RNAi", "3"],
            ],
        )
    }

    #[test]
    fn test_complex_detail() {
        let mut index = ComplexIndex::new();
        index.insert("CRISPR", "ABL1-BCR-GRB2-A", "ABL1-BCR-GRB2");
        index.insert("CRISPR", "ABL1-BCR-GRB2-A", "A-B-C");
        let trinet = trinet();
        let detail = resolve(trinet.get(0).unwrap(), None).unwrap();

        let complex = complex_detail(&detail, &index, &tpi(), &PlotSettings::default()).unwrap();
        assert_eq!(complex.complex, "ABL1-BCR-GRB2-A");
        assert_eq!(complex.network.nodes.len(), 4);
        assert_eq!(complex.network.edges.len(), 6);
        assert_eq!(complex.tpis.len(), 1);
        assert_eq!(complex.tpis[0].source, "CRISPR");
        let ids: Vec<String> = complex.tpis[0].rows.iter().map(|r| r.identifier().unwrap()).collect();
        assert_eq!(ids, vec!["A-B-C", "ABL1-BCR-GRB2"]);
    }

    #[test]
    fn test_complex_detail_missing_source() {
        let mut index = ComplexIndex::new();
        index.insert("CRISPR", "X-Y-Z", "X-Y-Z");
        let trinet = trinet();
        let detail = resolve(trinet.get(1).unwrap(), None).unwrap();

        let complex = complex_detail(&detail, &index, &tpi(), &PlotSettings::default()).unwrap();
        assert_eq!(complex.network.nodes.len(), 3);
        assert_eq!(complex.tpis[0].rows.len(), 1);
        assert!(complex.tpis[0].error.is_none());
        assert_eq!(complex.tpis[1].source, "RNAi");
        assert!(complex.tpis[1].rows.is_empty());
        assert!(complex.tpis[1].error.is_some());
    }

    #[test]
    fn test_complex_detail_rejects_other_kinds() {
        let ppi = TableView::full(ppi_table());
        let detail = resolve(ppi.get(0).unwrap(), None).unwrap();
        let err = complex_detail(&detail, &ComplexIndex::new(), &tpi(), &PlotSettings::default()).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidParameter(_)));
    }

    #[test]
    fn test_relation_network_adds_top_drug() {
        let tpi = tpi();
        let row = tpi.get(2).unwrap();
        assert_eq!(row.identifier().unwrap(), "ABL1-BCR-GRB2");
        let chart = relation_network(row, &PlotSettings::default(), &dgi()).unwrap();
        // No DGI for these genes: a bare triangle
        assert_eq!(chart.nodes.len(), 3);

        let ppi = TableView::full(ppi_table());
        let row = ppi.iter().find(|r| r.identifier().unwrap() == "BRAF-MAP2K1").unwrap();
        let chart = relation_network(row, &PlotSettings::default(), &dgi()).unwrap();
        assert_eq!(chart.nodes.len(), 3);
        assert!(chart.node(NodeCategory::Drug, "Plx4720").is_some());
    }
}
