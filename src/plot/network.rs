//! Gene and drug interaction network of a complex.

use crate::data::{first_name, TableView, DRUG_NAME_COLUMN, GENE_COLUMN};
use crate::error::Result;
use crate::plot::PlotSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::TAU;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Gene,
    Drug,
}

impl NodeCategory {
    /// Node id of a label in this category; genes and drugs never share one.
    pub fn node_id(self, label: &str) -> String {
        match self {
            NodeCategory::Gene => format!("gene:{}", label),
            NodeCategory::Drug => format!("drug:{}", label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    /// Unique within a chart; edges refer to nodes by id.
    pub id: String,
    pub label: String,
    pub category: NodeCategory,
    pub color: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub source: String,
    pub target: String,
    pub color: String,
}

/// Node-link chart model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkChart {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
    pub notes: Vec<String>,
}

impl NetworkChart {
    pub fn node(&self, category: NodeCategory, label: &str) -> Option<&NetworkNode> {
        self.nodes
            .iter()
            .find(|n| n.category == category && n.label == label)
    }
}

/// Display label of a drug: its first listed name, capitalised.
pub fn drug_label(names: &str) -> String {
    let name = first_name(names).to_lowercase();
    let mut chars = name.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build the network of a complex's genes.
///
/// Genes form a complete graph. When a DGI view is given, each gene is
/// linked to its single best-scoring drug in that view and a note records
/// how many drugs were dropped.
pub fn network_chart(
    genes: &[&str],
    settings: &PlotSettings,
    dgi: Option<&TableView>,
) -> Result<NetworkChart> {
    let mut labels: Vec<(NodeCategory, String)> = Vec::new();
    let mut seen = BTreeSet::new();
    for gene in genes {
        let key = (NodeCategory::Gene, gene.to_string());
        if seen.insert(key.clone()) {
            labels.push(key);
        }
    }

    let mut edges = Vec::new();
    for i in 0..labels.len() {
        for j in (i + 1)..labels.len() {
            edges.push(NetworkEdge {
                source: NodeCategory::Gene.node_id(&labels[i].1),
                target: NodeCategory::Gene.node_id(&labels[j].1),
                color: settings.gene_node_color.clone(),
            });
        }
    }

    let mut notes = Vec::new();
    if let Some(view) = dgi {
        let score_column = view.table().schema().score_column.clone();
        let gene_list: Vec<String> = labels.iter().map(|(_, g)| g.clone()).collect();
        for gene in &gene_list {
            let mut n_drugs = 0usize;
            let mut best: Option<(f64, String)> = None;
            for row in view.iter() {
                if row.text(GENE_COLUMN)? != *gene {
                    continue;
                }
                n_drugs += 1;
                let score = row.number(&score_column)?.unwrap_or(f64::NEG_INFINITY);
                if best.as_ref().map_or(true, |(s, _)| score > *s) {
                    let names = row.text(DRUG_NAME_COLUMN).unwrap_or_default();
                    let label = if names.trim().is_empty() {
                        row.identifier()?
                    } else {
                        drug_label(&names)
                    };
                    best = Some((score, label));
                }
            }
            if n_drugs > 1 {
                notes.push(format!(
                    "{} interacts with {} drugs; showing top 1 by PCorr-DGI score.",
                    gene, n_drugs
                ));
            }
            if let Some((_, label)) = best {
                let key = (NodeCategory::Drug, label);
                if seen.insert(key.clone()) {
                    labels.push(key.clone());
                }
                edges.push(NetworkEdge {
                    source: NodeCategory::Drug.node_id(&key.1),
                    target: NodeCategory::Gene.node_id(gene),
                    color: settings.drug_node_color.clone(),
                });
            }
        }
    }

    let n = labels.len();
    let nodes = labels
        .into_iter()
        .enumerate()
        .map(|(i, (category, label))| {
            let (x, y) = circular_position(i, n);
            let color = match category {
                NodeCategory::Gene => settings.gene_node_color.clone(),
                NodeCategory::Drug => settings.drug_node_color.clone(),
            };
            NetworkNode {
                id: category.node_id(&label),
                label,
                category,
                color,
                x,
                y,
            }
        })
        .collect::<Vec<_>>();

    debug!(nodes = nodes.len(), edges = edges.len(), "built network");
    Ok(NetworkChart {
        nodes,
        edges,
        notes,
    })
}

fn circular_position(i: usize, n: usize) -> (f64, f64) {
    if n <= 1 {
        return (0.0, 0.0);
    }
    let angle = TAU * i as f64 / n as f64;
    (angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{InteractionTable, TableKind, TableSchema};
    use std::sync::Arc;

    fn dgi_view() -> TableView {
        let header = ["DGI", "PCorr-DGI score", "Data source (Drug)", "Data source (Gene)", "Drug name", "Gene"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let records = vec![
            vec!["D1-ABL1", "0.95", "CTRP", "CRISPR", "IMATINIB; Gleevec", "ABL1"],
            vec!["D2-ABL1", "0.90", "CTRP", "CRISPR", "nilotinib", "ABL1"],
            vec!["D3-GRB2", "0.85", "GDSC", "CRISPR", "drugx", "GRB2"],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect())
        .collect();
        let table = InteractionTable::from_records("dgi", TableSchema::for_kind(TableKind::Dgi), header, records).unwrap();
        TableView::full(Arc::new(table))
    }

    #[test]
    fn test_drug_label() {
        assert_eq!(drug_label("IMATINIB; Gleevec"), "Imatinib");
        assert_eq!(drug_label("plx-4720"), "Plx-4720");
        assert_eq!(drug_label(""), "");
    }

    #[test]
    fn test_complete_gene_graph() {
        let chart = network_chart(&["ABL1", "BCR", "GRB2"], &PlotSettings::default(), None).unwrap();
        assert_eq!(chart.nodes.len(), 3);
        assert_eq!(chart.edges.len(), 3);
        assert!(chart.nodes.iter().all(|n| n.color == "#ffb6c1"));
        assert!(chart.notes.is_empty());
    }

    #[test]
    fn test_top_drug_per_gene() {
        let view = dgi_view();
        let chart = network_chart(&["ABL1", "BCR", "GRB2"], &PlotSettings::default(), Some(&view)).unwrap();
        assert_eq!(chart.nodes.len(), 5);
        let imatinib = chart.node(NodeCategory::Drug, "Imatinib").unwrap();
        assert_eq!(imatinib.id, "drug:Imatinib");
        assert_eq!(imatinib.color, "#0a75ad");
        assert!(chart.node(NodeCategory::Drug, "Nilotinib").is_none());
        assert!(chart.node(NodeCategory::Drug, "Drugx").is_some());
        assert!(chart
            .edges
            .iter()
            .any(|e| e.source == "drug:Imatinib" && e.target == "gene:ABL1"));
        assert_eq!(chart.edges.len(), 5);
        assert_eq!(
            chart.notes,
            vec!["ABL1 interacts with 2 drugs; showing top 1 by PCorr-DGI score."]
        );
    }

    #[test]
    fn test_drug_named_like_gene_keeps_own_node() {
        let header = ["DGI", "PCorr-DGI score", "Data source (Drug)", "Data source (Gene)", "Drug name", "Gene"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let records = vec![vec!["D9-ABL1", "0.95", "CTRP", "CRISPR", "bcr", "ABL1"]]
            .into_iter()
            .map(|r| r.into_iter().map(String::from).collect())
            .collect();
        let table = InteractionTable::from_records("dgi", TableSchema::for_kind(TableKind::Dgi), header, records).unwrap();
        let view = TableView::full(Arc::new(table));

        let chart = network_chart(&["ABL1", "Bcr"], &PlotSettings::default(), Some(&view)).unwrap();
        assert_eq!(chart.nodes.len(), 3);
        assert_eq!(chart.node(NodeCategory::Gene, "Bcr").unwrap().id, "gene:Bcr");
        assert_eq!(chart.node(NodeCategory::Drug, "Bcr").unwrap().id, "drug:Bcr");
        assert_eq!(chart.edges.len(), 2);
    }
}
