//! Per-table-type schema descriptors.
//!
//! A single [`TableSchema`] parameterises filtering, selection and detail
//! resolution for every interaction type, so PPI, TPI, TriNET and DGI
//! tables all flow through the same code.

use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interaction table family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Protein-protein interactions (PCorr-PPI).
    Ppi,
    /// Ternary protein interactions (TPCA-PCorr-TPI).
    Tpi,
    /// TriNET protein complexes.
    Complex,
    /// Drug-gene interactions (PCorr-DGI).
    Dgi,
}

impl TableKind {
    /// Short label used in file names and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ppi => "PPI",
            Self::Tpi => "TPI",
            Self::Complex => "TriNET",
            Self::Dgi => "DGI",
        }
    }

    /// Parse from a case-insensitive label.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ppi" => Some(Self::Ppi),
            "tpi" => Some(Self::Tpi),
            "complex" | "trinet" => Some(Self::Complex),
            "dgi" => Some(Self::Dgi),
            _ => None,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Number of entities a composite identifier must split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Exactly N entities.
    Exact(usize),
    /// N or more entities.
    AtLeast(usize),
}

impl Arity {
    /// Check whether a token count satisfies this arity.
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exact(k) => n == k,
            Arity::AtLeast(k) => n >= k,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(k) => write!(f, "{}", k),
            Arity::AtLeast(k) => write!(f, "at least {}", k),
        }
    }
}

/// Where a row records the data source(s) behind its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceColumns {
    /// One gene-effect source column.
    Single(String),
    /// Drug-response source plus gene-effect source (DGI tables).
    DrugGene { drug: String, gene: String },
}

impl SourceColumns {
    /// Column holding the gene-effect source label(s).
    pub fn gene_column(&self) -> &str {
        match self {
            SourceColumns::Single(c) => c,
            SourceColumns::DrugGene { gene, .. } => gene,
        }
    }

    /// Column holding the drug-response source label, if any.
    pub fn drug_column(&self) -> Option<&str> {
        match self {
            SourceColumns::Single(_) => None,
            SourceColumns::DrugGene { drug, .. } => Some(drug),
        }
    }
}

/// A parsed data-source cell.
///
/// The combined form replaces the `"CRISPR; RNAi"` string sentinel with an
/// explicit variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Single(String),
    Combined(Vec<String>),
}

impl Source {
    /// Parse a data-source cell. Labels are separated by `;`.
    pub fn parse(raw: &str) -> Result<Self> {
        let labels: Vec<String> = raw
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        match labels.len() {
            0 => Err(ExplorerError::InvalidInput(format!(
                "Empty data source field '{}'",
                raw
            ))),
            1 => Ok(Source::Single(labels.into_iter().next().unwrap_or_default())),
            _ => Ok(Source::Combined(labels)),
        }
    }

    /// Labels in display order.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Source::Single(s) => vec![s.as_str()],
            Source::Combined(v) => v.iter().map(String::as_str).collect(),
        }
    }

    /// Whether this source asks for several views.
    pub fn is_combined(&self) -> bool {
        matches!(self, Source::Combined(_))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.labels().join("; "))
    }
}

/// Schema descriptor for one interaction table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table family.
    pub kind: TableKind,
    /// Column holding the hyphen-joined composite identifier.
    pub id_column: String,
    /// Canonical score column (load order, threshold filter).
    pub score_column: String,
    /// Data-source column(s).
    pub source: SourceColumns,
    /// Expected identifier arity.
    pub arity: Arity,
    /// Lineage column for lineage-specific (L-PCorr) tables.
    #[serde(default)]
    pub lineage_column: Option<String>,
}

impl TableSchema {
    /// Built-in schema for a table family.
    pub fn for_kind(kind: TableKind) -> Self {
        match kind {
            TableKind::Ppi => Self {
                kind,
                id_column: "PPI".into(),
                score_column: "PCorr-PPI score".into(),
                source: SourceColumns::Single("Data source".into()),
                arity: Arity::Exact(2),
                lineage_column: None,
            },
            TableKind::Tpi => Self {
                kind,
                id_column: "TPI".into(),
                score_column: "TPCA-PCorr-TPI score".into(),
                source: SourceColumns::Single("Data source".into()),
                arity: Arity::Exact(3),
                lineage_column: None,
            },
            TableKind::Complex => Self {
                kind,
                id_column: "Complex".into(),
                score_column: "TriNET score".into(),
                source: SourceColumns::Single("Data source".into()),
                arity: Arity::AtLeast(3),
                lineage_column: None,
            },
            TableKind::Dgi => Self {
                kind,
                id_column: "DGI".into(),
                score_column: "PCorr-DGI score".into(),
                source: SourceColumns::DrugGene {
                    drug: "Data source (Drug)".into(),
                    gene: "Data source (Gene)".into(),
                },
                arity: Arity::Exact(2),
                lineage_column: None,
            },
        }
    }

    /// Same schema with a lineage column (L-PCorr tables).
    pub fn with_lineage_column(mut self, column: &str) -> Self {
        self.lineage_column = Some(column.to_string());
        self
    }

    /// Columns the table file must provide.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut cols = vec![self.id_column.as_str(), self.score_column.as_str()];
        cols.push(self.source.gene_column());
        if let Some(drug) = self.source.drug_column() {
            cols.push(drug);
        }
        if let Some(lineage) = &self.lineage_column {
            cols.push(lineage);
        }
        cols
    }
}
