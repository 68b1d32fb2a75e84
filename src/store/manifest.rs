//! Dataset manifest: where every table, matrix and auxiliary map lives.

use crate::data::{SignalKind, TableKind, TableSchema};
use crate::error::{ExplorerError, Result};
use crate::plot::PlotSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One interaction table of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Name the table is loaded by.
    pub name: String,
    /// Table family; selects the built-in schema.
    pub kind: TableKind,
    /// Delimited file, relative to the manifest.
    pub path: PathBuf,
    /// Lineage column for lineage-specific tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineage_column: Option<String>,
    /// Drop exact duplicate rows on load.
    #[serde(default)]
    pub drop_duplicates: bool,
}

impl TableEntry {
    /// Schema for this table.
    pub fn schema(&self) -> TableSchema {
        let schema = TableSchema::for_kind(self.kind);
        match &self.lineage_column {
            Some(col) => schema.with_lineage_column(col),
            None => schema,
        }
    }

    /// Whether this is a lineage-specific table.
    pub fn is_lineage_specific(&self) -> bool {
        self.lineage_column.is_some()
    }
}

/// One signal matrix of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEntry {
    pub kind: SignalKind,
    /// Data-source label (`CRISPR`, `RNAi`, `CTRP`, ...).
    pub source: String,
    /// Entity × sample delimited file, relative to the manifest.
    pub path: PathBuf,
}

/// Dataset manifest loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    /// Dataset name.
    pub name: String,
    /// Interaction tables.
    pub tables: Vec<TableEntry>,
    /// Signal matrices.
    #[serde(default)]
    pub signals: Vec<SignalEntry>,
    /// Sample → lineage file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineages: Option<PathBuf>,
    /// Lineage → colour file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<PathBuf>,
    /// Drug id → name file, one row per synonym.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drug_names: Option<PathBuf>,
    /// Drug id → SMILES file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drug_smiles: Option<PathBuf>,
    /// Melting-curve file (`sample, gene, <condition>...`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub melting: Option<PathBuf>,
    /// Complex index file (`source, complex, tpi`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexes: Option<PathBuf>,
    /// Plot constants.
    #[serde(default)]
    pub plot: PlotSettings,
}

impl DatasetManifest {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(ExplorerError::from)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Check that table names are unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for entry in &self.tables {
            if !seen.insert(entry.name.as_str()) {
                return Err(ExplorerError::InvalidInput(format!(
                    "Duplicate table name '{}' in manifest",
                    entry.name
                )));
            }
        }
        Ok(())
    }

    /// Table entry by name.
    pub fn table(&self, name: &str) -> Option<&TableEntry> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Names of the tables of one kind that are not lineage-specific.
    pub fn tables_of_kind(&self, kind: TableKind) -> Vec<&str> {
        self.tables
            .iter()
            .filter(|t| t.kind == kind && !t.is_lineage_specific())
            .map(|t| t.name.as_str())
            .collect()
    }

    /// An example manifest covering every table family.
    pub fn example() -> Self {
        let table = |name: &str, kind, path: &str, lineage: Option<&str>| TableEntry {
            name: name.to_string(),
            kind,
            path: PathBuf::from(path),
            lineage_column: lineage.map(String::from),
            drop_duplicates: lineage.is_some(),
        };
        let signal = |kind, source: &str, path: &str| SignalEntry {
            kind,
            source: source.to_string(),
            path: PathBuf::from(path),
        };
        Self {
            name: "pcorr".to_string(),
            tables: vec![
                table("ppi", TableKind::Ppi, "tables/pcorr_ppis.tsv", None),
                table("tpi", TableKind::Tpi, "tables/tpca_pcorr_tpis.tsv", None),
                table("trinet", TableKind::Complex, "tables/trinet.tsv", None),
                table("dgi", TableKind::Dgi, "tables/pcorr_dgis.tsv", None),
                table("l_ppi", TableKind::Ppi, "tables/l_pcorr_ppis.tsv", Some("Lineage")),
                table("l_tpi", TableKind::Tpi, "tables/l_pcorr_tpis.tsv", Some("Lineage")),
                table("l_dgi", TableKind::Dgi, "tables/l_pcorr_dgis.tsv", Some("Lineage")),
            ],
            signals: vec![
                signal(SignalKind::GeneEffect, "CRISPR", "signals/ge_crispr.tsv"),
                signal(SignalKind::GeneEffect, "RNAi", "signals/ge_rnai.tsv"),
                signal(SignalKind::DrugResponse, "CTRP", "signals/dr_ctrp.tsv"),
                signal(SignalKind::DrugResponse, "GDSC", "signals/dr_gdsc.tsv"),
            ],
            lineages: Some(PathBuf::from("maps/ccl_lineage.tsv")),
            palette: Some(PathBuf::from("maps/lineage_color.tsv")),
            drug_names: Some(PathBuf::from("maps/drug_names.tsv")),
            drug_smiles: Some(PathBuf::from("maps/drug_smiles.tsv")),
            melting: Some(PathBuf::from("signals/melting.tsv")),
            complexes: Some(PathBuf::from("maps/tpi_complex.tsv")),
            plot: PlotSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_roundtrip() {
        let example = DatasetManifest::example();
        let yaml = example.to_yaml().unwrap();
        let parsed = DatasetManifest::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, example);
        assert_eq!(parsed.tables_of_kind(TableKind::Ppi), vec!["ppi"]);
    }

    #[test]
    fn test_minimal_manifest() {
        let yaml = "name: mini\ntables:\n  - name: ppi\n    kind: ppi\n    path: ppi.csv\n";
        let m = DatasetManifest::from_yaml(yaml).unwrap();
        assert!(m.signals.is_empty());
        assert_eq!(m.plot, PlotSettings::default());
        assert_eq!(m.table("ppi").unwrap().schema().id_column, "PPI");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let yaml = "name: dup\ntables:\n  - {name: a, kind: ppi, path: a.csv}\n  - {name: a, kind: tpi, path: b.csv}\n";
        assert!(DatasetManifest::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_lineage_entry_schema() {
        let example = DatasetManifest::example();
        let entry = example.table("l_tpi").unwrap();
        assert_eq!(entry.schema().lineage_column.as_deref(), Some("Lineage"));
        assert!(entry.drop_duplicates);
    }
}
