//! Drug identifiers, display names and structures.

use crate::data::table::{read_pairs, InteractionTable};
use crate::error::{ExplorerError, Result};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::OnceLock;

/// DGI column holding the drug identifier.
pub const DRUG_ID_COLUMN: &str = "Drug id";
/// DGI column holding `; `-joined drug names.
pub const DRUG_NAME_COLUMN: &str = "Drug name";
/// DGI column holding the drug structure.
pub const SMILES_COLUMN: &str = "SMILES";
/// DGI column holding the target gene.
pub const GENE_COLUMN: &str = "Gene";

/// Lowercase and strip everything outside `[a-z0-9]`.
///
/// `"PLX-4720"` and `"plx4720"` normalise to the same key.
pub fn normalize_name(name: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]").expect("static pattern"));
    re.replace_all(&name.to_lowercase(), "").into_owned()
}

/// First name of a `; `-joined name list.
pub fn first_name(names: &str) -> &str {
    names.split("; ").next().unwrap_or(names).trim()
}

/// Drug id → names, name → id and id → SMILES lookups.
#[derive(Debug, Clone, Default)]
pub struct DrugCatalog {
    id_names: HashMap<String, BTreeSet<String>>,
    name_id: HashMap<String, String>,
    id_smiles: HashMap<String, String>,
}

impl DrugCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one synonym of a drug.
    pub fn add_name(&mut self, id: &str, name: &str) {
        self.id_names
            .entry(id.to_string())
            .or_default()
            .insert(name.to_string());
        self.name_id.insert(name.to_string(), id.to_string());
    }

    /// Register a drug's structure.
    pub fn add_smiles(&mut self, id: &str, smiles: &str) {
        self.id_smiles.insert(id.to_string(), smiles.to_string());
    }

    /// Load from an id → name file (one row per synonym) and an optional
    /// id → SMILES file.
    pub fn from_paths<P: AsRef<Path>>(names: P, smiles: Option<P>) -> Result<Self> {
        let mut catalog = Self::new();
        for (id, name) in read_pairs(names.as_ref())? {
            catalog.add_name(&id, &name);
        }
        if let Some(smiles) = smiles {
            for (id, s) in read_pairs(smiles.as_ref())? {
                catalog.add_smiles(&id, &s);
            }
        }
        Ok(catalog)
    }

    /// Derive a catalog from a DGI table's `Drug id`, `Drug name` and
    /// `SMILES` columns.
    pub fn from_dgi_table(table: &InteractionTable) -> Result<Self> {
        let id_idx = table.column_index(DRUG_ID_COLUMN)?;
        let name_idx = table.column_index(DRUG_NAME_COLUMN)?;
        let smiles_idx = table.column_index(SMILES_COLUMN).ok();

        let mut catalog = Self::new();
        for pos in 0..table.n_rows() {
            let id = table.cell_at(pos, id_idx).to_string();
            if id.is_empty() {
                continue;
            }
            let names = table.cell_at(pos, name_idx).to_string();
            for name in names.split(';').map(str::trim).filter(|n| !n.is_empty()) {
                catalog.add_name(&id, name);
            }
            if let Some(idx) = smiles_idx {
                let smiles = table.cell_at(pos, idx).to_string();
                if !smiles.is_empty() {
                    catalog.add_smiles(&id, &smiles);
                }
            }
        }
        Ok(catalog)
    }

    /// All names of a drug, sorted.
    pub fn names(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.id_names.get(id)
    }

    /// Display name: the lexicographically smallest synonym.
    pub fn canonical_name(&self, id: &str) -> Result<&str> {
        self.id_names
            .get(id)
            .and_then(|names| names.iter().next())
            .map(String::as_str)
            .ok_or_else(|| ExplorerError::not_found("drug", id))
    }

    /// Drug id for an exact name.
    pub fn id_for_name(&self, name: &str) -> Option<&str> {
        self.name_id.get(name).map(String::as_str)
    }

    /// Structure of a drug, if known.
    pub fn smiles(&self, id: &str) -> Option<&str> {
        self.id_smiles.get(id).map(String::as_str)
    }

    /// Drugs whose normalised name contains the normalised query, as sorted
    /// `(id, name)` pairs.
    pub fn search(&self, query: &str) -> Vec<(&str, &str)> {
        let needle = normalize_name(query);
        if needle.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<(&str, &str)> = self
            .name_id
            .iter()
            .filter(|(name, _)| normalize_name(name).contains(&needle))
            .map(|(name, id)| (id.as_str(), name.as_str()))
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Number of drugs.
    pub fn len(&self) -> usize {
        self.id_names.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.id_names.is_empty()
    }
}
