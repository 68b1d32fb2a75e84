//! Sparse perturbation-signal matrices (gene effect, drug response).

use crate::data::table::delimiter_for;
use crate::data::value::is_missing_token;
use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use sprs::CsMat;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

/// Which measurement a matrix holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Gene-effect scores from genetic perturbation screens.
    GeneEffect,
    /// Drug-response scores from compound screens.
    DrugResponse,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::GeneEffect => write!(f, "gene effect"),
            SignalKind::DrugResponse => write!(f, "drug response"),
        }
    }
}

/// A sparse entity × sample matrix of measurements.
///
/// Rows are entities (genes or drug ids), columns are samples (cell lines).
/// Only measured values are stored; an absent entry means "no measurement",
/// never zero.
#[derive(Debug, Clone)]
pub struct SignalMatrix {
    /// Sparse matrix in CSR format (entities × samples)
    data: CsMat<f64>,
    entity_ids: Vec<String>,
    sample_ids: Vec<String>,
    entity_index: HashMap<String, usize>,
}

impl SignalMatrix {
    /// Create a matrix from CSR storage and identifiers.
    pub fn new(data: CsMat<f64>, entity_ids: Vec<String>, sample_ids: Vec<String>) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != entity_ids.len() || ncols != sample_ids.len() {
            return Err(ExplorerError::InvalidInput(format!(
                "Signal matrix shape {}x{} does not match {} entities and {} samples",
                nrows,
                ncols,
                entity_ids.len(),
                sample_ids.len()
            )));
        }
        let entity_index = entity_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Ok(Self {
            data,
            entity_ids,
            sample_ids,
            entity_index,
        })
    }

    /// Build a matrix from dense rows where `None` marks a missing value.
    pub fn from_rows(
        entity_ids: Vec<String>,
        sample_ids: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        let n_samples = sample_ids.len();
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut values = Vec::new();
        indptr.push(0);
        for row in &rows {
            for (col, value) in row.iter().take(n_samples).enumerate() {
                if let Some(v) = value {
                    indices.push(col);
                    values.push(*v);
                }
            }
            indptr.push(indices.len());
        }
        // Built directly rather than through TriMat so measured zeros stay explicit
        let data = CsMat::new((rows.len(), n_samples), indptr, indices, values);
        Self::new(data, entity_ids, sample_ids)
    }

    /// Load a matrix from a delimited file.
    ///
    /// Expected format:
    /// - First row: header with sample IDs (first column is the entity header)
    /// - Subsequent rows: entity ID followed by values; missing tokens are skipped
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter_for(path))
            .flexible(true)
            .from_path(path)?;

        let header = reader.headers()?.clone();
        if header.len() < 2 {
            return Err(ExplorerError::EmptyData(format!(
                "Signal matrix {} must have at least one sample",
                path.display()
            )));
        }
        let sample_ids: Vec<String> = header.iter().skip(1).map(|s| s.trim().to_string()).collect();

        let mut entity_ids = Vec::new();
        let mut rows = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            let Some(entity) = record.get(0).map(str::trim).filter(|e| !e.is_empty()) else {
                continue;
            };
            let mut row = Vec::with_capacity(sample_ids.len());
            for (col_idx, raw) in record.iter().skip(1).enumerate() {
                let raw = raw.trim();
                if is_missing_token(raw) {
                    row.push(None);
                    continue;
                }
                let value: f64 = raw.parse().map_err(|_| {
                    ExplorerError::InvalidInput(format!(
                        "Non-numeric signal value '{}' at row {}, column {}",
                        raw, row_idx, col_idx
                    ))
                })?;
                row.push((!value.is_nan()).then_some(value));
            }
            entity_ids.push(entity.to_string());
            rows.push(row);
        }

        if entity_ids.is_empty() {
            return Err(ExplorerError::EmptyData(format!(
                "No entities in signal matrix {}",
                path.display()
            )));
        }
        Self::from_rows(entity_ids, sample_ids, rows)
    }

    /// Number of entities.
    pub fn n_entities(&self) -> usize {
        self.entity_ids.len()
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Number of measured values.
    pub fn nnz(&self) -> usize {
        self.data.nnz()
    }

    /// Entity identifiers.
    pub fn entity_ids(&self) -> &[String] {
        &self.entity_ids
    }

    /// Sample identifiers.
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Check if an entity has a row.
    pub fn has_entity(&self, entity: &str) -> bool {
        self.entity_index.contains_key(entity)
    }

    /// Measured value for (entity, sample), if any.
    pub fn get(&self, entity: &str, sample: &str) -> Option<f64> {
        let row = *self.entity_index.get(entity)?;
        let col = self.sample_ids.iter().position(|s| s == sample)?;
        self.data.get(row, col).copied()
    }

    /// Measured values of one entity as `(sample, value)` pairs.
    pub fn vector(&self, entity: &str) -> Result<Vec<(&str, f64)>> {
        let row = *self
            .entity_index
            .get(entity)
            .ok_or_else(|| ExplorerError::not_found("entity", entity))?;
        let Some(outer) = self.data.outer_view(row) else {
            return Ok(Vec::new());
        };
        Ok(outer
            .iter()
            .map(|(col, &value)| (self.sample_ids[col].as_str(), value))
            .collect())
    }
}

/// Signal matrices grouped by kind and data-source label.
#[derive(Debug, Clone, Default)]
pub struct SignalSet {
    matrices: BTreeMap<(SignalKind, String), SignalMatrix>,
}

impl SignalSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a matrix under a kind and source label.
    pub fn insert(&mut self, kind: SignalKind, source: &str, matrix: SignalMatrix) {
        self.matrices.insert((kind, source.to_string()), matrix);
    }

    /// Builder-style [`SignalSet::insert`].
    pub fn with(mut self, kind: SignalKind, source: &str, matrix: SignalMatrix) -> Self {
        self.insert(kind, source, matrix);
        self
    }

    /// Matrix for a kind and source label.
    pub fn get(&self, kind: SignalKind, source: &str) -> Result<&SignalMatrix> {
        self.matrices
            .get(&(kind, source.to_string()))
            .ok_or_else(|| match kind {
                SignalKind::GeneEffect => ExplorerError::not_found("gene effect source", source),
                SignalKind::DrugResponse => ExplorerError::not_found("drug response source", source),
            })
    }

    /// Source labels registered for a kind.
    pub fn sources(&self, kind: SignalKind) -> Vec<&str> {
        self.matrices
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, s)| s.as_str())
            .collect()
    }

    /// Number of matrices.
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_tsv() -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(file, "gene\tACH1\tACH2\tACH3").unwrap();
        writeln!(file, "BRAF\t-0.5\tNA\t0").unwrap();
        writeln!(file, "KRAS\t-1.2\t-0.3\t").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_from_path() {
        let file = create_test_tsv();
        let m = SignalMatrix::from_path(file.path()).unwrap();
        assert_eq!(m.n_entities(), 2);
        assert_eq!(m.n_samples(), 3);
        // Explicit zero kept, NA and blank skipped
        assert_eq!(m.nnz(), 4);
        assert_eq!(m.get("BRAF", "ACH3"), Some(0.0));
        assert_eq!(m.get("BRAF", "ACH2"), None);
    }

    #[test]
    fn test_vector() {
        let file = create_test_tsv();
        let m = SignalMatrix::from_path(file.path()).unwrap();
        let v = m.vector("KRAS").unwrap();
        assert_eq!(v, vec![("ACH1", -1.2), ("ACH2", -0.3)]);
        assert!(matches!(
            m.vector("TP53"),
            Err(ExplorerError::NotFound { kind: "entity", .. })
        ));
    }

    #[test]
    fn test_signal_set_lookup() {
        let m = SignalMatrix::from_rows(
            vec!["A".into()],
            vec!["s1".into()],
            vec![vec![Some(1.0)]],
        )
        .unwrap();
        let set = SignalSet::new().with(SignalKind::GeneEffect, "CRISPR", m);
        assert!(set.get(SignalKind::GeneEffect, "CRISPR").is_ok());
        assert!(set.get(SignalKind::GeneEffect, "RNAi").is_err());
        assert!(set.get(SignalKind::DrugResponse, "CRISPR").is_err());
        assert_eq!(set.sources(SignalKind::GeneEffect), vec!["CRISPR"]);
    }

    #[test]
    fn test_shape_mismatch() {
        let data = CsMat::new((1, 1), vec![0, 1], vec![0], vec![1.0]);
        assert!(SignalMatrix::new(data, vec!["A".into(), "B".into()], vec!["s".into()]).is_err());
    }
}
