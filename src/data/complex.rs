//! TriNET complex → member TPI lookup.

use crate::data::table::read_delimited;
use crate::error::{ExplorerError, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Source label → complex id → TPI ids assembled into that complex.
#[derive(Debug, Clone, Default)]
pub struct ComplexIndex {
    entries: HashMap<String, HashMap<String, BTreeSet<String>>>,
}

impl ComplexIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a TPI belongs to a complex under a source.
    pub fn insert(&mut self, source: &str, complex: &str, tpi: &str) {
        self.entries
            .entry(source.to_string())
            .or_default()
            .entry(complex.to_string())
            .or_default()
            .insert(tpi.to_string());
    }

    /// Load from a delimited file with columns `source, complex, tpi`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (header, records) = read_delimited(path)?;
        if header.len() < 3 {
            return Err(ExplorerError::InvalidInput(format!(
                "Complex index {} must have source, complex and tpi columns",
                path.display()
            )));
        }
        let mut index = Self::new();
        for record in records {
            if let [source, complex, tpi, ..] = record.as_slice() {
                let (source, complex, tpi) = (source.trim(), complex.trim(), tpi.trim());
                if !source.is_empty() && !complex.is_empty() && !tpi.is_empty() {
                    index.insert(source, complex, tpi);
                }
            }
        }
        Ok(index)
    }

    /// TPI ids of a complex under a source.
    pub fn tpis(&self, source: &str, complex: &str) -> Result<&BTreeSet<String>> {
        let by_complex = self
            .entries
            .get(source)
            .ok_or_else(|| ExplorerError::not_found("complex source", source))?;
        by_complex
            .get(complex)
            .ok_or_else(|| ExplorerError::not_found("complex", complex))
    }

    /// Number of (source, complex) entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lookup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "source,complex,tpi").unwrap();
        writeln!(file, "CRISPR,A-B-C-D,A-B-C").unwrap();
        writeln!(file, "CRISPR,A-B-C-D,B-C-D").unwrap();
        writeln!(file, "RNAi,A-B-C-D,A-C-D").unwrap();
        file.flush().unwrap();

        let index = ComplexIndex::from_path(file.path()).unwrap();
        assert_eq!(index.len(), 2);
        let tpis = index.tpis("CRISPR", "A-B-C-D").unwrap();
        assert_eq!(tpis.len(), 2);
        assert!(index.tpis("CRISPR", "X-Y-Z").is_err());
        assert!(index.tpis("Other", "A-B-C-D").is_err());
    }
}
