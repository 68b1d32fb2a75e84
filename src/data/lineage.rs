//! Sample lineage annotations and lineage display colours.

use crate::data::table::read_pairs;
use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Bucket for samples without a lineage annotation.
pub const UNKNOWN_LINEAGE: &str = "Unknown";

/// Colour used for lineages missing from the palette.
pub const FALLBACK_COLOR: &str = "gray";

/// Sample → lineage map with the inverse grouping.
#[derive(Debug, Clone, Default)]
pub struct LineageIndex {
    sample_lineage: HashMap<String, String>,
    lineage_samples: BTreeMap<String, BTreeSet<String>>,
}

impl LineageIndex {
    /// Build from `(sample, lineage)` pairs.
    pub fn from_pairs<I, S, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: Into<String>,
    {
        let mut index = Self::default();
        for (sample, lineage) in pairs {
            let (sample, lineage) = (sample.into(), lineage.into());
            index
                .lineage_samples
                .entry(lineage.clone())
                .or_default()
                .insert(sample.clone());
            index.sample_lineage.insert(sample, lineage);
        }
        index
    }

    /// Load from a two-column delimited file (`sample`, `lineage`).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let pairs = read_pairs(path.as_ref())?;
        Ok(Self::from_pairs(pairs))
    }

    /// Lineage of a sample, if annotated.
    pub fn lineage_of(&self, sample: &str) -> Option<&str> {
        self.sample_lineage.get(sample).map(String::as_str)
    }

    /// Lineage of a sample, or the unknown bucket.
    pub fn lineage_or_unknown(&self, sample: &str) -> &str {
        self.lineage_of(sample).unwrap_or(UNKNOWN_LINEAGE)
    }

    /// Samples annotated with a lineage.
    pub fn samples_of(&self, lineage: &str) -> Option<&BTreeSet<String>> {
        self.lineage_samples.get(lineage)
    }

    /// All lineages, sorted.
    pub fn lineages(&self) -> Vec<&str> {
        self.lineage_samples.keys().map(String::as_str).collect()
    }

    /// Check if a lineage exists.
    pub fn has_lineage(&self, lineage: &str) -> bool {
        self.lineage_samples.contains_key(lineage)
    }

    /// Number of annotated samples.
    pub fn n_samples(&self) -> usize {
        self.sample_lineage.len()
    }
}

/// Lineage → display colour.
#[derive(Debug, Clone, Default)]
pub struct LineagePalette {
    colors: HashMap<String, String>,
}

impl LineagePalette {
    /// Build from `(lineage, colour)` pairs.
    pub fn from_pairs<I, L, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, C)>,
        L: Into<String>,
        C: Into<String>,
    {
        Self {
            colors: pairs
                .into_iter()
                .map(|(l, c)| (l.into(), c.into()))
                .collect(),
        }
    }

    /// Load from a two-column delimited file (`lineage`, `color`).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_pairs(read_pairs(path.as_ref())?))
    }

    /// Colour for a lineage, falling back to [`FALLBACK_COLOR`].
    pub fn color(&self, lineage: &str) -> &str {
        self.colors
            .get(lineage)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Number of mapped lineages.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lineage_index() {
        let idx = LineageIndex::from_pairs([("SH4", "Skin"), ("A375", "Skin"), ("MCF7", "Breast")]);
        assert_eq!(idx.lineage_of("SH4"), Some("Skin"));
        assert_eq!(idx.lineage_or_unknown("XYZ"), UNKNOWN_LINEAGE);
        assert_eq!(idx.samples_of("Skin").unwrap().len(), 2);
        assert_eq!(idx.lineages(), vec!["Breast", "Skin"]);
    }

    #[test]
    fn test_palette_fallback() {
        let palette = LineagePalette::from_pairs([("Skin", "#aa0000")]);
        assert_eq!(palette.color("Skin"), "#aa0000");
        assert_eq!(palette.color("Unknown"), FALLBACK_COLOR);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(file, "sample\tlineage").unwrap();
        writeln!(file, "SH4\tSkin").unwrap();
        writeln!(file, "K562\t").unwrap();
        file.flush().unwrap();
        let idx = LineageIndex::from_path(file.path()).unwrap();
        assert_eq!(idx.n_samples(), 1);
    }
}
