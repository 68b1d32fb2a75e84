//! Thermal proteome profiling (protein melting) curves.

use crate::data::table::read_delimited;
use crate::data::value::is_missing_token;
use crate::error::{ExplorerError, Result};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::path::Path;

/// Measured rows of one sample.
#[derive(Debug, Clone, Default)]
struct SampleCurves {
    rows: Vec<(String, Vec<Option<f64>>)>,
}

/// Per-sample soluble-fraction measurements over ordered conditions
/// (temperature steps).
#[derive(Debug, Clone, Default)]
pub struct MeltingCurves {
    conditions: Vec<String>,
    samples: BTreeMap<String, SampleCurves>,
}

impl MeltingCurves {
    /// Create an empty set over the given conditions.
    pub fn new(conditions: Vec<String>) -> Self {
        Self {
            conditions,
            samples: BTreeMap::new(),
        }
    }

    /// Add one measured row for a gene in a sample.
    pub fn add_row(&mut self, sample: &str, gene: &str, values: Vec<Option<f64>>) -> Result<()> {
        if values.len() != self.conditions.len() {
            return Err(ExplorerError::InvalidInput(format!(
                "Melting row for {} in {} has {} values, expected {}",
                gene,
                sample,
                values.len(),
                self.conditions.len()
            )));
        }
        self.samples
            .entry(sample.to_string())
            .or_default()
            .rows
            .push((gene.to_string(), values));
        Ok(())
    }

    /// Load from a delimited file with columns `sample, gene, <condition>...`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (header, records) = read_delimited(path)?;
        if header.len() < 3 {
            return Err(ExplorerError::EmptyData(format!(
                "Melting file {} has no condition columns",
                path.display()
            )));
        }
        let mut curves = Self::new(header[2..].to_vec());
        let n = curves.conditions.len();
        for record in records {
            let (Some(sample), Some(gene)) = (record.first(), record.get(1)) else {
                continue;
            };
            let values = (0..n)
                .map(|i| {
                    record
                        .get(i + 2)
                        .map(|s| s.trim())
                        .filter(|s| !is_missing_token(s))
                        .and_then(|s| s.parse::<f64>().ok())
                })
                .collect();
            curves.add_row(sample.trim(), gene.trim(), values)?;
        }
        Ok(curves)
    }

    /// Ordered condition labels.
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Samples with measurements.
    pub fn samples(&self) -> Vec<&str> {
        self.samples.keys().map(String::as_str).collect()
    }

    /// Check if a sample has measurements.
    pub fn has_sample(&self, sample: &str) -> bool {
        self.samples.contains_key(sample)
    }

    /// Mean value per condition over every row of `gene` in `sample`.
    ///
    /// `Ok(None)` when the sample has no rows for the gene; conditions with
    /// no measured value are `None`.
    pub fn mean_curve(&self, sample: &str, gene: &str) -> Result<Option<Vec<Option<f64>>>> {
        let curves = self
            .samples
            .get(sample)
            .ok_or_else(|| ExplorerError::not_found("sample", sample))?;
        let rows: Vec<&Vec<Option<f64>>> = curves
            .rows
            .iter()
            .filter(|(g, _)| g == gene)
            .map(|(_, v)| v)
            .collect();
        if rows.is_empty() {
            return Ok(None);
        }
        let means = (0..self.conditions.len())
            .map(|i| {
                let present: Vec<f64> = rows.iter().filter_map(|r| r[i]).collect();
                (!present.is_empty()).then(|| present.iter().mean())
            })
            .collect();
        Ok(Some(means))
    }
}
