//! Fixed plotting constants, overridable from the dataset manifest.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Colours, cutoffs and defaults used by the chart builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    /// Gene-effect reference cutoff per data source.
    pub gene_effect_cutoffs: BTreeMap<String, f64>,
    /// Colour of highlighted points.
    pub highlight_color: String,
    /// Colour of non-highlighted points when a highlight is active.
    pub other_color: String,
    /// Melting-curve series colours, cycled.
    pub melting_palette: Vec<String>,
    /// Samples offered by default for melting curves.
    pub melting_samples: Vec<String>,
    /// Network node colour for genes (and gene-gene edges).
    pub gene_node_color: String,
    /// Network node colour for drugs (and drug-gene edges).
    pub drug_node_color: String,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            gene_effect_cutoffs: [("CRISPR".to_string(), -0.237), ("RNAi".to_string(), -0.325)]
                .into_iter()
                .collect(),
            highlight_color: "red".to_string(),
            other_color: "lightgray".to_string(),
            melting_palette: vec!["tomato".into(), "steelblue".into(), "green".into()],
            melting_samples: ["MCF7", "HCT116", "K562", "HL60", "A375"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            gene_node_color: "#ffb6c1".to_string(),
            drug_node_color: "#0a75ad".to_string(),
        }
    }
}

impl PlotSettings {
    /// Gene-effect cutoff for a source, if one is defined.
    pub fn cutoff(&self, source: &str) -> Option<f64> {
        self.gene_effect_cutoffs.get(source).copied()
    }

    /// Melting-curve colour for the i-th series.
    pub fn melting_color(&self, i: usize) -> &str {
        if self.melting_palette.is_empty() {
            return "black";
        }
        &self.melting_palette[i % self.melting_palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = PlotSettings::default();
        assert_eq!(s.cutoff("CRISPR"), Some(-0.237));
        assert_eq!(s.cutoff("RNAi"), Some(-0.325));
        assert_eq!(s.cutoff("CTRP"), None);
        assert_eq!(s.melting_color(3), "tomato");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let s: PlotSettings = serde_yaml::from_str("highlight_color: orange\n").unwrap();
        assert_eq!(s.highlight_color, "orange");
        assert_eq!(s.other_color, "lightgray");
    }
}
