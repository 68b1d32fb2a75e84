//! Thermal melting curves of the genes of a selected interaction.

use crate::data::MeltingCurves;
use crate::error::Result;
use crate::plot::PlotSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One gene's mean curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeltingSeries {
    pub gene: String,
    pub color: String,
    /// Mean soluble fraction per condition, aligned with the chart's conditions.
    pub values: Vec<Option<f64>>,
}

/// Melting-curve chart for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeltingChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub conditions: Vec<String>,
    pub series: Vec<MeltingSeries>,
    /// Genes without data in this sample.
    pub notes: Vec<String>,
}

/// Build the melting chart of `genes` in `sample`.
///
/// Colours follow gene position, so a gene keeps its colour when an earlier
/// gene has no data. An unknown sample is `NotFound`.
pub fn melting_chart(
    curves: &MeltingCurves,
    settings: &PlotSettings,
    sample: &str,
    genes: &[&str],
) -> Result<MeltingChart> {
    let mut series = Vec::new();
    let mut notes = Vec::new();
    for (i, gene) in genes.iter().enumerate() {
        match curves.mean_curve(sample, gene)? {
            Some(values) => series.push(MeltingSeries {
                gene: gene.to_string(),
                color: settings.melting_color(i).to_string(),
                values,
            }),
            None => notes.push(format!("No melting data for {} in {}", gene, sample)),
        }
    }
    debug!(sample, series = series.len(), skipped = notes.len(), "built melting chart");

    Ok(MeltingChart {
        title: sample.to_string(),
        x_label: "Temperature".to_string(),
        y_label: "Soluble fraction".to_string(),
        conditions: curves.conditions().to_vec(),
        series,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplorerError;

    fn curves() -> MeltingCurves {
        let mut c = MeltingCurves::new(vec!["37".into(), "45".into(), "53".into()]);
        c.add_row("K562", "ABL1", vec![Some(1.0), Some(1.0), Some(0.2)]).unwrap();
        c.add_row("K562", "ABL1", vec![Some(1.0), Some(0.5), None]).unwrap();
        c.add_row("K562", "GRB2", vec![Some(1.0), Some(0.9), Some(0.7)]).unwrap();
        c
    }

    #[test]
    fn test_series_and_skips() {
        let chart = melting_chart(&curves(), &PlotSettings::default(), "K562", &["ABL1", "BCR", "GRB2"]).unwrap();
        assert_eq!(chart.title, "K562");
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].values, vec![Some(1.0), Some(0.75), Some(0.2)]);
        assert_eq!(chart.series[0].color, "tomato");
        // GRB2 keeps the third colour even though BCR was skipped
        assert_eq!(chart.series[1].color, "green");
        assert_eq!(chart.notes.len(), 1);
        assert!(chart.notes[0].contains("BCR"));
    }

    #[test]
    fn test_unknown_sample() {
        let err = melting_chart(&curves(), &PlotSettings::default(), "MCF7", &["ABL1"]).unwrap_err();
        assert!(matches!(err, ExplorerError::NotFound { kind: "sample", .. }));
    }
}
