//! Download file naming for exported views.

use crate::data::{TableKind, TableView};
use crate::filter::Threshold;

/// What an export was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportContext {
    pub kind: TableKind,
    /// The table is lineage-specific (L-PCorr).
    pub lineage_specific: bool,
    /// Lineage the view is scoped to, if any.
    pub lineage: Option<String>,
    pub threshold: Threshold,
}

impl ExportContext {
    /// Context for a view with the given scope and threshold.
    pub fn for_view(view: &TableView, lineage: Option<&str>, threshold: Threshold) -> Self {
        let schema = view.table().schema();
        Self {
            kind: schema.kind,
            lineage_specific: schema.lineage_column.is_some(),
            lineage: lineage.map(String::from),
            threshold,
        }
    }
}

/// File name for a CSV export, e.g. `pcorr_PPIs.csv` or
/// `Skin-PCorr_TPIs_gt0.90.csv`.
pub fn export_file_name(ctx: &ExportContext) -> String {
    let stem = if ctx.lineage_specific {
        let prefix = match &ctx.lineage {
            Some(lineage) => format!("{}-PCorr", lineage),
            None => "L-PCorr".to_string(),
        };
        format!("{}_{}s", prefix, ctx.kind.label())
    } else {
        match ctx.kind {
            TableKind::Ppi => "pcorr_PPIs".to_string(),
            TableKind::Tpi => "tpca_pcorr_TPIs".to_string(),
            TableKind::Complex => "TriNET".to_string(),
            TableKind::Dgi => "pcorr_DGIs".to_string(),
        }
    };
    if ctx.threshold.is_default() {
        format!("{}.csv", stem)
    } else {
        format!("{}_gt{}.csv", stem, ctx.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(kind: TableKind, lineage_specific: bool, lineage: Option<&str>, t: f64) -> ExportContext {
        ExportContext {
            kind,
            lineage_specific,
            lineage: lineage.map(String::from),
            threshold: Threshold::new(t).unwrap(),
        }
    }

    #[test]
    fn test_main_table_names() {
        assert_eq!(export_file_name(&ctx(TableKind::Ppi, false, None, 0.8)), "pcorr_PPIs.csv");
        assert_eq!(export_file_name(&ctx(TableKind::Tpi, false, None, 0.8)), "tpca_pcorr_TPIs.csv");
        assert_eq!(export_file_name(&ctx(TableKind::Complex, false, None, 0.8)), "TriNET.csv");
        assert_eq!(export_file_name(&ctx(TableKind::Dgi, false, None, 0.8)), "pcorr_DGIs.csv");
    }

    #[test]
    fn test_lineage_names() {
        assert_eq!(export_file_name(&ctx(TableKind::Ppi, true, None, 0.8)), "L-PCorr_PPIs.csv");
        assert_eq!(
            export_file_name(&ctx(TableKind::Dgi, true, Some("Skin"), 0.8)),
            "Skin-PCorr_DGIs.csv"
        );
    }

    #[test]
    fn test_threshold_suffix() {
        assert_eq!(
            export_file_name(&ctx(TableKind::Ppi, false, None, 0.85)),
            "pcorr_PPIs_gt0.85.csv"
        );
    }
}
