//! Chart models for a resolved selection.
//!
//! Builders return plain serialisable structs; rendering is left to the
//! caller. Every builder is pure over the loaded signals, lineage tables and
//! [`PlotSettings`].

mod melting;
mod network;
mod scatter;
mod settings;

pub use melting::{melting_chart, MeltingChart, MeltingSeries};
pub use network::{drug_label, network_chart, NetworkChart, NetworkEdge, NetworkNode, NodeCategory};
pub use scatter::{
    pairwise_scatters, pearson, scatter_chart, Axis, HighlightMatch, LegendEntry, LineOrientation,
    PlotContext, PointState, ReferenceLine, ScatterChart, ScatterPoint, ScatterRequest,
    MIN_POINTS_FOR_R,
};
pub use settings::PlotSettings;

use crate::detail::{Entity, ResolvedDetail, SourceView};
use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Charts of one source view of a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewCharts {
    pub view: SourceView,
    pub scatters: Vec<ScatterChart>,
    /// Why the view has no charts, when building failed.
    pub error: Option<String>,
}

/// Build the scatters of every source view of a selection.
///
/// A view whose source or entities are missing from the signal data keeps
/// its slot with `error` set; the other views are unaffected.
pub fn detail_charts(
    ctx: &PlotContext<'_>,
    detail: &ResolvedDetail,
    lineage_scope: Option<&str>,
) -> Vec<ViewCharts> {
    detail
        .views
        .iter()
        .map(|view| match view_scatters(ctx, detail, view, lineage_scope) {
            Ok(scatters) => ViewCharts {
                view: view.clone(),
                scatters,
                error: None,
            },
            Err(e) => {
                warn!(identifier = %detail.identifier, source = %view.gene_source, error = %e, "view skipped");
                ViewCharts {
                    view: view.clone(),
                    scatters: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}

fn view_scatters(
    ctx: &PlotContext<'_>,
    detail: &ResolvedDetail,
    view: &SourceView,
    lineage_scope: Option<&str>,
) -> Result<Vec<ScatterChart>> {
    let highlight = view.highlight.as_deref();
    match (detail.entities.as_slice(), &view.drug_source) {
        ([Entity::Drug { id, display_name }, Entity::Gene { symbol }], Some(drug_source)) => {
            let req = ScatterRequest::new(
                Axis::drug(id, display_name, drug_source),
                Axis::gene(symbol, &view.gene_source),
            )
            .highlight(highlight)
            .lineage_scope(lineage_scope);
            Ok(vec![scatter_chart(ctx, &req)?])
        }
        (_, None) => pairwise_scatters(ctx, &detail.genes(), &view.gene_source, highlight, lineage_scope),
        _ => Err(ExplorerError::InvalidInput(format!(
            "Cannot chart '{}' with a drug source",
            detail.identifier
        ))),
    }
}
