//! Correlation scatter of two entities' perturbation signals.

use crate::data::{LineageIndex, LineagePalette, SignalKind, SignalSet};
use crate::detail::Entity;
use crate::error::{ExplorerError, Result};
use crate::plot::PlotSettings;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Minimum number of points for a correlation coefficient.
pub const MIN_POINTS_FOR_R: usize = 3;

/// Shared lookups for building charts.
#[derive(Debug, Clone, Copy)]
pub struct PlotContext<'a> {
    pub signals: &'a SignalSet,
    pub lineages: &'a LineageIndex,
    pub palette: &'a LineagePalette,
    pub settings: &'a PlotSettings,
}

/// One plotted axis: an entity measured by one kind of signal from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub entity: Entity,
    pub kind: SignalKind,
    pub source: String,
}

impl Axis {
    /// Gene-effect axis of a gene.
    pub fn gene(symbol: &str, source: &str) -> Self {
        Self {
            entity: Entity::Gene {
                symbol: symbol.to_string(),
            },
            kind: SignalKind::GeneEffect,
            source: source.to_string(),
        }
    }

    /// Drug-response axis of a drug.
    pub fn drug(id: &str, display_name: &str, source: &str) -> Self {
        Self {
            entity: Entity::Drug {
                id: id.to_string(),
                display_name: display_name.to_string(),
            },
            kind: SignalKind::DrugResponse,
            source: source.to_string(),
        }
    }

    /// Axis label, e.g. `Gene effect of BRAF (CRISPR)`.
    pub fn label(&self) -> String {
        let what = match self.kind {
            SignalKind::GeneEffect => "Gene effect",
            SignalKind::DrugResponse => "Drug response",
        };
        format!("{} of {} ({})", what, self.entity.display_name(), self.source)
    }
}

/// A scatter to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterRequest {
    pub x: Axis,
    pub y: Axis,
    /// Sample or lineage to highlight; blank means none.
    #[serde(default)]
    pub highlight: Option<String>,
    /// Restrict to samples of one lineage.
    #[serde(default)]
    pub lineage_scope: Option<String>,
}

impl ScatterRequest {
    /// Request without highlight or scope.
    pub fn new(x: Axis, y: Axis) -> Self {
        Self {
            x,
            y,
            highlight: None,
            lineage_scope: None,
        }
    }

    /// Set the highlight term.
    pub fn highlight(mut self, term: Option<&str>) -> Self {
        self.highlight = term.map(String::from);
        self
    }

    /// Restrict to one lineage.
    pub fn lineage_scope(mut self, lineage: Option<&str>) -> Self {
        self.lineage_scope = lineage.map(String::from);
        self
    }
}

/// How a point is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointState {
    /// Coloured by its lineage.
    Lineage,
    /// Matches the highlight term.
    Highlight,
    /// Does not match an active highlight.
    Other,
}

/// What an active highlight matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightMatch {
    Sample,
    Lineage,
}

/// One sample of a scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub sample: String,
    pub lineage: String,
    pub x: f64,
    pub y: f64,
    pub state: PointState,
    pub color: String,
}

/// Legend entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Axis a reference line is drawn across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineOrientation {
    /// Constant x.
    Vertical,
    /// Constant y.
    Horizontal,
}

/// Dashed reference line at a gene-effect cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub orientation: LineOrientation,
    pub value: f64,
}

/// Scatter chart model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
    pub legend_title: String,
    pub legend: Vec<LegendEntry>,
    pub highlight: Option<HighlightMatch>,
    pub reference_lines: Vec<ReferenceLine>,
    pub equal_aspect: bool,
    pub pearson_r: Option<f64>,
    pub warnings: Vec<String>,
}

impl ScatterChart {
    /// Number of plotted samples.
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Plotted sample names, sorted.
    pub fn samples(&self) -> Vec<&str> {
        self.points.iter().map(|p| p.sample.as_str()).collect()
    }
}

/// Build a scatter of `x` against `y` over the samples both measure.
///
/// An unknown source or entity is `NotFound`. A highlight term that matches
/// no plotted sample (nor, without a lineage scope, any plotted lineage) is
/// recorded in `warnings` and the chart falls back to lineage colouring.
pub fn scatter_chart(ctx: &PlotContext<'_>, req: &ScatterRequest) -> Result<ScatterChart> {
    let xs = ctx.signals.get(req.x.kind, &req.x.source)?.vector(req.x.entity.key())?;
    let ys = ctx.signals.get(req.y.kind, &req.y.source)?.vector(req.y.entity.key())?;

    let x_by_sample: HashMap<&str, f64> = xs.into_iter().collect();
    let mut pairs: Vec<(&str, f64, f64)> = ys
        .into_iter()
        .filter_map(|(sample, y)| x_by_sample.get(sample).map(|&x| (sample, x, y)))
        .filter(|(sample, _, _)| match &req.lineage_scope {
            Some(scope) => ctx.lineages.lineage_of(sample) == Some(scope.as_str()),
            None => true,
        })
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut warnings = Vec::new();
    let term = req
        .highlight
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let highlight = term.and_then(|term| {
        if pairs.iter().any(|(s, _, _)| *s == term) {
            return Some((term, HighlightMatch::Sample));
        }
        if req.lineage_scope.is_none()
            && pairs
                .iter()
                .any(|(s, _, _)| ctx.lineages.lineage_or_unknown(s) == term)
        {
            return Some((term, HighlightMatch::Lineage));
        }
        let message = match &req.lineage_scope {
            Some(scope) => format!("\"{}\" not found in CCLs of {}", term, scope),
            None => ExplorerError::HighlightNotFound(term.to_string()).to_string(),
        };
        warn!(term, "highlight term matched nothing");
        warnings.push(message);
        None
    });

    let points: Vec<ScatterPoint> = pairs
        .iter()
        .map(|&(sample, x, y)| {
            let lineage = ctx.lineages.lineage_or_unknown(sample).to_string();
            let (state, color) = match highlight {
                Some((term, how)) => {
                    let hit = match how {
                        HighlightMatch::Sample => sample == term,
                        HighlightMatch::Lineage => lineage == term,
                    };
                    if hit {
                        (PointState::Highlight, ctx.settings.highlight_color.clone())
                    } else {
                        (PointState::Other, ctx.settings.other_color.clone())
                    }
                }
                None => (PointState::Lineage, ctx.palette.color(&lineage).to_string()),
            };
            ScatterPoint {
                sample: sample.to_string(),
                lineage,
                x,
                y,
                state,
                color,
            }
        })
        .collect();

    let (legend_title, legend) = match highlight {
        Some(_) => (
            "State".to_string(),
            vec![
                LegendEntry {
                    label: "Highlight".to_string(),
                    color: ctx.settings.highlight_color.clone(),
                },
                LegendEntry {
                    label: "Other".to_string(),
                    color: ctx.settings.other_color.clone(),
                },
            ],
        ),
        None => {
            let by_lineage: BTreeMap<&str, &str> = points
                .iter()
                .map(|p| (p.lineage.as_str(), p.color.as_str()))
                .collect();
            (
                "Lineage".to_string(),
                by_lineage
                    .into_iter()
                    .map(|(l, c)| LegendEntry {
                        label: l.to_string(),
                        color: c.to_string(),
                    })
                    .collect(),
            )
        }
    };

    let mut reference_lines = Vec::new();
    for (axis, orientation) in [
        (&req.x, LineOrientation::Vertical),
        (&req.y, LineOrientation::Horizontal),
    ] {
        if axis.kind == SignalKind::GeneEffect {
            if let Some(value) = ctx.settings.cutoff(&axis.source) {
                reference_lines.push(ReferenceLine { orientation, value });
            }
        }
    }

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();

    let mut title = format!(
        "{}-{}",
        req.x.entity.display_name(),
        req.y.entity.display_name()
    );
    if let Some(scope) = &req.lineage_scope {
        title = format!("{} ({})", title, scope);
    }

    Ok(ScatterChart {
        title,
        x_label: req.x.label(),
        y_label: req.y.label(),
        points,
        legend_title,
        legend,
        highlight: highlight.map(|(_, how)| how),
        reference_lines,
        equal_aspect: req.x.kind == SignalKind::GeneEffect && req.y.kind == SignalKind::GeneEffect,
        pearson_r: pearson(&xs, &ys),
        warnings,
    })
}

/// Pearson correlation, `None` below [`MIN_POINTS_FOR_R`] points or when
/// either side is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < MIN_POINTS_FOR_R {
        return None;
    }
    let sx = xs.iter().std_dev();
    let sy = ys.iter().std_dev();
    if !(sx > 0.0 && sy > 0.0) {
        return None;
    }
    let r = xs.iter().covariance(ys.iter()) / (sx * sy);
    r.is_finite().then_some(r.clamp(-1.0, 1.0))
}

/// Gene-vs-gene scatters for every pair of genes: `(a,b), (a,c), (b,c)`.
pub fn pairwise_scatters(
    ctx: &PlotContext<'_>,
    genes: &[&str],
    source: &str,
    highlight: Option<&str>,
    lineage_scope: Option<&str>,
) -> Result<Vec<ScatterChart>> {
    let mut charts = Vec::new();
    for i in 0..genes.len() {
        for j in (i + 1)..genes.len() {
            let req = ScatterRequest::new(Axis::gene(genes[i], source), Axis::gene(genes[j], source))
                .highlight(highlight)
                .lineage_scope(lineage_scope);
            charts.push(scatter_chart(ctx, &req)?);
        }
    }
    Ok(charts)
}
