//! Ordered filter steps that turn a table into a view.
//!
//! Every step narrows the rows of the view it receives, so a pipeline is a
//! conjunction: reordering steps never changes the surviving rows, only
//! which step reports a failure first.

use crate::data::{InteractionTable, TableView};
use crate::error::{ExplorerError, Result};
use crate::filter::{
    filter_any_entity, filter_column, filter_entity, filter_lineage, filter_threshold,
    filter_threshold_on, ColumnFilter, ColumnPredicate, Threshold,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One row filter of a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ViewStep {
    /// Schema score strictly above the threshold.
    Threshold { value: Threshold },
    /// A named numeric column strictly above the threshold.
    ThresholdOn { column: String, value: Threshold },
    /// Rows of one lineage; lineage-specific tables only.
    Lineage { lineage: String },
    Column {
        column: String,
        predicate: ColumnPredicate,
    },
    /// Identifier mentions the entity.
    Entity { entity: String },
    /// Identifier mentions at least one of the entities.
    AnyEntity { entities: Vec<String> },
}

impl ViewStep {
    /// Narrow `view` by this step.
    pub fn apply(&self, view: &TableView) -> Result<TableView> {
        match self {
            ViewStep::Threshold { value } => filter_threshold(view, value),
            ViewStep::ThresholdOn { column, value } => filter_threshold_on(view, column, value),
            ViewStep::Lineage { lineage } => filter_lineage(view, lineage),
            ViewStep::Column { column, predicate } => filter_column(view, column, predicate),
            ViewStep::Entity { entity } => filter_entity(view, entity),
            ViewStep::AnyEntity { entities } => {
                let wanted: HashSet<String> = entities.iter().cloned().collect();
                filter_any_entity(view, &wanted)
            }
        }
    }
}

/// A saved view: a name and its steps, stored as YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<ViewStep>,
}

impl ViewConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(ExplorerError::from)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(ExplorerError::from)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    /// The pipeline this config describes.
    pub fn pipeline(&self) -> ViewPipeline {
        ViewPipeline {
            name: self.name.clone(),
            steps: self.steps.clone(),
        }
    }
}

/// Builds a view from a table by running its steps in order.
#[derive(Debug, Clone, Default)]
pub struct ViewPipeline {
    name: String,
    steps: Vec<ViewStep>,
}

impl ViewPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used in logs and saved configs.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Append a step.
    pub fn step(mut self, step: ViewStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn threshold(self, value: Threshold) -> Self {
        self.step(ViewStep::Threshold { value })
    }

    pub fn threshold_on(self, column: &str, value: Threshold) -> Self {
        self.step(ViewStep::ThresholdOn {
            column: column.to_string(),
            value,
        })
    }

    pub fn lineage(self, lineage: &str) -> Self {
        self.step(ViewStep::Lineage {
            lineage: lineage.to_string(),
        })
    }

    pub fn column(self, column: &str, predicate: ColumnPredicate) -> Self {
        self.step(ViewStep::Column {
            column: column.to_string(),
            predicate,
        })
    }

    pub fn column_filter(self, filter: &ColumnFilter) -> Self {
        self.column(&filter.column, filter.predicate.clone())
    }

    pub fn entity(self, entity: &str) -> Self {
        self.step(ViewStep::Entity {
            entity: entity.to_string(),
        })
    }

    pub fn any_entity<I, S>(self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.step(ViewStep::AnyEntity {
            entities: entities.into_iter().map(Into::into).collect(),
        })
    }

    pub fn steps(&self) -> &[ViewStep] {
        &self.steps
    }

    /// Save as a config.
    pub fn to_config(&self, description: Option<&str>) -> ViewConfig {
        ViewConfig {
            name: self.name.clone(),
            description: description.map(String::from),
            steps: self.steps.clone(),
        }
    }

    /// View of every row of `table` that passes all steps.
    pub fn run(&self, table: &Arc<InteractionTable>) -> Result<TableView> {
        self.run_view(&TableView::full(Arc::clone(table)))
    }

    /// Narrow an existing view. A failing step is reported with its
    /// one-based position.
    pub fn run_view(&self, view: &TableView) -> Result<TableView> {
        let view = self
            .steps
            .iter()
            .enumerate()
            .try_fold(view.clone(), |view, (i, step)| {
                step.apply(&view).map_err(|e| {
                    ExplorerError::Pipeline(format!("step {} ({:?}): {}", i + 1, step, e))
                })
            })?;
        debug!(view = %self.name, steps = self.steps.len(), rows = view.len(), "view built");
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ppi_table;
    use crate::filter::TextMatch;

    fn crispr_only() -> ColumnPredicate {
        ColumnPredicate::Text {
            query: "CRISPR".into(),
            mode: TextMatch::Exact,
        }
    }

    #[test]
    fn test_builder_records_steps() {
        let pipeline = ViewPipeline::new()
            .name("crispr")
            .threshold(Threshold::new(0.85).unwrap())
            .column("Data source", crispr_only());

        assert_eq!(pipeline.steps().len(), 2);
        let config = pipeline.to_config(None);
        assert_eq!(config.name, "crispr");
        assert_eq!(config.pipeline().steps(), pipeline.steps());
    }

    #[test]
    fn test_run_applies_every_step() {
        let view = ViewPipeline::new()
            .threshold(Threshold::new(0.85).unwrap())
            .column("Data source", crispr_only())
            .run(&ppi_table())
            .unwrap();

        // ABL1-BCR is "CRISPR; RNAi", BRAF-MAP2K1 is RNAi, NFKB1-RELA sits at 0.85
        let ids: Vec<String> = view.iter().map(|r| r.identifier().unwrap()).collect();
        assert_eq!(ids, vec!["KRAS-RAF1"]);
    }

    #[test]
    fn test_step_order_does_not_change_rows() {
        let table = ppi_table();
        let range = ColumnPredicate::Range { lo: 0.8, hi: 0.9 };
        let a = ViewPipeline::new()
            .threshold(Threshold::default())
            .column("PCorr-PPI score", range.clone())
            .run(&table)
            .unwrap();
        let b = ViewPipeline::new()
            .column("PCorr-PPI score", range)
            .threshold(Threshold::default())
            .run(&table)
            .unwrap();
        assert_eq!(a.rows(), b.rows());
    }

    #[test]
    fn test_config_yaml() {
        let pipeline = ViewPipeline::new()
            .name("braf")
            .threshold(Threshold::new(0.9).unwrap())
            .entity("BRAF")
            .any_entity(["KRAS", "NRAS"]);

        let yaml = pipeline.to_config(Some("BRAF neighbours")).to_yaml().unwrap();
        assert!(yaml.contains("step: any_entity"));

        let parsed = ViewConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.name, "braf");
        assert_eq!(parsed.description.as_deref(), Some("BRAF neighbours"));
        assert_eq!(parsed.steps, pipeline.steps());
    }

    #[test]
    fn test_failing_step_is_numbered() {
        let err = ViewPipeline::new()
            .threshold(Threshold::default())
            .lineage("Skin")
            .run(&ppi_table())
            .unwrap_err();
        match err {
            ExplorerError::Pipeline(msg) => assert!(msg.starts_with("step 2 ")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_config_rejects_bad_threshold() {
        let yaml = "name: bad\nsteps:\n  - step: threshold\n    value: 0.3\n";
        assert!(ViewConfig::from_yaml(yaml).is_err());
    }
}
