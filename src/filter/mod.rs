//! Row filters over table views.
//!
//! Every filter takes a [`TableView`](crate::data::TableView) and returns a
//! new view over the same table; filters compose conjunctively.

pub mod column;
pub mod entity;
pub mod lineage;
pub mod threshold;

pub use column::{filter_column, observed_range, ColumnFilter, ColumnPredicate, TextMatch};
pub use entity::{
    collect_entities, filter_any_entity, filter_entity, filter_values_in, identifier_tokens,
};
pub use lineage::{default_lineage, filter_lineage, lineages, DEFAULT_LINEAGE};
pub use threshold::{
    filter_threshold, filter_threshold_on, filter_threshold_with_stats, Threshold,
    ThresholdFilterResult,
};
