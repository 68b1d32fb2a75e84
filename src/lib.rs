//! PCorr Interaction Explorer Library
//!
//! Browsing engine for scored molecular-interaction tables (protein-protein,
//! protein triplets, complexes and drug-gene pairs) backed by perturbation
//! signal matrices.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (InteractionTable, TableView, SignalMatrix, lookups)
//! - **store**: Manifest-driven, memoized loading of a dataset
//! - **filter**: Row filters (score threshold, column predicate, lineage, entity)
//! - **pipeline**: Filter composition and YAML view configs
//! - **grid**: Paging, sorting, selection and CSV export
//! - **detail**: Resolution of a selected row into entities and source views
//! - **plot**: Scatter, melting-curve and network chart models
//! - **explore**: Gene- and drug-centric queries across tables
//! - **session**: Per-page state advanced by events
//!
//! # Example
//!
//! ```no_run
//! use pcorr_explorer::prelude::*;
//!
//! let store = TableStore::open("dataset.yaml").unwrap();
//! let ppi = store.load("ppi").unwrap();
//!
//! let view = ViewPipeline::new()
//!     .threshold(Threshold::new(0.9).unwrap())
//!     .run(&ppi)
//!     .unwrap();
//!
//! let mut grid = GridState::default();
//! grid.select(&view, 0).unwrap();
//! let detail = resolve(grid.selected(&view).unwrap(), None).unwrap();
//! println!("{}", detail.title());
//! ```

pub mod data;
pub mod detail;
pub mod error;
pub mod explore;
pub mod filter;
pub mod grid;
pub mod pipeline;
pub mod plot;
pub mod session;
pub mod store;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{
        CellValue, ColumnType, ComplexIndex, DrugCatalog, InteractionTable, LineageIndex,
        LineagePalette, MeltingCurves, RowRef, SignalKind, SignalMatrix, SignalSet, Source,
        TableKind, TableSchema, TableView,
    };
    pub use crate::detail::{
        example_selection, resolve, split_identifier, structure_smiles, validate_smiles, Entity,
        ExampleSelection, ResolvedDetail, SourceView,
    };
    pub use crate::error::{ExplorerError, Result};
    pub use crate::explore::{
        complex_detail, complex_tpis, dgi_genes, drug_query, gene_interactions, related_only,
        relation_network, ComplexDetail, DrugQuery, SourceTpis,
    };
    pub use crate::filter::{
        filter_column, filter_entity, filter_lineage, filter_threshold, ColumnFilter,
        ColumnPredicate, TextMatch, Threshold,
    };
    pub use crate::grid::{
        export_file_name, ExportContext, GridState, SortDirection, SortKey, DEFAULT_PAGE_SIZE,
        EXPLORATION_PAGE_SIZE,
    };
    pub use crate::pipeline::{ViewConfig, ViewPipeline, ViewStep};
    pub use crate::plot::{
        detail_charts, melting_chart, network_chart, pairwise_scatters, scatter_chart, Axis,
        MeltingChart, NetworkChart, NodeCategory, PlotContext, PlotSettings, PointState,
        ScatterChart, ScatterRequest, ViewCharts,
    };
    pub use crate::session::{PageEvent, PageState};
    pub use crate::store::{DatasetManifest, TableStore};
}
