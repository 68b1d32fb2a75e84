//! Data structures for interaction browsing.

mod complex;
mod drug;
mod lineage;
mod melting;
mod schema;
mod signal;
mod table;
mod value;

pub use complex::ComplexIndex;
pub use drug::{
    first_name, normalize_name, DrugCatalog, DRUG_ID_COLUMN, DRUG_NAME_COLUMN, GENE_COLUMN,
    SMILES_COLUMN,
};
pub use lineage::{LineageIndex, LineagePalette, FALLBACK_COLOR, UNKNOWN_LINEAGE};
pub use melting::MeltingCurves;
pub use schema::{Arity, Source, SourceColumns, TableKind, TableSchema};
pub use signal::{SignalKind, SignalMatrix, SignalSet};
pub use table::{Column, InteractionRow, InteractionTable, RowRef, TableView};
pub use value::{is_missing_token, CellValue, ColumnType};

#[cfg(test)]
pub(crate) use table::tests::ppi_table;
