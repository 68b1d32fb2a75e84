//! Interaction tables and read-only views over them.

use crate::data::schema::TableSchema;
use crate::data::value::{CellValue, ColumnType};
use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// One immutable record of an interaction table.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRow {
    cells: Vec<CellValue>,
}

impl InteractionRow {
    /// Cells in column order.
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }
}

/// An interaction table loaded into memory.
///
/// Rows are ordered descending by the schema's score column; nothing
/// mutates a table after construction.
#[derive(Debug, Clone)]
pub struct InteractionTable {
    name: String,
    schema: TableSchema,
    columns: Vec<Column>,
    rows: Vec<InteractionRow>,
}

impl InteractionTable {
    /// Build a table from a header and raw string records.
    ///
    /// Column types are inferred (numeric if every present value parses as a
    /// number). Schema columns must be present, and the score column must be
    /// numeric.
    pub fn from_records(
        name: &str,
        schema: TableSchema,
        header: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Result<Self> {
        if header.is_empty() {
            return Err(ExplorerError::EmptyData(format!(
                "Table '{}' has no columns",
                name
            )));
        }
        for required in schema.required_columns() {
            if !header.iter().any(|h| h == required) {
                return Err(ExplorerError::MissingColumn(required.to_string()));
            }
        }

        let n_cols = header.len();
        let columns: Vec<Column> = header
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let column_type = ColumnType::infer(
                    records
                        .iter()
                        .map(|r| r.get(idx).map(String::as_str).unwrap_or("")),
                );
                Column { name, column_type }
            })
            .collect();

        let score_idx = columns
            .iter()
            .position(|c| c.name == schema.score_column)
            .ok_or_else(|| ExplorerError::MissingColumn(schema.score_column.clone()))?;
        if columns[score_idx].column_type != ColumnType::Numeric && !records.is_empty() {
            return Err(ExplorerError::InvalidInput(format!(
                "Score column '{}' of table '{}' is not numeric",
                schema.score_column, name
            )));
        }

        let mut rows: Vec<InteractionRow> = records
            .iter()
            .map(|record| InteractionRow {
                cells: (0..n_cols)
                    .map(|idx| {
                        let raw = record.get(idx).map(String::as_str).unwrap_or("");
                        CellValue::parse(raw, columns[idx].column_type)
                    })
                    .collect(),
            })
            .collect();

        // Descending by score, stable, missing scores last
        rows.sort_by(|a, b| match (&a.cells[score_idx], &b.cells[score_idx]) {
            (CellValue::Number(x), CellValue::Number(y)) => y.total_cmp(x),
            (x, y) => x.sort_cmp(y),
        });

        Ok(Self {
            name: name.to_string(),
            schema,
            columns,
            rows,
        })
    }

    /// Load a table from a delimited text file with a header row.
    ///
    /// `.tsv` and `.txt` files are tab-separated; anything else is read as
    /// comma-separated.
    pub fn from_path<P: AsRef<Path>>(name: &str, schema: TableSchema, path: P) -> Result<Self> {
        let (header, records) = read_delimited(path.as_ref())?;
        Self::from_records(name, schema, header, records)
    }

    /// Drop exact duplicate rows, keeping first occurrences.
    pub fn drop_duplicates(mut self) -> Self {
        let mut seen = HashSet::new();
        self.rows.retain(|row| {
            let key: Vec<String> = row.cells.iter().map(|c| format!("{:?}", c)).collect();
            seen.insert(key)
        });
        self
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema descriptor.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Column descriptors.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Check if a column exists.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.name == column)
    }

    /// Index of a column.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == column)
            .ok_or_else(|| ExplorerError::MissingColumn(column.to_string()))
    }

    /// Declared type of a column.
    pub fn column_type(&self, column: &str) -> Result<ColumnType> {
        Ok(self.columns[self.column_index(column)?].column_type)
    }

    /// Row at a position.
    pub fn row(&self, position: usize) -> Option<&InteractionRow> {
        self.rows.get(position)
    }

    /// Cell at (position, column index).
    #[inline]
    pub fn cell_at(&self, position: usize, col_idx: usize) -> &CellValue {
        &self.rows[position].cells[col_idx]
    }
}

/// Field delimiter for a delimited text file, chosen by extension.
pub(crate) fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") | Some("txt") | Some("tab") => b'\t',
        _ => b',',
    }
}

/// Read a delimited file into a trimmed header and raw records, skipping
/// blank lines.
pub(crate) fn read_delimited(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .flexible(true)
        .from_path(path)?;

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        records.push(record.iter().map(String::from).collect());
    }
    Ok((header, records))
}

/// Read the first two columns of a delimited file as trimmed key/value
/// pairs, skipping rows where either side is blank.
pub(crate) fn read_pairs(path: &Path) -> Result<Vec<(String, String)>> {
    let (header, records) = read_delimited(path)?;
    if header.len() < 2 {
        return Err(ExplorerError::InvalidInput(format!(
            "{} must have two columns",
            path.display()
        )));
    }
    Ok(records
        .into_iter()
        .filter_map(|r| {
            let key = r.first()?.trim().to_string();
            let value = r.get(1)?.trim().to_string();
            (!key.is_empty() && !value.is_empty()).then_some((key, value))
        })
        .collect())
}

/// A borrowed handle on one row, resolving cells by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a InteractionTable,
    position: usize,
}

impl<'a> RowRef<'a> {
    /// Position of the row in its table.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Owning table.
    pub fn table(&self) -> &'a InteractionTable {
        self.table
    }

    /// Cell by column name.
    pub fn get(&self, column: &str) -> Result<&'a CellValue> {
        let idx = self.table.column_index(column)?;
        Ok(self.table.cell_at(self.position, idx))
    }

    /// Cell rendered as text (numbers formatted, missing as empty).
    pub fn text(&self, column: &str) -> Result<String> {
        Ok(self.get(column)?.to_string())
    }

    /// Numeric cell, `None` if missing or non-numeric.
    pub fn number(&self, column: &str) -> Result<Option<f64>> {
        Ok(self.get(column)?.as_number())
    }

    /// The row's composite identifier.
    pub fn identifier(&self) -> Result<String> {
        self.text(&self.table.schema.id_column)
    }

    /// All `(column, value)` pairs.
    pub fn fields(&self) -> Vec<(&'a str, &'a CellValue)> {
        self.table
            .columns
            .iter()
            .zip(self.table.rows[self.position].cells.iter())
            .map(|(c, v)| (c.name.as_str(), v))
            .collect()
    }
}

/// An ordered subsequence of a table's rows.
///
/// Filters take a view and return a new view; the table itself is shared.
#[derive(Debug, Clone)]
pub struct TableView {
    table: Arc<InteractionTable>,
    rows: Vec<usize>,
}

impl TableView {
    /// View over every row of a table, in load order.
    pub fn full(table: Arc<InteractionTable>) -> Self {
        let rows = (0..table.n_rows()).collect();
        Self { table, rows }
    }

    /// Derive a view over the same table with different row positions.
    pub fn with_rows(&self, rows: Vec<usize>) -> Self {
        Self {
            table: Arc::clone(&self.table),
            rows,
        }
    }

    /// Underlying table.
    pub fn table(&self) -> &InteractionTable {
        &self.table
    }

    /// Shared handle on the underlying table.
    pub fn table_arc(&self) -> &Arc<InteractionTable> {
        &self.table
    }

    /// Row positions in view order.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of rows in the view.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row handle at a view index.
    pub fn get(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|&position| RowRef {
            table: &self.table,
            position,
        })
    }

    /// Row handle by table position, if the row is in this view.
    pub fn find_position(&self, position: usize) -> Option<RowRef<'_>> {
        self.rows.contains(&position).then_some(RowRef {
            table: &self.table,
            position,
        })
    }

    /// Iterate over row handles in view order.
    pub fn iter(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        self.rows.iter().map(move |&position| RowRef {
            table: &self.table,
            position,
        })
    }

    /// Identity of the row sequence; changes whenever membership or order
    /// of the filtered rows changes.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.table.name.hash(&mut hasher);
        self.table.n_rows().hash(&mut hasher);
        self.rows.hash(&mut hasher);
        hasher.finish()
    }

    /// Write the view as CSV: header of all columns, one line per row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(self.table.column_names())?;
        for row in self.iter() {
            let fields: Vec<String> = row.fields().iter().map(|(_, v)| v.to_string()).collect();
            out.write_record(&fields)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::schema::TableKind;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    /// Small PPI table used across the crate's unit tests.
    pub(crate) fn ppi_table() -> Arc<InteractionTable> {
        let header = ["PPI", "PCorr-PPI score", "Data source", "Note"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let records = vec![
            vec!["NFKB1-RELA", "0.85", "CRISPR", "canonical"],
            vec!["ABL1-BCR", "0.97", "CRISPR; RNAi", "fusion"],
            vec!["BRAF-MAP2K1", "0.91", "RNAi", "kinase"],
            vec!["TP53-MDM2", "0.80", "CRISPR", "NA"],
            vec!["KRAS-RAF1", "0.88", "CRISPR", "kinase"],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(String::from).collect())
        .collect();
        Arc::new(
            InteractionTable::from_records(
                "ppi",
                TableSchema::for_kind(TableKind::Ppi),
                header,
                records,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_sorted_descending_on_load() {
        let table = ppi_table();
        let view = TableView::full(table);
        let ids: Vec<String> = view.iter().map(|r| r.identifier().unwrap()).collect();
        assert_eq!(
            ids,
            vec!["ABL1-BCR", "BRAF-MAP2K1", "KRAS-RAF1", "NFKB1-RELA", "TP53-MDM2"]
        );
    }

    #[test]
    fn test_column_types() {
        let table = ppi_table();
        assert_eq!(table.column_type("PCorr-PPI score").unwrap(), ColumnType::Numeric);
        assert_eq!(table.column_type("Note").unwrap(), ColumnType::Text);
        assert!(table.column_type("Missing").is_err());
    }

    #[test]
    fn test_missing_schema_column() {
        let header = vec!["PPI".to_string(), "Data source".to_string()];
        let err = InteractionTable::from_records(
            "bad",
            TableSchema::for_kind(TableKind::Ppi),
            header,
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, ExplorerError::MissingColumn(c) if c == "PCorr-PPI score"));
    }

    #[test]
    fn test_from_path_tsv() {
        let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(file, "TPI\tTPCA-PCorr-TPI score\tData source").unwrap();
        writeln!(file, "A-B-C\t0.82\tCRISPR").unwrap();
        writeln!(file, "D-E-F\t0.95\tRNAi").unwrap();
        file.flush().unwrap();

        let table =
            InteractionTable::from_path("tpi", TableSchema::for_kind(TableKind::Tpi), file.path())
                .unwrap();
        assert_eq!(table.n_rows(), 2);
        let view = TableView::full(Arc::new(table));
        assert_eq!(view.get(0).unwrap().identifier().unwrap(), "D-E-F");
    }

    #[test]
    fn test_from_path_csv_with_quotes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "DGI,PCorr-DGI score,Data source (Drug),Data source (Gene),Drug name").unwrap();
        writeln!(file, "D865-BRAF,0.93,CTRP,CRISPR; RNAi,\"PLX-4720; PLX4720\"").unwrap();
        file.flush().unwrap();

        let table =
            InteractionTable::from_path("dgi", TableSchema::for_kind(TableKind::Dgi), file.path())
                .unwrap();
        let view = TableView::full(Arc::new(table));
        let row = view.get(0).unwrap();
        assert_eq!(row.text("Drug name").unwrap(), "PLX-4720; PLX4720");
    }

    #[test]
    fn test_drop_duplicates() {
        let header = vec![
            "PPI".to_string(),
            "PCorr-PPI score".to_string(),
            "Data source".to_string(),
        ];
        let rec = vec!["A-B".to_string(), "0.9".to_string(), "CRISPR".to_string()];
        let table = InteractionTable::from_records(
            "dup",
            TableSchema::for_kind(TableKind::Ppi),
            header,
            vec![rec.clone(), rec],
        )
        .unwrap()
        .drop_duplicates();
        assert_eq!(table.n_rows(), 1);
    }

    #[test]
    fn test_write_csv() {
        let view = TableView::full(ppi_table());
        let subset = view.with_rows(vec![0, 3]);
        let mut buf = Vec::new();
        subset.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "PPI,PCorr-PPI score,Data source,Note");
        assert!(lines[1].starts_with("ABL1-BCR,0.97,CRISPR; RNAi"));
    }

    #[test]
    fn test_fingerprint_tracks_rows() {
        let view = TableView::full(ppi_table());
        let a = view.with_rows(vec![0, 1]);
        let b = view.with_rows(vec![0, 1]);
        let c = view.with_rows(vec![0, 2]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
