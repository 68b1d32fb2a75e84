//! Read-only, process-wide table store.
//!
//! The store resolves names against a [`DatasetManifest`] and loads every
//! table, matrix and auxiliary map at most once. Loaded values are shared
//! as `Arc`s and never invalidated; the store is `Send + Sync`, so several
//! sessions can read from one store concurrently.

mod manifest;

pub use manifest::{DatasetManifest, SignalEntry, TableEntry};

use crate::data::{
    ComplexIndex, DrugCatalog, InteractionTable, LineageIndex, LineagePalette, MeltingCurves,
    SignalMatrix, SignalSet, TableKind,
};
use crate::error::{ExplorerError, Result};
use crate::plot::PlotSettings;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};
use tracing::{debug, info};

/// Memoized loader for a dataset described by a manifest.
#[derive(Debug)]
pub struct TableStore {
    manifest: DatasetManifest,
    base_dir: PathBuf,
    tables: RwLock<HashMap<String, Arc<InteractionTable>>>,
    signals: OnceLock<Arc<SignalSet>>,
    lineages: OnceLock<Arc<LineageIndex>>,
    palette: OnceLock<Arc<LineagePalette>>,
    drugs: OnceLock<Arc<DrugCatalog>>,
    melting: OnceLock<Arc<MeltingCurves>>,
    complexes: OnceLock<Arc<ComplexIndex>>,
}

impl TableStore {
    /// Create a store; relative manifest paths resolve against `base_dir`.
    pub fn new(manifest: DatasetManifest, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            base_dir: base_dir.into(),
            tables: RwLock::new(HashMap::new()),
            signals: OnceLock::new(),
            lineages: OnceLock::new(),
            palette: OnceLock::new(),
            drugs: OnceLock::new(),
            melting: OnceLock::new(),
            complexes: OnceLock::new(),
        }
    }

    /// Open a manifest file; paths inside it are relative to its directory.
    pub fn open<P: AsRef<Path>>(manifest_path: P) -> Result<Self> {
        let path = manifest_path.as_ref();
        let manifest = DatasetManifest::from_file(path)?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        info!(dataset = %manifest.name, tables = manifest.tables.len(), "opened dataset manifest");
        Ok(Self::new(manifest, base_dir))
    }

    /// The manifest.
    pub fn manifest(&self) -> &DatasetManifest {
        &self.manifest
    }

    /// Plot constants from the manifest.
    pub fn settings(&self) -> &PlotSettings {
        &self.manifest.plot
    }

    /// Names of every table in the manifest, in manifest order.
    pub fn table_names(&self) -> Vec<&str> {
        self.manifest.tables.iter().map(|t| t.name.as_str()).collect()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn existing(&self, kind: &'static str, path: &Path) -> Result<PathBuf> {
        let resolved = self.resolve(path);
        if !resolved.exists() {
            return Err(ExplorerError::not_found(kind, resolved.display().to_string()));
        }
        Ok(resolved)
    }

    /// Load a table by name, sorted descending by score.
    ///
    /// Repeated loads return the same `Arc`.
    pub fn load(&self, name: &str) -> Result<Arc<InteractionTable>> {
        {
            let cache = self.tables.read().unwrap_or_else(|e| e.into_inner());
            if let Some(table) = cache.get(name) {
                return Ok(Arc::clone(table));
            }
        }

        let entry = self
            .manifest
            .table(name)
            .ok_or_else(|| ExplorerError::not_found("table", name))?;
        let path = self.existing("table file", &entry.path)?;
        let mut table = InteractionTable::from_path(name, entry.schema(), &path)?;
        if entry.drop_duplicates {
            table = table.drop_duplicates();
        }
        debug!(table = name, rows = table.n_rows(), path = %path.display(), "loaded table");

        let mut cache = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let table = cache
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(table));
        Ok(Arc::clone(table))
    }

    /// Load the first non-lineage table of a kind.
    pub fn load_kind(&self, kind: TableKind) -> Result<Arc<InteractionTable>> {
        let name = self
            .manifest
            .tables_of_kind(kind)
            .first()
            .map(|s| s.to_string())
            .ok_or_else(|| ExplorerError::not_found("table of kind", kind.label()))?;
        self.load(&name)
    }

    /// All signal matrices of the manifest.
    pub fn signals(&self) -> Result<Arc<SignalSet>> {
        memoize(&self.signals, || {
            let mut set = SignalSet::new();
            for entry in &self.manifest.signals {
                let path = self.existing("signal file", &entry.path)?;
                let matrix = SignalMatrix::from_path(&path)?;
                debug!(
                    kind = %entry.kind,
                    source = %entry.source,
                    entities = matrix.n_entities(),
                    samples = matrix.n_samples(),
                    "loaded signal matrix"
                );
                set.insert(entry.kind, &entry.source, matrix);
            }
            Ok(set)
        })
    }

    /// Sample → lineage index; empty when the manifest has none.
    pub fn lineages(&self) -> Result<Arc<LineageIndex>> {
        memoize(&self.lineages, || match &self.manifest.lineages {
            Some(path) => LineageIndex::from_path(self.existing("lineage file", path)?),
            None => Ok(LineageIndex::default()),
        })
    }

    /// Lineage palette; empty (all fallback colour) when the manifest has none.
    pub fn palette(&self) -> Result<Arc<LineagePalette>> {
        memoize(&self.palette, || match &self.manifest.palette {
            Some(path) => LineagePalette::from_path(self.existing("palette file", path)?),
            None => Ok(LineagePalette::default()),
        })
    }

    /// Drug catalog from the manifest's name/SMILES files, or derived from
    /// the DGI table when no name file is configured.
    pub fn drugs(&self) -> Result<Arc<DrugCatalog>> {
        memoize(&self.drugs, || match &self.manifest.drug_names {
            Some(names) => {
                let names = self.existing("drug name file", names)?;
                let smiles = match &self.manifest.drug_smiles {
                    Some(p) => Some(self.existing("drug SMILES file", p)?),
                    None => None,
                };
                DrugCatalog::from_paths(names, smiles)
            }
            None => match self.manifest.tables_of_kind(TableKind::Dgi).first() {
                Some(name) => DrugCatalog::from_dgi_table(&*self.load(name)?),
                None => Ok(DrugCatalog::new()),
            },
        })
    }

    /// Melting curves.
    pub fn melting(&self) -> Result<Arc<MeltingCurves>> {
        memoize(&self.melting, || {
            let path = self
                .manifest
                .melting
                .as_ref()
                .ok_or_else(|| ExplorerError::not_found("dataset entry", "melting"))?;
            MeltingCurves::from_path(self.existing("melting file", path)?)
        })
    }

    /// Complex → TPI index.
    pub fn complexes(&self) -> Result<Arc<ComplexIndex>> {
        memoize(&self.complexes, || {
            let path = self
                .manifest
                .complexes
                .as_ref()
                .ok_or_else(|| ExplorerError::not_found("dataset entry", "complexes"))?;
            ComplexIndex::from_path(self.existing("complex index file", path)?)
        })
    }
}

/// Load into a `OnceLock` on first use. A concurrent loser of the race
/// returns the winner's value.
fn memoize<T, F>(cell: &OnceLock<Arc<T>>, load: F) -> Result<Arc<T>>
where
    F: FnOnce() -> Result<T>,
{
    if let Some(value) = cell.get() {
        return Ok(Arc::clone(value));
    }
    let value = Arc::new(load()?);
    let _ = cell.set(Arc::clone(&value));
    Ok(cell.get().map(Arc::clone).unwrap_or(value))
}
