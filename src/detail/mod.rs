//! Resolution of a selected row into entities and per-source chart views.

mod smiles;

pub use smiles::validate_smiles;

use crate::data::{
    first_name, Arity, DrugCatalog, RowRef, Source, TableKind, DRUG_NAME_COLUMN, SMILES_COLUMN,
};
use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A resolved entity of an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entity {
    Gene { symbol: String },
    Drug { id: String, display_name: String },
}

impl Entity {
    /// Key into signal matrices (gene symbol or drug id).
    pub fn key(&self) -> &str {
        match self {
            Entity::Gene { symbol } => symbol,
            Entity::Drug { id, .. } => id,
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &str {
        match self {
            Entity::Gene { symbol } => symbol,
            Entity::Drug { display_name, .. } => display_name,
        }
    }

    /// Whether this is a drug.
    pub fn is_drug(&self) -> bool {
        matches!(self, Entity::Drug { .. })
    }
}

/// One chart view of a selected row: a gene-effect source, the
/// drug-response source for DGIs, and the view's own highlight term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceView {
    pub gene_source: String,
    pub drug_source: Option<String>,
    pub highlight: Option<String>,
}

/// A selected row resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDetail {
    pub kind: TableKind,
    pub identifier: String,
    pub entities: Vec<Entity>,
    pub views: Vec<SourceView>,
}

impl ResolvedDetail {
    /// Display title, e.g. `PLX-4720-BRAF`.
    pub fn title(&self) -> String {
        self.entities
            .iter()
            .map(Entity::display_name)
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Set the highlight term of one view; blank terms clear it. Other views
    /// are untouched.
    pub fn set_highlight(&mut self, view: usize, term: &str) -> Result<()> {
        let n_views = self.views.len();
        let target = self.views.get_mut(view).ok_or_else(|| {
            ExplorerError::InvalidParameter(format!("view {} of {} does not exist", view, n_views))
        })?;
        let term = term.trim();
        target.highlight = (!term.is_empty()).then(|| term.to_string());
        Ok(())
    }

    /// Gene entities in order.
    pub fn genes(&self) -> Vec<&str> {
        self.entities
            .iter()
            .filter(|e| !e.is_drug())
            .map(Entity::key)
            .collect()
    }
}

/// Structure shown for the DGI example.
pub const EXAMPLE_SMILES: &str = "CCCS(=O)(=O)Nc1ccc(F)c(C(=O)c2c[nH]c3ncc(Cl)cc23)c1F";

/// Preset detail shown while nothing is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleSelection {
    pub detail: ResolvedDetail,
    pub lineage: Option<String>,
    pub smiles: Option<String>,
}

/// The example for a page. TriNET pages have none.
///
/// The DGI example looks PLX-4720 up in the catalog, so an unknown name is
/// `NotFound`.
pub fn example_selection(
    kind: TableKind,
    lineage_specific: bool,
    catalog: &DrugCatalog,
) -> Result<Option<ExampleSelection>> {
    let gene = |s: &str| Entity::Gene {
        symbol: s.to_string(),
    };
    let view = |drug_source: Option<&str>| SourceView {
        gene_source: "CRISPR".to_string(),
        drug_source: drug_source.map(String::from),
        highlight: None,
    };
    let (identifier, entities, views, lineage, smiles) = match kind {
        TableKind::Ppi => (
            "NFKB1-RELA".to_string(),
            vec![gene("NFKB1"), gene("RELA")],
            vec![view(None)],
            "Lymphoid",
            None,
        ),
        TableKind::Tpi => (
            "ABL1-BCR-GRB2".to_string(),
            vec![gene("ABL1"), gene("BCR"), gene("GRB2")],
            vec![view(None)],
            "Myeloid",
            None,
        ),
        TableKind::Dgi => {
            let name = "PLX-4720";
            let id = catalog
                .id_for_name(name)
                .ok_or_else(|| ExplorerError::not_found("drug", name))?;
            (
                format!("{}-BRAF", id),
                vec![
                    Entity::Drug {
                        id: id.to_string(),
                        display_name: name.to_string(),
                    },
                    gene("BRAF"),
                ],
                vec![view(Some("CTRP"))],
                "Skin",
                Some(EXAMPLE_SMILES.to_string()),
            )
        }
        TableKind::Complex => return Ok(None),
    };
    Ok(Some(ExampleSelection {
        detail: ResolvedDetail {
            kind,
            identifier,
            entities,
            views,
        },
        lineage: lineage_specific.then(|| lineage.to_string()),
        smiles,
    }))
}

/// Split a hyphen-joined identifier into trimmed entity symbols.
///
/// The token count must satisfy `arity` and no token may be blank.
pub fn split_identifier(identifier: &str, arity: Arity) -> Result<Vec<String>> {
    let tokens: Vec<String> = identifier.split('-').map(|t| t.trim().to_string()).collect();
    if tokens.iter().any(String::is_empty) || !arity.accepts(tokens.len()) {
        return Err(ExplorerError::MalformedIdentifier {
            identifier: identifier.to_string(),
            expected: arity.to_string(),
            found: tokens.iter().filter(|t| !t.is_empty()).count(),
        });
    }
    Ok(tokens)
}

/// Resolve a selected row into entities and source views.
///
/// DGI rows yield `[Drug, Gene]`; the drug display name comes from the
/// catalog when one is given (an unknown id is `NotFound`), otherwise from
/// the row's own `Drug name` column. A combined source yields one view per
/// label, in order.
pub fn resolve(row: RowRef<'_>, catalog: Option<&DrugCatalog>) -> Result<ResolvedDetail> {
    let schema = row.table().schema();
    let identifier = row.identifier()?;
    let tokens = split_identifier(&identifier, schema.arity)?;

    let entities = if schema.kind == TableKind::Dgi {
        let (drug_id, gene) = (&tokens[0], &tokens[1]);
        let display_name = match catalog {
            Some(catalog) => catalog.canonical_name(drug_id)?.to_string(),
            None => row_drug_name(row).unwrap_or_else(|| drug_id.clone()),
        };
        vec![
            Entity::Drug {
                id: drug_id.clone(),
                display_name,
            },
            Entity::Gene {
                symbol: gene.clone(),
            },
        ]
    } else {
        tokens
            .into_iter()
            .map(|symbol| Entity::Gene { symbol })
            .collect()
    };

    let gene_sources = Source::parse(&row.text(schema.source.gene_column())?)?;
    let drug_sources = match schema.source.drug_column() {
        Some(col) => Some(Source::parse(&row.text(col)?)?),
        None => None,
    };

    let mut views = Vec::new();
    for gene_source in gene_sources.labels() {
        match &drug_sources {
            Some(drug) => {
                for drug_source in drug.labels() {
                    views.push(SourceView {
                        gene_source: gene_source.to_string(),
                        drug_source: Some(drug_source.to_string()),
                        highlight: None,
                    });
                }
            }
            None => views.push(SourceView {
                gene_source: gene_source.to_string(),
                drug_source: None,
                highlight: None,
            }),
        }
    }

    debug!(identifier = %identifier, views = views.len(), "resolved detail");
    Ok(ResolvedDetail {
        kind: schema.kind,
        identifier,
        entities,
        views,
    })
}

fn row_drug_name(row: RowRef<'_>) -> Option<String> {
    let names = row.get(DRUG_NAME_COLUMN).ok()?.as_text()?;
    let name = first_name(names);
    (!name.is_empty()).then(|| name.to_string())
}

/// The row's SMILES string after a syntax check.
pub fn structure_smiles(row: RowRef<'_>) -> Result<String> {
    let cell = row.get(SMILES_COLUMN)?;
    let smiles = cell
        .as_text()
        .ok_or_else(|| ExplorerError::not_found("SMILES for", row.identifier().unwrap_or_default()))?;
    validate_smiles(smiles)?;
    Ok(smiles.trim().to_string())
}
