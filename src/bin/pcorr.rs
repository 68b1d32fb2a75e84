//! pcorr - PCorr interaction explorer CLI
//!
//! Command-line interface for browsing interaction tables and building
//! chart models from a dataset manifest.

use clap::{Parser, Subcommand, ValueEnum};
use pcorr_explorer::data::{InteractionTable, TableKind, TableSchema, TableView};
use pcorr_explorer::detail::{
    example_selection, resolve, split_identifier, structure_smiles, ResolvedDetail,
};
use pcorr_explorer::error::{ExplorerError, Result};
use pcorr_explorer::explore::{
    complex_detail, complex_tpis, dgi_genes, drug_query, gene_interactions, related_only,
    relation_network, ComplexDetail, DrugQuery,
};
use pcorr_explorer::filter::{
    filter_threshold, filter_threshold_with_stats, ColumnPredicate, TextMatch, Threshold,
};
use pcorr_explorer::grid::{
    export_file_name, ExportContext, GridState, DEFAULT_PAGE_SIZE, EXPLORATION_PAGE_SIZE,
};
use pcorr_explorer::pipeline::{ViewConfig, ViewPipeline};
use pcorr_explorer::plot::{
    detail_charts, melting_chart, network_chart, NetworkChart, PlotContext, ViewCharts,
};
use pcorr_explorer::store::{DatasetManifest, TableStore};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Output format for chart models and reports
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// PCorr interaction explorer
#[derive(Parser)]
#[command(name = "pcorr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Row filters shared by table-browsing commands
#[derive(clap::Args, Debug)]
struct ViewArgs {
    /// Path to the dataset manifest YAML
    #[arg(short, long)]
    manifest: PathBuf,

    /// Table name from the manifest
    #[arg(short, long)]
    table: String,

    /// Minimum score (exclusive), between 0.80 and 1.00
    #[arg(long, default_value = "0.8")]
    threshold: f64,

    /// Lineage for lineage-specific tables (default: Myeloid or the first)
    #[arg(long)]
    lineage: Option<String>,

    /// Column to filter on
    #[arg(long)]
    column: Option<String>,

    /// Inclusive lower bound for a numeric column
    #[arg(long, requires = "column")]
    lo: Option<f64>,

    /// Inclusive upper bound for a numeric column
    #[arg(long, requires = "column")]
    hi: Option<f64>,

    /// Case-insensitive text query for a text column
    #[arg(long, requires = "column", conflicts_with_all = ["lo", "hi"])]
    query: Option<String>,

    /// Match the text query as a substring instead of the whole cell
    #[arg(long, requires = "query")]
    contains: bool,

    /// View pipeline YAML; replaces the filter flags above
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tables of a dataset
    Tables {
        /// Path to the dataset manifest YAML
        #[arg(short, long)]
        manifest: PathBuf,
    },

    /// Filter a table and print a page or export it as CSV
    Filter {
        #[command(flatten)]
        view: ViewArgs,

        /// Zero-based page to print
        #[arg(long, default_value = "0")]
        page: usize,

        /// Export the whole view as CSV (a directory gets the default file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a row of the filtered view and build its charts
    Detail {
        #[command(flatten)]
        view: ViewArgs,

        /// Zero-based row of the filtered view; omit for the page example
        #[arg(short, long)]
        row: Option<usize>,

        /// Sample or lineage to highlight in every chart
        #[arg(long)]
        highlight: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Build the melting-curve chart of genes in one sample
    Melting {
        /// Path to the dataset manifest YAML
        #[arg(short, long)]
        manifest: PathBuf,

        /// Sample (cell line); defaults to the first configured sample
        #[arg(short, long)]
        sample: Option<String>,

        /// Genes, hyphen- or comma-separated (e.g. "ABL1-BCR-GRB2")
        #[arg(short, long)]
        genes: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Find PPI, TPI and TriNET rows mentioning a gene
    ExploreGene {
        /// Path to the dataset manifest YAML
        #[arg(short, long)]
        manifest: PathBuf,

        /// Gene symbol
        #[arg(short, long)]
        gene: String,

        /// Minimum score (exclusive)
        #[arg(long, default_value = "0.8")]
        threshold: f64,

        /// Keep only rows touching a gene with a drug interaction
        #[arg(long)]
        dgi_only: bool,

        /// Zero-based page of each result table
        #[arg(long, default_value = "0")]
        page: usize,

        /// Result table to select from (PPI, TPI or TriNET)
        #[arg(long, requires = "row")]
        select: Option<String>,

        /// Zero-based row of the selected result table; prints its network
        /// with each gene's top drug
        #[arg(long, requires = "select")]
        row: Option<usize>,
    },

    /// Find drug-gene interactions of a drug
    ExploreDrug {
        /// Path to the dataset manifest YAML
        #[arg(short, long)]
        manifest: PathBuf,

        /// Drug id (exact)
        #[arg(long, conflicts_with_all = ["name", "smiles"])]
        id: Option<String>,

        /// Drug name (normalised substring)
        #[arg(long, conflicts_with = "smiles")]
        name: Option<String>,

        /// SMILES (exact)
        #[arg(long)]
        smiles: Option<String>,

        /// Minimum score (exclusive)
        #[arg(long, default_value = "0.8")]
        threshold: f64,

        /// Keep only DGIs whose gene appears in a PPI, TPI or TriNET row
        #[arg(long)]
        related_only: bool,

        /// Zero-based page of the result table
        #[arg(long, default_value = "0")]
        page: usize,
    },

    /// List the TPIs of a TriNET complex, optionally with its network
    ComplexTpis {
        /// Path to the dataset manifest YAML
        #[arg(short, long)]
        manifest: PathBuf,

        /// Data source of the TriNET row (e.g. CRISPR or RNAi)
        #[arg(short, long)]
        source: String,

        /// Complex identifier (e.g. "ABL1-BCR-GRB2-CRK")
        #[arg(short, long)]
        complex: String,

        /// Print the network chart instead of the TPI rows
        #[arg(long)]
        network: bool,

        /// Add each gene's top drug to the network
        #[arg(long, requires = "network")]
        with_drugs: bool,

        /// Minimum DGI score (exclusive) for network drugs
        #[arg(long, default_value = "0.8")]
        threshold: f64,
    },

    /// Generate an example dataset manifest
    Example {
        /// Output path for the example YAML
        #[arg(short, long, default_value = "dataset.yaml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Tables { manifest } => cmd_tables(&manifest),

        Commands::Filter { view, page, output } => cmd_filter(&view, page, output.as_deref()),

        Commands::Detail {
            view,
            row,
            highlight,
            format,
        } => cmd_detail(&view, row, highlight.as_deref(), format),

        Commands::Melting {
            manifest,
            sample,
            genes,
            format,
        } => cmd_melting(&manifest, sample.as_deref(), &genes, format),

        Commands::ExploreGene {
            manifest,
            gene,
            threshold,
            dgi_only,
            page,
            select,
            row,
        } => match (select, row) {
            (Some(select), Some(row)) => cmd_relation_network(&manifest, &gene, threshold, &select, row),
            _ => cmd_explore_gene(&manifest, &gene, threshold, dgi_only, page),
        },

        Commands::ExploreDrug {
            manifest,
            id,
            name,
            smiles,
            threshold,
            related_only,
            page,
        } => cmd_explore_drug(&manifest, id, name, smiles, threshold, related_only, page),

        Commands::ComplexTpis {
            manifest,
            source,
            complex,
            network,
            with_drugs,
            threshold,
        } => cmd_complex_tpis(&manifest, &source, &complex, network, with_drugs, threshold),

        Commands::Example { output } => cmd_example(&output),
    };

    match result {
        Ok(()) => {}
        Err(e) if e.is_recoverable() => warn!("{}", e),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn emit<T: Serialize>(value: &T, format: OutputFormat, text: impl FnOnce(&T) -> String) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Text => println!("{}", text(value)),
    }
    Ok(())
}

/// Build the filtered view described by the shared flags.
fn build_view(store: &TableStore, args: &ViewArgs) -> Result<(Arc<InteractionTable>, TableView, Option<String>)> {
    let table = store.load(&args.table)?;
    let threshold = Threshold::new(args.threshold)?;

    let lineage = match (&table.schema().lineage_column, &args.lineage) {
        (Some(_), Some(l)) => Some(l.clone()),
        (Some(_), None) => pcorr_explorer::filter::default_lineage(&TableView::full(Arc::clone(&table)))?,
        (None, Some(l)) => {
            warn!(table = %args.table, lineage = %l, "table is not lineage-specific; ignoring lineage");
            None
        }
        (None, None) => None,
    };

    let pipeline = match &args.config {
        Some(path) => ViewConfig::from_file(path)?.pipeline(),
        None => {
            let mut pipeline = ViewPipeline::new().name(&args.table);
            if let Some(l) = &lineage {
                pipeline = pipeline.lineage(l);
            }
            pipeline = pipeline.threshold(threshold);
            if let Some(column) = &args.column {
                let predicate = match (&args.query, args.lo, args.hi) {
                    (Some(query), _, _) => ColumnPredicate::Text {
                        query: query.clone(),
                        mode: if args.contains { TextMatch::Contains } else { TextMatch::Exact },
                    },
                    (None, lo, hi) => ColumnPredicate::Range {
                        lo: lo.unwrap_or(f64::MIN),
                        hi: hi.unwrap_or(f64::MAX),
                    },
                };
                pipeline = pipeline.column(column, predicate);
            }
            pipeline
        }
    };

    let view = pipeline.run(&table)?;
    Ok((table, view, lineage))
}

fn print_page(view: &TableView, page_size: usize, page: usize, label: &str) -> Result<()> {
    let mut grid = GridState::new(page_size);
    grid.sync(view);
    grid.set_page(view, page);
    let display = grid.display_view(view)?;
    let rows = grid.page_rows(&display);
    eprintln!(
        "{}: page {} of {} ({} rows)",
        label,
        rows.page + 1,
        rows.n_pages,
        rows.total
    );
    let positions = rows.rows.iter().map(|r| r.position()).collect();
    view.with_rows(positions).write_csv(io::stdout().lock())
}

/// List tables with their kind and row count
fn cmd_tables(manifest_path: &Path) -> Result<()> {
    let store = TableStore::open(manifest_path)?;
    println!("Dataset: {}", store.manifest().name);
    println!();
    for entry in &store.manifest().tables {
        let scope = if entry.is_lineage_specific() { " (lineage-specific)" } else { "" };
        match store.load(&entry.name) {
            Ok(table) => println!(
                "  {:<12} {:<7} {:>8} rows{}",
                entry.name,
                entry.kind.label(),
                table.n_rows(),
                scope
            ),
            Err(e) => println!("  {:<12} {:<7} unavailable: {}", entry.name, entry.kind.label(), e),
        }
    }
    Ok(())
}

/// Filter a table and print one page or export the whole view
fn cmd_filter(args: &ViewArgs, page: usize, output: Option<&Path>) -> Result<()> {
    let store = TableStore::open(&args.manifest)?;
    let (table, view, lineage) = build_view(&store, args)?;
    let threshold = Threshold::new(args.threshold)?;

    let stats = filter_threshold_with_stats(&TableView::full(Arc::clone(&table)), &threshold)?.1;
    eprintln!("{}", stats);

    match output {
        Some(path) => {
            let path = if path.is_dir() {
                let ctx = ExportContext::for_view(&view, lineage.as_deref(), threshold);
                path.join(export_file_name(&ctx))
            } else {
                path.to_path_buf()
            };
            GridState::default().export_csv(&view, BufWriter::new(File::create(&path)?))?;
            info!(rows = view.len(), path = %path.display(), "exported view");
        }
        None => print_page(&view, DEFAULT_PAGE_SIZE, page, table.name())?,
    }
    Ok(())
}

#[derive(Serialize)]
struct DetailReport {
    example: bool,
    title: String,
    lineage: Option<String>,
    smiles: Option<String>,
    detail: ResolvedDetail,
    charts: Vec<ViewCharts>,
}

#[derive(Serialize)]
struct SourceTpisReport {
    source: String,
    tpis: Vec<String>,
    error: Option<String>,
}

#[derive(Serialize)]
struct ComplexReport {
    complex: String,
    network: NetworkChart,
    associated_tpis: Vec<SourceTpisReport>,
}

impl ComplexReport {
    fn new(complex: &ComplexDetail) -> Result<Self> {
        let associated_tpis = complex
            .tpis
            .iter()
            .map(|s| -> Result<SourceTpisReport> {
                Ok(SourceTpisReport {
                    source: s.source.clone(),
                    tpis: s.rows.iter().map(|r| r.identifier()).collect::<Result<_>>()?,
                    error: s.error.clone(),
                })
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            complex: complex.complex.clone(),
            network: complex.network.clone(),
            associated_tpis,
        })
    }
}

fn emit_complex(report: &ComplexReport, format: OutputFormat) -> Result<()> {
    emit(report, format, |r| {
        let mut out = format!("Network of {}\n", r.complex);
        for edge in &r.network.edges {
            out.push_str(&format!("  {} -- {}\n", edge.source, edge.target));
        }
        for source in &r.associated_tpis {
            match &source.error {
                Some(error) => out.push_str(&format!("  [{}] no associated TPIs: {}\n", source.source, error)),
                None => out.push_str(&format!("  [{}] TPIs: {}\n", source.source, source.tpis.join(", "))),
            }
        }
        out
    })
}

/// Resolve a row (or the page example) and build its charts
fn cmd_detail(args: &ViewArgs, row: Option<usize>, highlight: Option<&str>, format: OutputFormat) -> Result<()> {
    let store = TableStore::open(&args.manifest)?;
    let (table, view, lineage) = build_view(&store, args)?;
    let catalog = store.drugs()?;
    let kind = table.schema().kind;
    let lineage_specific = table.schema().lineage_column.is_some();

    let (mut detail, lineage, smiles, example) = match row {
        Some(row) => {
            let mut grid = GridState::new(DEFAULT_PAGE_SIZE);
            grid.sync(&view);
            grid.set_page(&view, row / DEFAULT_PAGE_SIZE);
            grid.select(&view, row % DEFAULT_PAGE_SIZE)?;
            let selected = grid
                .selected(&view)
                .ok_or_else(|| ExplorerError::InvalidParameter(format!("No row {} in view", row)))?;
            let catalog = (kind == TableKind::Dgi).then_some(catalog.as_ref());
            let detail = resolve(selected, catalog)?;
            let smiles = if kind == TableKind::Dgi {
                structure_smiles(selected)
                    .map_err(|e| warn!(error = %e, "no structure for selection"))
                    .ok()
            } else {
                None
            };
            (detail, lineage, smiles, false)
        }
        None => {
            let example = example_selection(kind, lineage_specific, &catalog)?.ok_or_else(|| {
                ExplorerError::InvalidParameter(format!("{} pages have no example; pass --row", kind.label()))
            })?;
            (example.detail, example.lineage, example.smiles, true)
        }
    };

    if kind == TableKind::Complex {
        let index = store.complexes()?;
        let tpi = TableView::full(store.load_kind(TableKind::Tpi)?);
        let complex = complex_detail(&detail, &index, &tpi, store.settings())?;
        return emit_complex(&ComplexReport::new(&complex)?, format);
    }

    if let Some(term) = highlight {
        for i in 0..detail.views.len() {
            detail.set_highlight(i, term)?;
        }
    }

    let signals = store.signals()?;
    let lineages = store.lineages()?;
    let palette = store.palette()?;
    let ctx = PlotContext {
        signals: &signals,
        lineages: &lineages,
        palette: &palette,
        settings: store.settings(),
    };
    let scope = if lineage_specific { lineage.as_deref() } else { None };
    let charts = detail_charts(&ctx, &detail, scope);

    let report = DetailReport {
        example,
        title: detail.title(),
        lineage: scope.map(String::from),
        smiles,
        detail,
        charts,
    };
    emit(&report, format, |r| {
        let mut out = format!("{}{}\n", r.title, if r.example { " (example)" } else { "" });
        if let Some(smiles) = &r.smiles {
            out.push_str(&format!("  SMILES: {}\n", smiles));
        }
        for view in &r.charts {
            let source = match &view.view.drug_source {
                Some(drug) => format!("{}/{}", drug, view.view.gene_source),
                None => view.view.gene_source.clone(),
            };
            if let Some(error) = &view.error {
                out.push_str(&format!("  [{}] unavailable: {}\n", source, error));
                continue;
            }
            for chart in &view.scatters {
                let pearson = chart.pearson_r.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "n/a".into());
                out.push_str(&format!("  [{}] {}: {} samples, r = {}\n", source, chart.title, chart.n_points(), pearson));
                for w in &chart.warnings {
                    out.push_str(&format!("    warning: {}\n", w));
                }
            }
        }
        out
    })
}

/// Build a melting-curve chart
fn cmd_melting(manifest_path: &Path, sample: Option<&str>, genes: &str, format: OutputFormat) -> Result<()> {
    let store = TableStore::open(manifest_path)?;
    let curves = store.melting()?;
    let settings = store.settings();
    let sample = match sample {
        Some(s) => s.to_string(),
        None => settings
            .melting_samples
            .first()
            .cloned()
            .ok_or_else(|| ExplorerError::InvalidParameter("no sample given or configured".into()))?,
    };
    let genes: Vec<&str> = genes
        .split(|c: char| c == '-' || c == ',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .collect();

    let chart = melting_chart(&curves, settings, &sample, &genes)?;
    emit(&chart, format, |c| {
        let mut out = format!("{} ({} conditions)\n", c.title, c.conditions.len());
        for s in &c.series {
            out.push_str(&format!("  {} [{}]\n", s.gene, s.color));
        }
        for note in &c.notes {
            out.push_str(&format!("  note: {}\n", note));
        }
        out
    })
}

/// Load the non-lineage relation tables present in the manifest
fn relation_views(store: &TableStore) -> Result<Vec<TableView>> {
    let mut views = Vec::new();
    for kind in [TableKind::Ppi, TableKind::Tpi, TableKind::Complex] {
        match store.load_kind(kind) {
            Ok(table) => views.push(TableView::full(table)),
            Err(ExplorerError::NotFound { .. }) => warn!(kind = kind.label(), "no table of kind in dataset"),
            Err(e) => return Err(e),
        }
    }
    Ok(views)
}

/// Gene-centric exploration
fn cmd_explore_gene(manifest_path: &Path, gene: &str, threshold: f64, dgi_only: bool, page: usize) -> Result<()> {
    let store = TableStore::open(manifest_path)?;
    let threshold = Threshold::new(threshold)?;
    let relations = relation_views(&store)?;

    let genes = if dgi_only {
        Some(dgi_genes(&TableView::full(store.load_kind(TableKind::Dgi)?))?)
    } else {
        None
    };

    let results = gene_interactions(&relations, gene.trim(), &threshold, genes.as_ref())?;
    for view in &results {
        let label = view.table().schema().kind.label();
        if view.is_empty() {
            warn!(gene, table = label, "no interactions found");
            continue;
        }
        print_page(view, EXPLORATION_PAGE_SIZE, page, label)?;
        println!();
    }
    Ok(())
}

/// Drug-centric exploration
#[allow(clippy::too_many_arguments)]
fn cmd_explore_drug(
    manifest_path: &Path,
    id: Option<String>,
    name: Option<String>,
    smiles: Option<String>,
    threshold: f64,
    related: bool,
    page: usize,
) -> Result<()> {
    let query = match (id, name, smiles) {
        (Some(id), _, _) => DrugQuery::Id(id),
        (None, Some(name), _) => DrugQuery::Name(name),
        (None, None, Some(smiles)) => DrugQuery::Smiles(smiles),
        (None, None, None) => {
            return Err(ExplorerError::InvalidParameter(
                "one of --id, --name or --smiles is required".into(),
            ))
        }
    };

    let store = TableStore::open(manifest_path)?;
    let threshold = Threshold::new(threshold)?;
    let dgi = filter_threshold(&TableView::full(store.load_kind(TableKind::Dgi)?), &threshold)?;

    let mut hits = drug_query(&dgi, &query)?;
    if related {
        let relations = relation_views(&store)?
            .iter()
            .map(|v| filter_threshold(v, &threshold))
            .collect::<Result<Vec<_>>>()?;
        hits = related_only(&hits, &relations)?;
    }

    if hits.is_empty() {
        warn!(?query, "no drug-gene interactions found");
        return Ok(());
    }
    print_page(&hits, DEFAULT_PAGE_SIZE, page, "DGI")
}

/// TPIs (or network) of a TriNET complex
fn cmd_complex_tpis(
    manifest_path: &Path,
    source: &str,
    complex: &str,
    network: bool,
    with_drugs: bool,
    threshold: f64,
) -> Result<()> {
    let store = TableStore::open(manifest_path)?;
    let index = store.complexes()?;
    let tpi = TableView::full(store.load_kind(TableKind::Tpi)?);
    let rows = complex_tpis(&index, &tpi, source, complex)?;

    if !network {
        return print_page(&rows, rows.len().max(1), 0, complex);
    }

    let genes = split_identifier(complex, TableSchema::for_kind(TableKind::Complex).arity)?;
    let genes: Vec<&str> = genes.iter().map(String::as_str).collect();
    let dgi = if with_drugs {
        let threshold = Threshold::new(threshold)?;
        Some(filter_threshold(&TableView::full(store.load_kind(TableKind::Dgi)?), &threshold)?)
    } else {
        None
    };
    let chart = network_chart(&genes, store.settings(), dgi.as_ref())?;
    for note in &chart.notes {
        info!("{}", note);
    }
    println!("{}", serde_json::to_string_pretty(&chart)?);
    Ok(())
}

/// Network of one gene-exploration result row with each gene's top drug
fn cmd_relation_network(manifest_path: &Path, gene: &str, threshold: f64, select: &str, row: usize) -> Result<()> {
    let kind = TableKind::parse(select)
        .filter(|k| matches!(k, TableKind::Ppi | TableKind::Tpi | TableKind::Complex))
        .ok_or_else(|| ExplorerError::InvalidParameter(format!("'{}' is not PPI, TPI or TriNET", select)))?;

    let store = TableStore::open(manifest_path)?;
    let threshold = Threshold::new(threshold)?;
    let relation = TableView::full(store.load_kind(kind)?);
    let hits = gene_interactions(&[relation], gene.trim(), &threshold, None)?;
    let hits = hits
        .first()
        .ok_or_else(|| ExplorerError::not_found("table", kind.label()))?;
    let selected = hits
        .get(row)
        .ok_or_else(|| ExplorerError::InvalidParameter(format!("No row {} in {} results", row, kind.label())))?;

    let dgi = filter_threshold(&TableView::full(store.load_kind(TableKind::Dgi)?), &threshold)?;
    let chart = relation_network(selected, store.settings(), &dgi)?;
    for note in &chart.notes {
        info!("{}", note);
    }
    println!("{}", serde_json::to_string_pretty(&chart)?);
    Ok(())
}

/// Generate an example dataset manifest
fn cmd_example(output_path: &Path) -> Result<()> {
    let manifest = DatasetManifest::example();
    let yaml = manifest.to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote example manifest to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}
