//! Command implementations and argument parsing for the citygrid CLI.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use citygrid_core::{
    Edge, EdgeCostFields, GeneratorBuilder, GeneratorError, Graph, GraphIntegrityError,
    GraphSummary, HighlightSelection, NamingPolicy, PropertyType, PropertyWeighting,
    RegionReport, RepairStrategy, SkippedPair, VertexId,
};
use citygrid_providers_names::{NameListError, StreetNameList};
use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_ROWS: usize = 24;
const DEFAULT_COLUMNS: usize = 16;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "citygrid",
    about = "Generate and inspect synthetic city road networks."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a city graph and write it as a JSON snapshot.
    Generate(GenerateCommand),
    /// Validate a snapshot and report its contents per region.
    Inspect(InspectCommand),
    /// List the edges joining requested vertex pairs.
    Highlight(HighlightCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Street-name list: JSON (`{"ruas": [...]}`) or one name per line.
    #[arg(long)]
    pub names: PathBuf,

    /// Number of grid rows.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Number of grid columns.
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    pub columns: usize,

    /// Length of one grid step, in metres.
    #[arg(long = "street-length", default_value_t = 200.0)]
    pub street_length: f64,

    /// Taxi speed, in metres per second.
    #[arg(long = "max-speed", default_value_t = 15.0)]
    pub max_speed: f64,

    /// Taxi price per kilometre.
    #[arg(long = "taxi-rate", default_value_t = 4.0)]
    pub taxi_rate: f64,

    /// Walking speed, in metres per second.
    #[arg(long = "non-motorized-speed", default_value_t = 1.5)]
    pub non_motorized_speed: f64,

    /// Probability that a candidate intersection is removed.
    #[arg(long = "prune-probability", default_value_t = 0.3)]
    pub prune_probability: f64,

    /// Seed of the generation pass.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Properties generated per street direction.
    #[arg(long = "properties-per-side", default_value_t = 5)]
    pub properties_per_side: usize,

    /// Street naming policy.
    #[arg(long, value_enum, default_value_t = NamingArg::Unique)]
    pub naming: NamingArg,

    /// How property types are drawn.
    #[arg(long, value_enum, default_value_t = WeightingArg::RegionWeighted)]
    pub properties: WeightingArg,

    /// How pruned neighbours are bridged.
    #[arg(long, value_enum, default_value_t = RepairArg::ForwardScan)]
    pub repair: RepairArg,

    /// Which optional cost fields are emitted on edges.
    #[arg(long, value_enum, default_value_t = CostsArg::WithExcavation)]
    pub costs: CostsArg,

    /// Omit the region label from nodes.
    #[arg(long = "no-region-labels")]
    pub no_region_labels: bool,

    /// Destination of the JSON snapshot.
    #[arg(long)]
    pub output: PathBuf,
}

/// Options accepted by the `inspect` command.
#[derive(Debug, Args, Clone)]
pub struct InspectCommand {
    /// Snapshot to inspect.
    pub graph: PathBuf,

    /// Number of rows of the grid the snapshot was generated on.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Number of columns of the grid the snapshot was generated on.
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    pub columns: usize,
}

/// Options accepted by the `highlight` command.
#[derive(Debug, Args, Clone)]
pub struct HighlightCommand {
    /// Snapshot to search.
    pub graph: PathBuf,

    /// Vertex pair written as `node_a,node_b`; repeatable.
    #[arg(long = "edge", required = true)]
    pub edges: Vec<VertexPair>,
}

/// An unordered pair of vertices named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexPair(pub VertexId, pub VertexId);

impl FromStr for VertexPair {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (first, second) = raw
            .split_once(',')
            .ok_or_else(|| format!("expected `node_a,node_b`, got `{raw}`"))?;
        let first = first.parse().map_err(|err| format!("{err}"))?;
        let second = second.parse().map_err(|err| format!("{err}"))?;
        Ok(Self(first, second))
    }
}

/// Street naming policies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamingArg {
    /// A fresh name for every street.
    Unique,
    /// One name per grid row and one per grid column.
    SharedPerAxis,
}

/// Property weightings selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeightingArg {
    /// Every type equally likely.
    Uniform,
    /// Weighted by the street's region.
    RegionWeighted,
}

/// Repair strategies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RepairArg {
    /// Skip pruned intersections to the next existing one.
    ForwardScan,
    /// Only link adjacent intersections.
    Disabled,
}

/// Edge cost field sets selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CostsArg {
    /// Distance, price and time only.
    Basic,
    /// Also draw and emit an excavation cost.
    WithExcavation,
}

impl From<NamingArg> for NamingPolicy {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::Unique => Self::UniquePerStreet,
            NamingArg::SharedPerAxis => Self::SharedPerAxis,
        }
    }
}

impl From<WeightingArg> for PropertyWeighting {
    fn from(arg: WeightingArg) -> Self {
        match arg {
            WeightingArg::Uniform => Self::Uniform,
            WeightingArg::RegionWeighted => Self::RegionWeighted,
        }
    }
}

impl From<RepairArg> for RepairStrategy {
    fn from(arg: RepairArg) -> Self {
        match arg {
            RepairArg::ForwardScan => Self::ForwardScan,
            RepairArg::Disabled => Self::Disabled,
        }
    }
}

impl From<CostsArg> for EdgeCostFields {
    fn from(arg: CostsArg) -> Self {
        match arg {
            CostsArg::Basic => Self::Basic,
            CostsArg::WithExcavation => Self::WithExcavation,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while reading or writing a file.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The street-name list could not be parsed.
    #[error(transparent)]
    Names(#[from] NameListError),
    /// Generation failed.
    #[error(transparent)]
    Core(#[from] GeneratorError),
    /// A snapshot could not be encoded or decoded.
    #[error("snapshot `{path}` is not a valid graph: {source}")]
    Snapshot {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A loaded snapshot violates the graph invariants.
    #[error("snapshot `{path}` failed validation: {source}")]
    Integrity {
        /// Snapshot path.
        path: PathBuf,
        /// The violated invariant.
        #[source]
        source: GraphIntegrityError,
    },
}

impl CliError {
    /// Stable code of the underlying failure, for structured logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "CLI_IO",
            Self::Names(error) => error.code(),
            Self::Core(error) => error.code().as_str(),
            Self::Snapshot { .. } => "CLI_SNAPSHOT",
            Self::Integrity { source, .. } => source.code().as_str(),
        }
    }
}

/// Outcome of the `generate` command.
#[derive(Debug, Clone)]
pub struct GenerateSummary {
    /// Where the snapshot was written.
    pub output: PathBuf,
    /// Figures describing the generated graph.
    pub summary: GraphSummary,
}

/// Outcome of the `inspect` command.
#[derive(Debug, Clone)]
pub struct InspectReport {
    /// Figures describing the snapshot.
    pub summary: GraphSummary,
    /// Node counts per re-derived region.
    pub regions: RegionReport,
}

/// Outcome of the `highlight` command.
#[derive(Debug, Clone)]
pub struct HighlightReport {
    /// Edges joining the requested pairs.
    pub edges: Vec<Edge>,
    /// Requested pairs that matched nothing.
    pub skipped: Vec<SkippedPair>,
}

/// Result of executing any CLI command.
#[derive(Debug, Clone)]
pub enum CommandOutput {
    /// A snapshot was generated.
    Generated(GenerateSummary),
    /// A snapshot was inspected.
    Inspected(InspectReport),
    /// Edges were selected from a snapshot.
    Highlighted(HighlightReport),
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, generation, or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use citygrid_cli::cli::{Cli, Command, CommandOutput, InspectCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), r#"{"nodes": [], "edges": [], "properties": []}"#)?;
/// let cli = Cli {
///     command: Command::Inspect(InspectCommand {
///         graph: file.path().to_path_buf(),
///         rows: 24,
///         columns: 16,
///     }),
/// };
/// let CommandOutput::Inspected(report) = run_cli(cli)? else {
///     unreachable!("inspect returns a report");
/// };
/// assert_eq!(report.summary.nodes, 0);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<CommandOutput, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Generate(command) => {
            span.record("command", "generate");
            run_generate(command).map(CommandOutput::Generated)
        }
        Command::Inspect(command) => {
            span.record("command", "inspect");
            run_inspect(command).map(CommandOutput::Inspected)
        }
        Command::Highlight(command) => {
            span.record("command", "highlight");
            run_highlight(command).map(CommandOutput::Highlighted)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(
        rows = command.rows,
        columns = command.columns,
        seed = command.seed,
        names = field::Empty,
        output = field::Empty,
    ),
)]
pub(super) fn run_generate(command: GenerateCommand) -> Result<GenerateSummary, CliError> {
    let generator = GeneratorBuilder::new()
        .with_dimensions(command.rows, command.columns)
        .with_street_length(command.street_length)
        .with_max_speed(command.max_speed)
        .with_taxi_rate(command.taxi_rate)
        .with_non_motorized_speed(command.non_motorized_speed)
        .with_prune_probability(command.prune_probability)
        .with_seed(command.seed)
        .with_properties_per_side(command.properties_per_side)
        .with_naming_policy(command.naming.into())
        .with_property_weighting(command.properties.into())
        .with_repair_strategy(command.repair.into())
        .with_edge_cost_fields(command.costs.into())
        .with_region_labels(!command.no_region_labels)
        .build()?;

    let span = Span::current();
    span.record("names", field::display(command.names.display()));
    span.record("output", field::display(command.output.display()));

    let names = load_names(&command.names)?;
    let mut pool = names.to_pool();
    let graph = generator.generate(&mut pool)?;
    write_graph(&graph, &command.output)?;

    let summary = GraphSummary::from_graph(&graph);
    info!(
        nodes = summary.nodes,
        streets = summary.streets,
        properties = summary.properties.total(),
        "snapshot written"
    );
    Ok(GenerateSummary {
        output: command.output,
        summary,
    })
}

#[instrument(
    name = "cli.inspect",
    err,
    skip(command),
    fields(rows = command.rows, columns = command.columns),
)]
pub(super) fn run_inspect(command: InspectCommand) -> Result<InspectReport, CliError> {
    let graph = load_graph(&command.graph)?;
    let regions = RegionReport::from_graph(&graph, command.rows, command.columns);
    if !regions.mismatches().is_empty() {
        tracing::warn!(
            mismatches = regions.mismatches().len(),
            "stored region labels disagree with the grid dimensions"
        );
    }
    Ok(InspectReport {
        summary: GraphSummary::from_graph(&graph),
        regions,
    })
}

#[instrument(
    name = "cli.highlight",
    err,
    skip(command),
    fields(pairs = command.edges.len(), matched = field::Empty),
)]
pub(super) fn run_highlight(command: HighlightCommand) -> Result<HighlightReport, CliError> {
    let graph = load_graph(&command.graph)?;
    let selection = HighlightSelection::select(
        &graph,
        command.edges.iter().map(|pair| (pair.0, pair.1)),
    );
    Span::current().record("matched", selection.edges().len());
    Ok(HighlightReport {
        edges: selection.edges().iter().map(|edge| (*edge).clone()).collect(),
        skipped: selection.skipped().to_vec(),
    })
}

fn load_names(path: &Path) -> Result<StreetNameList, CliError> {
    StreetNameList::try_from_path(path).map_err(|error| match error {
        NameListError::Io(source) => CliError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => CliError::Names(other),
    })
}

/// Reads and validates a snapshot.
#[instrument(
    name = "cli.load_graph",
    err,
    skip(path),
    fields(path = %path.display(), nodes = field::Empty, edges = field::Empty),
)]
pub(super) fn load_graph(path: &Path) -> Result<Graph, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph: Graph =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
    graph.validate().map_err(|source| CliError::Integrity {
        path: path.to_path_buf(),
        source,
    })?;
    let span = Span::current();
    span.record("nodes", graph.nodes().len());
    span.record("edges", graph.edges().len());
    Ok(graph)
}

fn write_graph(graph: &Graph, path: &Path) -> Result<(), CliError> {
    let io_error = |source: io::Error| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, graph).map_err(|source| CliError::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)
}

/// Renders `output` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use citygrid_cli::cli::{CommandOutput, HighlightReport, render_output};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let output = CommandOutput::Highlighted(HighlightReport {
///     edges: Vec::new(),
///     skipped: Vec::new(),
/// });
/// let mut buffer = Vec::new();
/// render_output(&output, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "highlighted edges: 0\n");
/// # Ok(())
/// # }
/// ```
pub fn render_output(output: &CommandOutput, mut writer: impl Write) -> io::Result<()> {
    match output {
        CommandOutput::Generated(generated) => {
            writeln!(writer, "snapshot: {}", generated.output.display())?;
            render_summary(&generated.summary, &mut writer)
        }
        CommandOutput::Inspected(report) => {
            render_summary(&report.summary, &mut writer)?;
            for (region, count) in report.regions.counts() {
                writeln!(writer, "region {region}: {count} nodes")?;
            }
            for mismatch in report.regions.mismatches() {
                writeln!(
                    writer,
                    "label mismatch: {} stored {} derived {}",
                    mismatch.id, mismatch.stored, mismatch.derived
                )?;
            }
            Ok(())
        }
        CommandOutput::Highlighted(report) => {
            writeln!(writer, "highlighted edges: {}", report.edges.len())?;
            for edge in &report.edges {
                writeln!(
                    writer,
                    "{}\t{} -> {}\t{} m\t{} s\t{}",
                    edge.transport(),
                    edge.from(),
                    edge.to(),
                    edge.distance(),
                    edge.time_cost(),
                    edge.price_cost()
                )?;
            }
            for skipped in &report.skipped {
                writeln!(
                    writer,
                    "skipped {},{}: {}",
                    skipped.first, skipped.second, skipped.reason
                )?;
            }
            Ok(())
        }
    }
}

fn render_summary(summary: &GraphSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "nodes: {}", summary.nodes)?;
    writeln!(
        writer,
        "edges: {} (walk {}, taxi {})",
        summary.edges(),
        summary.walk_edges,
        summary.taxi_edges
    )?;
    writeln!(
        writer,
        "streets: {} ({} repaired)",
        summary.streets, summary.repaired_streets
    )?;
    if let Some(longest) = summary.longest_street {
        writeln!(writer, "longest street: {longest} m")?;
    }
    writeln!(writer, "properties: {}", summary.properties.total())?;
    for property_type in PropertyType::ALL {
        writeln!(
            writer,
            "  {property_type}: {}",
            summary.properties_of(property_type)
        )?;
    }
    Ok(())
}
