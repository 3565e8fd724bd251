//! eraline CLI
//!
//! Lays out a JSON dataset of lifespans and prints rows, ticks or
//! coordinate lookups.

mod locate;
mod render;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use eraline_core::model::{CategoryRegistry, EntityFilter};
use eraline_core::navigation::default_eras;
use eraline_core::{LayoutConfig, LayoutParams, LayoutResult, layout_entities, parse_entities, select_ticks};
use eraline_protocol::{Entity, Year};

use locate::{Query, locate};

#[derive(Parser)]
#[command(name = "eraline")]
#[command(about = "Lay out lifespans on a gap-compressed timeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign rows and print the laid-out entities
    Layout {
        #[command(flatten)]
        input: InputArgs,

        /// Width of the text chart in characters
        #[arg(long, default_value = "100")]
        columns: usize,
    },

    /// Print the tick plan for the laid-out dataset
    Ticks {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Convert between years and pixel positions
    Locate {
        #[command(flatten)]
        input: InputArgs,

        /// Year to map to a position and scroll target
        #[arg(long, allow_hyphen_values = true, required_unless_present = "x", conflicts_with = "x")]
        year: Option<f64>,

        /// Pixel position to map back to a year
        #[arg(long)]
        x: Option<f64>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Dataset JSON file (array of records or {"people": [...]})
    dataset: PathBuf,

    /// Zoom value; 140 is 1x
    #[arg(long, default_value = "140")]
    zoom: f64,

    /// Viewport width in pixels
    #[arg(long, default_value = "1280")]
    width: f64,

    /// Year ongoing lifespans extend to (defaults to the current year)
    #[arg(long, allow_hyphen_values = true)]
    current_year: Option<Year>,

    /// Only keep entities whose text contains this query
    #[arg(long)]
    query: Option<String>,

    /// Only keep entities of this category key
    #[arg(long)]
    category: Option<String>,

    /// Layout config JSON; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Layout { input, columns } => run_layout(&input, columns),
        Commands::Ticks { input } => run_ticks(&input),
        Commands::Locate { input, year, x } => run_locate(&input, year, x),
    }
}

/// Dataset, config and params resolved from the shared arguments.
struct Loaded {
    entities: Vec<Entity>,
    registry: CategoryRegistry,
    config: LayoutConfig,
    params: LayoutParams,
}

impl Loaded {
    fn from_args(args: &InputArgs) -> Result<Self> {
        let data = std::fs::read(&args.dataset)
            .with_context(|| format!("failed to read {}", args.dataset.display()))?;
        let entities = parse_entities(&data)
            .with_context(|| format!("failed to parse {}", args.dataset.display()))?;

        let config = match &args.config {
            Some(path) => load_config(path)?,
            None => LayoutConfig::default(),
        };

        let mut registry = CategoryRegistry::with_defaults();
        registry.register_entities(&entities);

        let current_year = resolve_current_year(args.current_year, Local::now());
        let params = LayoutParams::new(args.zoom, args.width, current_year);
        Ok(Self {
            entities,
            registry,
            config,
            params,
        })
    }

    fn layout(&self, args: &InputArgs) -> Result<LayoutResult> {
        let mut filter = EntityFilter::new(
            args.query.clone().unwrap_or_default(),
            args.category.clone(),
        );
        if let Some(category) = &args.category {
            filter.sanitize(&self.registry);
            if filter.category.is_none() {
                log::warn!("unknown category {category:?}; showing all categories");
            }
        }

        let matched = filter.apply(&self.entities, &self.registry);
        log::debug!("{} of {} entities match", matched.len(), self.entities.len());
        layout_entities(matched, &self.params, &self.config).context("layout failed")
    }
}

fn load_config(path: &Path) -> Result<LayoutConfig> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    LayoutConfig::from_json(&data).with_context(|| format!("invalid config {}", path.display()))
}

/// Year ongoing lifespans run to: `--current-year` if given, else the
/// calendar year of `today`.
fn resolve_current_year(explicit: Option<Year>, today: impl Datelike) -> Year {
    explicit.unwrap_or_else(|| today.year())
}

fn emit(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn run_layout(args: &InputArgs, columns: usize) -> Result<()> {
    let loaded = Loaded::from_args(args)?;
    let result = loaded.layout(args)?;

    if args.json {
        return emit(&serde_json::to_string_pretty(&result)?);
    }
    emit(&render::render_listing(&result))?;
    emit(&render::render_rows(&result, columns))
}

fn run_ticks(args: &InputArgs) -> Result<()> {
    let loaded = Loaded::from_args(args)?;
    let result = loaded.layout(args)?;
    let Some(metrics) = &result.metrics else {
        log::warn!("no entities to lay out");
        return Ok(());
    };

    let plan = select_ticks(metrics, &loaded.config);
    if args.json {
        return emit(&serde_json::to_string_pretty(&plan)?);
    }
    emit(&render::render_ticks(&plan))
}

fn run_locate(args: &InputArgs, year: Option<f64>, x: Option<f64>) -> Result<()> {
    let query = Query::from_args(year, x).context("either --year or --x is required")?;
    let loaded = Loaded::from_args(args)?;
    let result = loaded.layout(args)?;
    let Some(metrics) = &result.metrics else {
        log::warn!("no entities to lay out");
        return Ok(());
    };

    let location = locate(metrics, query, loaded.params.viewport_width_px, &default_eras());
    if args.json {
        return emit(&serde_json::to_string_pretty(&location)?);
    }
    emit(&render::render_location(&location))
}
