//! Command-line interface for the salmon occurrence database tooling.
#![forbid(unsafe_code)]

mod error;

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use log::info;

use salmon_ingest::{
    FeatureSource, FieldMapping, IngestOptions, IngestReport, ShapefileSource, ingest_regions,
};
use salmon_schema::{RegionKind, SqliteRegionStore};

pub use error::CliError;

/// Top-level argument parser for the `salmon` binary.
#[derive(Debug, Parser)]
#[command(
    name = "salmon",
    about = "Loaders for the salmon occurrence database",
    version
)]
pub struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the `salmon` binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add or update regions from a shapefile.
    Ingest(IngestArgs),
}

/// Arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Args)]
pub struct IngestArgs {
    /// Shapefile with the regions to be added
    #[arg(value_name = "shapefile")]
    pub shapefile: PathBuf,
    /// YAML file with correspondences between attributes
    #[arg(value_name = "mapping")]
    pub mapping: PathBuf,
    /// The kind of region held in the shapefile
    #[arg(value_name = "kind", value_parser = parse_kind)]
    pub kind: RegionKind,
    /// SQLite database receiving the regions
    #[arg(value_name = "database")]
    pub database: PathBuf,
    /// Dry run to check data format and database connection
    #[arg(short = 'd', long)]
    pub dry: bool,
}

fn parse_kind(value: &str) -> Result<RegionKind, String> {
    RegionKind::from_str(value).map_err(|error| error.to_string())
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Ingest(args) => run_ingest(&args).map(|_| ()),
    }
}

/// Execute the `ingest` subcommand and return its report.
///
/// The database is opened only after the mapping resolves against the
/// shapefile's attributes, so configuration failures leave no database
/// file behind. Dry runs open the database read-only and never create it.
pub fn run_ingest(args: &IngestArgs) -> Result<IngestReport, CliError> {
    if args.dry {
        info!("Dry Run");
    } else {
        info!("Adding Regions");
    }

    info!("Loading mapping file");
    let mapping = FieldMapping::from_yaml_file(&args.mapping)?;

    info!("Loading shapefile");
    let mut source = ShapefileSource::open(&args.shapefile)?;

    ingest_from_source(&mut source, &mapping, args)
}

fn ingest_from_source<S: FeatureSource>(
    source: &mut S,
    mapping: &FieldMapping,
    args: &IngestArgs,
) -> Result<IngestReport, CliError> {
    let fields = mapping.resolve(source.field_names())?;

    let mut store = if args.dry {
        SqliteRegionStore::open_read_only(&args.database)?
    } else {
        SqliteRegionStore::open(&args.database)?
    };
    let options = IngestOptions {
        kind: args.kind,
        dry_run: args.dry,
    };
    let report = ingest_regions(source, &fields, &mut store, options)?;
    Ok(report)
}
