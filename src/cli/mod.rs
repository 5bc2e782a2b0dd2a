//! Command-line parsing for the MRC tools.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the parsing/comparison code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{LineGrammar, SizeAxis};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mrc", version, about = "Parse, compare, and plot cache miss rate curves")]
pub struct Cli {
    /// Layout of each MRC line.
    #[arg(long, value_enum, global = true, default_value_t = LineGrammar::Canonical)]
    pub grammar: LineGrammar,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a curve file as a table.
    Show(ShowArgs),
    /// Plot one or more curve files on a shared chart.
    Plot(PlotArgs),
    /// Mean absolute hit-ratio error between two curve files.
    Compare(CompareArgs),
    /// Per-client drift of snapshot curves over time.
    Drift(DriftArgs),
    /// List clients in a directory with their observation windows.
    Clients(ClientsArgs),
    /// Export a curve's plot series to CSV.
    Export(ExportArgs),
}

/// Chart options shared by `plot` and `drift --plot`.
#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Size dimension used for the x-axis.
    #[arg(long, value_enum, default_value_t = SizeAxis::Count)]
    pub axis: SizeAxis,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Log2 x-axis in terminal plots.
    #[arg(long)]
    pub log_x: bool,

    /// Write an SVG chart here instead of printing to the terminal.
    #[arg(long, value_name = "SVG")]
    pub svg: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// MRC text file, one point per line.
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct PlotArgs {
    /// MRC text files.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub chart: ChartArgs,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    pub a: PathBuf,
    pub b: PathBuf,
}

#[derive(Debug, Args)]
pub struct DriftArgs {
    /// Directory of per-client JSON files.
    pub dir: PathBuf,

    /// Only these clients (repeatable).
    #[arg(long = "client", value_name = "ID")]
    pub clients: Vec<String>,

    /// Pick this many random clients instead of all of them.
    #[arg(long, value_name = "K", conflicts_with = "clients")]
    pub sample: Option<usize>,

    /// Random seed for `--sample`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// With `--sample`, only pick clients observed for at least this many seconds.
    #[arg(long, default_value_t = 0)]
    pub min_span: u64,

    /// Also plot every client's snapshots.
    #[arg(long)]
    pub plot: bool,

    #[command(flatten)]
    pub chart: ChartArgs,
}

#[derive(Debug, Args)]
pub struct ClientsArgs {
    /// Directory of per-client JSON files.
    pub dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// MRC text file.
    pub file: PathBuf,

    /// Destination CSV.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    /// Size dimension used for the x column.
    #[arg(long, value_enum, default_value_t = SizeAxis::Count)]
    pub axis: SizeAxis,
}
