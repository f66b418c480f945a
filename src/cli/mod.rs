//! Command-line parsing for the molecular line overlay tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the physics/synthesis code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::LinewidthUnit;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "spm",
    version,
    about = "Overlay synthetic molecular spectra on an observed spectrum"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Synthesize one trace per catalog, print a report, and optionally plot
    /// or export the overlay.
    Overlay(OverlayArgs),
    /// Launch the interactive TUI.
    ///
    /// Loads the same inputs as `spm overlay`, then lets you edit each
    /// molecule's parameters live; every edit re-synthesizes that trace.
    Tui(OverlayArgs),
    /// Generate a synthetic observed spectrum for demos and testing.
    Sample(SampleArgs),
    /// Download a transition catalog by its species tag.
    Fetch(FetchArgs),
}

/// Common options for overlaying (shared by `overlay` and `tui`).
#[derive(Debug, Parser, Clone)]
pub struct OverlayArgs {
    /// Observed spectrum file (tab-separated frequency/intensity).
    #[arg(short = 's', long)]
    pub spectrum: PathBuf,

    /// Transition catalog file(s); repeat for multiple molecules.
    #[arg(short = 'c', long = "catalog", required = true)]
    pub catalogs: Vec<PathBuf>,

    /// Initial column density for every molecule (cm^-2).
    #[arg(short = 'n', long)]
    pub density: Option<f64>,

    /// Initial excitation temperature for every molecule (K).
    #[arg(short = 't', long)]
    pub temperature: Option<f64>,

    /// Initial Gaussian linewidth (sigma) for every molecule.
    #[arg(short = 'w', long)]
    pub linewidth: Option<f64>,

    /// Unit of --linewidth.
    #[arg(long, value_enum, default_value_t = LinewidthUnit::KmPerS)]
    pub linewidth_unit: LinewidthUnit,

    /// Initial frequency offset for every molecule (MHz).
    #[arg(long)]
    pub offset: Option<f64>,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Show at most this many per-line warnings per input file.
    #[arg(long, default_value_t = 5)]
    pub max_warnings: usize,

    /// Export the assembled overlay (all series) to a JSON file.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,

    /// Print the overlay as JSON on stdout instead of the report.
    #[arg(long)]
    pub json: bool,
}

/// Options for generating a demo observed spectrum.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output file (tab-separated frequency/intensity).
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    /// Start of the frequency axis (MHz).
    #[arg(long, default_value_t = 99_000.0)]
    pub start: f64,

    /// End of the frequency axis (MHz).
    #[arg(long, default_value_t = 101_000.0)]
    pub end: f64,

    /// Number of samples.
    #[arg(long, default_value_t = 4000)]
    pub points: usize,

    /// Baseline noise standard deviation.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Number of synthetic emission features to inject.
    #[arg(long, default_value_t = 8)]
    pub lines: usize,

    /// Random seed (same seed, same spectrum).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Options for downloading a catalog.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Species tag, e.g. 18003 for water.
    #[arg(long)]
    pub tag: u32,

    /// Output path (defaults to c<tag>.cat in the working directory).
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,
}
