use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Out-of-season flood-extent detection.
#[derive(Parser)]
#[command(
    name = "oosdetect",
    version,
    about = "Out-of-season flood-extent detection and BIC-based hyperparameter selection"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Run the resumable hyperparameter grid search.
    Grid(GridArgs),
    /// Run one hyperparameter combination and write its table.
    Detect(DetectArgs),
    /// Score grid-search results with BIC and recommend parameters.
    Select(SelectArgs),
}

/// Arguments for the `grid` subcommand.
#[derive(clap::Args)]
pub struct GridArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "oosdetect.toml")]
    pub config: PathBuf,

    /// Override the result directory from config.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Override the worker count from config.
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Arguments for the `detect` subcommand.
#[derive(clap::Args)]
pub struct DetectArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "oosdetect.toml")]
    pub config: PathBuf,

    /// Administrative level of the regions (0, 1 or 2).
    #[arg(short, long, default_value_t = 1)]
    pub adm_level: u8,

    /// Output Parquet path; must not exist.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Override the worker count from config.
    #[arg(short, long)]
    pub workers: Option<usize>,
}

/// Arguments for the `select` subcommand.
#[derive(clap::Args)]
pub struct SelectArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "oosdetect.toml")]
    pub config: PathBuf,

    /// Override the result directory from config.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Override the recommendations JSON path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the text report of every analysed pair.
    #[arg(long)]
    pub report: bool,
}
