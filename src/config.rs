use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level oosdetect configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OosConfig {
    /// Exposure data settings.
    #[serde(default)]
    pub source: SourceToml,

    /// Single-combination detector settings.
    #[serde(default)]
    pub detect: DetectToml,

    /// Grid search settings.
    #[serde(default)]
    pub grid: GridToml,

    /// BIC selection settings.
    #[serde(default)]
    pub select: SelectToml,
}

impl OosConfig {
    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceToml {
    /// Directory of `{iso3}.parquet` exposure files.
    pub input_dir: Option<PathBuf>,
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,
    #[serde(default = "default_data_label")]
    pub data_label: String,
}

impl Default for SourceToml {
    fn default() -> Self {
        Self {
            input_dir: None,
            countries: default_countries(),
            data_label: default_data_label(),
        }
    }
}

fn default_countries() -> Vec<String> {
    oos_grid::DEFAULT_COUNTRIES
        .iter()
        .map(|c| c.to_string())
        .collect()
}
fn default_data_label() -> String {
    "dev".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectToml {
    #[serde(default = "default_rolling_sum_days")]
    pub rolling_sum_days: u32,
    #[serde(default = "default_context_window_days")]
    pub context_window_days: u32,
    #[serde(default = "default_percentage_threshold")]
    pub percentage_threshold: f64,
    #[serde(default = "default_min_oos_run_length")]
    pub min_oos_run_length: u32,
    #[serde(default = "default_rolling_window")]
    pub rolling_window: String,
}

impl Default for DetectToml {
    fn default() -> Self {
        Self {
            rolling_sum_days: default_rolling_sum_days(),
            context_window_days: default_context_window_days(),
            percentage_threshold: default_percentage_threshold(),
            min_oos_run_length: default_min_oos_run_length(),
            rolling_window: default_rolling_window(),
        }
    }
}

fn default_rolling_sum_days() -> u32 {
    5
}
fn default_context_window_days() -> u32 {
    30
}
fn default_percentage_threshold() -> f64 {
    99.0
}
fn default_min_oos_run_length() -> u32 {
    30
}
fn default_rolling_window() -> String {
    "partial".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridToml {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_percentage_thresholds")]
    pub percentage_thresholds: Vec<f64>,
    #[serde(default = "default_context_windows")]
    pub context_window_days: Vec<u32>,
    #[serde(default = "default_adm_levels")]
    pub adm_levels: Vec<u8>,
    #[serde(default = "default_min_oos_run_lengths")]
    pub min_oos_run_lengths: Vec<u32>,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for GridToml {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            percentage_thresholds: default_percentage_thresholds(),
            context_window_days: default_context_windows(),
            adm_levels: default_adm_levels(),
            min_oos_run_lengths: default_min_oos_run_lengths(),
            max_workers: default_max_workers(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("grid_search_results")
}
fn default_percentage_thresholds() -> Vec<f64> {
    vec![95.0, 96.0, 97.0, 98.0, 99.0]
}
fn default_context_windows() -> Vec<u32> {
    vec![10, 15, 20, 25, 30]
}
fn default_adm_levels() -> Vec<u8> {
    vec![0, 1, 2]
}
fn default_min_oos_run_lengths() -> Vec<u32> {
    vec![15, 30]
}
fn default_max_workers() -> usize {
    4
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectToml {
    /// Only analyse rows with this rolling-sum length.
    #[serde(default)]
    pub rolling_sum_days: Option<u32>,
    #[serde(default = "default_top_regions")]
    pub top_regions: usize,
    #[serde(default = "default_select_output")]
    pub output: PathBuf,
}

impl Default for SelectToml {
    fn default() -> Self {
        Self {
            rolling_sum_days: None,
            top_regions: default_top_regions(),
            output: default_select_output(),
        }
    }
}

fn default_top_regions() -> usize {
    10
}
fn default_select_output() -> PathBuf {
    PathBuf::from("bic_recommendations.json")
}
