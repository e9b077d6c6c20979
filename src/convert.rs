//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, anyhow, bail};

use crate::config::*;

use oos_detect::RollingWindow;
use oos_grid::{Combination, GridSpec, RunnerConfig};
use oos_io::{AdmLevel, Compression, ParquetSource, WriterConfig};
use oos_select::SelectConfig;

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses a rolling-window policy name.
pub fn parse_rolling_window(s: &str) -> Result<RollingWindow> {
    match s.to_lowercase().as_str() {
        "partial" => Ok(RollingWindow::Partial),
        "full" => Ok(RollingWindow::Full),
        other => bail!("unknown rolling window policy: {other:?}"),
    }
}

/// Converts a numeric administrative level.
pub fn parse_adm_level(level: u8) -> Result<AdmLevel> {
    Ok(AdmLevel::try_from(level)?)
}

/// Converts a list of numeric administrative levels.
pub fn parse_adm_levels(levels: &[u8]) -> Result<Vec<AdmLevel>> {
    levels.iter().map(|&l| parse_adm_level(l)).collect()
}

/// Builds the exposure source from the `[source]` section.
pub fn build_source(source: &SourceToml) -> Result<ParquetSource> {
    let dir = source
        .input_dir
        .as_ref()
        .ok_or_else(|| anyhow!("no input directory: set [source].input_dir in config"))?;
    Ok(ParquetSource::new(dir))
}

/// Builds a [`WriterConfig`] from the `[grid]` section.
pub fn build_writer_config(grid: &GridToml) -> Result<WriterConfig> {
    let compression = parse_compression(&grid.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(grid.row_group_size))
}

/// Builds a [`RunnerConfig`]; `workers` overrides `[grid].max_workers`.
pub fn build_runner_config(
    source: &SourceToml,
    grid: &GridToml,
    workers: Option<usize>,
) -> Result<RunnerConfig> {
    Ok(RunnerConfig::default()
        .with_countries(source.countries.clone())
        .with_data_label(source.data_label.clone())
        .with_max_workers(workers.unwrap_or(grid.max_workers))
        .with_writer(build_writer_config(grid)?))
}

/// Builds the [`GridSpec`]. Rolling-sum length and policy come from `[detect]`.
pub fn build_grid_spec(grid: &GridToml, detect: &DetectToml) -> Result<GridSpec> {
    Ok(GridSpec::new()
        .with_percentage_thresholds(grid.percentage_thresholds.clone())
        .with_context_window_days(grid.context_window_days.clone())
        .with_adm_levels(parse_adm_levels(&grid.adm_levels)?)
        .with_min_oos_run_lengths(grid.min_oos_run_lengths.clone())
        .with_rolling_sum_days(detect.rolling_sum_days)
        .with_rolling_window(parse_rolling_window(&detect.rolling_window)?))
}

/// Builds the single [`Combination`] described by `[detect]`.
pub fn build_combination(detect: &DetectToml, adm_level: u8) -> Result<Combination> {
    Ok(Combination {
        adm_level: parse_adm_level(adm_level)?,
        min_oos_run_length: detect.min_oos_run_length,
        percentage_threshold: detect.percentage_threshold,
        context_window_days: detect.context_window_days,
        rolling_sum_days: detect.rolling_sum_days,
        rolling_window: parse_rolling_window(&detect.rolling_window)?,
    })
}

/// Builds a [`SelectConfig`] from the `[select]` section.
pub fn build_select_config(select: &SelectToml) -> SelectConfig {
    SelectConfig::new()
        .with_rolling_sum_days(select.rolling_sum_days)
        .with_top_regions(select.top_regions)
}
