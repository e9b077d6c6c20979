//! Detect command: one hyperparameter combination for every configured country.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use oos_grid::Runner;
use oos_io::write_results;

use crate::cli::DetectArgs;
use crate::config::OosConfig;
use crate::convert;

/// Run the `[detect]` combination and write its table to `--output`.
pub fn run(args: DetectArgs) -> Result<()> {
    let _cmd = info_span!("detect").entered();
    let config = OosConfig::load(&args.config)?;

    if args.output.exists() {
        bail!("output already exists: {}", args.output.display());
    }

    let source = convert::build_source(&config.source)?;
    let combo = convert::build_combination(&config.detect, args.adm_level)?;
    let runner_cfg = convert::build_runner_config(&config.source, &config.grid, args.workers)?;
    let runner = Runner::new(runner_cfg).context("failed to build runner")?;

    info!(combination = %combo, "running detection");
    let result = runner
        .run_analysis(&source, &combo)
        .with_context(|| format!("detection failed for {combo}"))?;

    for failure in &result.failures {
        warn!(iso3 = %failure.iso3, pcode = %failure.pcode, reason = %failure.reason, "region skipped");
    }
    if result.n_regions == 0 {
        bail!("no region succeeded for {combo}");
    }

    write_results(&args.output, &result.records, runner.config().writer())
        .with_context(|| format!("failed to write results: {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        rows = result.records.len(),
        regions = result.n_regions,
        "results written"
    );
    println!(
        "{} regions ({} failed), {} out-of-season days written to {}",
        result.n_regions,
        result.failures.len(),
        result.records.iter().filter(|r| r.is_out_of_season).count(),
        args.output.display()
    );
    Ok(())
}
