//! Grid command: resumable hyperparameter grid search.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use oos_grid::Runner;
use oos_io::ResultLayout;

use crate::cli::GridArgs;
use crate::config::OosConfig;
use crate::convert;

/// Run every combination of the configured grid that has no result file yet.
pub fn run(args: GridArgs) -> Result<()> {
    let _cmd = info_span!("grid").entered();
    let config = OosConfig::load(&args.config)?;

    let source = convert::build_source(&config.source)?;
    let spec = convert::build_grid_spec(&config.grid, &config.detect)?;
    let runner_cfg = convert::build_runner_config(&config.source, &config.grid, args.workers)?;
    let output_dir = args.output_dir.unwrap_or(config.grid.output_dir);
    let layout = ResultLayout::new(&output_dir);

    info!(
        input = %source.input_dir().display(),
        output = %output_dir.display(),
        countries = runner_cfg.countries().len(),
        workers = runner_cfg.max_workers(),
        "starting grid search"
    );

    let runner = Runner::new(runner_cfg).context("failed to build grid runner")?;
    let summary = runner
        .run_grid(&source, &layout, &spec)
        .context("invalid grid definition")?;

    println!(
        "{} combinations: {} computed, {} skipped, {} failed ({} region failures)",
        summary.total, summary.computed, summary.skipped, summary.failed, summary.region_failures
    );
    if summary.failed > 0 {
        bail!(
            "{} of {} combinations failed; rerun to retry them",
            summary.failed,
            summary.total
        );
    }
    Ok(())
}
