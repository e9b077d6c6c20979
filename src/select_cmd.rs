//! Select command: BIC analysis of persisted grid-search results.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use oos_io::ResultLayout;
use oos_select::run_comprehensive_analysis;

use crate::cli::SelectArgs;
use crate::config::OosConfig;
use crate::convert;

/// Recommend one (threshold, window) per configured (adm level, length) pair.
pub fn run(args: SelectArgs) -> Result<()> {
    let _cmd = info_span!("select").entered();
    let config = OosConfig::load(&args.config)?;

    let adm_levels = convert::parse_adm_levels(&config.grid.adm_levels)?;
    let select_cfg = convert::build_select_config(&config.select);
    let output_dir = args.output_dir.unwrap_or(config.grid.output_dir);
    let layout = ResultLayout::new(&output_dir);

    info!(results = %output_dir.display(), "running BIC analysis");
    let analysis = run_comprehensive_analysis(
        &layout,
        &adm_levels,
        &config.grid.min_oos_run_lengths,
        &select_cfg,
    )
    .context("BIC analysis failed")?;

    if args.report {
        for report in &analysis.reports {
            println!("{}", report.render_report());
        }
    }

    for skipped in &analysis.skipped {
        println!(
            "adm{} length{}: skipped ({})",
            skipped.adm_level, skipped.length, skipped.reason
        );
    }
    for rec in &analysis.recommendations {
        println!(
            "adm{} length{}: pct {} win {} (median BIC {:.2})",
            rec.adm_level,
            rec.length,
            oos_io::format_threshold(rec.percentage_threshold),
            rec.context_window_days,
            rec.median_bic
        );
    }

    let json = analysis.to_json()?;
    let path = args.output.unwrap_or(config.select.output);
    std::fs::write(&path, &json)
        .with_context(|| format!("failed to write recommendations: {}", path.display()))?;
    info!(path = %path.display(), "recommendations written");

    if analysis.recommendations.is_empty() {
        bail!("no (adm level, length) pair produced a recommendation");
    }
    Ok(())
}
