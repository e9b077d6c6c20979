//! Integration tests of the BIC model selector over persisted result files.

use std::collections::BTreeMap;
use std::path::Path;

use oos_grid::{GridSpec, Runner, RunnerConfig};
use oos_io::{
    AdmLevel, ExposureRow, MemorySource, OosRecord, ResultLayout, WriterConfig, write_results,
};
use oos_select::{
    SelectConfig, SelectError, analyze_grid_results, best_config_per_region, calculate_bic,
    combination_summaries, find_best_config, run_comprehensive_analysis,
};

const MONTH_DAYS: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// One result table row per calendar day of the leap-year axis.
///
/// Days with index in `run` are out of season with smoothed percentage
/// `100 - spread * (i % 3)`; every other day sits at 20 %.
fn region_table(
    pcode: &str,
    threshold: f64,
    win: u32,
    run: std::ops::Range<usize>,
    spread: f64,
) -> Vec<OosRecord> {
    let mut out = Vec::new();
    let mut i = 0;
    for (m, &days) in MONTH_DAYS.iter().enumerate() {
        for d in 1..=days {
            let oos = run.contains(&i);
            let pct = if oos { 100.0 - spread * (i % 3) as f64 } else { 20.0 };
            out.push(OosRecord {
                iso3: "ner".to_string(),
                adm_level: 1,
                pcode: pcode.to_string(),
                month_day: format!("{:02}-{d:02}", m + 1).parse().expect("label"),
                zero_pct: pct,
                context_zero_pct: pct,
                is_out_of_season_raw: oos,
                is_out_of_season: oos,
                rolling_sum_days: 5,
                context_window_days: win,
                percentage_threshold: threshold,
                min_oos_run_length: 15,
                data: "test".to_string(),
            });
            i += 1;
        }
    }
    out
}

fn write_combination(layout: &ResultLayout, threshold: f64, win: u32, tables: Vec<Vec<OosRecord>>) {
    let rows: Vec<OosRecord> = tables.into_iter().flatten().collect();
    let path = layout.combination_path(AdmLevel::Region, 15, threshold, win);
    write_results(&path, &rows, &WriterConfig::default()).expect("write results");
}

fn file_sizes(root: &Path) -> BTreeMap<String, u64> {
    let mut out = BTreeMap::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in std::fs::read_dir(&dir).expect("read dir") {
            let path = entry.expect("entry").path();
            if path.is_dir() {
                stack.push(path);
            } else {
                let size = std::fs::metadata(&path).expect("metadata").len();
                out.insert(path.display().to_string(), size);
            }
        }
    }
    out
}

#[test]
fn missing_pair_reports_directory() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let layout = ResultLayout::new(dir.path());
    let err = analyze_grid_results(&layout, AdmLevel::District, 30, &SelectConfig::new())
        .unwrap_err();
    assert_eq!(
        err,
        SelectError::MissingResults {
            dir: dir.path().join("adm2").join("length30")
        }
    );
}

#[test]
fn bic_grows_with_within_run_spread() {
    let flags: Vec<bool> = (0..60).map(|i| (10..50).contains(&i)).collect();
    let mut last = f64::NEG_INFINITY;
    for spread in [0.5, 1.0, 2.0, 4.0, 8.0] {
        let pct: Vec<f64> = (0..60).map(|i| 100.0 - spread * (i % 3) as f64).collect();
        let score = calculate_bic(&pct, &flags, 15);
        assert_eq!((score.k, score.n), (1, Some(40)));
        assert!(score.bic >= last, "spread {spread}: {} < {last}", score.bic);
        last = score.bic;
    }
}

#[test]
fn regions_without_runs_left_out_of_aggregates() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let layout = ResultLayout::new(dir.path());
    write_combination(
        &layout,
        95.0,
        10,
        vec![
            region_table("NE001", 95.0, 10, 30..80, 1.0),
            region_table("NE002", 95.0, 10, 0..0, 0.0),
        ],
    );

    let records =
        analyze_grid_results(&layout, AdmLevel::Region, 15, &SelectConfig::new()).expect("analyze");
    assert_eq!(records.len(), 2);
    let degenerate = records.iter().find(|r| r.pcode == "NE002").expect("NE002");
    assert_eq!(degenerate.k, 0);
    assert_eq!(degenerate.n, None);
    assert_eq!(degenerate.ss_w, None);
    assert_eq!(degenerate.bic, f64::INFINITY);

    let summary = &combination_summaries(&records)[0];
    assert_eq!(summary.n_regions, 2);
    assert_eq!(summary.n_degenerate, 1);
    assert!(summary.bic.mean.is_finite());

    let best = best_config_per_region(&records);
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].pcode, "NE001");

    let selection = find_best_config(&records, AdmLevel::Region, 15).expect("select");
    let ne001 = records.iter().find(|r| r.pcode == "NE001").expect("NE001");
    assert_eq!(selection.recommendation.median_bic, ne001.bic);
}

#[test]
fn homogeneous_runs_win() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let layout = ResultLayout::new(dir.path());
    for (threshold, spread) in [(95.0, 6.0), (99.0, 0.5)] {
        write_combination(
            &layout,
            threshold,
            20,
            vec![
                region_table("NE001", threshold, 20, 30..80, spread),
                region_table("NE002", threshold, 20, 200..260, spread),
            ],
        );
    }

    let records =
        analyze_grid_results(&layout, AdmLevel::Region, 15, &SelectConfig::new()).expect("analyze");
    assert_eq!(records.len(), 4);
    let selection = find_best_config(&records, AdmLevel::Region, 15).expect("select");
    assert_eq!(selection.recommendation.percentage_threshold, 99.0);
    assert_eq!(selection.recommendation.context_window_days, 20);
    assert_eq!(selection.recommendation.adm_level, 1);
    assert_eq!(selection.recommendation.length, 15);
}

#[test]
fn comprehensive_analysis_skips_missing_pairs() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let layout = ResultLayout::new(dir.path());
    write_combination(
        &layout,
        97.0,
        15,
        vec![region_table("NE001", 97.0, 15, 100..140, 1.0)],
    );

    let analysis = run_comprehensive_analysis(
        &layout,
        &[AdmLevel::Country, AdmLevel::Region],
        &[15],
        &SelectConfig::new(),
    )
    .expect("comprehensive analysis");
    assert_eq!(analysis.recommendations.len(), 1);
    assert_eq!(analysis.recommendations[0].adm_level, 1);
    assert_eq!(analysis.skipped.len(), 1);
    assert_eq!(analysis.skipped[0].adm_level, 0);
    assert!(analysis.skipped[0].reason.contains("no grid search results"));
    assert_eq!(analysis.reports.len(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&analysis.to_json().expect("json")).expect("parse json");
    assert_eq!(json["recommendations"][0]["percentage_threshold"], 97.0);
    let median = json["recommendations"][0]["median_BIC"].as_f64().expect("median_BIC");
    assert_eq!(median, analysis.recommendations[0].median_bic);
    assert!(json["recommendations"][0]["avg_BIC"].is_number());
    assert!(json["recommendations"][0].get("median_bic").is_none());
    assert_eq!(json["skipped"][0]["length"], 15);
    assert!(json.get("reports").is_none());
}

#[test]
fn pair_without_structure_is_skipped() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let layout = ResultLayout::new(dir.path());
    write_combination(
        &layout,
        99.0,
        10,
        vec![region_table("NE001", 99.0, 10, 0..0, 0.0)],
    );

    let analysis =
        run_comprehensive_analysis(&layout, &[AdmLevel::Region], &[15], &SelectConfig::new())
            .expect("comprehensive analysis");
    assert!(analysis.recommendations.is_empty());
    assert_eq!(analysis.skipped.len(), 1);
    assert!(analysis.skipped[0].reason.contains("no parameter combination"));
}

fn exposure_rows(pcode: &str, dry_months: &[u32]) -> Vec<ExposureRow> {
    let mut rows = Vec::new();
    for year in [2019, 2020, 2021] {
        for month in 1..=12u32 {
            let days = match month {
                2 if year == 2020 => 29,
                2 => 28,
                4 | 6 | 9 | 11 => 30,
                _ => 31,
            };
            for day in 1..=days {
                let value = if dry_months.contains(&month) { 0.0 } else { 10.0 };
                rows.push(ExposureRow::new(pcode, 1, format!("{year}-{month:02}-{day:02}"), value));
            }
        }
    }
    rows
}

#[test]
fn selects_from_grid_output_without_writing() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let layout = ResultLayout::new(dir.path());
    let mut rows = exposure_rows("NE001", &[1, 2, 3]);
    rows.extend(exposure_rows("NE002", &[11, 12]));
    let source = MemorySource::new().with_country("ner", rows.into_iter().collect());

    let spec = GridSpec::new()
        .with_percentage_thresholds(vec![95.0, 99.0])
        .with_context_window_days(vec![10, 20])
        .with_adm_levels(vec![AdmLevel::Region])
        .with_min_oos_run_lengths(vec![15]);
    let runner = Runner::new(RunnerConfig::default().with_countries(vec!["ner".to_string()]))
        .expect("build runner");
    let summary = runner.run_grid(&source, &layout, &spec).expect("run grid");
    assert_eq!(summary.computed, 4);

    let before = file_sizes(dir.path());
    let analysis =
        run_comprehensive_analysis(&layout, &[AdmLevel::Region], &[15], &SelectConfig::new())
            .expect("comprehensive analysis");
    assert_eq!(file_sizes(dir.path()), before);

    assert_eq!(analysis.recommendations.len(), 1);
    let report = &analysis.reports[0];
    assert_eq!(report.n_records, 2 * 4);
    assert_eq!(report.best_per_region.len(), 2);
    assert!(report.render_report().contains("Recommended configuration"));
}
