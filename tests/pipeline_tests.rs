use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use kmer_bench_viewer::data::group::group_paths;
use kmer_bench_viewer::data::loader::discover;
use kmer_bench_viewer::data::model::Variant;
use kmer_bench_viewer::pipeline::{build_report, smooth_group};
use kmer_bench_viewer::report::{assemble, MetricsMap};
use kmer_bench_viewer::{ReportConfig, ReportError};

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn query_csv(scale: f64) -> String {
    let mut s = String::from("quantile, quantile_t_mean, quantile_t_stdev, rank_t_mean, rank_t_stdev\n");
    for i in 0..5 {
        let q = i as f64 / 4.0;
        s.push_str(&format!("{q}, {}, 1, {}, 2\n", scale * (1.0 + q), scale * (2.0 - q)));
    }
    s
}

const DISTRIBUTION: &str = "quantile,real_quantile,estimated_quantile,real_rank,estimated_rank\n\
0.0,0,1,0,0\n\
0.5,4,5,50,45\n\
1.0,8,6,100,100\n";

fn config_for(root: &Path) -> ReportConfig {
    let experiments = root.join("experiments");
    let distributions = root.join("dist");
    fs::create_dir_all(&experiments).unwrap();
    fs::create_dir_all(&distributions).unwrap();
    ReportConfig {
        experiments_dir: experiments,
        distribution_dir: distributions,
        filter_results: root.join("filtrado").join("resultados_filtro_genomas.csv"),
        query_window: 3,
        error_window: 1,
        ..ReportConfig::default()
    }
}

fn populate(config: &ReportConfig) {
    let e = &config.experiments_dir;
    write(e, "consultas_sketch_k21.csv", &query_csv(10.0));
    write(e, "consultas_plain_v_k21.csv", &query_csv(100.0));
    write(e, "consultas_compressed_v_k21.csv", &query_csv(30.0));
    write(e, "consultas_sketch_k11.csv", &query_csv(8.0));
    write(e, "consultas_unknown_k11.csv", &query_csv(1.0));
    write(e, "consultas_plain_broken_k31.csv", "quantile,quantile_t_mean\n0.1\n");
    write(e, "construccion_sketch.csv", "n,t_mean,t_stdev\n11,1000000000,0\n21,2000000000,0\n");

    let d = &config.distribution_dir;
    write(d, "21mers_distribution.csv", DISTRIBUTION);
    write(
        d,
        "21mers_memory.csv",
        "elements,unique_elements,sketch_memory,vector_memory,compressed_vector_memory\n100,40,2048,320,100\n",
    );
    write(d, "11mers_distribution.csv", DISTRIBUTION);
}

#[test]
fn full_pipeline_groups_smooths_and_links_errors() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    populate(&config);

    let report = build_report(&config).unwrap();

    // Unknown tag and the malformed file are skipped, the rest grouped by K.
    assert_eq!(report.queries.full.parameters(), vec![11, 21]);
    let k21 = report.queries.full.group(21).unwrap();
    let variants: Vec<Variant> = k21.entries.iter().map(|e| e.variant).collect();
    assert_eq!(variants, Variant::ALL.to_vec());

    // Zoomed view hides plain only.
    let zoomed = report.queries.zoomed.group(21).unwrap();
    assert!(zoomed.entry(Variant::Plain).is_none());
    assert!(zoomed.entry(Variant::Compressed).is_some());

    // Smoothed with window 3: first mean averages rows 0 and 1.
    let sketch = k21.entry(Variant::Sketch).unwrap();
    let expected = (10.0 * 1.0 + 10.0 * 1.25) / 2.0;
    assert!((sketch.series[0].mean[0] - expected).abs() < 1e-9);
    assert_eq!(sketch.series[0].mean.len(), 5);

    // Distribution errors attach to the sketch run with the same K.
    assert_eq!(sketch.errors.len(), 2);
    assert!(k21.entry(Variant::Plain).unwrap().errors.is_empty());

    // 21mers has a memory record, 11mers does not but keeps its errors.
    let labels: Vec<&str> = report
        .memory_comparison
        .points
        .iter()
        .map(|p| p.label.as_str())
        .collect();
    assert_eq!(labels, vec!["21mers", "11mers"]);
    assert_eq!(report.memory_comparison.points[0].sketch_memory(), Some(2048));
    assert!(report.memory_comparison.points[1].memory.is_none());

    assert_eq!(report.error_profiles.len(), 2);
    assert_eq!(report.construction.len(), 1);
    assert_eq!(report.construction[0].mean_seconds, vec![1.0, 2.0]);
    assert_eq!(report.memory_table.len(), 1);
    assert_eq!(report.memory_table[0].k, 21);
    assert_eq!(report.memory_table[0].sketch_kb, Some(2.0));
}

#[test]
fn repeated_runs_serialize_identically() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    populate(&config);

    let first = serde_json::to_string(&build_report(&config).unwrap()).unwrap();
    let second = serde_json::to_string(&build_report(&config).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn group_then_assemble_is_deterministic_and_exclusion_is_per_call() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    populate(&config);

    let paths = discover(&config.experiments_dir, "consultas", ".csv").unwrap();
    let grouped = smooth_group(&group_paths(&paths), 3, true);
    let plain: BTreeSet<Variant> = [Variant::Plain].into_iter().collect();
    let none = BTreeSet::new();

    let zoomed = assemble(&grouped, &MetricsMap::new(), &plain);
    let full = assemble(&grouped, &MetricsMap::new(), &none);
    let full_again = assemble(&grouped, &MetricsMap::new(), &none);

    assert!(zoomed
        .groups
        .iter()
        .all(|g| g.entry(Variant::Plain).is_none()));
    assert!(full.group(21).unwrap().entry(Variant::Plain).is_some());
    assert_eq!(
        serde_json::to_string(&full).unwrap(),
        serde_json::to_string(&full_again).unwrap()
    );
}

#[test]
fn empty_directories_are_a_nothing_to_do_condition() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());

    let err = build_report(&config).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReportError>(),
        Some(ReportError::EmptyInput(_))
    ));
}

#[test]
fn missing_directories_behave_like_empty_ones() {
    let dir = tempfile::tempdir().unwrap();
    let config = ReportConfig {
        experiments_dir: dir.path().join("nope"),
        distribution_dir: dir.path().join("nope_either"),
        filter_results: dir.path().join("no_filter.csv"),
        ..ReportConfig::default()
    };
    assert!(build_report(&config).is_err());
}

#[test]
fn smoothing_disabled_keeps_raw_values() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path());
    config.smoothing_enabled = false;
    populate(&config);

    let report = build_report(&config).unwrap();
    assert_eq!(report.queries.window, 1);
    let sketch = report
        .queries
        .full
        .group(21)
        .unwrap()
        .entry(Variant::Sketch)
        .unwrap();
    assert_eq!(sketch.series[0].mean[0], 10.0);
}

#[test]
fn distribution_without_rank_columns_keeps_quantile_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    write(
        &config.distribution_dir,
        "15mers_distribution.csv",
        "quantile,real_quantile,estimated_quantile\n0.5,0,3\n1.0,10,5\n",
    );

    let report = build_report(&config).unwrap();
    let point = &report.memory_comparison.points[0];
    assert_eq!(point.errors.len(), 1);
    assert_eq!(point.errors[0].absolute_error, 4.0);
    assert_eq!(point.errors[0].relative_error, 0.5);
    assert!(report.queries.full.is_empty());
}

#[test]
fn distribution_curves_and_filter_table_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    populate(&config);
    fs::create_dir_all(config.filter_results.parent().unwrap()).unwrap();
    fs::write(
        &config.filter_results,
        "k,lower_quantile,upper_quantile,lower_bound,upper_bound,elements,unique_elim_e,elim_e\n\
31,0.05,0.95,2,71,1550000000,372000000,465000000\n\
21,0.1,0.9,3,61,1050000000,252000000,315000000\n",
    )
    .unwrap();

    let report = build_report(&config).unwrap();

    let profile = &report.error_profiles[0];
    let comparison = profile.comparison.as_ref().unwrap();
    assert_eq!(comparison.x, vec![0.0, 0.5, 1.0]);
    assert_eq!(comparison.real, vec![0.0, 4.0, 8.0]);
    assert_eq!(comparison.estimated, vec![1.0, 5.0, 6.0]);

    let ks: Vec<u32> = report.filter_table.iter().map(|r| r.k).collect();
    assert_eq!(ks, vec![31, 21]);
    assert_eq!(report.filter_table[1].eliminated, Some(315_000_000));
}

#[test]
fn filter_results_alone_are_enough_for_a_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    fs::create_dir_all(config.filter_results.parent().unwrap()).unwrap();
    fs::write(
        &config.filter_results,
        "k,lower_quantile,upper_quantile\n21,0.1,0.9\n",
    )
    .unwrap();

    let report = build_report(&config).unwrap();
    assert_eq!(report.filter_table.len(), 1);
    assert_eq!(report.filter_table[0].elements, None);
    assert!(!report.is_empty());
}

#[test]
fn blank_distribution_cells_do_not_poison_the_memory_comparison() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    write(
        &config.distribution_dir,
        "13mers_distribution.csv",
        "quantile,real_quantile,estimated_quantile\n0.0,2,3\n0.5,,5\n1.0,8,6\n",
    );

    let report = build_report(&config).unwrap();
    let errors = &report.memory_comparison.points[0].errors;
    assert_eq!(errors[0].absolute_error, 1.5);
    assert!((errors[0].relative_error - 0.375).abs() < 1e-12);
    assert!(serde_json::to_string(&report).unwrap().contains("\"absolute_error\":1.5"));
}
