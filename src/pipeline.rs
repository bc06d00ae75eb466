//! Discovery → load → group → smooth → metrics → assemble.
//!
//! Per-file problems are logged and the file is left out; only finding no
//! input at all stops a run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::ReportConfig;
use crate::data::filename::{detect_variant, extract_parameter};
use crate::data::group::group_paths;
use crate::data::loader::{discover, file_label, load_file, load_memory_record, memory_path_for};
use crate::data::metrics::{error_profile, table_errors, MetricDimension};
use crate::data::model::{RunGroup, RunKey, Variant};
use crate::data::smooth::smooth;
use crate::error::ReportError;
use crate::report::{
    assemble, assemble_construction, assemble_memory_comparison, distribution_comparison,
    filter_table, memory_table, BenchmarkReport, ConstructionSeries, FileErrorProfile, FilterRow,
    MemoryPoint, MemoryRow, MetricsMap, QueryReport,
};

/// Query-timing columns smoothed before display.
pub const QUERY_TIMING_COLUMNS: [&str; 4] = [
    "quantile_t_mean",
    "quantile_t_stdev",
    "rank_t_mean",
    "rank_t_stdev",
];

/// Input files of one run, sorted by name within each kind.
#[derive(Debug, Clone, Default)]
pub struct Discovered {
    pub queries: Vec<PathBuf>,
    pub distributions: Vec<PathBuf>,
    pub memories: Vec<PathBuf>,
    pub constructions: Vec<PathBuf>,
    pub filter_results: Option<PathBuf>,
}

impl Discovered {
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
            && self.distributions.is_empty()
            && self.memories.is_empty()
            && self.constructions.is_empty()
            && self.filter_results.is_none()
    }
}

/// A missing directory counts as "no files" with a warning.
fn discover_or_empty(dir: &Path, prefix: &str, suffix: &str) -> Vec<PathBuf> {
    match discover(dir, prefix, suffix) {
        Ok(paths) => paths,
        Err(e) => {
            log::warn!("{e:#}");
            Vec::new()
        }
    }
}

pub fn discover_inputs(config: &ReportConfig) -> Discovered {
    Discovered {
        queries: discover_or_empty(&config.experiments_dir, &config.query_prefix, ".csv"),
        distributions: discover_or_empty(&config.distribution_dir, "", &config.distribution_suffix),
        memories: discover_or_empty(&config.distribution_dir, "", &config.memory_suffix),
        constructions: discover_or_empty(
            &config.experiments_dir,
            &config.construction_prefix,
            ".csv",
        ),
        filter_results: Some(config.filter_results.clone()).filter(|path| {
            let found = path.is_file();
            if !found {
                log::debug!("no filtering results at {}", path.display());
            }
            found
        }),
    }
}

/// Smooth the timing columns of every grouped table.
pub fn smooth_group(group: &RunGroup, window: usize, centered: bool) -> RunGroup {
    let targets: BTreeSet<String> = QUERY_TIMING_COLUMNS.iter().map(|c| c.to_string()).collect();
    group
        .iter()
        .map(|(&k, tables)| {
            let smoothed = tables
                .iter()
                .map(|(&variant, table)| (variant, smooth(table, &targets, window, centered)))
                .collect();
            (k, smoothed)
        })
        .collect()
}

/// Run key of a distribution file. Distribution files usually carry only K;
/// their estimates come from the sketch.
fn distribution_key(filename: &str) -> Result<RunKey, ReportError> {
    let parameter = extract_parameter(filename)?;
    let variant = detect_variant(filename).unwrap_or(Variant::Sketch);
    Ok(RunKey::new(variant, parameter))
}

/// Error summaries, memory points and error profiles of the distribution
/// files.
pub fn distribution_reports(
    config: &ReportConfig,
    paths: &[PathBuf],
) -> (MetricsMap, Vec<MemoryPoint>, Vec<FileErrorProfile>) {
    let mut metrics = MetricsMap::new();
    let mut points = Vec::new();
    let mut profiles = Vec::new();
    let window = config.effective_error_window();

    for path in paths {
        let table = match load_file(path) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("skipping {}: {e:#}", path.display());
                continue;
            }
        };
        let label = file_label(path, "distribution.csv");
        let memory = load_memory_record(&memory_path_for(path));
        let errors = table_errors(&table);

        match distribution_key(&table.filename) {
            Ok(key) if !errors.is_empty() => {
                metrics.insert(key, errors.clone());
            }
            Ok(_) => {}
            Err(e) => log::warn!("{e}; errors of {} not linked to a run", table.filename),
        }

        let file_profiles: Vec<_> = MetricDimension::ALL
            .iter()
            .filter_map(|&dimension| error_profile(&table, dimension, window, config.centered).ok())
            .collect();
        if !file_profiles.is_empty() {
            profiles.push(FileErrorProfile {
                label: label.clone(),
                window,
                memory,
                profiles: file_profiles,
                comparison: distribution_comparison(&table).ok(),
            });
        }

        points.push(MemoryPoint {
            label,
            errors,
            memory,
        });
    }
    (metrics, points, profiles)
}

/// Load, group and smooth the query files, then assemble full and zoomed
/// views sharing `metrics`.
pub fn query_report(config: &ReportConfig, paths: &[PathBuf], metrics: &MetricsMap) -> QueryReport {
    let window = config.effective_query_window();
    let grouped = group_paths(paths);
    log::info!(
        "grouped {} query files into {} K values",
        paths.len(),
        grouped.len()
    );
    let smoothed = smooth_group(&grouped, window, config.centered);
    QueryReport {
        window,
        full: assemble(&smoothed, metrics, &BTreeSet::new()),
        zoomed: assemble(&smoothed, metrics, &config.zoom_exclude),
        zoom_exclude: config.zoom_exclude.clone(),
    }
}

fn construction_report(paths: &[PathBuf]) -> Vec<ConstructionSeries> {
    let tables = paths.iter().filter_map(|path| match load_file(path) {
        Ok(table) => Some(table),
        Err(e) => {
            log::warn!("skipping {}: {e:#}", path.display());
            None
        }
    });
    assemble_construction(tables)
}

fn memory_rows(paths: &[PathBuf]) -> Vec<MemoryRow> {
    let records = paths.iter().filter_map(|path| {
        let name = path.file_name()?.to_string_lossy().into_owned();
        let k = match extract_parameter(&name) {
            Ok(k) => k,
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                return None;
            }
        };
        Some((k, load_memory_record(path)?))
    });
    memory_table(records)
}

fn filter_rows(path: Option<&Path>) -> Vec<FilterRow> {
    let Some(path) = path else {
        return Vec::new();
    };
    let rows = load_file(path).and_then(|table| filter_table(&table).map_err(anyhow::Error::from));
    match rows {
        Ok(rows) => rows,
        Err(e) => {
            log::warn!("skipping {}: {e:#}", path.display());
            Vec::new()
        }
    }
}

/// Run the whole pipeline on already discovered inputs.
pub fn build_report_from(config: &ReportConfig, inputs: &Discovered) -> Result<BenchmarkReport> {
    if inputs.is_empty() {
        return Err(ReportError::empty(format!(
            "no result files in {} or {}, and no {}",
            config.experiments_dir.display(),
            config.distribution_dir.display(),
            config.filter_results.display()
        ))
        .into());
    }

    let (metrics, points, error_profiles) = distribution_reports(config, &inputs.distributions);
    let report = BenchmarkReport {
        queries: query_report(config, &inputs.queries, &metrics),
        memory_comparison: assemble_memory_comparison(points),
        error_profiles,
        construction: construction_report(&inputs.constructions),
        memory_table: memory_rows(&inputs.memories),
        filter_table: filter_rows(inputs.filter_results.as_deref()),
    };

    if report.is_empty() {
        log::warn!("result files were found but none of them could be used");
    }
    log::info!(
        "report: {} K groups, {} memory points, {} error profiles, {} construction series",
        report.queries.full.groups.len(),
        report.memory_comparison.points.len(),
        report.error_profiles.len(),
        report.construction.len()
    );
    Ok(report)
}

/// Discover inputs under the configured directories and build the report.
pub fn build_report(config: &ReportConfig) -> Result<BenchmarkReport> {
    let inputs = discover_inputs(config);
    build_report_from(config, &inputs)
}
