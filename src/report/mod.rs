//! Comparative report assembly: turns grouped, smoothed tables and their
//! error summaries into the ordered structures a renderer draws.
//!
//! Nothing in here draws or picks colours; the viewer and the JSON export
//! both consume these types as-is.

pub mod construction;
pub mod filtering;
pub mod memory;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::data::filter::included_variants;
use crate::data::metrics::{ErrorProfile, ErrorSummary, MetricDimension};
use crate::data::model::{MemoryRecord, ResultTable, RunGroup, RunKey, Variant};
use crate::error::ReportError;

pub use construction::{assemble_construction, ConstructionSeries};
pub use filtering::{filter_table, FilterRow};
pub use memory::{assemble_memory_comparison, memory_table, MemoryComparison, MemoryPoint, MemoryRow};

/// Error summaries per run.
pub type MetricsMap = BTreeMap<RunKey, Vec<ErrorSummary>>;

// ---------------------------------------------------------------------------
// Query timing model
// ---------------------------------------------------------------------------

/// Mean timing along the quantile axis with a ±1 stdev band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingSeries {
    pub dimension: MetricDimension,
    pub x: Vec<f64>,
    pub mean: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantEntry {
    pub variant: Variant,
    pub label: String,
    pub source: String,
    pub series: Vec<TimingSeries>,
    pub errors: Vec<ErrorSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterGroup {
    pub parameter: u32,
    pub entries: Vec<VariantEntry>,
}

impl ParameterGroup {
    pub fn entry(&self, variant: Variant) -> Option<&VariantEntry> {
        self.entries.iter().find(|e| e.variant == variant)
    }
}

/// Groups ascending by parameter, entries in canonical variant order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportModel {
    pub groups: Vec<ParameterGroup>,
}

impl ReportModel {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn parameters(&self) -> Vec<u32> {
        self.groups.iter().map(|g| g.parameter).collect()
    }

    pub fn group(&self, parameter: u32) -> Option<&ParameterGroup> {
        self.groups.iter().find(|g| g.parameter == parameter)
    }
}

/// Timing series of one dimension, `None` when the table has no timings
/// for it. A missing `quantile` axis is an error.
pub fn timing_series(
    table: &ResultTable,
    dimension: MetricDimension,
) -> Result<Option<TimingSeries>, ReportError> {
    let mean_col = format!("{}_t_mean", dimension.name());
    let Some(mean) = table.column(&mean_col) else {
        return Ok(None);
    };
    let x = table.require("quantile")?;
    let stdev_col = format!("{}_t_stdev", dimension.name());
    let stdev = table.column(&stdev_col);

    let (lower, upper): (Vec<f64>, Vec<f64>) = mean
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            let s = stdev.map_or(0.0, |s| s[i]);
            (m - s, m + s)
        })
        .unzip();

    Ok(Some(TimingSeries {
        dimension,
        x: x.to_vec(),
        mean: mean.to_vec(),
        lower,
        upper,
    }))
}

fn variant_entry(key: RunKey, table: &ResultTable, metrics: &MetricsMap) -> VariantEntry {
    let series = MetricDimension::ALL
        .iter()
        .filter_map(|&dimension| match timing_series(table, dimension) {
            Ok(series) => series,
            Err(e) => {
                log::warn!("{}: no {} timings: {e}", table.filename, dimension.name());
                None
            }
        })
        .collect();

    VariantEntry {
        variant: key.variant,
        label: key.variant.label().to_string(),
        source: table.filename.clone(),
        series,
        errors: metrics.get(&key).cloned().unwrap_or_default(),
    }
}

/// Assemble the comparative model of `group`, leaving out `exclude`.
///
/// `group` is only borrowed, so a full pass and a zoomed pass can be built
/// from the same grouping back to back.
pub fn assemble(group: &RunGroup, metrics: &MetricsMap, exclude: &BTreeSet<Variant>) -> ReportModel {
    let variants = included_variants(exclude);
    let groups = group
        .iter()
        .map(|(&parameter, tables)| ParameterGroup {
            parameter,
            entries: variants
                .iter()
                .filter_map(|&variant| {
                    let table = tables.get(&variant)?;
                    Some(variant_entry(RunKey::new(variant, parameter), table, metrics))
                })
                .collect(),
        })
        .filter(|g| !g.entries.is_empty())
        .collect();
    ReportModel { groups }
}

// ---------------------------------------------------------------------------
// Whole-report bundle
// ---------------------------------------------------------------------------

/// Full and zoomed query views over the same grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryReport {
    pub window: usize,
    pub full: ReportModel,
    pub zoomed: ReportModel,
    pub zoom_exclude: BTreeSet<Variant>,
}

/// Real and estimated frequency of one distribution file along the
/// quantile axis, unsmoothed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionComparison {
    pub x: Vec<f64>,
    pub real: Vec<f64>,
    pub estimated: Vec<f64>,
}

impl DistributionComparison {
    /// Largest finite value of either curve.
    pub fn peak(&self) -> Option<f64> {
        self.real
            .iter()
            .chain(&self.estimated)
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }
}

pub fn distribution_comparison(table: &ResultTable) -> Result<DistributionComparison, ReportError> {
    let dimension = MetricDimension::Quantile;
    Ok(DistributionComparison {
        x: table.require("quantile")?.to_vec(),
        real: table.require(dimension.real_column())?.to_vec(),
        estimated: table.require(dimension.estimated_column())?.to_vec(),
    })
}

/// Pointwise error profiles of one distribution file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileErrorProfile {
    pub label: String,
    pub window: usize,
    pub memory: Option<MemoryRecord>,
    pub profiles: Vec<ErrorProfile>,
    pub comparison: Option<DistributionComparison>,
}

impl FileErrorProfile {
    /// `"total/unique"` element counts when the memory record has both.
    pub fn element_counts(&self) -> Option<String> {
        let memory = self.memory?;
        Some(format!("{}/{}", memory.elements?, memory.unique_elements?))
    }
}

/// Everything one invocation produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BenchmarkReport {
    pub queries: QueryReport,
    pub memory_comparison: MemoryComparison,
    pub error_profiles: Vec<FileErrorProfile>,
    pub construction: Vec<ConstructionSeries>,
    pub memory_table: Vec<MemoryRow>,
    pub filter_table: Vec<FilterRow>,
}

impl BenchmarkReport {
    pub fn is_empty(&self) -> bool {
        self.queries.full.is_empty()
            && self.memory_comparison.points.is_empty()
            && self.error_profiles.is_empty()
            && self.construction.is_empty()
            && self.memory_table.is_empty()
            && self.filter_table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::group::group;

    fn query_table(name: &str, means: &[f64]) -> ResultTable {
        let mut columns = BTreeMap::new();
        let n = means.len();
        columns.insert(
            "quantile".to_string(),
            (0..n).map(|i| i as f64 / n as f64).collect(),
        );
        columns.insert("quantile_t_mean".to_string(), means.to_vec());
        columns.insert("quantile_t_stdev".to_string(), vec![1.0; n]);
        columns.insert("rank_t_mean".to_string(), means.to_vec());
        ResultTable::new(name, columns).unwrap()
    }

    fn sample_group() -> RunGroup {
        group(vec![
            query_table("consultas_sketch_21.csv", &[5.0, 6.0]),
            query_table("consultas_plain_21.csv", &[50.0, 60.0]),
            query_table("consultas_compressed_21.csv", &[15.0, 16.0]),
            query_table("consultas_sketch_10.csv", &[4.0, 4.0]),
        ])
    }

    #[test]
    fn groups_ascending_and_variants_canonical() {
        let model = assemble(&sample_group(), &MetricsMap::new(), &BTreeSet::new());
        assert_eq!(model.parameters(), vec![10, 21]);
        let variants: Vec<Variant> = model.groups[1].entries.iter().map(|e| e.variant).collect();
        assert_eq!(variants, Variant::ALL.to_vec());
    }

    #[test]
    fn band_is_mean_plus_minus_stdev_and_missing_stdev_is_zero() {
        let model = assemble(&sample_group(), &MetricsMap::new(), &BTreeSet::new());
        let sketch = model.group(21).unwrap().entry(Variant::Sketch).unwrap();
        assert_eq!(sketch.series.len(), 2);
        let q = &sketch.series[0];
        assert_eq!(q.dimension, MetricDimension::Quantile);
        assert_eq!(q.lower, vec![4.0, 5.0]);
        assert_eq!(q.upper, vec![6.0, 7.0]);
        let r = &sketch.series[1];
        assert_eq!(r.lower, r.upper);
    }

    #[test]
    fn exclusion_does_not_leak_between_calls() {
        let g = sample_group();
        let exclude: BTreeSet<Variant> = [Variant::Plain].into_iter().collect();
        let zoomed = assemble(&g, &MetricsMap::new(), &exclude);
        assert!(zoomed.group(21).unwrap().entry(Variant::Plain).is_none());

        let full = assemble(&g, &MetricsMap::new(), &BTreeSet::new());
        assert!(full.group(21).unwrap().entry(Variant::Plain).is_some());
    }

    #[test]
    fn groups_emptied_by_exclusion_are_dropped() {
        let g = group(vec![query_table("consultas_plain_7.csv", &[1.0])]);
        let exclude: BTreeSet<Variant> = [Variant::Plain].into_iter().collect();
        assert!(assemble(&g, &MetricsMap::new(), &exclude).is_empty());
    }

    #[test]
    fn metrics_attach_by_run_key() {
        let mut metrics = MetricsMap::new();
        metrics.insert(
            RunKey::new(Variant::Sketch, 10),
            vec![ErrorSummary {
                label: "quantile".to_string(),
                absolute_error: 1.5,
                relative_error: 0.1,
            }],
        );
        let model = assemble(&sample_group(), &metrics, &BTreeSet::new());
        assert_eq!(model.group(10).unwrap().entries[0].errors.len(), 1);
        assert!(model.group(21).unwrap().entries[0].errors.is_empty());
    }

    #[test]
    fn table_without_quantile_axis_has_no_series() {
        let mut columns = BTreeMap::new();
        columns.insert("quantile_t_mean".to_string(), vec![1.0]);
        let table = ResultTable::new("consultas_sketch_3.csv", columns).unwrap();
        assert!(timing_series(&table, MetricDimension::Quantile).is_err());
        assert!(timing_series(&table, MetricDimension::Rank).unwrap().is_none());

        let model = assemble(&group(vec![table]), &MetricsMap::new(), &BTreeSet::new());
        assert!(model.groups[0].entries[0].series.is_empty());
    }

    #[test]
    fn element_counts_need_both_fields() {
        let mut profile = FileErrorProfile {
            label: "21mers".to_string(),
            window: 5,
            memory: None,
            profiles: Vec::new(),
            comparison: None,
        };
        assert_eq!(profile.element_counts(), None);
        profile.memory = Some(MemoryRecord {
            elements: Some(1000),
            unique_elements: Some(300),
            ..MemoryRecord::default()
        });
        assert_eq!(profile.element_counts().as_deref(), Some("1000/300"));
    }

    #[test]
    fn distribution_comparison_needs_the_quantile_pair() {
        let mut columns = BTreeMap::new();
        columns.insert("quantile".to_string(), vec![0.0, 1.0]);
        columns.insert("real_quantile".to_string(), vec![3.0, 9.0]);
        columns.insert("estimated_quantile".to_string(), vec![f64::NAN, 11.0]);
        let table = ResultTable::new("21mers_distribution.csv", columns.clone()).unwrap();
        let cmp = distribution_comparison(&table).unwrap();
        assert_eq!(cmp.real, vec![3.0, 9.0]);
        assert_eq!(cmp.peak(), Some(11.0));

        columns.remove("estimated_quantile");
        let table = ResultTable::new("21mers_distribution.csv", columns).unwrap();
        assert!(distribution_comparison(&table).is_err());
    }
}
