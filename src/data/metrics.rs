use serde::Serialize;

use super::model::ResultTable;
use super::smooth::smooth_series;
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// ErrorSummary – MAE / MRE of one dimension
// ---------------------------------------------------------------------------

/// Mean absolute and mean relative error of one estimated series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSummary {
    pub label: String,
    pub absolute_error: f64,
    pub relative_error: f64,
}

/// Pointwise errors. Relative error is 0 wherever the real value is 0; a
/// blank (NaN) input stays NaN so smoothing skips it.
fn pointwise(real: &[f64], estimated: &[f64]) -> (Vec<f64>, Vec<f64>) {
    real.iter()
        .zip(estimated)
        .map(|(&r, &e)| {
            let abs = (r - e).abs();
            let rel = if r != 0.0 { abs / r.abs() } else { 0.0 };
            (abs, rel)
        })
        .unzip()
}

fn check_dimensions(real: &[f64], estimated: &[f64]) -> Result<(), ReportError> {
    if real.len() != estimated.len() {
        return Err(ReportError::DimensionMismatch {
            real: real.len(),
            estimated: estimated.len(),
        });
    }
    if real.is_empty() {
        return Err(ReportError::empty("no observations to compare"));
    }
    Ok(())
}

/// Compute MAE over every index and MRE over the indices with a non-zero
/// real value (0 when there are none). The relative denominator is `|real|`
/// so the result is never negative.
///
/// Pairs where either side is NaN (a blank cell) are left out of both
/// means; if nothing is left the input counts as empty.
pub fn compute_errors(
    label: impl Into<String>,
    real: &[f64],
    estimated: &[f64],
) -> Result<ErrorSummary, ReportError> {
    check_dimensions(real, estimated)?;

    let pairs: Vec<(f64, f64)> = real
        .iter()
        .zip(estimated)
        .map(|(&r, &e)| (r, e))
        .filter(|(r, e)| !r.is_nan() && !e.is_nan())
        .collect();
    if pairs.is_empty() {
        return Err(ReportError::empty("every observation pair has a blank value"));
    }

    let absolute_error =
        pairs.iter().map(|(r, e)| (r - e).abs()).sum::<f64>() / pairs.len() as f64;

    let (rel_sum, rel_count) = pairs
        .iter()
        .filter(|(r, _)| *r != 0.0)
        .fold((0.0, 0usize), |(sum, n), (r, e)| (sum + (r - e).abs() / r.abs(), n + 1));
    let relative_error = if rel_count == 0 {
        0.0
    } else {
        rel_sum / rel_count as f64
    };

    Ok(ErrorSummary {
        label: label.into(),
        absolute_error,
        relative_error,
    })
}

// ---------------------------------------------------------------------------
// Metric dimensions of a distribution file
// ---------------------------------------------------------------------------

/// What a distribution file estimates: frequency at a quantile, or rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricDimension {
    Quantile,
    Rank,
}

impl MetricDimension {
    pub const ALL: [MetricDimension; 2] = [MetricDimension::Quantile, MetricDimension::Rank];

    pub fn name(self) -> &'static str {
        match self {
            MetricDimension::Quantile => "quantile",
            MetricDimension::Rank => "rank",
        }
    }

    pub fn real_column(self) -> &'static str {
        match self {
            MetricDimension::Quantile => "real_quantile",
            MetricDimension::Rank => "real_rank",
        }
    }

    pub fn estimated_column(self) -> &'static str {
        match self {
            MetricDimension::Quantile => "estimated_quantile",
            MetricDimension::Rank => "estimated_rank",
        }
    }
}

/// Error summary of one dimension of `table`.
pub fn dimension_errors(
    table: &ResultTable,
    dimension: MetricDimension,
) -> Result<ErrorSummary, ReportError> {
    let real = table.require(dimension.real_column())?;
    let estimated = table.require(dimension.estimated_column())?;
    compute_errors(dimension.name(), real, estimated)
}

/// Error summaries for every dimension `table` can provide.
///
/// A dimension whose columns are missing or empty is logged and left out;
/// the other dimension is still computed.
pub fn table_errors(table: &ResultTable) -> Vec<ErrorSummary> {
    MetricDimension::ALL
        .iter()
        .filter_map(|&dimension| match dimension_errors(table, dimension) {
            Ok(summary) => Some(summary),
            Err(e) => {
                log::warn!("skipping {} error of {}: {e}", dimension.name(), table.filename);
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// ErrorProfile – pointwise errors along the quantile axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorProfile {
    pub dimension: MetricDimension,
    /// The `quantile` column of the source table.
    pub x: Vec<f64>,
    pub absolute: Vec<f64>,
    pub relative: Vec<f64>,
}

/// Pointwise absolute/relative error of one dimension, smoothed with
/// `window` (no smoothing when `window <= 1`).
pub fn error_profile(
    table: &ResultTable,
    dimension: MetricDimension,
    window: usize,
    centered: bool,
) -> Result<ErrorProfile, ReportError> {
    let x = table.require("quantile")?;
    let real = table.require(dimension.real_column())?;
    let estimated = table.require(dimension.estimated_column())?;
    check_dimensions(real, estimated)?;

    let (absolute, relative) = pointwise(real, estimated);
    Ok(ErrorProfile {
        dimension,
        x: x.to_vec(),
        absolute: smooth_series(&absolute, window, centered),
        relative: smooth_series(&relative, window, centered),
    })
}
