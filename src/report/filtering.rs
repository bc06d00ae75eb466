use serde::Serialize;

use crate::data::model::ResultTable;
use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Read-filtering results table
// ---------------------------------------------------------------------------

/// One filtering run: the quantile band kept, the frequency bounds it maps
/// to and how many k-mers were eliminated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterRow {
    pub k: u32,
    pub lower_quantile: f64,
    pub upper_quantile: f64,
    pub lower_bound: Option<u64>,
    pub upper_bound: Option<u64>,
    pub elements: Option<u64>,
    pub unique_eliminated: Option<u64>,
    pub eliminated: Option<u64>,
}

fn count(values: Option<&[f64]>, row: usize) -> Option<u64> {
    values
        .and_then(|v| v.get(row).copied())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u64)
}

/// Rows of a filtering results file, in file order.
///
/// `k`, `lower_quantile` and `upper_quantile` are required; the count
/// columns are optional. Rows whose `k` is not a non-negative integer are
/// skipped.
pub fn filter_table(table: &ResultTable) -> Result<Vec<FilterRow>, ReportError> {
    let k = table.require("k")?;
    let lower_quantile = table.require("lower_quantile")?;
    let upper_quantile = table.require("upper_quantile")?;
    let lower_bound = table.column("lower_bound");
    let upper_bound = table.column("upper_bound");
    let elements = table.column("elements");
    let unique_eliminated = table.column("unique_elim_e");
    let eliminated = table.column("elim_e");

    let rows = (0..table.len())
        .filter_map(|row| {
            let Some(k) = count(Some(k), row).and_then(|k| u32::try_from(k).ok()) else {
                log::warn!("{}: row {row} has no usable k, skipped", table.filename);
                return None;
            };
            Some(FilterRow {
                k,
                lower_quantile: lower_quantile[row],
                upper_quantile: upper_quantile[row],
                lower_bound: count(lower_bound, row),
                upper_bound: count(upper_bound, row),
                elements: count(elements, row),
                unique_eliminated: count(unique_eliminated, row),
                eliminated: count(eliminated, row),
            })
        })
        .collect();
    Ok(rows)
}
