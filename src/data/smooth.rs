//! Moving-average noise reduction for measurement columns.

use std::collections::BTreeSet;

use super::model::ResultTable;

/// Index range `[start, end)` averaged for output position `i`.
fn window_bounds(i: usize, len: usize, window: usize, centered: bool) -> (usize, usize) {
    let offset = if centered { (window - 1) / 2 } else { 0 };
    let end = (i + 1 + offset).min(len);
    let start = (i + 1 + offset).saturating_sub(window);
    (start, end)
}

/// Rolling mean over `values` with a shrinking window at the edges.
///
/// NaN entries are ignored; a window without any finite entry yields NaN.
/// `window <= 1` returns the input unchanged.
pub fn smooth_series(values: &[f64], window: usize, centered: bool) -> Vec<f64> {
    if window <= 1 {
        return values.to_vec();
    }
    (0..values.len())
        .map(|i| {
            let (start, end) = window_bounds(i, values.len(), window, centered);
            let (sum, count) = values[start..end]
                .iter()
                .filter(|v| !v.is_nan())
                .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        })
        .collect()
}

/// Return a copy of `table` with every column in `targets` smoothed.
///
/// Targets that the table does not have are skipped silently. The input
/// table is left untouched.
pub fn smooth(
    table: &ResultTable,
    targets: &BTreeSet<String>,
    window: usize,
    centered: bool,
) -> ResultTable {
    let mut out = table.clone();
    if window <= 1 {
        return out;
    }
    for name in targets {
        let Some(values) = table.column(name) else {
            continue;
        };
        let smoothed = smooth_series(values, window, centered);
        // Same length by construction.
        if let Err(e) = out.replace_column(name, smoothed) {
            log::error!("smoothing {}: {e}", table.filename);
        }
    }
    out
}
