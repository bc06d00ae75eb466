use std::cmp::Ordering;

use serde::Serialize;

use crate::data::metrics::{ErrorSummary, MetricDimension};
use crate::data::model::MemoryRecord;

// ---------------------------------------------------------------------------
// Error vs memory
// ---------------------------------------------------------------------------

/// One distribution file: its errors and, when known, its memory footprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryPoint {
    pub label: String,
    pub errors: Vec<ErrorSummary>,
    pub memory: Option<MemoryRecord>,
}

impl MemoryPoint {
    pub fn error(&self, dimension: MetricDimension) -> Option<&ErrorSummary> {
        self.errors.iter().find(|e| e.label == dimension.name())
    }

    /// Sketch memory in bytes, the x axis of the comparison.
    pub fn sketch_memory(&self) -> Option<u64> {
        self.memory.and_then(|m| m.sketch_memory)
    }
}

/// Points with a sketch memory figure come first, ascending by it; the rest
/// follow by label and carry only their error values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryComparison {
    pub points: Vec<MemoryPoint>,
}

impl MemoryComparison {
    /// Points that can be placed on a memory axis.
    pub fn with_memory(&self) -> impl Iterator<Item = &MemoryPoint> {
        self.points.iter().filter(|p| p.sketch_memory().is_some())
    }
}

fn point_order(a: &MemoryPoint, b: &MemoryPoint) -> Ordering {
    match (a.sketch_memory(), b.sketch_memory()) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.label.cmp(&b.label)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.label.cmp(&b.label),
    }
}

pub fn assemble_memory_comparison(points: impl IntoIterator<Item = MemoryPoint>) -> MemoryComparison {
    let mut points: Vec<MemoryPoint> = points
        .into_iter()
        .filter(|p| {
            if p.errors.is_empty() {
                log::warn!("{}: no error summaries, left out of the memory comparison", p.label);
            }
            !p.errors.is_empty()
        })
        .collect();
    points.sort_by(point_order);
    MemoryComparison { points }
}

// ---------------------------------------------------------------------------
// Memory summary table
// ---------------------------------------------------------------------------

/// One row of the per-K memory table, sizes in KiB.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryRow {
    pub k: u32,
    pub elements: Option<u64>,
    pub unique_elements: Option<u64>,
    pub sketch_kb: Option<f64>,
    pub vector_kb: Option<f64>,
    pub compressed_kb: Option<f64>,
}

fn kib(bytes: Option<u64>) -> Option<f64> {
    bytes.map(|b| (b as f64 / 1024.0 * 100.0).round() / 100.0)
}

/// Rows sorted by K.
pub fn memory_table(records: impl IntoIterator<Item = (u32, MemoryRecord)>) -> Vec<MemoryRow> {
    let mut rows: Vec<MemoryRow> = records
        .into_iter()
        .map(|(k, rec)| MemoryRow {
            k,
            elements: rec.elements,
            unique_elements: rec.unique_elements,
            sketch_kb: kib(rec.sketch_memory),
            vector_kb: kib(rec.vector_memory),
            compressed_kb: kib(rec.compressed_vector_memory),
        })
        .collect();
    rows.sort_by_key(|r| r.k);
    rows
}
