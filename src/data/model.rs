use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Variant – which data structure produced a result file
// ---------------------------------------------------------------------------

/// The benchmarked data-structure implementations.
///
/// The derived `Ord` is the canonical order used everywhere a group of
/// variants is listed, so reports never depend on file enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Plain,
    Compressed,
    Sketch,
}

impl Variant {
    /// All variants in canonical order.
    pub const ALL: [Variant; 3] = [Variant::Plain, Variant::Compressed, Variant::Sketch];

    /// Lower-case tag searched for in filenames.
    pub fn tag(self) -> &'static str {
        match self {
            Variant::Plain => "plain",
            Variant::Compressed => "compressed",
            Variant::Sketch => "sketch",
        }
    }

    /// Human readable legend label.
    pub fn label(self) -> &'static str {
        match self {
            Variant::Plain => "Plain Vector",
            Variant::Compressed => "Compressed Vector",
            Variant::Sketch => "Sketch",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// RunKey – one experimental configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RunKey {
    pub variant: Variant,
    /// The K parameter (k-mer length).
    pub parameter: u32,
}

impl RunKey {
    pub fn new(variant: Variant, parameter: u32) -> Self {
        Self { variant, parameter }
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@K={}", self.variant, self.parameter)
    }
}

// ---------------------------------------------------------------------------
// ResultTable – one loaded result file
// ---------------------------------------------------------------------------

/// A numeric table read from one result file.
///
/// All columns have the same length; [`ResultTable::new`] refuses ragged
/// input so downstream code can index columns in lockstep.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    /// Source filename (no directory).
    pub filename: String,
    columns: BTreeMap<String, Vec<f64>>,
    rows: usize,
}

impl ResultTable {
    pub fn new(
        filename: impl Into<String>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self, ReportError> {
        let filename = filename.into();
        let rows = columns.values().next().map_or(0, Vec::len);
        for (name, values) in &columns {
            if values.len() != rows {
                return Err(ReportError::RaggedColumns {
                    file: filename,
                    column: name.clone(),
                    expected: rows,
                    found: values.len(),
                });
            }
        }
        Ok(Self {
            filename,
            columns,
            rows,
        })
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Like [`ResultTable::column`] but reports the absence as an error.
    pub fn require(&self, name: &str) -> Result<&[f64], ReportError> {
        self.column(name)
            .ok_or_else(|| ReportError::missing_column(&self.filename, name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Replace an existing column. Values of a different length are rejected.
    pub fn replace_column(&mut self, name: &str, values: Vec<f64>) -> Result<(), ReportError> {
        if values.len() != self.rows {
            return Err(ReportError::RaggedColumns {
                file: self.filename.clone(),
                column: name.to_string(),
                expected: self.rows,
                found: values.len(),
            });
        }
        match self.columns.get_mut(name) {
            Some(slot) => {
                *slot = values;
                Ok(())
            }
            None => Err(ReportError::missing_column(&self.filename, name)),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

// ---------------------------------------------------------------------------
// MemoryRecord – companion `*_memory.csv` contents
// ---------------------------------------------------------------------------

/// Memory footprint of one run, in bytes, plus element counts.
/// Any field may be missing from the source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemoryRecord {
    pub sketch_memory: Option<u64>,
    pub vector_memory: Option<u64>,
    pub compressed_vector_memory: Option<u64>,
    pub elements: Option<u64>,
    pub unique_elements: Option<u64>,
}

impl MemoryRecord {
    /// Read the first row of a memory table. Returns `None` for an empty table.
    pub fn from_table(table: &ResultTable) -> Option<Self> {
        if table.is_empty() {
            return None;
        }
        let first = |name: &str| {
            table
                .column(name)
                .and_then(|values| values.first().copied())
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.round() as u64)
        };
        Some(Self {
            sketch_memory: first("sketch_memory"),
            vector_memory: first("vector_memory"),
            compressed_vector_memory: first("compressed_vector_memory"),
            elements: first("elements"),
            unique_elements: first("unique_elements"),
        })
    }
}

// ---------------------------------------------------------------------------
// RunGroup – parameter → variant → table
// ---------------------------------------------------------------------------

/// Grouped runs, ascending by parameter, canonical variant order inside.
pub type RunGroup = BTreeMap<u32, BTreeMap<Variant, ResultTable>>;
