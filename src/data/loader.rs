use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{MemoryRecord, ResultTable};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a result table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, numeric cells (the harness's native output)
/// * `.json`    – `{"col": [...], ...}` or records `[{"col": v, ...}, ...]`
/// * `.parquet` – flat numeric columns
///
/// Columns holding non-numeric values are dropped; empty cells become NaN.
pub fn load_file(path: &Path) -> Result<ResultTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let columns = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let table = ResultTable::new(file_name(path), columns)?;
    if table.is_empty() {
        log::warn!("{} has no rows", table.filename);
    }
    log::debug!(
        "loaded {}: {} rows, columns [{}]",
        table.filename,
        table.len(),
        table.column_names().collect::<Vec<_>>().join(", ")
    );
    Ok(table)
}

/// Files in `dir` whose names start with `prefix` and end with `suffix`,
/// sorted by name so downstream grouping is deterministic.
pub fn discover(dir: &Path, prefix: &str, suffix: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = file_name(&path);
        if name.starts_with(prefix) && name.ends_with(suffix) {
            paths.push(path);
        }
    }
    paths.sort();
    log::debug!(
        "discovered {} files matching {prefix}*{suffix} in {}",
        paths.len(),
        dir.display()
    );
    Ok(paths)
}

/// Companion memory file of a distribution file:
/// `21mers_distribution.csv` → `21mers_memory.csv`.
pub fn memory_path_for(distribution: &Path) -> PathBuf {
    let name = file_name(distribution);
    let companion = match name.strip_suffix("distribution.csv") {
        Some(stem) => format!("{stem}memory.csv"),
        None => format!("{name}.memory.csv"),
    };
    distribution.with_file_name(companion)
}

/// Read a memory record. Absence or unreadability is not an error: it is
/// logged and reported as `None`.
pub fn load_memory_record(path: &Path) -> Option<MemoryRecord> {
    if !path.exists() {
        log::warn!("no memory file {}", path.display());
        return None;
    }
    match load_file(path) {
        Ok(table) => {
            let record = MemoryRecord::from_table(&table);
            if record.is_none() {
                log::warn!("memory file {} is empty", path.display());
            }
            record
        }
        Err(e) => {
            log::warn!("reading memory file {}: {e:#}", path.display());
            None
        }
    }
}

/// Display label of a result file: its name without `strip_suffix`
/// (and the separator before it).
pub fn file_label(path: &Path, strip_suffix: &str) -> String {
    let name = file_name(path);
    name.strip_suffix(strip_suffix)
        .map(|s| s.trim_end_matches('_').to_string())
        .unwrap_or(name)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Column accumulation shared by all formats
// ---------------------------------------------------------------------------

/// Collects cells column by column; a column that sees a non-numeric cell
/// is marked and dropped at the end.
#[derive(Default)]
struct Columns {
    values: BTreeMap<String, Option<Vec<f64>>>,
}

impl Columns {
    fn declare(&mut self, name: &str) {
        if !self.values.contains_key(name) {
            self.values.insert(name.to_string(), Some(Vec::new()));
        }
    }

    fn push(&mut self, name: &str, value: Option<f64>) {
        self.declare(name);
        if let Some(slot) = self.values.get_mut(name) {
            match (slot.as_mut(), value) {
                (Some(column), Some(v)) => column.push(v),
                (Some(_), None) => *slot = None,
                (None, _) => {}
            }
        }
    }

    fn finish(self, source: &str) -> BTreeMap<String, Vec<f64>> {
        self.values
            .into_iter()
            .filter_map(|(name, column)| {
                if column.is_none() {
                    log::debug!("{source}: dropping non-numeric column '{name}'");
                }
                column.map(|c| (name, c))
            })
            .collect()
    }
}

fn parse_cell(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(f64::NAN);
    }
    s.parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one observation per row.
/// Whitespace around cells (e.g. `0.5, 120`) is tolerated.
fn load_csv(path: &Path) -> Result<BTreeMap<String, Vec<f64>>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns = Columns::default();
    for header in &headers {
        columns.declare(header);
    }

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (header, cell) in headers.iter().zip(record.iter()) {
            columns.push(header, parse_cell(cell));
        }
    }

    Ok(columns.finish(&path.display().to_string()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepts either a columns object (`df.to_json(orient='list')`-like):
///
/// ```json
/// { "quantile": [0.1, 0.2], "real_quantile": [3, 5] }
/// ```
///
/// or a records array (`orient='records'`):
///
/// ```json
/// [ { "quantile": 0.1, "real_quantile": 3 }, ... ]
/// ```
fn load_json(path: &Path) -> Result<BTreeMap<String, Vec<f64>>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let source = path.display().to_string();

    let mut columns = Columns::default();
    match &root {
        JsonValue::Object(obj) => {
            for (name, val) in obj {
                let arr = val
                    .as_array()
                    .with_context(|| format!("column '{name}' is not an array"))?;
                columns.declare(name);
                for cell in arr {
                    columns.push(name, json_number(cell));
                }
            }
        }
        JsonValue::Array(records) => {
            for (i, rec) in records.iter().enumerate() {
                let obj = rec
                    .as_object()
                    .with_context(|| format!("Row {i} is not a JSON object"))?;
                for (name, cell) in obj {
                    columns.push(name, json_number(cell));
                }
            }
        }
        _ => bail!("Expected a JSON object of columns or an array of records"),
    }

    Ok(columns.finish(&source))
}

fn json_number(val: &JsonValue) -> Option<f64> {
    match val {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::Null => Some(f64::NAN),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Every numeric column is cast to Float64; nulls become NaN and
/// non-numeric columns are skipped.
fn load_parquet(path: &Path) -> Result<BTreeMap<String, Vec<f64>>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for (idx, field) in schema.fields().iter().enumerate() {
            if !field.data_type().is_numeric() {
                log::debug!("{}: skipping column '{}'", path.display(), field.name());
                continue;
            }
            let casted = cast(batch.column(idx).as_ref(), &DataType::Float64)
                .with_context(|| format!("casting '{}' to f64", field.name()))?;
            let values = casted
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array after cast")?;
            columns
                .entry(field.name().clone())
                .or_default()
                .extend(values.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn csv_with_spaces_and_text_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consultas_sketch_21.csv");
        fs::write(
            &path,
            "quantile, quantile_t_mean, note\n0.1, 120, a\n0.2, 140, b\n",
        )
        .unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.filename, "consultas_sketch_21.csv");
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("quantile_t_mean").unwrap(), &[120.0, 140.0]);
        assert!(!table.has_column("note"));
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["quantile", "quantile_t_mean"]);
    }

    #[test]
    fn json_columns_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let cols = dir.path().join("a.json");
        fs::write(&cols, r#"{"quantile": [0.1, 0.2], "real_rank": [1, 2]}"#).unwrap();
        let table = load_file(&cols).unwrap();
        assert_eq!(table.column("real_rank").unwrap(), &[1.0, 2.0]);

        let recs = dir.path().join("b.json");
        fs::write(&recs, r#"[{"quantile": 0.1}, {"quantile": 0.2}]"#).unwrap();
        assert_eq!(load_file(&recs).unwrap().column("quantile").unwrap(), &[0.1, 0.2]);
    }

    #[test]
    fn parquet_numeric_columns_are_cast_to_f64() {
        use arrow::array::{Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;
        use std::sync::Arc;

        let schema = Arc::new(Schema::new(vec![
            Field::new("quantile", DataType::Float64, false),
            Field::new("real_rank", DataType::Int64, true),
            Field::new("note", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![0.1, 0.2])),
                Arc::new(Int64Array::from(vec![Some(3), None])),
                Arc::new(StringArray::from(vec!["a", "b"])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("21mers_distribution.parquet");
        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.column("quantile").unwrap(), &[0.1, 0.2]);
        let rank = table.column("real_rank").unwrap();
        assert_eq!(rank[0], 3.0);
        assert!(rank[1].is_nan());
        assert!(!table.has_column("note"));
    }

    #[test]
    fn unsupported_extension_fails() {
        assert!(load_file(Path::new("results.xlsx")).is_err());
    }

    #[test]
    fn discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["consultas_sketch_21.csv", "consultas_plain_10.csv", "other.csv"] {
            fs::write(dir.path().join(name), "quantile\n0.1\n").unwrap();
        }
        let found = discover(dir.path(), "consultas", ".csv").unwrap();
        let names: Vec<String> = found.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["consultas_plain_10.csv", "consultas_sketch_21.csv"]);
    }

    #[test]
    fn memory_companion_path_and_missing_record() {
        let dir = tempfile::tempdir().unwrap();
        let dist = dir.path().join("21mers_distribution.csv");
        let mem = memory_path_for(&dist);
        assert_eq!(file_name(&mem), "21mers_memory.csv");
        assert!(load_memory_record(&mem).is_none());

        fs::write(&mem, "elements,unique_elements,sketch_memory\n1000,250,4096\n").unwrap();
        let record = load_memory_record(&mem).unwrap();
        assert_eq!(record.sketch_memory, Some(4096));
        assert_eq!(record.unique_elements, Some(250));
        assert_eq!(record.vector_memory, None);
    }

    #[test]
    fn labels_strip_suffix() {
        assert_eq!(
            file_label(Path::new("/d/21mers_distribution.csv"), "distribution.csv"),
            "21mers"
        );
        assert_eq!(file_label(Path::new("x.csv"), "distribution.csv"), "x.csv");
    }
}
