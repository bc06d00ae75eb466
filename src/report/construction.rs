use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filename::detect_variant;
use crate::data::model::{ResultTable, Variant};
use crate::error::ReportError;

const NANOS_PER_SECOND: f64 = 1e9;

/// Construction time against input size for one variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructionSeries {
    pub variant: Variant,
    pub label: String,
    pub n: Vec<f64>,
    pub mean_seconds: Vec<f64>,
    pub stdev_seconds: Vec<f64>,
}

fn series(variant: Variant, table: &ResultTable) -> Result<ConstructionSeries, ReportError> {
    let n = table.require("n")?;
    let mean = table.require("t_mean")?;
    let stdev = table.column("t_stdev");

    Ok(ConstructionSeries {
        variant,
        label: variant.label().to_string(),
        n: n.to_vec(),
        mean_seconds: mean.iter().map(|t| t / NANOS_PER_SECOND).collect(),
        stdev_seconds: match stdev {
            Some(s) => s.iter().map(|t| t / NANOS_PER_SECOND).collect(),
            None => vec![0.0; mean.len()],
        },
    })
}

/// One series per variant, canonical order. Construction files carry no K,
/// so only the variant tag is read from the name; unusable tables are
/// skipped with a warning.
pub fn assemble_construction(
    tables: impl IntoIterator<Item = ResultTable>,
) -> Vec<ConstructionSeries> {
    let mut by_variant: BTreeMap<Variant, ConstructionSeries> = BTreeMap::new();
    for table in tables {
        let Some(variant) = detect_variant(&table.filename) else {
            log::warn!("skipping {}: no variant tag", table.filename);
            continue;
        };
        match series(variant, &table) {
            Ok(s) => {
                by_variant.insert(variant, s);
            }
            Err(e) => log::warn!("skipping {}: {e}", table.filename),
        }
    }
    by_variant.into_values().collect()
}
