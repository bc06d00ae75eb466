use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::Variant;

/// Everything a report run needs to know: where the files are, how they are
/// named and how much smoothing to apply.
///
/// Every field has a default matching the harness's layout, so a JSON config
/// file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Query-timing and construction CSVs.
    pub experiments_dir: PathBuf,
    /// `*mers_distribution.csv` / `*mers_memory.csv` files of one sketch
    /// configuration.
    pub distribution_dir: PathBuf,
    pub query_prefix: String,
    pub construction_prefix: String,
    pub distribution_suffix: String,
    pub memory_suffix: String,
    /// Read-filtering results table; skipped when the file does not exist.
    pub filter_results: PathBuf,
    /// Moving-average width for query timings.
    pub query_window: usize,
    /// Moving-average width for pointwise error profiles.
    pub error_window: usize,
    pub smoothing_enabled: bool,
    pub centered: bool,
    /// Variants hidden from the zoomed query view.
    pub zoom_exclude: BTreeSet<Variant>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            experiments_dir: PathBuf::from("data/experiments"),
            distribution_dir: PathBuf::from("data/frequency_distribution/NB_100_BC_10_CS_100"),
            query_prefix: "consultas".to_string(),
            construction_prefix: "construccion".to_string(),
            distribution_suffix: "mers_distribution.csv".to_string(),
            memory_suffix: "mers_memory.csv".to_string(),
            filter_results: PathBuf::from("data/filtrado/resultados_filtro_genomas.csv"),
            query_window: 20,
            error_window: 5,
            smoothing_enabled: true,
            centered: true,
            zoom_exclude: [Variant::Plain].into_iter().collect(),
        }
    }
}

impl ReportConfig {
    /// Read a JSON config file; missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: ReportConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Effective query smoothing window (1 when smoothing is off).
    pub fn effective_query_window(&self) -> usize {
        if self.smoothing_enabled {
            self.query_window
        } else {
            1
        }
    }

    /// Effective error-profile smoothing window (1 when smoothing is off).
    pub fn effective_error_window(&self) -> usize {
        if self.smoothing_enabled {
            self.error_window
        } else {
            1
        }
    }
}
