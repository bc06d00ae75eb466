use std::path::PathBuf;

use kmer_bench_viewer::data::filter::{init_filter_state, visible_parameters, ParameterFilter};
use kmer_bench_viewer::pipeline::build_report;
use kmer_bench_viewer::report::{BenchmarkReport, ReportModel};
use kmer_bench_viewer::ReportConfig;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which chart the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Queries,
    ErrorVsMemory,
    ErrorProfile,
    Construction,
    MemoryTable,
    FilterTable,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Queries,
        View::ErrorVsMemory,
        View::ErrorProfile,
        View::Construction,
        View::MemoryTable,
        View::FilterTable,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Queries => "Queries",
            View::ErrorVsMemory => "Error vs Memory",
            View::ErrorProfile => "Error Profile",
            View::Construction => "Construction",
            View::MemoryTable => "Memory Table",
            View::FilterTable => "Read Filtering",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ReportConfig,

    /// Last built report (None until a build succeeds).
    pub report: Option<BenchmarkReport>,

    pub view: View,

    /// K values shown in the query view.
    pub filters: ParameterFilter,

    /// Show the zoomed query model (configured variants hidden).
    pub zoomed: bool,

    /// Index into `report.error_profiles`.
    pub selected_profile: usize,

    /// Colours of distribution labels.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            report: None,
            view: View::Queries,
            filters: ParameterFilter::default(),
            zoomed: false,
            selected_profile: 0,
            color_map: None,
            status_message: None,
        }
    }

    /// Ingest a newly built report, initialise filters and colours.
    pub fn set_report(&mut self, report: BenchmarkReport) {
        self.filters = init_filter_state(&report.queries.full.parameters());
        self.color_map = Some(ColorMap::new(
            report
                .memory_comparison
                .points
                .iter()
                .map(|p| p.label.as_str()),
        ));
        self.selected_profile = 0;
        self.status_message = if report.is_empty() {
            Some("No usable result files found.".to_string())
        } else {
            None
        };
        self.report = Some(report);
    }

    /// Re-run the pipeline over the configured directories.
    pub fn reload(&mut self) {
        match build_report(&self.config) {
            Ok(report) => {
                log::info!(
                    "Built report with {} K groups",
                    report.queries.full.groups.len()
                );
                self.set_report(report);
            }
            Err(e) => {
                log::error!("Failed to build report: {e:#}");
                self.report = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn set_experiments_dir(&mut self, dir: PathBuf) {
        self.config.experiments_dir = dir;
        self.reload();
    }

    pub fn set_distribution_dir(&mut self, dir: PathBuf) {
        self.config.distribution_dir = dir;
        self.reload();
    }

    /// The query model currently displayed.
    pub fn query_model(&self) -> Option<&ReportModel> {
        let queries = &self.report.as_ref()?.queries;
        Some(if self.zoomed {
            &queries.zoomed
        } else {
            &queries.full
        })
    }

    /// K values of the displayed query model that pass the filter.
    pub fn visible_parameters(&self) -> Vec<u32> {
        self.query_model()
            .map(|m| visible_parameters(&m.parameters(), &self.filters))
            .unwrap_or_default()
    }

    pub fn toggle_parameter(&mut self, k: u32) {
        if !self.filters.remove(&k) {
            self.filters.insert(k);
        }
    }

    pub fn select_all(&mut self) {
        if let Some(report) = &self.report {
            self.filters = init_filter_state(&report.queries.full.parameters());
        }
    }

    pub fn select_none(&mut self) {
        self.filters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmer_bench_viewer::report::ParameterGroup;

    fn report_with(ks: &[u32]) -> BenchmarkReport {
        let mut report = BenchmarkReport::default();
        report.queries.full.groups = ks
            .iter()
            .map(|&parameter| ParameterGroup {
                parameter,
                entries: Vec::new(),
            })
            .collect();
        report.queries.zoomed.groups = report.queries.full.groups[1..].to_vec();
        report
    }

    #[test]
    fn filters_follow_report_and_zoom() {
        let mut state = AppState::new(ReportConfig::default());
        state.set_report(report_with(&[10, 21, 31]));
        assert_eq!(state.visible_parameters(), vec![10, 21, 31]);

        state.toggle_parameter(21);
        assert_eq!(state.visible_parameters(), vec![10, 31]);

        state.zoomed = true;
        assert_eq!(state.visible_parameters(), vec![31]);

        state.select_none();
        assert!(state.visible_parameters().is_empty());
        state.select_all();
        assert_eq!(state.visible_parameters(), vec![21, 31]);
    }

    #[test]
    fn empty_report_sets_status() {
        let mut state = AppState::new(ReportConfig::default());
        state.set_report(BenchmarkReport::default());
        assert!(state.status_message.is_some());
    }
}
