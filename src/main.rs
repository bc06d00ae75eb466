mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::BenchViewerApp;
use clap::Parser;
use eframe::egui;
use kmer_bench_viewer::ReportConfig;
use state::AppState;

/// Interactive viewer for k-mer sketch benchmark results.
#[derive(Parser, Debug)]
#[command(name = "kmer-bench-viewer", version, about)]
struct Args {
    /// JSON report configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with query-timing and construction CSVs.
    #[arg(long)]
    experiments: Option<PathBuf>,

    /// Directory with distribution and memory CSVs.
    #[arg(long)]
    distributions: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ReportConfig::load(path).unwrap_or_else(|e| {
            log::error!("{e:#}; using defaults");
            ReportConfig::default()
        }),
        None => ReportConfig::default(),
    };
    if let Some(dir) = args.experiments {
        config.experiments_dir = dir;
    }
    if let Some(dir) = args.distributions {
        config.distribution_dir = dir;
    }

    let mut state = AppState::new(config);
    state.reload();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "K-mer Bench Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(BenchViewerApp::new(state)))),
    )
}
