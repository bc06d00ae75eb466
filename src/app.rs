use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BenchViewerApp {
    pub state: AppState,
}

impl BenchViewerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for BenchViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: K filters / file selection ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: current view ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Queries => plot::query_plots(ui, &self.state),
            View::ErrorVsMemory => plot::memory_plots(ui, &self.state),
            View::ErrorProfile => plot::profile_plots(ui, &self.state),
            View::Construction => plot::construction_plot(ui, &self.state),
            View::MemoryTable => table::memory_table(ui, &self.state),
            View::FilterTable => table::filter_table(ui, &self.state),
        });
    }
}
