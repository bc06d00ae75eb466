use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – K filters and file selection
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    if state.report.is_none() {
        ui.heading("Filters");
        ui.separator();
        ui.label("No report loaded.");
        return;
    }

    match state.view {
        View::ErrorProfile => profile_list(ui, state),
        _ => parameter_filters(ui, state),
    }
}

fn parameter_filters(ui: &mut Ui, state: &mut AppState) {
    ui.heading("K values");
    ui.separator();

    let parameters = state
        .report
        .as_ref()
        .map(|r| r.queries.full.parameters())
        .unwrap_or_default();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
        ui.label(format!("({}/{})", state.filters.len(), parameters.len()));
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for k in parameters {
                let mut checked = state.filters.contains(&k);
                if ui.checkbox(&mut checked, format!("K = {k}")).changed() {
                    state.toggle_parameter(k);
                }
            }
        });
}

fn profile_list(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Distribution files");
    ui.separator();

    let labels: Vec<String> = state
        .report
        .as_ref()
        .map(|r| r.error_profiles.iter().map(|p| p.label.clone()).collect())
        .unwrap_or_default();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, label) in labels.iter().enumerate() {
                let mut text = RichText::new(label);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(label));
                }
                if ui
                    .selectable_label(state.selected_profile == i, text)
                    .clicked()
                {
                    state.selected_profile = i;
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open experiments folder…").clicked() {
                if let Some(dir) = pick_folder("Open experiments folder") {
                    state.set_experiments_dir(dir);
                }
                ui.close_menu();
            }
            if ui.button("Open distributions folder…").clicked() {
                if let Some(dir) = pick_folder("Open distributions folder") {
                    state.set_distribution_dir(dir);
                }
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        for view in View::ALL {
            if ui.selectable_label(state.view == view, view.title()).clicked() {
                state.view = view;
            }
        }

        ui.separator();

        if state.view == View::Queries {
            let hidden: Vec<String> = state
                .config
                .zoom_exclude
                .iter()
                .map(|v| v.label().to_string())
                .collect();
            let label = format!("Zoom (hide {})", hidden.join(", "));
            if ui.selectable_label(state.zoomed, label).clicked() {
                state.zoomed = !state.zoomed;
            }
            if let Some(report) = &state.report {
                if report.queries.window > 1 {
                    ui.label(format!("Smoothing: {}", report.queries.window));
                }
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

fn pick_folder(title: &str) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new().set_title(title).pick_folder()
}
