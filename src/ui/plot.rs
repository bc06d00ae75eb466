use eframe::egui::{Color32, ScrollArea, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, PlotUi, Points, Polygon};

use kmer_bench_viewer::data::metrics::MetricDimension;
use kmer_bench_viewer::report::{MemoryPoint, TimingSeries};

use crate::color::{dimension_color, variant_color};
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 280.0;

fn points(x: &[f64], y: &[f64]) -> Vec<[f64; 2]> {
    x.iter().zip(y.iter()).map(|(&xi, &yi)| [xi, yi]).collect()
}

fn no_data(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(message);
    });
}

/// Closed outline of the ±stdev band: upper edge forward, lower edge back.
fn band(series: &TimingSeries) -> Vec<[f64; 2]> {
    let upper = series.x.iter().zip(&series.upper).map(|(&x, &y)| [x, y]);
    let lower = series
        .x
        .iter()
        .zip(&series.lower)
        .rev()
        .map(|(&x, &y)| [x, y]);
    upper.chain(lower).collect()
}

// ---------------------------------------------------------------------------
// Query timings (one row per K, quantile and rank side by side)
// ---------------------------------------------------------------------------

pub fn query_plots(ui: &mut Ui, state: &AppState) {
    let Some(model) = state.query_model() else {
        no_data(ui, "Open a folder to view results  (File → Open…)");
        return;
    };
    let visible = state.visible_parameters();
    if visible.is_empty() {
        no_data(ui, "No K values selected.");
        return;
    }

    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        for k in visible {
            let Some(group) = model.group(k) else {
                continue;
            };
            ui.heading(format!("K = {k}"));
            ui.columns(2, |cols| {
                for (col, dimension) in cols.iter_mut().zip(MetricDimension::ALL) {
                    Plot::new(format!("query_{k}_{}", dimension.name()))
                        .legend(Legend::default())
                        .height(PLOT_HEIGHT)
                        .x_axis_label("Quantile")
                        .y_axis_label(format!("{} time (ns)", dimension.name()))
                        .show(col, |plot_ui| {
                            for entry in &group.entries {
                                let Some(series) =
                                    entry.series.iter().find(|s| s.dimension == dimension)
                                else {
                                    continue;
                                };
                                let color = variant_color(entry.variant);
                                plot_ui.polygon(
                                    Polygon::new(band(series))
                                        .fill_color(color.gamma_multiply(0.2))
                                        .stroke((0.0, color)),
                                );
                                let mut line = Line::new(points(&series.x, &series.mean))
                                    .name(&entry.label)
                                    .color(color)
                                    .width(1.5);
                                if dimension == MetricDimension::Rank {
                                    line = line.style(LineStyle::dashed_loose());
                                }
                                plot_ui.line(line);
                            }
                        });
                }
            });
            ui.separator();
        }
    });
}

// ---------------------------------------------------------------------------
// Error vs memory
// ---------------------------------------------------------------------------

fn error_value(point: &MemoryPoint, dimension: MetricDimension, relative: bool) -> Option<f64> {
    let summary = point.error(dimension)?;
    Some(if relative {
        summary.relative_error
    } else {
        summary.absolute_error
    })
}

fn error_vs_memory(plot_ui: &mut PlotUi, state: &AppState, dimension: MetricDimension, relative: bool) {
    let Some(report) = &state.report else {
        return;
    };
    let with_memory: Vec<[f64; 2]> = report
        .memory_comparison
        .with_memory()
        .filter_map(|p| Some([p.sketch_memory()? as f64, error_value(p, dimension, relative)?]))
        .collect();

    plot_ui.line(
        Line::new(PlotPoints::from(with_memory))
            .name("Sketch Error")
            .color(dimension_color(dimension))
            .width(2.0),
    );

    for point in report.memory_comparison.with_memory() {
        let (Some(x), Some(y)) = (point.sketch_memory(), error_value(point, dimension, relative))
        else {
            continue;
        };
        let color = state
            .color_map
            .as_ref()
            .map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(&point.label));
        plot_ui.points(
            Points::new(vec![[x as f64, y]])
                .name(&point.label)
                .color(color)
                .radius(4.0),
        );
    }
}

pub fn memory_plots(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        no_data(ui, "Open a folder to view results  (File → Open…)");
        return;
    };
    if report.memory_comparison.with_memory().next().is_none() {
        no_data(ui, "No distribution files with memory records.");
        return;
    }

    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        for dimension in MetricDimension::ALL {
            ui.heading(format!("{}: error vs sketch memory", dimension.name()));
            ui.columns(2, |cols| {
                for (col, relative) in cols.iter_mut().zip([true, false]) {
                    let kind = if relative { "MRE" } else { "MAE" };
                    Plot::new(format!("mem_{}_{kind}", dimension.name()))
                        .legend(Legend::default())
                        .height(PLOT_HEIGHT)
                        .x_axis_label("Sketch Memory (Bytes)")
                        .y_axis_label(kind)
                        .show(col, |plot_ui| error_vs_memory(plot_ui, state, dimension, relative));
                }
            });
        }

        ui.heading("Structure memory");
        Plot::new("mem_structures")
            .legend(Legend::default())
            .height(PLOT_HEIGHT)
            .x_axis_label("Sketch Memory (Bytes)")
            .y_axis_label("Memory Size (Bytes)")
            .show(ui, |plot_ui| {
                let overlay = |field: fn(&MemoryPoint) -> Option<u64>| -> Vec<[f64; 2]> {
                    report
                        .memory_comparison
                        .with_memory()
                        .filter_map(|p| Some([p.sketch_memory()? as f64, field(p)? as f64]))
                        .collect()
                };
                plot_ui.line(
                    Line::new(overlay(|p| p.memory?.vector_memory))
                        .name("Vector Mem")
                        .color(Color32::from_rgb(214, 39, 40))
                        .style(LineStyle::dashed_loose()),
                );
                plot_ui.line(
                    Line::new(overlay(|p| p.memory?.compressed_vector_memory))
                        .name("Compressed Mem")
                        .color(Color32::from_rgb(44, 160, 44))
                        .style(LineStyle::dotted_loose()),
                );
            });
    });
}

// ---------------------------------------------------------------------------
// Pointwise error profile of one distribution file
// ---------------------------------------------------------------------------

pub fn profile_plots(ui: &mut Ui, state: &AppState) {
    let Some(profile) = state
        .report
        .as_ref()
        .and_then(|r| r.error_profiles.get(state.selected_profile))
    else {
        no_data(ui, "No distribution files loaded.");
        return;
    };

    let mut title = format!("Analysis: {}", profile.label);
    if profile.window > 1 {
        title.push_str(&format!(" (smoothing: {})", profile.window));
    }
    if let Some(counts) = profile.element_counts() {
        title.push_str(&format!(" - total/unique elements: {counts}"));
    }
    ui.heading(title);

    ui.columns(2, |cols| {
        for (col, relative) in cols.iter_mut().zip([true, false]) {
            let kind = if relative { "Relative" } else { "Absolute" };
            Plot::new(format!("profile_{kind}"))
                .legend(Legend::default())
                .height(PLOT_HEIGHT)
                .x_axis_label("Quantile (0.0 - 1.0)")
                .y_axis_label(format!("{kind} error"))
                .show(col, |plot_ui| {
                    for p in &profile.profiles {
                        let y = if relative { &p.relative } else { &p.absolute };
                        let mut line = Line::new(points(&p.x, y))
                            .name(format!("{} err ({kind})", p.dimension.name()))
                            .color(dimension_color(p.dimension))
                            .width(1.5);
                        if p.dimension == MetricDimension::Rank {
                            line = line.style(LineStyle::dashed_loose());
                        }
                        plot_ui.line(line);
                    }
                });
        }
    });

    let Some(comparison) = &profile.comparison else {
        return;
    };
    ui.separator();
    ui.heading("Real vs estimated frequency");
    Plot::new("profile_frequency")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Quantile")
        .y_axis_label("Frequency")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points(&comparison.x, &comparison.real))
                    .name("Real")
                    .color(dimension_color(MetricDimension::Quantile))
                    .width(2.0),
            );
            plot_ui.line(
                Line::new(points(&comparison.x, &comparison.estimated))
                    .name("Estimated")
                    .color(dimension_color(MetricDimension::Rank))
                    .width(2.0)
                    .style(LineStyle::dashed_loose()),
            );
        });
}

// ---------------------------------------------------------------------------
// Construction time
// ---------------------------------------------------------------------------

pub fn construction_plot(ui: &mut Ui, state: &AppState) {
    let Some(report) = state.report.as_ref().filter(|r| !r.construction.is_empty()) else {
        no_data(ui, "No construction files loaded.");
        return;
    };

    Plot::new("construction")
        .legend(Legend::default())
        .x_axis_label("K (k-mer length)")
        .y_axis_label("Mean time (s)")
        .show(ui, |plot_ui| {
            for series in &report.construction {
                let color = variant_color(series.variant);
                plot_ui.line(
                    Line::new(points(&series.n, &series.mean_seconds))
                        .name(&series.label)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(points(&series.n, &series.mean_seconds))
                        .color(color)
                        .radius(3.0),
                );
                // Error bars.
                for ((&n, &m), &s) in series
                    .n
                    .iter()
                    .zip(&series.mean_seconds)
                    .zip(&series.stdev_seconds)
                {
                    if s > 0.0 {
                        plot_ui.line(
                            Line::new(PlotPoints::from(vec![[n, m - s], [n, m + s]]))
                                .color(color)
                                .width(1.0),
                        );
                    }
                }
            }
        });
}
