use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const MEMORY_HEADERS: [&str; 6] = [
    "K-mer",
    "Elements",
    "Unique Elem.",
    "Sketch Mem (KB)",
    "Vector Mem (KB)",
    "Comp. Vector Mem (KB)",
];

const FILTER_HEADERS: [&str; 8] = [
    "K",
    "Low Q",
    "Up Q",
    "Low Bound",
    "Up Bound",
    "Elements",
    "Unique Elim.",
    "Total Elim.",
];

fn count(v: Option<u64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "–".to_string())
}

/// `1234567` → `1,234,567`
fn grouped(v: Option<u64>) -> String {
    let Some(v) = v else {
        return "–".to_string();
    };
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn kib(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "–".to_string())
}

fn empty(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(message);
    });
}

fn text_table<const N: usize>(ui: &mut Ui, headers: [&str; N], rows: Vec<[String; N]>) {
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(90.0), N)
        .header(22.0, |mut header| {
            for title in headers {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for cells in rows {
                body.row(20.0, |mut table_row| {
                    for cell in cells {
                        table_row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

/// Per-K memory summary.
pub fn memory_table(ui: &mut Ui, state: &AppState) {
    let Some(rows) = state
        .report
        .as_ref()
        .map(|r| &r.memory_table)
        .filter(|rows| !rows.is_empty())
    else {
        empty(ui, "No memory files loaded.");
        return;
    };

    let cells = rows
        .iter()
        .map(|row| {
            [
                row.k.to_string(),
                count(row.elements),
                count(row.unique_elements),
                kib(row.sketch_kb),
                kib(row.vector_kb),
                kib(row.compressed_kb),
            ]
        })
        .collect();
    text_table(ui, MEMORY_HEADERS, cells);
}

/// Read-filtering results, one row per filtering run.
pub fn filter_table(ui: &mut Ui, state: &AppState) {
    let Some(rows) = state
        .report
        .as_ref()
        .map(|r| &r.filter_table)
        .filter(|rows| !rows.is_empty())
    else {
        empty(ui, "No read-filtering results loaded.");
        return;
    };

    let cells = rows
        .iter()
        .map(|row| {
            [
                row.k.to_string(),
                row.lower_quantile.to_string(),
                row.upper_quantile.to_string(),
                grouped(row.lower_bound),
                grouped(row.upper_bound),
                grouped(row.elements),
                grouped(row.unique_eliminated),
                grouped(row.eliminated),
            ]
        })
        .collect();
    text_table(ui, FILTER_HEADERS, cells);
}
