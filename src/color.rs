use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use kmer_bench_viewer::data::metrics::MetricDimension;
use kmer_bench_viewer::data::model::Variant;

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

/// Each structure variant keeps the same colour in every view.
pub fn variant_color(variant: Variant) -> Color32 {
    match variant {
        Variant::Plain => Color32::from_rgb(31, 119, 180),
        Variant::Compressed => Color32::from_rgb(44, 160, 44),
        Variant::Sketch => Color32::from_rgb(214, 39, 40),
    }
}

pub fn dimension_color(dimension: MetricDimension) -> Color32 {
    match dimension {
        MetricDimension::Quantile => Color32::from_rgb(31, 119, 180),
        MetricDimension::Rank => Color32::from_rgb(255, 127, 14),
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: result label → Color32
// ---------------------------------------------------------------------------

/// Maps result labels (e.g. `21mers`) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
