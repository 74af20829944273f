use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// Hues run from violet down to red so that a current sweep plotted in
/// ascending order reads like a spectrum.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 270.0 - (i as f32 / n as f32) * 270.0;
            let hsl = Hsl::new(hue, 0.75, 0.5);
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
// Color mapping: column label → Color32
// ---------------------------------------------------------------------------

/// Maps each curve (by column label) to a distinct colour, in plotting order.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<'a>(labels: impl ExactSizeIterator<Item = &'a str>) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels
            .zip(palette)
            .map(|(label, color)| (label.to_string(), color))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}
