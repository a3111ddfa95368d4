use eframe::egui::Color32;
use indexmap::IndexMap;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{SeriesKey, SessionDataset};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// Hues stop short of 360° so the first and last series never share a colour.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 330.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
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
// Color mapping: series key → Color32
// ---------------------------------------------------------------------------

/// Assigns one colour per series, in series order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: IndexMap<SeriesKey, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(dataset: &SessionDataset) -> Self {
        let palette = generate_palette(dataset.series.len());
        let mapping: IndexMap<SeriesKey, Color32> = dataset
            .series
            .keys()
            .zip(palette)
            .map(|(key, c)| {
                log::debug!("Plotting {key} with colour {c:?}");
                (key.clone(), c)
            })
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, key: &SeriesKey) -> Color32 {
        self.mapping
            .get(key)
            .copied()
            .unwrap_or(self.default_color)
    }
}
