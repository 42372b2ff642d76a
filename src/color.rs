use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed accents
// ---------------------------------------------------------------------------

pub const BLUE: Color32 = Color32::from_rgb(0x34, 0x98, 0xdb);
pub const ORANGE: Color32 = Color32::from_rgb(0xe6, 0x7e, 0x22);
pub const RED: Color32 = Color32::from_rgb(0xe7, 0x4c, 0x3c);
pub const PURPLE: Color32 = Color32::from_rgb(0x9b, 0x59, 0xb6);
pub const GREEN: Color32 = Color32::from_rgb(0x2e, 0xcc, 0x71);

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
// Color mapping: series label → Color32
// ---------------------------------------------------------------------------

/// Maps the series labels of a chart to distinct colours.
#[derive(Debug, Clone)]
pub struct SeriesColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl SeriesColors {
    /// Assign palette colours to `labels` in order.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels: Vec<String> = labels.into_iter().map(|l| l.as_ref().to_string()).collect();
        let palette = generate_palette(labels.len());
        let mapping: BTreeMap<String, Color32> =
            labels.into_iter().zip(palette.into_iter()).collect();
        SeriesColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Force a specific colour for one label.
    pub fn pin(mut self, label: &str, color: Color32) -> Self {
        self.mapping.insert(label.to_string(), color);
        self
    }

    /// Look up the colour for a series label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// Colours for yes/no survey answers: affirmative red, negative green,
/// palette colours for anything else.
pub fn yes_no_colors<I, S>(labels: I) -> SeriesColors
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SeriesColors::new(labels).pin("Yes", RED).pin("No", GREEN)
}
