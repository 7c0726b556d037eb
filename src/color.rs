use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
///
/// Softer saturation and higher lightness than a plot palette, so country
/// badges stay readable as text on the dark card background.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.65);
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
// Country → Color32
// ---------------------------------------------------------------------------

/// Stable colour per discovered country, used for card badges.
#[derive(Debug, Clone)]
pub struct CountryColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CountryColors {
    /// `countries` is expected sorted, so colours do not shift between runs.
    pub fn new(countries: &[String]) -> Self {
        let palette = generate_palette(countries.len());
        let mapping = countries.iter().cloned().zip(palette).collect();

        CountryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, country: &str) -> Color32 {
        self.mapping
            .get(country)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn unknown_country_falls_back_to_gray() {
        let colors = CountryColors::new(&["Canada".to_string(), "Spain".to_string()]);
        assert_ne!(colors.color_for("Canada"), colors.color_for("Spain"));
        assert_eq!(colors.color_for("Atlantis"), Color32::GRAY);
    }
}
