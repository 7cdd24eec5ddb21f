use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

/// Colour type shared by the offscreen renderer and the preview window.
pub type Rgb8 = Srgb<u8>;

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

/// The ten-colour qualitative cycle used for the temperature lines.
const CYCLE: [Rgb8; 10] = [
    Srgb::new(31, 119, 180),
    Srgb::new(255, 127, 14),
    Srgb::new(44, 160, 44),
    Srgb::new(214, 39, 40),
    Srgb::new(148, 103, 189),
    Srgb::new(140, 86, 75),
    Srgb::new(227, 119, 194),
    Srgb::new(127, 127, 127),
    Srgb::new(188, 189, 34),
    Srgb::new(23, 190, 207),
];

pub const MASS_BALANCE: Rgb8 = Srgb::new(0, 0, 0);
pub const ANNOTATION_TEXT: Rgb8 = Srgb::new(128, 128, 128);
pub const GRID: Rgb8 = Srgb::new(211, 211, 211);
pub const LEGEND_BORDER: Rgb8 = Srgb::new(128, 128, 128);

// ---------------------------------------------------------------------------
// Palettes
// ---------------------------------------------------------------------------

/// Colours for `n` temperature lines: the fixed cycle first, evenly spaced
/// hues after that.
pub fn line_palette(n: usize) -> Vec<Rgb8> {
    let mut colors: Vec<Rgb8> = CYCLE.iter().copied().take(n).collect();
    if n > CYCLE.len() {
        colors.extend(generate_palette(n - CYCLE.len()));
    }
    colors
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb8> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format::<u8>()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Backend conversions
// ---------------------------------------------------------------------------

pub fn to_plotters(c: Rgb8) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}

pub fn to_egui(c: Rgb8) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_lines_use_the_fixed_cycle() {
        let colors = line_palette(6);
        assert_eq!(colors.len(), 6);
        assert_eq!(colors[0], Srgb::new(31, 119, 180));
        assert_eq!(colors[5], Srgb::new(140, 86, 75));
    }

    #[test]
    fn long_palettes_extend_past_the_cycle() {
        let colors = line_palette(13);
        assert_eq!(colors.len(), 13);
        assert_eq!(&colors[..10], &CYCLE[..]);
        assert_ne!(colors[10], colors[11]);
    }

    #[test]
    fn empty_palette() {
        assert!(line_palette(0).is_empty());
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn conversions_keep_channels() {
        let c = Srgb::new(1, 2, 3);
        assert_eq!(to_plotters(c), RGBColor(1, 2, 3));
        assert_eq!(to_egui(c), Color32::from_rgb(1, 2, 3));
    }
}
