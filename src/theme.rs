//! Dashboard Theme Module
//! Dark palette, hex color parsing and the sequential color ramps used by
//! the map charts.

use egui::Color32;

/// Window / panel background.
pub const BACKGROUND: Color32 = Color32::from_rgb(0x34, 0x32, 0x31);
/// Default chart and label text.
pub const TEXT: Color32 = Color32::from_rgb(0xBE, 0xBE, 0xBE);
/// Plot grid lines.
pub const GRID: Color32 = Color32::from_rgb(0x33, 0x33, 0x33);
/// Indicator accent.
pub const RED: Color32 = Color32::from_rgb(0xBF, 0x00, 0x00);
/// Confirmed-cases trace.
pub const BLUE: Color32 = Color32::from_rgb(0x46, 0x6f, 0xc2);
/// Deaths trace.
pub const GREEN: Color32 = Color32::from_rgb(0x5b, 0xc2, 0x46);

/// Line palette for sub-region traces.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Color for the i-th sub-region trace.
pub fn series_color(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}

/// Parse a `#RRGGBB` hex color into a Color32 with the given alpha.
/// Returns None for malformed input.
pub fn hex_to_rgba(hex: &str, alpha: u8) -> Option<Color32> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color32::from_rgba_unmultiplied(r, g, b, alpha))
}

/// Sequential red ramp for the scatter-geo marker color (share of cases from
/// the previous week, 0..100).
const REDS: [Color32; 5] = [
    Color32::from_rgb(0xff, 0xf5, 0xf0),
    Color32::from_rgb(0xfc, 0xbb, 0xa1),
    Color32::from_rgb(0xfb, 0x6a, 0x4a),
    Color32::from_rgb(0xcb, 0x18, 0x1d),
    Color32::from_rgb(0x67, 0x00, 0x0d),
];

/// Sequential peach ramp for the choropleth fill.
const PEACH: [Color32; 5] = [
    Color32::from_rgb(0xfd, 0xe0, 0xc5),
    Color32::from_rgb(0xf8, 0xb5, 0x8b),
    Color32::from_rgb(0xf2, 0x85, 0x5d),
    Color32::from_rgb(0xef, 0x6a, 0x4c),
    Color32::from_rgb(0xeb, 0x4a, 0x40),
];

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| -> u8 { (x as f32 + (y as f32 - x as f32) * t).round() as u8 };
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

fn sample_ramp(stops: &[Color32], t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let scaled = t * (stops.len() - 1) as f32;
    let idx = (scaled.floor() as usize).min(stops.len() - 2);
    lerp_color(stops[idx], stops[idx + 1], scaled - idx as f32)
}

/// Marker color for a share-of-last-week percentage in 0..100.
pub fn reds_scale(percent: f64) -> Color32 {
    sample_ramp(&REDS, percent / 100.0)
}

/// Choropleth fill for a value within [min, max].
pub fn peach_scale(value: f64, min: f64, max: f64) -> Color32 {
    let span = (max - min).max(f64::EPSILON);
    sample_ramp(&PEACH, (value - min) / span)
}

/// Apply the dashboard palette to egui's global visuals.
pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = BACKGROUND;
    visuals.extreme_bg_color = GRID;
    visuals.override_text_color = Some(TEXT);
    ctx.set_visuals(visuals);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(
            hex_to_rgba("#466fc2", 255),
            Some(Color32::from_rgba_unmultiplied(0x46, 0x6f, 0xc2, 255))
        );
        assert_eq!(
            hex_to_rgba("BF0000", 128),
            Some(Color32::from_rgba_unmultiplied(0xBF, 0x00, 0x00, 128))
        );
    }

    #[test]
    fn rejects_malformed_hex() {
        assert_eq!(hex_to_rgba("#46fc2", 255), None);
        assert_eq!(hex_to_rgba("#4Z6fc2ab", 255), None);
        assert_eq!(hex_to_rgba("not-a-color", 255), None);
    }

    #[test]
    fn ramps_clamp_at_both_ends() {
        assert_eq!(reds_scale(-10.0), REDS[0]);
        assert_eq!(reds_scale(500.0), REDS[4]);
        assert_eq!(peach_scale(0.0, 0.0, 5_000_000.0), PEACH[0]);
        assert_eq!(peach_scale(9_000_000.0, 0.0, 5_000_000.0), PEACH[4]);
    }

    #[test]
    fn ramp_midpoint_is_between_stops() {
        let mid = reds_scale(50.0);
        assert_ne!(mid, REDS[0]);
        assert_ne!(mid, REDS[4]);
    }
}
