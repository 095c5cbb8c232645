//! Color palettes for the chart panels.

use plotters::style::{Color, HSLColor, RGBColor};

pub const TREND_BLUE: RGBColor = RGBColor(31, 119, 180);
pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

// Samples of the viridis ramp at 0, 0.25, 0.5, 0.75 and 1.
const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

/// `n` colors with evenly spaced hues and equal saturation/lightness.
pub fn hue_palette(n: usize) -> Vec<RGBColor> {
    (0..n)
        .map(|i| {
            let rgba = HSLColor(i as f64 / n as f64, 0.65, 0.55).to_rgba();
            RGBColor(rgba.0, rgba.1, rgba.2)
        })
        .collect()
}

/// Linear interpolation along the viridis ramp, `t` clamped to `[0, 1]`.
pub fn viridis(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - i as f64;

    let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

/// Viridis colors for `n` category codes, spread over the whole ramp.
pub fn category_colors(n: usize) -> Vec<RGBColor> {
    let span = n.saturating_sub(1).max(1) as f64;
    (0..n).map(|code| viridis(code as f64 / span)).collect()
}
