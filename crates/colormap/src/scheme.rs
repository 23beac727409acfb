//! Zone palettes and multi-stop color ramps.
//!
//! A zone's color depends only on its label. The corrosion classes have a
//! fixed table; other band sets take evenly spaced colors from the same
//! red-to-green ramp.

use corrozone_core::BandSet;
use serde::{Serialize, Serializer};

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Neutral gray for labels missing from a palette.
    pub const UNKNOWN: Self = Self { r: 136, g: 136, b: 136 };

    /// `#rrggbb` form used by GeoJSON styling and legends.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

/// A color stop: position in [0, 1] mapped to an RGB color.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: Rgb,
}

impl ColorStop {
    pub const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

/// Red (closest to the sea) to green (furthest inland)
const CORROSION_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, 255, 0, 0),
    ColorStop::new(1.0 / 3.0, 255, 102, 0),
    ColorStop::new(2.0 / 3.0, 255, 204, 0),
    ColorStop::new(1.0, 153, 204, 0),
];

const CORROSION_LABELS: &[&str] = &["C5 - Muito Alta", "C4 - Alta", "C3 - Média", "C2 - Baixa"];

// ─── Interpolation engine ──────────────────────────────────────────────

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp(c1.r as f64, c2.r as f64, t).round() as u8,
        lerp(c1.g as f64, c2.g as f64, t).round() as u8,
        lerp(c1.b as f64, c2.b as f64, t).round() as u8,
    )
}

fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    if t <= 0.0 {
        return stops[0].color;
    }
    if t >= 1.0 {
        return stops[stops.len() - 1].color;
    }
    for i in 1..stops.len() {
        if t <= stops[i].t {
            let ratio = (t - stops[i - 1].t) / (stops[i].t - stops[i - 1].t);
            return lerp_color(stops[i - 1].color, stops[i].color, ratio);
        }
    }
    stops[stops.len() - 1].color
}

/// Evaluate the corrosion ramp at normalized position `t` ∈ [0, 1].
///
/// Out-of-range positions clamp to the end colors.
pub fn evaluate(t: f64) -> Rgb {
    multi_stop(CORROSION_STOPS, t)
}

/// Static label → color table.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePalette {
    entries: Vec<(String, Rgb)>,
}

impl ZonePalette {
    /// Palette for the four default corrosion classes.
    pub fn corrosion() -> Self {
        Self {
            entries: CORROSION_LABELS
                .iter()
                .zip(CORROSION_STOPS)
                .map(|(label, stop)| (label.to_string(), stop.color))
                .collect(),
        }
    }

    /// Palette for an arbitrary band set.
    ///
    /// Bands are spread evenly along the ramp in band order. Labels listed in
    /// `overrides` keep the given color.
    pub fn for_bands(bands: &BandSet, overrides: &[(&str, Rgb)]) -> Self {
        let n = bands.len();
        let entries = bands
            .iter()
            .enumerate()
            .map(|(i, band)| {
                let color = overrides
                    .iter()
                    .find(|(label, _)| *label == band.label())
                    .map(|(_, c)| *c)
                    .unwrap_or_else(|| {
                        let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                        evaluate(t)
                    });
                (band.label().to_string(), color)
            })
            .collect();
        Self { entries }
    }

    /// Color of `label`; gray when the label is unknown.
    pub fn color_for(&self, label: &str) -> Rgb {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| *c)
            .unwrap_or(Rgb::UNKNOWN)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|(l, _)| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Rgb)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corrozone_core::BandSpec;

    #[test]
    fn corrosion_colors() {
        let palette = ZonePalette::corrosion();
        assert_eq!(palette.color_for("C5 - Muito Alta").hex(), "#ff0000");
        assert_eq!(palette.color_for("C4 - Alta").hex(), "#ff6600");
        assert_eq!(palette.color_for("C3 - Média").hex(), "#ffcc00");
        assert_eq!(palette.color_for("C2 - Baixa").hex(), "#99cc00");
    }

    #[test]
    fn unknown_label_is_gray() {
        let palette = ZonePalette::corrosion();
        assert_eq!(palette.color_for("C1"), Rgb::UNKNOWN);
        assert!(!palette.contains("C1"));
    }

    #[test]
    fn default_bands_match_corrosion_table() {
        let palette = ZonePalette::for_bands(&BandSet::corrosion_default(), &[]);
        assert_eq!(palette, ZonePalette::corrosion());
    }

    #[test]
    fn overrides_win() {
        let bands = BandSet::new(vec![
            BandSpec::new("near", 0.0, 100.0).unwrap(),
            BandSpec::new("far", 100.0, 500.0).unwrap(),
        ])
        .unwrap();
        let blue = Rgb::new(0, 0, 255);
        let palette = ZonePalette::for_bands(&bands, &[("far", blue)]);
        assert_eq!(palette.color_for("near"), Rgb::new(255, 0, 0));
        assert_eq!(palette.color_for("far"), blue);
    }

    #[test]
    fn single_band_gets_first_color() {
        let bands = BandSet::new(vec![BandSpec::new("only", 0.0, 100.0).unwrap()]).unwrap();
        let palette = ZonePalette::for_bands(&bands, &[]);
        assert_eq!(palette.color_for("only"), Rgb::new(255, 0, 0));
    }

    #[test]
    fn hex_round_trip() {
        assert_eq!(Rgb::from_hex("#ffcc00"), Some(Rgb::new(255, 204, 0)));
        assert_eq!(Rgb::from_hex("99cc00"), Some(Rgb::new(153, 204, 0)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
    }

    #[test]
    fn clamping() {
        assert_eq!(evaluate(-0.5), Rgb::new(255, 0, 0));
        assert_eq!(evaluate(1.5), Rgb::new(153, 204, 0));
    }

    #[test]
    fn midpoint_interpolates() {
        // Halfway between #ff6600 and #ffcc00
        assert_eq!(evaluate(0.5), Rgb::new(255, 153, 0));
    }
}
