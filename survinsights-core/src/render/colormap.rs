//! Colour handling for charts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Brown-to-blue-green diverging anchors.
const BRBG: [Rgb; 11] = [
    Rgb(0x54, 0x30, 0x05),
    Rgb(0x8c, 0x51, 0x0a),
    Rgb(0xbf, 0x81, 0x2d),
    Rgb(0xdf, 0xc2, 0x7d),
    Rgb(0xf6, 0xe8, 0xc3),
    Rgb(0xf5, 0xf5, 0xf5),
    Rgb(0xc7, 0xea, 0xe5),
    Rgb(0x80, 0xcd, 0xc1),
    Rgb(0x35, 0x97, 0x8f),
    Rgb(0x01, 0x66, 0x5e),
    Rgb(0x00, 0x3c, 0x30),
];

/// Colour-blind safe categorical palette, cycled for many series.
const CATEGORICAL: [Rgb; 10] = [
    Rgb(0x01, 0x73, 0xb2),
    Rgb(0xde, 0x8f, 0x05),
    Rgb(0x02, 0x9e, 0x73),
    Rgb(0xd5, 0x5e, 0x00),
    Rgb(0xcc, 0x78, 0xbc),
    Rgb(0xca, 0x91, 0x61),
    Rgb(0xfb, 0xaf, 0xe4),
    Rgb(0x94, 0x94, 0x94),
    Rgb(0xec, 0xe1, 0x33),
    Rgb(0x56, 0xb4, 0xe9),
];

/// Continuous diverging colormap evaluated on `[0, 1]`; inputs are clamped.
pub fn brbg(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (BRBG.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(BRBG.len() - 2);
    BRBG[i].lerp(BRBG[i + 1], scaled - i as f64)
}

pub fn categorical(i: usize) -> Rgb {
    CATEGORICAL[i % CATEGORICAL.len()]
}

/// Min–max normalisation to `[0, 1]`; a zero span maps everything to 0.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    values
        .iter()
        .map(|v| if span > 0.0 { (v - min) / span } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brbg_endpoints() {
        assert_eq!(brbg(0.0), BRBG[0]);
        assert_eq!(brbg(1.0), BRBG[10]);
        assert_eq!(brbg(0.5), BRBG[5]);
        assert_eq!(brbg(-3.0), BRBG[0]);
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(Rgb(1, 102, 94).to_string(), "#01665e");
    }

    #[test]
    fn test_normalize_constant() {
        assert_eq!(normalize(&[2.0, 2.0]), vec![0.0, 0.0]);
        assert_eq!(normalize(&[0.0, 5.0, 10.0]), vec![0.0, 0.5, 1.0]);
    }
}
