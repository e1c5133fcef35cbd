//! Color model
//!
//! Pigment-style (subtractive) mixing, hue relationships and perceptual
//! similarity. Everything here is pure and order-independent.

pub mod hsv;
pub mod mix;
pub mod similarity;

pub use hsv::{Hsv, analogous, analogous_spread, complementary};
pub use mix::{MixSample, mix_subtractive, mix_weighted};
pub use similarity::{Scorer, SimilarityWeights, similarity, similarity_with, weighted_distance};

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color with an alpha channel that mixing ignores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Pack into `0xRRGGBB` (alpha dropped)
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels normalized to [0, 1]
    #[inline]
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Round and clamp float channels (0-255 scale) into a color
    #[inline]
    pub fn from_f32_channels(r: f32, g: f32, b: f32) -> Self {
        Self::rgb(channel_u8(r), channel_u8(g), channel_u8(b))
    }
}

/// Round half away from zero, then clamp to [0, 255]
///
/// NaN maps to 0.
#[inline]
pub(crate) fn channel_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let c = Color::from_hex(0x12AB7F);
        assert_eq!(c, Color::rgb(0x12, 0xAB, 0x7F));
        assert_eq!(c.to_hex(), 0x12AB7F);
    }

    #[test]
    fn test_channel_rounding() {
        assert_eq!(channel_u8(127.5), 128);
        assert_eq!(channel_u8(-3.0), 0);
        assert_eq!(channel_u8(300.0), 255);
        assert_eq!(channel_u8(f32::NAN), 0);
    }

    #[test]
    fn test_alpha_defaults_when_missing() {
        let c: Color = serde_json::from_str(r#"{"r":1,"g":2,"b":3}"#).unwrap();
        assert_eq!(c, Color::rgb(1, 2, 3));
    }
}
