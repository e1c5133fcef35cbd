//! HSV conversion and hue relationships used for puzzle generation

use serde::{Deserialize, Serialize};

use super::Color;
use crate::wrap_degrees;

/// Hue in degrees [0, 360), saturation and value in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    /// Same saturation/value with the hue rotated by `degrees`
    #[inline]
    pub fn rotate(self, degrees: f32) -> Self {
        Self {
            h: wrap_degrees(self.h + degrees),
            ..self
        }
    }
}

impl From<Color> for Hsv {
    fn from(c: Color) -> Self {
        let [r, g, b] = c.to_unit();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta <= 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max <= 0.0 { 0.0 } else { delta / max };

        Self {
            h: wrap_degrees(h),
            s,
            v: max,
        }
    }
}

impl From<Hsv> for Color {
    fn from(hsv: Hsv) -> Self {
        let h = wrap_degrees(hsv.h);
        let s = hsv.s.clamp(0.0, 1.0);
        let v = hsv.v.clamp(0.0, 1.0);

        let c = v * s;
        let sector = h / 60.0;
        let x = c * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match sector as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Color::from_f32_channels((r + m) * 255.0, (g + m) * 255.0, (b + m) * 255.0)
    }
}

/// Hue rotated by 180 degrees, saturation and value preserved
pub fn complementary(color: Color) -> Color {
    Hsv::from(color).rotate(180.0).into()
}

/// The two neighbours at -30 and +30 degrees of hue
pub fn analogous(color: Color) -> [Color; 2] {
    let hsv = Hsv::from(color);
    [hsv.rotate(-30.0).into(), hsv.rotate(30.0).into()]
}

/// `count` hue neighbours alternating -step, +step, -2*step, +2*step, ...
///
/// Always returns at least two colors.
pub fn analogous_spread(color: Color, step_degrees: f32, count: usize) -> Vec<Color> {
    let hsv = Hsv::from(color);
    (0..count.max(2))
        .map(|i| {
            let ring = (i / 2 + 1) as f32;
            let sign = if i % 2 == 0 { -1.0 } else { 1.0 };
            hsv.rotate(sign * ring * step_degrees).into()
        })
        .collect()
}
