//! Subtractive (pigment) mixing
//!
//! Each channel is treated as ink absorption: the mix averages `255 - c`
//! across inputs and converts back. Sums are integer so the result never
//! depends on input order.

use serde::{Deserialize, Serialize};

use super::{Color, channel_u8};
use crate::consts::MAX_MIX_REPEATS;

/// A color contributing to a blend with some weight (proportion, area, count)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixSample {
    pub color: Color,
    pub weight: f32,
}

impl MixSample {
    pub fn new(color: Color, weight: f32) -> Self {
        Self { color, weight }
    }
}

/// Mix colors like pigments. Empty input yields white.
pub fn mix_subtractive(colors: &[Color]) -> Color {
    let mut absorb = [0u64; 3];
    for c in colors {
        for (acc, ch) in absorb.iter_mut().zip(c.channels()) {
            *acc += (255 - ch) as u64;
        }
    }
    from_absorption(absorb, colors.len() as u64)
}

/// Duplication-weighted subtractive mix
///
/// Each sample is repeated `1..=20` times in proportion to its share of the
/// total weight, then the multiset is mixed with [`mix_subtractive`].
/// Samples with non-positive or non-finite weight are dropped.
pub fn mix_weighted(samples: &[MixSample]) -> Color {
    let valid = || {
        samples
            .iter()
            .filter(|s| s.weight.is_finite() && s.weight > 0.0)
    };
    let total: f32 = valid().map(|s| s.weight).sum();
    if total <= 0.0 || !total.is_finite() {
        return Color::WHITE;
    }

    let mut absorb = [0u64; 3];
    let mut count = 0u64;
    for sample in valid() {
        let repeats = repeat_count(sample.weight, total) as u64;
        for (acc, ch) in absorb.iter_mut().zip(sample.color.channels()) {
            *acc += (255 - ch) as u64 * repeats;
        }
        count += repeats;
    }
    from_absorption(absorb, count)
}

/// Number of times a sample is duplicated in a weighted mix
#[inline]
pub fn repeat_count(weight: f32, total: f32) -> u32 {
    let share = (weight / total).clamp(0.0, 1.0);
    ((share * MAX_MIX_REPEATS as f32).round() as u32).clamp(1, MAX_MIX_REPEATS)
}

fn from_absorption(absorb: [u64; 3], count: u64) -> Color {
    if count == 0 {
        return Color::WHITE;
    }
    let n = count as f32;
    let [r, g, b] = absorb.map(|a| 255.0 - a as f32 / n);
    Color::rgb(channel_u8(r), channel_u8(g), channel_u8(b))
}
