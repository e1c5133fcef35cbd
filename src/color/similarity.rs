//! Perceptual similarity scoring
//!
//! Weighted Euclidean distance in normalized RGB, green-dominant per the
//! standard luminance weights. Every game mode scores progress with this.

use serde::{Deserialize, Serialize};

use super::Color;
use crate::consts::{LUMA_B, LUMA_G, LUMA_R};

/// Per-channel weights for the distance metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            r: LUMA_R,
            g: LUMA_G,
            b: LUMA_B,
        }
    }
}

impl SimilarityWeights {
    /// Non-negative, finite weights (bad values become 0)
    pub fn sanitized(self) -> Self {
        let fix = |w: f32| if w.is_finite() { w.max(0.0) } else { 0.0 };
        Self {
            r: fix(self.r),
            g: fix(self.g),
            b: fix(self.b),
        }
    }
}

/// Weighted distance between two colors in normalized RGB space
pub fn weighted_distance(a: Color, b: Color, weights: &SimilarityWeights) -> f32 {
    let [ar, ag, ab] = a.to_unit();
    let [br, bg, bb] = b.to_unit();
    let dr = ar - br;
    let dg = ag - bg;
    let db = ab - bb;
    (weights.r * dr * dr + weights.g * dg * dg + weights.b * db * db).sqrt()
}

/// Similarity in [0, 1] with the default luminance weights
///
/// Identical colors score exactly 1.0. White vs black reaches the theoretical
/// minimum `1 - sqrt(0.3 + 0.59 + 0.11) = 0`.
#[inline]
pub fn similarity(a: Color, b: Color) -> f32 {
    similarity_with(a, b, &SimilarityWeights::default())
}

/// Similarity in [0, 1] with custom weights
pub fn similarity_with(a: Color, b: Color, weights: &SimilarityWeights) -> f32 {
    (1.0 - weighted_distance(a, b, weights)).clamp(0.0, 1.0)
}

/// Scores produced colors against a puzzle target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scorer {
    pub target: Color,
    /// Score at or above which the puzzle counts as solved
    pub threshold: f32,
    #[serde(default)]
    pub weights: SimilarityWeights,
}

impl Scorer {
    pub fn new(target: Color, threshold: f32) -> Self {
        Self::with_weights(target, threshold, SimilarityWeights::default())
    }

    pub fn with_weights(target: Color, threshold: f32, weights: SimilarityWeights) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            target,
            threshold,
            weights: weights.sanitized(),
        }
    }

    pub fn score(&self, color: Color) -> f32 {
        similarity_with(color, self.target, &self.weights)
    }

    pub fn is_match(&self, color: Color) -> bool {
        self.score(color) >= self.threshold
    }
}
