//! Weight to size mapping.

use serde::{Deserialize, Serialize};

/// Lightest weight that still changes the size (grams).
pub const MIN_WEIGHT: f64 = 0.0;

/// Heaviest weight that still changes the size (grams).
pub const MAX_WEIGHT: f64 = 100.0;

/// Width of an egg at `MIN_WEIGHT`.
pub const BASE_WIDTH: f64 = 50.0;

/// Height of an egg at `MIN_WEIGHT`.
pub const BASE_HEIGHT: f64 = 70.0;

/// Width added between `MIN_WEIGHT` and `MAX_WEIGHT`.
pub const MAX_ADDITIONAL_WIDTH: f64 = 50.0;

/// Height added between `MIN_WEIGHT` and `MAX_WEIGHT`.
pub const MAX_ADDITIONAL_HEIGHT: f64 = 60.0;

/// Visual dimensions of an egg, in abstract length units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EggSize {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

/// Clamp a weight into [`MIN_WEIGHT`, `MAX_WEIGHT`].
///
/// NaN maps to `MIN_WEIGHT`.
#[inline]
pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        return MIN_WEIGHT;
    }
    weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// Position of a weight inside the weight range, as a percentage.
#[inline]
pub fn weight_percent(weight: f64) -> f64 {
    (clamp_weight(weight) - MIN_WEIGHT) / (MAX_WEIGHT - MIN_WEIGHT) * 100.0
}

/// Compute the visual size of an egg from its weight.
///
/// Out-of-range weights are clamped rather than rejected, so malformed
/// upstream data still renders.
pub fn size_for_weight(weight: f64) -> EggSize {
    let percent = weight_percent(weight);
    EggSize {
        width: BASE_WIDTH + MAX_ADDITIONAL_WIDTH * percent / 100.0,
        height: BASE_HEIGHT + MAX_ADDITIONAL_HEIGHT * percent / 100.0,
    }
}
