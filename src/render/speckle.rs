//! Speckle Pattern Generation
//!
//! Draws the dots of a speckled egg from a [`SeededRng`]. Draw order is part
//! of the output contract:
//!
//! ```text
//! count  = floor(u * 20) + 30          (one draw)
//! per point, in order:
//!   x       = u * 100
//!   y       = u * 100
//!   size    = u * size_span + size_min
//!   opacity = u * opacity_span + opacity_min
//! ```
//!
//! Reordering any of these draws changes every pattern already on screen.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::rng::SeededRng;

/// Fewest speckles on a speckled egg.
pub const SPECKLE_COUNT_MIN: usize = 30;

/// Number of distinct speckle counts above the minimum (30..=49).
pub const SPECKLE_COUNT_SPREAD: usize = 20;

/// A single dot on a speckled egg.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecklePoint {
    /// Horizontal position, percent of the egg's bounding box, in [0, 100).
    pub x: f64,
    /// Vertical position, percent of the egg's bounding box, in [0, 100).
    pub y: f64,
    /// Dot diameter.
    pub size: f64,
    /// Dot opacity.
    pub opacity: f64,
}

/// Cosmetic tuning for speckle size and opacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeckleTuning {
    /// Larger, bolder dots: size in [1.0, 3.5), opacity in [0.3, 0.8).
    #[default]
    Revised,
    /// Faint dust: size in [0.5, 2.0), opacity in [0.05, 0.25).
    Classic,
}

impl SpeckleTuning {
    /// `(span, min)` applied to the size draw.
    pub fn size_scale(self) -> (f64, f64) {
        match self {
            SpeckleTuning::Revised => (2.5, 1.0),
            SpeckleTuning::Classic => (1.5, 0.5),
        }
    }

    /// `(span, min)` applied to the opacity draw.
    pub fn opacity_scale(self) -> (f64, f64) {
        match self {
            SpeckleTuning::Revised => (0.5, 0.3),
            SpeckleTuning::Classic => (0.2, 0.05),
        }
    }

    /// Half-open range every speckle size falls in.
    pub fn size_range(self) -> Range<f64> {
        let (span, min) = self.size_scale();
        min..min + span
    }

    /// Half-open range every speckle opacity falls in.
    pub fn opacity_range(self) -> Range<f64> {
        let (span, min) = self.opacity_scale();
        min..min + span
    }
}

impl fmt::Display for SpeckleTuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeckleTuning::Revised => write!(f, "revised"),
            SpeckleTuning::Classic => write!(f, "classic"),
        }
    }
}

impl FromStr for SpeckleTuning {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revised" => Ok(SpeckleTuning::Revised),
            "classic" => Ok(SpeckleTuning::Classic),
            other => Err(format!("unknown speckle tuning: {other}")),
        }
    }
}

/// Draw the speckle count for one egg.
#[inline]
pub fn speckle_count(rng: &mut SeededRng) -> usize {
    (rng.next_unit() * SPECKLE_COUNT_SPREAD as f64).floor() as usize + SPECKLE_COUNT_MIN
}

/// Draw one speckle. Consumes exactly four values.
#[inline]
pub fn next_speckle(rng: &mut SeededRng, tuning: SpeckleTuning) -> SpecklePoint {
    let (size_span, size_min) = tuning.size_scale();
    let (opacity_span, opacity_min) = tuning.opacity_scale();

    let x = rng.next_scaled(100.0, 0.0);
    let y = rng.next_scaled(100.0, 0.0);
    let size = rng.next_scaled(size_span, size_min);
    let opacity = rng.next_scaled(opacity_span, opacity_min);

    SpecklePoint { x, y, size, opacity }
}

/// Generate the full, ordered speckle pattern for an egg.
///
/// Returns an empty list without touching `rng` when `speckled` is false.
pub fn generate_speckles(
    speckled: bool,
    rng: &mut SeededRng,
    tuning: SpeckleTuning,
) -> Vec<SpecklePoint> {
    if !speckled {
        return Vec::new();
    }

    let count = speckle_count(rng);
    (0..count).map(|_| next_speckle(rng, tuning)).collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_not_speckled_is_empty() {
        let mut rng = SeededRng::new(42);
        let before = rng.state();

        let speckles = generate_speckles(false, &mut rng, SpeckleTuning::Revised);

        assert!(speckles.is_empty());
        assert_eq!(rng.state(), before);
    }

    #[test]
    fn test_known_count() {
        // First draw for seed 42 is ~0.6011, so 12 + 30.
        let mut rng = SeededRng::new(42);
        let speckles = generate_speckles(true, &mut rng, SpeckleTuning::Revised);
        assert_eq!(speckles.len(), 42);
    }

    #[test]
    fn test_draw_order() {
        let mut rng = SeededRng::new(2024);
        let speckles = generate_speckles(true, &mut rng, SpeckleTuning::Revised);

        let mut replay = SeededRng::new(2024);
        let count = (replay.next_unit() * 20.0).floor() as usize + 30;
        assert_eq!(speckles.len(), count);

        let first = speckles[0];
        assert_eq!(first.x, replay.next_unit() * 100.0);
        assert_eq!(first.y, replay.next_unit() * 100.0);
        assert_eq!(first.size, replay.next_unit() * 2.5 + 1.0);
        assert_eq!(first.opacity, replay.next_unit() * 0.5 + 0.3);
    }

    #[test]
    fn test_consumes_one_plus_four_per_point() {
        let mut rng = SeededRng::new(77);
        let speckles = generate_speckles(true, &mut rng, SpeckleTuning::Classic);

        let mut counter = SeededRng::new(77);
        for _ in 0..(1 + 4 * speckles.len()) {
            counter.next_u32();
        }
        assert_eq!(rng.state(), counter.state());
    }

    #[test]
    fn test_tuning_changes_only_size_and_opacity() {
        let revised = generate_speckles(true, &mut SeededRng::new(9), SpeckleTuning::Revised);
        let classic = generate_speckles(true, &mut SeededRng::new(9), SpeckleTuning::Classic);

        assert_eq!(revised.len(), classic.len());
        for (a, b) in revised.iter().zip(&classic) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.y, b.y);
            assert_ne!(a.size, b.size);
        }
    }

    #[test]
    fn test_tuning_parse() {
        assert_eq!("revised".parse::<SpeckleTuning>(), Ok(SpeckleTuning::Revised));
        assert_eq!(" Classic ".parse::<SpeckleTuning>(), Ok(SpeckleTuning::Classic));
        assert!("bold".parse::<SpeckleTuning>().is_err());
        assert_eq!(SpeckleTuning::default(), SpeckleTuning::Revised);
        assert_eq!(SpeckleTuning::Classic.to_string(), "classic");
    }

    #[test]
    fn test_tuning_ranges() {
        assert_eq!(SpeckleTuning::Revised.size_range(), 1.0..3.5);
        assert_eq!(SpeckleTuning::Revised.opacity_range(), 0.3..0.8);
        assert_eq!(SpeckleTuning::Classic.size_range(), 0.5..2.0);
        assert_eq!(SpeckleTuning::Classic.opacity_range(), 0.05..0.25);
    }

    proptest! {
        #[test]
        fn prop_count_in_range(seed in any::<u32>()) {
            let speckles = generate_speckles(true, &mut SeededRng::new(seed), SpeckleTuning::Revised);
            prop_assert!((30..=49).contains(&speckles.len()));
        }

        #[test]
        fn prop_points_in_range(seed in any::<u32>(), classic in any::<bool>()) {
            let tuning = if classic { SpeckleTuning::Classic } else { SpeckleTuning::Revised };
            let speckles = generate_speckles(true, &mut SeededRng::new(seed), tuning);

            for point in speckles {
                prop_assert!((0.0..100.0).contains(&point.x));
                prop_assert!((0.0..100.0).contains(&point.y));
                prop_assert!(tuning.size_range().contains(&point.size));
                prop_assert!(tuning.opacity_range().contains(&point.opacity));
                prop_assert!(point.opacity > 0.0 && point.opacity < 1.0);
            }
        }

        #[test]
        fn prop_deterministic(seed in any::<u32>()) {
            let first = generate_speckles(true, &mut SeededRng::new(seed), SpeckleTuning::Revised);
            let second = generate_speckles(true, &mut SeededRng::new(seed), SpeckleTuning::Revised);
            prop_assert_eq!(first, second);
        }
    }
}
