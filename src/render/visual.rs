//! Render Pass
//!
//! Turns an [`EggVisual`] into a [`RenderedEgg`]: size from weight, seed from
//! the stored value or the `(weight, color)` hash, speckles from a fresh
//! generator. Nothing is shared between calls.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::hash::derive_seed;
use crate::core::rng::SeededRng;

use super::size::{size_for_weight, EggSize};
use super::speckle::{generate_speckles, SpecklePoint, SpeckleTuning};

/// Base fill used when the caller supplies no color.
pub const DEFAULT_EGG_COLOR: &str = "#f0e0c8";

/// Input of a single render pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EggVisual {
    /// Weight in grams. Clamped for sizing only.
    pub weight: f64,
    /// Base fill, used verbatim.
    #[serde(default = "default_color")]
    pub color: String,
    /// Whether to draw speckles.
    #[serde(default)]
    pub speckled: bool,
    /// Explicit pattern seed. `None` and `Some(0)` both fall back to the hash.
    #[serde(default)]
    pub seed: Option<u32>,
}

fn default_color() -> String {
    DEFAULT_EGG_COLOR.to_string()
}

impl EggVisual {
    /// Create a plain egg with the default color.
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            color: default_color(),
            speckled: false,
            seed: None,
        }
    }

    /// Set the base color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the speckle flag.
    pub fn with_speckles(mut self, speckled: bool) -> Self {
        self.speckled = speckled;
        self
    }

    /// Set an explicit seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed that drives this egg's pattern.
    ///
    /// An explicit non-zero seed wins; otherwise the seed is derived from
    /// weight and color.
    pub fn effective_seed(&self) -> u32 {
        match self.seed {
            Some(seed) if seed != 0 => seed,
            _ => derive_seed(self.weight, &self.color),
        }
    }

    /// Speckle pattern for this egg, without size or key.
    pub fn speckles(&self, tuning: SpeckleTuning) -> Vec<SpecklePoint> {
        if !self.speckled {
            return Vec::new();
        }
        let mut rng = SeededRng::new(self.effective_seed());
        generate_speckles(true, &mut rng, tuning)
    }
}

/// Output of a single render pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderedEgg {
    /// Unique label for this rendered instance.
    pub key: Uuid,
    /// Visual dimensions.
    #[serde(flatten)]
    pub size: EggSize,
    /// Base fill.
    pub color: String,
    /// Ordered speckle list; empty for plain eggs.
    pub speckles: Vec<SpecklePoint>,
}

impl RenderedEgg {
    /// Key used for the `index`-th speckle of this egg in a rendered list.
    pub fn speckle_key(&self, index: usize) -> String {
        format!("{}-speckle-{}", self.key, index)
    }
}

/// Render one egg.
pub fn render_egg(visual: &EggVisual, tuning: SpeckleTuning) -> RenderedEgg {
    RenderedEgg {
        key: Uuid::new_v4(),
        size: size_for_weight(visual.weight),
        color: visual.color.clone(),
        speckles: visual.speckles(tuning),
    }
}

// =============================================================================
// TESTS
// =============================================================================
