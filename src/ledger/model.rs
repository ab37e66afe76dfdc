//! Egg records as stored and as submitted.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::EggVisual;

/// Base color for plain eggs.
pub const PLAIN_EGG_COLOR: &str = "#fbe5ce";

/// Base color for speckled eggs.
pub const SPECKLED_EGG_COLOR: &str = "#f0d6a3";

/// Upper bound (inclusive) for seeds assigned at write time.
pub const MAX_ASSIGNED_SEED: u32 = 1_000_000;

/// A submitted egg is unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EggValidationError {
    /// Weight is negative, infinite or NaN.
    #[error("weight must be a finite, non-negative number of grams, got {0}")]
    InvalidWeight(f64),
    /// Color was supplied but is blank.
    #[error("color must not be empty")]
    EmptyColor,
}

/// An egg as submitted by a client.
///
/// Missing fields are filled in by [`EggInput::into_egg`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EggInput {
    /// Weight in grams.
    pub weight: f64,
    /// Base color. Defaults by speckle flag.
    #[serde(default)]
    pub color: Option<String>,
    /// Speckled shell.
    #[serde(default)]
    pub speckled: bool,
    /// Pattern seed chosen by the client, if any.
    #[serde(default)]
    pub seed: Option<u32>,
}

impl EggInput {
    /// Plain egg of the given weight.
    pub fn plain(weight: f64) -> Self {
        Self {
            weight,
            color: None,
            speckled: false,
            seed: None,
        }
    }

    /// Speckled egg of the given weight.
    pub fn speckled(weight: f64) -> Self {
        Self {
            speckled: true,
            ..Self::plain(weight)
        }
    }

    /// Validate and normalize into a storable [`Egg`].
    ///
    /// Speckled eggs without a non-zero seed get one drawn from `rng`, so the
    /// pattern is pinned from the moment the egg is written. Plain eggs never
    /// store a seed.
    pub fn into_egg<R: Rng>(self, rng: &mut R) -> Result<Egg, EggValidationError> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(EggValidationError::InvalidWeight(self.weight));
        }

        let color = match self.color {
            Some(color) if color.trim().is_empty() => return Err(EggValidationError::EmptyColor),
            Some(color) => color,
            None if self.speckled => SPECKLED_EGG_COLOR.to_string(),
            None => PLAIN_EGG_COLOR.to_string(),
        };

        let seed = match (self.speckled, self.seed) {
            (false, _) => None,
            (true, Some(seed)) if seed != 0 => Some(seed),
            (true, _) => Some(rng.gen_range(1..=MAX_ASSIGNED_SEED)),
        };

        Ok(Egg {
            weight: self.weight,
            color,
            speckled: self.speckled,
            seed,
        })
    }
}

/// A stored egg.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Egg {
    /// Weight in grams.
    pub weight: f64,
    /// Base color.
    pub color: String,
    /// Speckled shell.
    #[serde(default)]
    pub speckled: bool,
    /// Pattern seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl From<&Egg> for EggVisual {
    fn from(egg: &Egg) -> Self {
        EggVisual {
            weight: egg.weight,
            color: egg.color.clone(),
            speckled: egg.speckled,
            seed: egg.seed,
        }
    }
}

/// One row of the egg log: an egg and the day it was laid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EggRow {
    /// Day the egg was collected.
    pub date: NaiveDate,
    /// The egg.
    #[serde(flatten)]
    pub egg: Egg,
}

/// An egg together with its row position in the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredEgg {
    /// Zero-based row index, used to address updates and deletes.
    pub row_index: usize,
    /// The egg.
    #[serde(flatten)]
    pub egg: Egg,
}

/// All eggs collected on one day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Collection day.
    pub date: NaiveDate,
    /// Eggs in row order.
    pub eggs: Vec<StoredEgg>,
}

impl DayRecord {
    /// A day with no eggs.
    pub fn empty(date: NaiveDate) -> Self {
        Self { date, eggs: Vec::new() }
    }
}
