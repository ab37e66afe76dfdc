//! Seed Hashing
//!
//! Provides the deterministic fallback seed for eggs that carry no stored seed:
//! - 32-bit FNV-1a over arbitrary strings
//! - Seed key formatting for `(weight, color)` pairs
//!
//! Not cryptographic. The output only has to be stable across runs and
//! platforms, since it drives a purely cosmetic pattern.

/// FNV-1a 32-bit offset basis.
pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime.
pub const FNV_PRIME: u32 = 16_777_619;

/// Incremental FNV-1a hasher.
///
/// Each character's code point is XORed into the accumulator, which is then
/// multiplied by [`FNV_PRIME`] with 32-bit wraparound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fnv1a32 {
    state: u32,
}

impl Default for Fnv1a32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Fnv1a32 {
    /// Create a hasher at the offset basis.
    pub fn new() -> Self {
        Self { state: FNV_OFFSET_BASIS }
    }

    /// Fold a single character into the hash.
    #[inline]
    pub fn update_char(&mut self, c: char) {
        self.state ^= c as u32;
        self.state = self.state.wrapping_mul(FNV_PRIME);
    }

    /// Fold every character of a string into the hash.
    #[inline]
    pub fn update_str(&mut self, s: &str) {
        for c in s.chars() {
            self.update_char(c);
        }
    }

    /// Current accumulator value.
    #[inline]
    pub fn finish(&self) -> u32 {
        self.state
    }
}

/// Hash a string with 32-bit FNV-1a.
///
/// # Example
///
/// ```
/// use egg_tracker::core::hash::hash_str;
///
/// assert_eq!(hash_str(""), 2166136261);
/// assert_eq!(hash_str("a"), 0xE40C292C);
/// ```
pub fn hash_str(s: &str) -> u32 {
    let mut hasher = Fnv1a32::new();
    hasher.update_str(s);
    hasher.finish()
}

/// Build the seed key for an egg: `"<weight>-<color>"`.
///
/// Weight uses the shortest round-trip formatting, so whole grams print
/// without a fractional part (`65.0` becomes `"65"`). Negative zero prints as
/// `"0"` and infinities as `"Infinity"`/`"-Infinity"`. Values at or above
/// 1e21, or below 1e-6, print in plain positional form rather than with an
/// exponent; no egg weighs that.
pub fn seed_key(weight: f64, color: &str) -> String {
    if weight == 0.0 {
        // Also catches -0.0.
        format!("0-{color}")
    } else if weight.is_infinite() {
        let sign = if weight < 0.0 { "-" } else { "" };
        format!("{sign}Infinity-{color}")
    } else {
        format!("{weight}-{color}")
    }
}

/// Derive a pattern seed from an egg's weight and color.
pub fn derive_seed(weight: f64, color: &str) -> u32 {
    hash_str(&seed_key(weight, color))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_is_offset_basis() {
        assert_eq!(hash_str(""), FNV_OFFSET_BASIS);
    }

    #[test]
    fn test_known_values() {
        // Reference FNV-1a 32-bit vectors. These must never change,
        // otherwise every stored egg without a seed changes pattern.
        assert_eq!(hash_str("a"), 0xE40C_292C);
        assert_eq!(hash_str("foobar"), 0xBF9C_F968);
    }

    #[test]
    fn test_incremental_matches_oneshot() {
        let mut hasher = Fnv1a32::new();
        hasher.update_str("65-");
        hasher.update_str("#f0d6a3");
        assert_eq!(hasher.finish(), hash_str("65-#f0d6a3"));
    }

    #[test]
    fn test_seed_key_formatting() {
        assert_eq!(seed_key(65.0, "#f0d6a3"), "65-#f0d6a3");
        assert_eq!(seed_key(65.5, "#fbe5ce"), "65.5-#fbe5ce");
        assert_eq!(seed_key(0.0, ""), "0-");
    }

    #[test]
    fn test_seed_key_special_weights() {
        assert_eq!(seed_key(-0.0, "#fff"), "0-#fff");
        assert_eq!(derive_seed(-0.0, "#fff"), derive_seed(0.0, "#fff"));
        assert_eq!(seed_key(f64::INFINITY, "#fff"), "Infinity-#fff");
        assert_eq!(seed_key(f64::NEG_INFINITY, "#fff"), "-Infinity-#fff");
        assert_eq!(seed_key(f64::NAN, "#fff"), "NaN-#fff");
        assert_eq!(seed_key(-3.5, "#fff"), "-3.5-#fff");
    }

    #[test]
    fn test_derive_seed_determinism() {
        let seed1 = derive_seed(65.0, "#f0d6a3");
        let seed2 = derive_seed(65.0, "#f0d6a3");
        assert_eq!(seed1, seed2);
    }

    #[test]
    fn test_derive_seed_sensitivity() {
        let base = derive_seed(65.0, "#f0d6a3");
        assert_ne!(base, derive_seed(66.0, "#f0d6a3"));
        assert_ne!(base, derive_seed(65.0, "#000000"));
    }

    #[test]
    fn test_non_ascii_input() {
        // Any string hashes; multi-byte characters fold in by code point.
        let mut hasher = Fnv1a32::new();
        hasher.update_char('é');
        let expected = (FNV_OFFSET_BASIS ^ 0xE9).wrapping_mul(FNV_PRIME);
        assert_eq!(hasher.finish(), expected);
        assert_eq!(hash_str("é"), expected);
    }
}
