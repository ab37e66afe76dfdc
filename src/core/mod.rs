//! Core deterministic primitives.
//!
//! Everything in this module is a pure function of its inputs, so a stored
//! egg renders the same pattern on every client and every run.

pub mod hash;
pub mod rng;

// Re-export core types
pub use hash::{derive_seed, hash_str};
pub use rng::SeededRng;
