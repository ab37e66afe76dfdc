//! Egg Ledger
//!
//! The record-keeping domain: what an egg row is, how rows group into days,
//! the seven-day timeline, aggregate statistics, and the flock roster.

pub mod flock;
pub mod model;
pub mod stats;
pub mod timeline;

pub use flock::{default_flock, QuailProfile, Sex};
pub use model::{DayRecord, Egg, EggInput, EggRow, EggValidationError, StoredEgg};
pub use stats::{compute_stats, EggStats, WeightRanges};
pub use timeline::{build_timeline, group_by_day, last_n_days, TimelineDay, TimelineEgg};
