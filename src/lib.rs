//! # Egg Tracker Server
//!
//! Egg-laying ledger for a small quail flock, with a deterministic renderer
//! that turns an egg's weight, color and seed into a drawable shape.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    EGG TRACKER SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── hash.rs     - FNV-1a seed derivation                    │
//! │  └── rng.rs      - Mulberry32 sequence generator             │
//! │                                                              │
//! │  render/         - Egg rendering (pure)                      │
//! │  ├── size.rs     - Weight to width/height                    │
//! │  ├── speckle.rs  - Speckle pattern generation                │
//! │  └── visual.rs   - Render pass                               │
//! │                                                              │
//! │  ledger/         - Egg log model and queries                 │
//! │  ├── model.rs    - Eggs, rows, days                          │
//! │  ├── timeline.rs - Day grouping and the weekly timeline      │
//! │  ├── stats.rs    - Aggregate statistics                      │
//! │  └── flock.rs    - Quail profiles                            │
//! │                                                              │
//! │  store/          - Row storage (memory, JSON file)           │
//! │                                                              │
//! │  network/        - WebSocket service                         │
//! │  ├── server.rs   - Connection handling                       │
//! │  ├── service.rs  - Request dispatch                          │
//! │  └── protocol.rs - Message types                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! The same weight, color and seed always render the same speckles on any
//! platform. Speckled eggs are given a seed when written, so an egg keeps its
//! pattern for as long as it is stored.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod ledger;
pub mod network;
pub mod render;
pub mod store;

// Re-export commonly used types
pub use core::{derive_seed, SeededRng};
pub use ledger::{DayRecord, Egg, EggInput, EggRow, EggStats};
pub use render::{render_egg, size_for_weight, EggSize, EggVisual, RenderedEgg, SpeckleTuning};
pub use store::{EggStore, FileStore, MemoryStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
