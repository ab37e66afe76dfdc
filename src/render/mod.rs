//! Deterministic Speckle Renderer
//!
//! Computes the on-screen description of an egg: a size interpolated from its
//! weight and, for speckled eggs, a reproducible set of dots. Rendering
//! clients draw exactly what this module returns.

pub mod size;
pub mod speckle;
pub mod visual;

pub use size::{size_for_weight, EggSize};
pub use speckle::{generate_speckles, SpecklePoint, SpeckleTuning};
pub use visual::{render_egg, EggVisual, RenderedEgg, DEFAULT_EGG_COLOR};
