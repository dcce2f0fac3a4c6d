//! Color handling: per-disc jitter, plate palettes, and color-deficiency simulation.
pub mod cvd;
pub mod jitter;
pub mod palette;

pub use cvd::{ColorAppearanceTransform, DeficiencyKind, DeficiencySpec, MachadoTransform};
pub use jitter::{jitter, DEFAULT_JITTER_SPREAD};
pub use palette::{ColorCategory, PlatePalette};
