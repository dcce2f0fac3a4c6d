#![forbid(unsafe_code)]
//! plate_scatter: Color vision test plates from randomly packed discs.
//!
//! Modules:
//! - packing: two-phase disc packer with grid or exact occupancy
//! - color: palettes, per-disc jitter, and color vision deficiency simulation
//! - glyph: glyph masks and the built-in bitmap digit source
//! - raster, mask: disc rasterization and the circular plate mask
//! - plate: the assembler tying the stages together, plus events
//!
//! For examples, see the `plate_scatter_examples` crate.
pub mod color;
pub mod error;
pub mod events;
pub mod glyph;
pub mod mask;
pub mod packing;
pub mod plate;
pub mod raster;
pub(crate) mod sampling;

/// Convenient re-exports for common types. Import with `use plate_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::color::{
        jitter, ColorAppearanceTransform, ColorCategory, DeficiencyKind, DeficiencySpec,
        MachadoTransform, PlatePalette,
    };
    pub use crate::error::{Error, Result};
    pub use crate::events::{EventSink, FnSink, PlateEvent, PlateEventKind, VecSink};
    pub use crate::glyph::{BitmapDigits, GlyphMask, GlyphSource};
    pub use crate::mask::{apply_circular_mask, circular_alpha, CircularMask};
    pub use crate::packing::{
        Disc, DiscPacker, ExactOccupancy, GlyphPolicy, GridOccupancy, OccupancyIndex,
        OccupancyStrategy, PackConfig, PackPhase, PackResult, PackStats, PackedSet, PhaseOrder,
    };
    pub use crate::plate::{Plate, PlateAssembler, PlateConfig, PlateStage};
    pub use crate::raster::{render_discs, stamp_disc};
}
